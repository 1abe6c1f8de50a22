//! Developer-tooling notification hook.
//!
//! The application reports mount and unmount to an optional
//! [`DevtoolsHook`]; what the tooling does with it is its own business.

use super::application::App;
use crate::host::HostOps;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives application lifecycle notifications.
pub trait DevtoolsHook<H: HostOps + 'static> {
    /// Called after a successful mount.
    fn app_init(&self, app: &App<H>, version: &str);

    /// Called during unmount, after the root has been torn down.
    fn app_unmount(&self, app: &App<H>, version: &str);
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevtoolsEvent {
    Init { uid: u64, version: String },
    Unmount { uid: u64, version: String },
}

/// Records notifications in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDevtools {
    events: Rc<RefCell<Vec<DevtoolsEvent>>>,
}

impl RecordingDevtools {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<DevtoolsEvent> {
        self.events.borrow().clone()
    }
}

impl<H: HostOps + 'static> DevtoolsHook<H> for RecordingDevtools {
    fn app_init(&self, app: &App<H>, version: &str) {
        self.events.borrow_mut().push(DevtoolsEvent::Init {
            uid: app.uid(),
            version: version.to_string(),
        });
    }

    fn app_unmount(&self, app: &App<H>, version: &str) {
        self.events.borrow_mut().push(DevtoolsEvent::Unmount {
            uid: app.uid(),
            version: version.to_string(),
        });
    }
}
