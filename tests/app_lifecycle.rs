use hostkit::app::{
    create_app_api, AppFactory, ComponentInstance, DevtoolsEvent, MountState, Plugin,
    RecordingDevtools, SequentialIds, VNode,
};
use hostkit::diagnostics::RecordingSink;
use hostkit::dom::{Document, DomOps, NodeId};
use hostkit::domain::{Component, ComponentDefinition, Directive};
use hostkit::{App, AppConfig, AppContext, FeatureFlags, HostOps, HostkitError};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One call to the root render callback.
#[derive(Clone)]
struct RenderCall {
    had_vnode: bool,
    container: NodeId,
    is_svg: bool,
    context: Option<Rc<RefCell<AppContext>>>,
}

#[derive(Clone, Default)]
struct RenderLog(Rc<RefCell<Vec<RenderCall>>>);

impl RenderLog {
    fn calls(&self) -> Vec<RenderCall> {
        self.0.borrow().clone()
    }

    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

struct Harness {
    doc: Document,
    host: Rc<DomOps>,
    log: RenderLog,
    sink: RecordingSink,
    devtools: RecordingDevtools,
    factory: AppFactory<DomOps>,
}

fn dev_flags() -> FeatureFlags {
    FeatureFlags {
        dev: true,
        ..FeatureFlags::default()
    }
}

/// Factory whose renderer records each call and attaches a root instance
/// exposing `{"ready": true}`.
fn harness_with(flags: FeatureFlags) -> Harness {
    let doc = Document::new();
    let host = Rc::new(DomOps::new(doc.clone()));
    let log = RenderLog::default();
    let sink = RecordingSink::new();
    let devtools = RecordingDevtools::new();

    let recorded = log.clone();
    let factory = create_app_api(
        Rc::clone(&host),
        move |vnode: Option<&mut VNode>, container: &NodeId, is_svg: bool| {
            let mut call = RenderCall {
                had_vnode: vnode.is_some(),
                container: *container,
                is_svg,
                context: None,
            };
            if let Some(vnode) = vnode {
                call.context = vnode.app_context.clone();
                let exposed: Rc<dyn std::any::Any> = Rc::new(json!({ "ready": true }));
                vnode.component_instance =
                    Some(Rc::new(ComponentInstance::new(1, Rc::new(())).with_exposed(exposed)));
            }
            recorded.0.borrow_mut().push(call);
        },
        None,
    )
    .with_flags(flags)
    .with_ids(SequentialIds::starting_at(1))
    .with_diagnostics(sink.clone())
    .with_devtools(devtools.clone());

    Harness {
        doc,
        host,
        log,
        sink,
        devtools,
        factory,
    }
}

fn harness() -> Harness {
    harness_with(dev_flags())
}

fn root() -> Component {
    Component::new(ComponentDefinition::default())
}

#[test]
fn example_scenario() {
    let h = harness();
    let app = h.factory.create_app(root(), Some(json!({ "msg": "hi" })));
    assert_eq!(app.root_props().and_then(|p| p.get("msg")), Some(&json!("hi")));

    let container = h.doc.create_element("div", hostkit::dom::Namespace::Html);
    h.doc.append_child(h.doc.body(), container);

    let proxy = app.mount(&container, false, false).expect("root instance");
    assert_eq!(proxy.downcast_ref::<Value>(), Some(&json!({ "ready": true })));

    let calls = h.log.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].had_vnode);
    assert_eq!(calls[0].container, container);
    let context = calls[0].context.clone().expect("context attached to root node");
    assert!(Rc::ptr_eq(&context, &app.context()));

    let owner = App::from_container(&*h.host, &container).expect("container tagged");
    assert!(owner.ptr_eq(&app));
    assert_eq!(app.container(), Some(container));

    app.unmount();
    let calls = h.log.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[1].had_vnode);
    assert_eq!(calls[1].container, container);
    assert!(h.host.container_app(&container).is_none());
    assert!(App::from_container(&*h.host, &container).is_none());
    assert!(h.sink.is_empty(), "{:?}", h.sink.messages());
}

#[test]
fn plugin_installs_once() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let plugin: Plugin<DomOps> = Plugin::with_install("counter", move |_app, options| {
        assert_eq!(options, &[json!("opt")]);
        counter.set(counter.get() + 1);
    });

    for _ in 0..3 {
        app.use_plugin(&plugin, &[json!("opt")]);
    }

    assert_eq!(runs.get(), 1);
    assert_eq!(app.installed_plugins(), 1);
    assert_eq!(h.sink.len(), 2);
    assert!(h.sink.contains("Plugin has already been applied to target app."));
}

#[test]
fn plugin_install_preferred_over_call() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    let used = Rc::new(RefCell::new(Vec::new()));
    let (a, b) = (Rc::clone(&used), Rc::clone(&used));
    let plugin: Plugin<DomOps> = Plugin::from_parts(
        None,
        Some(Rc::new(move |_: &App<DomOps>, _: &[Value]| a.borrow_mut().push("install"))),
        Some(Rc::new(move |_: &App<DomOps>, _: &[Value]| b.borrow_mut().push("call"))),
    );

    app.use_plugin(&plugin, &[]);
    assert_eq!(*used.borrow(), vec!["install"]);
}

#[test]
fn plugin_without_capability_is_rejected() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    app.use_plugin(&Plugin::from_parts(None, None, None), &[]);
    assert_eq!(app.installed_plugins(), 0);
    assert!(h.sink.contains("A plugin must either be a function"));
}

#[test]
fn plugin_can_configure_app() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    let plugin: Plugin<DomOps> = Plugin::from_fn(|app, _| {
        app.provide("theme", String::from("dark"))
            .register_component("Card", Component::new(ComponentDefinition::named("Card")));
    });
    app.use_plugin(&plugin, &[]);

    assert!(app.component("Card").is_some());
    let theme = app.context().borrow().inject::<String>("theme");
    assert_eq!(theme.as_deref(), Some("dark"));
}

#[test]
fn component_overwrite_keeps_second() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    let first = Component::new(ComponentDefinition::named("First"));
    let second = Component::new(ComponentDefinition::named("Second"));

    app.register_component("MyCard", first.clone());
    assert!(app.component("MyCard").is_some_and(|c| c.ptr_eq(&first)));
    assert!(h.sink.is_empty());

    app.register_component("MyCard", second.clone());
    assert!(app.component("MyCard").is_some_and(|c| c.ptr_eq(&second)));
    assert!(h.sink.contains("Component \"MyCard\" has already been registered in target app."));
    assert!(app.component("Missing").is_none());
}

#[test]
fn native_and_builtin_component_names_warn() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    app.register_component("div", root());
    app.register_component("slot", root());
    app.register_component("1bad", root());

    let messages = h.sink.messages();
    assert!(messages.contains(&"Do not use built-in or reserved HTML elements as component id: div".to_string()));
    assert!(messages.contains(&"Do not use built-in or reserved HTML elements as component id: slot".to_string()));
    assert!(h.sink.contains("Invalid component name: \"1bad\""));
    // Validation never blocks registration.
    assert!(app.component("div").is_some());
}

#[test]
fn directive_registry() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    let focus = Directive::function();
    app.register_directive("focus", focus.clone());
    assert!(app.directive("focus").is_some_and(|d| d.ptr_eq(&focus)));

    app.register_directive("if", Directive::function());
    app.register_directive("focus", Directive::function());
    assert!(h.sink.contains("Do not use built-in directive ids as custom directive id: if"));
    assert!(h.sink.contains("Directive \"focus\" has already been registered in target app."));
    assert!(!app.directive("focus").is_some_and(|d| d.ptr_eq(&focus)));
}

#[test]
fn provide_overwrite_resolves_latest() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    app.provide("k", 1_i32);
    assert!(h.sink.is_empty());
    app.provide("k", 2_i32);

    assert_eq!(app.context().borrow().inject::<i32>("k"), Some(2));
    assert!(h.sink.contains("App already provides property with key \"k\""));
}

#[test]
fn mount_is_idempotent() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    let container = h.doc.body();

    let first = app.mount(&container, false, true);
    assert!(first.is_some());
    assert!(app.mount(&container, false, false).is_none());

    let calls = h.log.calls();
    assert_eq!(calls.iter().filter(|c| c.had_vnode).count(), 1);
    assert!(calls[0].is_svg);
    assert!(app.is_mounted());
    assert!(h.sink.contains("App has already been mounted."));
    assert_eq!(
        first.and_then(|p| p.downcast_ref::<Value>().cloned()),
        Some(json!({ "ready": true }))
    );
}

#[test]
fn unmounted_app_stays_locked() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    let container = h.doc.body();

    app.mount(&container, false, false);
    app.unmount();
    assert_eq!(app.state(), MountState::Unmounted);

    assert!(app.mount(&container, false, false).is_none());
    assert_eq!(h.log.len(), 2);
    assert!(h.sink.contains("App has already been unmounted and cannot be mounted again."));
    assert!(h.host.container_app(&container).is_none());
}

#[test]
fn unmount_without_mount_warns() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    app.unmount();
    assert_eq!(h.log.len(), 0);
    assert_eq!(app.state(), MountState::Pending);
    assert_eq!(h.sink.messages(), vec!["Cannot unmount an app that is not mounted.".to_string()]);
}

#[test]
fn bad_root_props_are_discarded() {
    let h = harness();
    let app = h.factory.create_app(root(), Some(json!([1, 2])));
    assert!(app.root_props().is_none());
    assert!(h.sink.contains("root props passed to app.mount() must be an object."));

    let app = h.factory.create_app(root(), Some(Value::Null));
    assert!(app.root_props().is_none());
    assert_eq!(h.sink.len(), 1);
}

#[test]
fn set_config_is_refused() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    app.config_mut().performance = true;

    app.set_config(AppConfig::default());

    assert!(app.config().performance);
    assert!(h.sink.contains("app.config cannot be replaced. Modify individual options instead."));
}

#[test]
fn dev_config_knows_native_tags() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    assert!(app.config().is_native_tag("div"));

    let prod = harness_with(FeatureFlags {
        dev: false,
        ..FeatureFlags::default()
    });
    let app = prod.factory.create_app(root(), None);
    assert!(!app.config().is_native_tag("div"));
}

#[test]
fn mixins() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    let logger = Component::new(ComponentDefinition::named("Logger"));
    app.mixin(logger.clone());
    app.mixin(logger);
    assert_eq!(app.context().borrow().mixins.len(), 1);
    assert!(h.sink.contains("Mixin has already been applied to target app: Logger"));

    let no_options = harness_with(FeatureFlags {
        dev: true,
        options_api: false,
        ..FeatureFlags::default()
    });
    let app = no_options.factory.create_app(root(), None);
    app.mixin(root());
    assert!(app.context().borrow().mixins.is_empty());
    assert!(no_options
        .sink
        .contains("Mixins are only available in builds supporting Options API"));
}

#[test]
fn warn_handler_takes_over() {
    let h = harness();
    let app = h.factory.create_app(Component::new(ComponentDefinition::named("Shell")), None);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let into = Rc::clone(&seen);
    app.config_mut().warn_handler = Some(Rc::new(move |msg: &str, trace: Option<&str>| {
        into.borrow_mut()
            .push((msg.to_string(), trace.map(str::to_string)));
    }));

    app.unmount();

    assert!(h.sink.is_empty());
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "Cannot unmount an app that is not mounted.");
    assert_eq!(seen[0].1.as_deref(), Some("at <App uid=1 root=Shell>"));
}

#[test]
fn warnings_silent_outside_dev() {
    let h = harness_with(FeatureFlags {
        dev: false,
        ..FeatureFlags::default()
    });
    let app = h.factory.create_app(root(), None);
    app.unmount();
    app.provide("k", 1_u8).provide("k", 2_u8);
    assert!(h.sink.is_empty());
}

#[test]
fn missing_root_instance_goes_to_error_handler() {
    let doc = Document::new();
    let host = Rc::new(DomOps::new(doc.clone()));
    let factory = create_app_api(
        host,
        |_: Option<&mut VNode>, _: &NodeId, _: bool| {},
        None,
    )
    .with_flags(dev_flags())
    .with_diagnostics(RecordingSink::new());
    let app = factory.create_app(root(), None);

    let errors = Rc::new(RefCell::new(Vec::new()));
    let into = Rc::clone(&errors);
    app.config_mut().error_handler = Some(Rc::new(move |err: &HostkitError, info: &str| {
        into.borrow_mut().push(format!("{info}: {err}"));
    }));

    assert!(app.mount(&doc.body(), false, false).is_none());
    assert!(app.is_mounted());
    assert_eq!(errors.borrow().len(), 1);
    assert!(errors.borrow()[0].starts_with("mount: Renderer produced no root component instance"));
}

#[test]
fn hydrate_used_when_requested() {
    let doc = Document::new();
    let host = Rc::new(DomOps::new(doc.clone()));
    let hydrated = Rc::new(Cell::new(0));
    let count = Rc::clone(&hydrated);
    let factory = create_app_api(
        host,
        |_: Option<&mut VNode>, _: &NodeId, _: bool| panic!("render must not run"),
        Some(Rc::new(move |vnode: &mut VNode, _: &NodeId| {
            count.set(count.get() + 1);
            vnode.component_instance = Some(Rc::new(ComponentInstance::new(1, Rc::new(()))));
        })),
    )
    .with_flags(FeatureFlags {
        dev: false,
        ..FeatureFlags::default()
    });

    let app = factory.create_app(root(), None);
    assert!(app.mount(&doc.body(), true, false).is_some());
    assert_eq!(hydrated.get(), 1);
}

#[test]
fn devtools_notified() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    app.mount(&h.doc.body(), false, false);
    assert!(app.instance().is_some());
    app.unmount();
    assert!(app.instance().is_none());

    assert_eq!(
        h.devtools.events(),
        vec![
            DevtoolsEvent::Init {
                uid: 1,
                version: hostkit::VERSION.to_string()
            },
            DevtoolsEvent::Unmount {
                uid: 1,
                version: hostkit::VERSION.to_string()
            },
        ]
    );
}

#[test]
fn reload_rerenders_until_unmount() {
    let h = harness();
    let app = h.factory.create_app(root(), None);
    assert!(!app.trigger_reload());

    app.mount(&h.doc.body(), false, false);
    assert!(app.trigger_reload());
    let calls = h.log.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].had_vnode);
    assert_eq!(calls[1].container, h.doc.body());

    app.unmount();
    assert!(!app.trigger_reload());
}

#[test]
fn reload_absent_in_production() {
    let h = harness_with(FeatureFlags {
        dev: false,
        ..FeatureFlags::default()
    });
    let app = h.factory.create_app(root(), None);
    app.mount(&h.doc.body(), false, false);
    assert!(!app.trigger_reload());
    assert!(app.instance().is_none());
    assert!(h.devtools.events().is_empty());
}

#[test]
fn apps_are_independent() {
    let h = harness();
    let a = h.factory.create_app(root(), None);
    let b = h.factory.create_app(root(), None);
    a.register_component("Only", root());

    assert_ne!(a.uid(), b.uid());
    assert!(b.component("Only").is_none());
    assert!(!Rc::ptr_eq(&a.context(), &b.context()));
}

#[test]
fn mount_selector_prepares_container() {
    let h = harness();
    let target = h.doc.create_element("div", hostkit::dom::Namespace::Html);
    h.doc.set_attribute(target, "id", "app");
    h.doc.set_text_content(target, "server text");
    h.doc.append_child(h.doc.body(), target);

    let app = h.factory.create_app(root(), None);
    assert!(app.mount_selector("#app", false).is_some());
    assert_eq!(h.doc.text_content(target), "");
    assert_eq!(h.doc.attribute(target, "data-v-app").as_deref(), Some(""));
    assert_eq!(h.log.calls()[0].container, target);

    let other = h.factory.create_app(root(), None);
    assert!(other.mount_selector("#missing", false).is_none());
    assert!(h
        .sink
        .contains("Failed to mount app: mount target selector \"#missing\" returned null."));
}
