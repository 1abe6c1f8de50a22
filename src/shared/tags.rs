//! Static name tables: HTML and SVG tags, reserved names, built-in directives.

use std::collections::HashSet;
use std::sync::OnceLock;

const HTML_TAGS: &str = "html,body,base,head,link,meta,style,title,address,article,aside,footer,\
header,h1,h2,h3,h4,h5,h6,nav,section,div,dd,dl,dt,figcaption,figure,picture,hr,img,li,main,ol,\
p,pre,ul,a,b,abbr,bdi,bdo,br,cite,code,data,dfn,em,i,kbd,mark,q,rp,rt,ruby,s,samp,small,span,\
strong,sub,sup,time,u,var,wbr,area,audio,map,track,video,embed,object,param,source,canvas,\
script,noscript,del,ins,caption,col,colgroup,table,thead,tbody,td,th,tr,button,datalist,\
fieldset,form,input,label,legend,meter,optgroup,option,output,progress,select,textarea,details,\
dialog,menu,summary,template,blockquote,iframe,tfoot";

const SVG_TAGS: &str = "svg,animate,animateMotion,animateTransform,audio,canvas,circle,clipPath,\
color-profile,defs,desc,discard,ellipse,feBlend,feColorMatrix,feComponentTransfer,feComposite,\
feConvolveMatrix,feDiffuseLighting,feDisplacementMap,feDistanceLight,feDropShadow,feFlood,\
feFuncA,feFuncB,feFuncG,feFuncR,feGaussianBlur,feImage,feMerge,feMergeNode,feMorphology,\
feOffset,fePointLight,feSpecularLighting,feSpotLight,feTile,feTurbulence,filter,\
foreignObject,g,hatch,hatchpath,image,line,linearGradient,marker,mask,mesh,meshgradient,\
meshpatch,meshrow,metadata,mpath,path,pattern,polygon,polyline,radialGradient,rect,set,\
solidcolor,stop,switch,symbol,text,textPath,title,tspan,unknown,use,view";

const VOID_TAGS: &str = "area,base,br,col,embed,hr,img,input,link,meta,param,source,track,wbr";

const BUILTIN_TAGS: &str = "slot,component";

const BUILTIN_DIRECTIVES: &str =
    "bind,cloak,else-if,else,for,html,if,model,on,once,pre,show,slot,text,memo";

// The leading comma puts the empty string in the set.
const RESERVED_PROPS: &str = ",key,ref,ref_for,ref_key,onVnodeBeforeMount,onVnodeMounted,\
onVnodeBeforeUpdate,onVnodeUpdated,onVnodeBeforeUnmount,onVnodeUnmounted";

/// A comma-separated name list compiled into a set on first use.
struct NameSet {
    source: &'static str,
    set: OnceLock<HashSet<&'static str>>,
}

impl NameSet {
    const fn new(source: &'static str) -> Self {
        Self {
            source,
            set: OnceLock::new(),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.set
            .get_or_init(|| self.source.split(',').collect())
            .contains(name)
    }
}

static HTML: NameSet = NameSet::new(HTML_TAGS);
static SVG: NameSet = NameSet::new(SVG_TAGS);
static VOID: NameSet = NameSet::new(VOID_TAGS);
static BUILTIN: NameSet = NameSet::new(BUILTIN_TAGS);
static DIRECTIVES: NameSet = NameSet::new(BUILTIN_DIRECTIVES);
static RESERVED: NameSet = NameSet::new(RESERVED_PROPS);

/// Returns `true` for standard HTML element names (case-sensitive).
#[must_use]
pub fn is_html_tag(tag: &str) -> bool {
    HTML.contains(tag)
}

/// Returns `true` for standard SVG element names (case-sensitive).
#[must_use]
pub fn is_svg_tag(tag: &str) -> bool {
    SVG.contains(tag)
}

/// Returns `true` for HTML elements that never have children or an end tag.
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VOID.contains(tag)
}

/// Returns `true` for the framework's own element names (`slot`, `component`).
#[must_use]
pub fn is_builtin_tag(tag: &str) -> bool {
    BUILTIN.contains(tag)
}

/// Returns `true` for directive ids the template compiler handles itself.
#[must_use]
pub fn is_builtin_directive(name: &str) -> bool {
    DIRECTIVES.contains(name)
}

/// Returns `true` for prop keys consumed by the virtual-node layer, including `""`.
#[must_use]
pub fn is_reserved_prop(key: &str) -> bool {
    RESERVED.contains(key)
}
