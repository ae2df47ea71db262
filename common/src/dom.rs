use std::cell::Cell;

use anyhow::Result;

// document abstraction
//
// every behavior talks to the page through this trait so that the same code runs against
// web-sys in the browser and against an in-memory tree in tests.  elements are opaque handles;
// the only requirement is that two handles to the same node compare equal.
pub trait Page: 'static {
    type Element: Clone + PartialEq + 'static;

    // lookup
    fn by_id(&self, id: &str) -> Option<Self::Element>;
    fn query(&self, selector: &str) -> Option<Self::Element>;
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    fn query_within(&self, root: &Self::Element, selector: &str) -> Vec<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn head(&self) -> Option<Self::Element>;

    // tree structure
    fn create_element(&self, tag: &str) -> Result<Self::Element>;
    fn append(&self, parent: &Self::Element, child: &Self::Element) -> Result<()>;
    fn remove(&self, el: &Self::Element);
    fn is_connected(&self, el: &Self::Element) -> bool;

    // true if node is the ancestor itself or one of its descendants
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    // attributes and classes
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str);
    fn set_class_name(&self, el: &Self::Element, class_name: &str);
    fn has_class(&self, el: &Self::Element, class: &str) -> bool;
    fn add_class(&self, el: &Self::Element, class: &str);
    fn remove_class(&self, el: &Self::Element, class: &str);

    // an empty value clears the inline property
    fn set_style(&self, el: &Self::Element, property: &str, value: &str);

    // content and form controls
    fn text(&self, el: &Self::Element) -> String;
    fn set_text(&self, el: &Self::Element, text: &str);
    fn value(&self, el: &Self::Element) -> String;
    fn set_value(&self, el: &Self::Element, value: &str);
    fn set_disabled(&self, el: &Self::Element, disabled: bool);

    // geometry
    fn scroll_y(&self) -> f64;
    fn scroll_to_smooth(&self, top: f64);
    fn offset_top(&self, el: &Self::Element) -> f64;

    // subscriptions
    fn listen(
        &self,
        target: Target<Self::Element>,
        kind: EventKind,
        handler: Box<dyn FnMut(&DomEvent<Self::Element>)>,
    );

    // invokes on_visible each time an observed element crosses into view, until it answers
    // Observation::Done for that element
    fn observe_visibility(
        &self,
        targets: &[Self::Element],
        options: &VisibilityOptions,
        on_visible: Box<dyn FnMut(&Self::Element) -> Observation>,
    );

    // returns false when the animate-on-scroll global is not loaded
    fn init_animate_on_scroll(&self, settings: &AosSettings) -> bool;

    fn toggle_class(&self, el: &Self::Element, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            true
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Target<E> {
    Window,
    Document,
    Element(E),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventKind {
    Click,
    Submit,
    Scroll,
    MouseEnter,
    MouseLeave,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Scroll => "scroll",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
        }
    }
}

// the subset of a dom event the behaviors care about
#[derive(Debug)]
pub struct DomEvent<E> {
    pub kind: EventKind,
    pub target: Option<E>,
    default_prevented: Cell<bool>,
}

impl<E> DomEvent<E> {
    pub fn new(kind: EventKind, target: Option<E>) -> Self {
        DomEvent {
            kind,
            target,
            default_prevented: Cell::new(false),
        }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityOptions {
    // fraction of the element that must be visible, 0.0 to 1.0
    pub threshold: f64,
    // css margin string applied to the viewport, e.g. "0px 0px -50px 0px"
    pub root_margin: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Observation {
    Continue,
    Done,
}

// fixed parameters handed to the animate-on-scroll library's init()
#[derive(Clone, Debug, PartialEq)]
pub struct AosSettings {
    pub duration: u32,
    pub easing: String,
    pub once: bool,
    pub offset: u32,
    pub delay: u32,
}
