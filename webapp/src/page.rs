use anyhow::Result;
use gloo_events::{EventListener, EventListenerOptions};
use js_sys::{Array, Function, Object, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Node, NodeList, ScrollBehavior, ScrollToOptions, Window,
};

use common::dom::{AosSettings, DomEvent, EventKind, Observation, Page, Target, VisibilityOptions};

fn js_err(err: JsValue) -> anyhow::Error {
    anyhow::Error::msg(format!("{err:?}"))
}

// only listeners that may cancel the default action give up passive mode
fn may_cancel(kind: EventKind) -> bool {
    matches!(kind, EventKind::Click | EventKind::Submit)
}

#[derive(Debug, PartialEq)]
enum StyleChange<'a> {
    Set(&'a str),
    Clear,
}

impl<'a> StyleChange<'a> {
    fn from_value(value: &'a str) -> Self {
        if value.is_empty() {
            Self::Clear
        } else {
            Self::Set(value)
        }
    }
}

// true when the target should stop being observed
fn on_entry<T>(
    intersecting: bool,
    target: &T,
    on_visible: &mut dyn FnMut(&T) -> Observation,
) -> bool {
    intersecting && on_visible(target) == Observation::Done
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

// the live browser document
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(WebPage { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.document.get_element_by_id(id)?.text_content()
    }
}

impl Page for WebPage {
    type Element = Element;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document
            .query_selector(selector)
            .unwrap_or_else(|err| {
                warn!("bad selector {selector}: {err:?}");
                None
            })
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(list),
            Err(err) => {
                warn!("bad selector {selector}: {err:?}");
                Vec::new()
            }
        }
    }

    fn query_within(&self, root: &Element, selector: &str) -> Vec<Element> {
        match root.query_selector_all(selector) {
            Ok(list) => elements(list),
            Err(err) => {
                warn!("bad selector {selector}: {err:?}");
                Vec::new()
            }
        }
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn create_element(&self, tag: &str) -> Result<Element> {
        self.document.create_element(tag).map_err(js_err)
    }

    fn append(&self, parent: &Element, child: &Element) -> Result<()> {
        parent.append_child(child).map(|_| ()).map_err(js_err)
    }

    fn remove(&self, el: &Element) {
        el.remove();
    }

    fn is_connected(&self, el: &Element) -> bool {
        el.is_connected()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node;
        ancestor.contains(Some(node))
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&self, el: &Element, name: &str, value: &str) {
        if let Err(err) = el.set_attribute(name, value) {
            warn!("failed to set attribute {name}: {err:?}");
        }
    }

    fn set_class_name(&self, el: &Element, class_name: &str) {
        el.set_class_name(class_name);
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn add_class(&self, el: &Element, class: &str) {
        if let Err(err) = el.class_list().add_1(class) {
            warn!("failed to add class {class}: {err:?}");
        }
    }

    fn remove_class(&self, el: &Element, class: &str) {
        if let Err(err) = el.class_list().remove_1(class) {
            warn!("failed to remove class {class}: {err:?}");
        }
    }

    fn set_style(&self, el: &Element, property: &str, value: &str) {
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            return;
        };

        let style = html.style();
        let result = match StyleChange::from_value(value) {
            StyleChange::Clear => style.remove_property(property).map(|_| ()),
            StyleChange::Set(value) => style.set_property(property, value),
        };
        if let Err(err) = result {
            warn!("failed to set style {property}: {err:?}");
        }
    }

    fn text(&self, el: &Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn set_text(&self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn value(&self, el: &Element) -> String {
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, el: &Element, value: &str) {
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn set_disabled(&self, el: &Element, disabled: bool) {
        if let Err(err) = el.toggle_attribute_with_force("disabled", disabled) {
            warn!("failed to toggle disabled: {err:?}");
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to_smooth(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn offset_top(&self, el: &Element) -> f64 {
        el.dyn_ref::<HtmlElement>()
            .map(|html| f64::from(html.offset_top()))
            .unwrap_or(0.0)
    }

    // listeners live as long as the page, so they are forgotten rather than stored
    fn listen(
        &self,
        target: Target<Element>,
        kind: EventKind,
        mut handler: Box<dyn FnMut(&DomEvent<Element>)>,
    ) {
        let target: EventTarget = match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Element(el) => el.into(),
        };

        let options = if may_cancel(kind) {
            EventListenerOptions::enable_prevent_default()
        } else {
            EventListenerOptions::default()
        };

        EventListener::new_with_options(&target, kind.as_str(), options, move |event| {
            let origin = event.target().and_then(|t| t.dyn_into::<Element>().ok());
            let dom_event = DomEvent::new(kind, origin);
            handler(&dom_event);
            if dom_event.default_prevented() {
                event.prevent_default();
            }
        })
        .forget();
    }

    fn observe_visibility(
        &self,
        targets: &[Element],
        options: &VisibilityOptions,
        mut on_visible: Box<dyn FnMut(&Element) -> Observation>,
    ) {
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    let target = entry.target();
                    if on_entry(entry.is_intersecting(), &target, &mut on_visible) {
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let observer =
            match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
                Ok(observer) => observer,
                Err(err) => {
                    warn!("intersection observer unavailable: {err:?}");
                    return;
                }
            };

        for target in targets {
            observer.observe(target);
        }
        callback.forget();
    }

    fn init_animate_on_scroll(&self, settings: &AosSettings) -> bool {
        let aos = match Reflect::get(&js_sys::global(), &JsValue::from_str("AOS")) {
            Ok(aos) if aos.is_object() => aos,
            _ => return false,
        };

        let init = match Reflect::get(&aos, &JsValue::from_str("init"))
            .and_then(|f| f.dyn_into::<Function>())
        {
            Ok(init) => init,
            Err(_) => {
                debug!("AOS global has no init()");
                return false;
            }
        };

        let options = Object::new();
        for (key, value) in [
            ("duration", JsValue::from(settings.duration)),
            ("easing", JsValue::from_str(&settings.easing)),
            ("once", JsValue::from(settings.once)),
            ("offset", JsValue::from(settings.offset)),
            ("delay", JsValue::from(settings.delay)),
        ] {
            if let Err(err) = Reflect::set(&options, &JsValue::from_str(key), &value) {
                warn!("failed to set AOS option {key}: {err:?}");
            }
        }

        if let Err(err) = init.call1(&aos, &options) {
            warn!("AOS.init failed: {err:?}");
        }
        true
    }
}
