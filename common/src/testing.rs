// in-memory stand-ins for the browser, used by the unit tests
//
// FakePage keeps a small element tree (html > head, body) with just enough selector support
// for the selectors in PageConfig: comma-separated compounds of tag, #id, .class, [attr],
// [attr="v"] and [attr^="v"].  clicks and submits bubble up to the document and window.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use anyhow::Result;

use crate::{
    dom::{AosSettings, DomEvent, EventKind, Observation, Page, Target, VisibilityOptions},
    sched::{Scheduler, TaskHandle},
    storage::PreferenceStore,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FakeEl(usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    parent: Option<usize>,
    children: Vec<usize>,
    offset_top: f64,
}

type Handler = Rc<RefCell<Box<dyn FnMut(&DomEvent<FakeEl>)>>>;

struct Observer {
    options: VisibilityOptions,
    targets: RefCell<Vec<FakeEl>>,
    on_visible: RefCell<Box<dyn FnMut(&FakeEl) -> Observation>>,
}

pub struct FakePage {
    nodes: RefCell<Vec<Node>>,
    listeners: RefCell<Vec<(Target<FakeEl>, EventKind, Handler)>>,
    observers: RefCell<Vec<Rc<Observer>>>,
    scroll_y: Cell<f64>,
    scroll_requests: RefCell<Vec<f64>>,
    aos_present: Cell<bool>,
    aos_settings: RefCell<Option<AosSettings>>,
}

const HTML: usize = 0;
const HEAD: usize = 1;
const BODY: usize = 2;

impl FakePage {
    pub fn new() -> Rc<Self> {
        let page = FakePage {
            nodes: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            scroll_y: Cell::new(0.0),
            scroll_requests: RefCell::new(Vec::new()),
            aos_present: Cell::new(false),
            aos_settings: RefCell::new(None),
        };

        let html = page.new_node("html");
        let head = page.new_node("head");
        let body = page.new_node("body");
        page.attach(html, head);
        page.attach(html, body);

        Rc::new(page)
    }

    pub fn root_body(&self) -> FakeEl {
        FakeEl(BODY)
    }

    // adds a child built from a compound like "a#home.nav-link.active"
    pub fn add(&self, parent: FakeEl, compound: &str) -> FakeEl {
        let compound = Compound::parse(compound);
        let idx = self.new_node(compound.tag.as_deref().unwrap_or("div"));
        {
            let mut nodes = self.nodes.borrow_mut();
            let node = &mut nodes[idx];
            if let Some(id) = compound.id {
                node.attrs.insert(String::from("id"), id);
            }
            node.classes = compound.classes;
            for (name, value) in compound.attrs {
                node.attrs.insert(name, value.unwrap_or_default());
            }
        }
        self.attach(parent.0, idx);
        FakeEl(idx)
    }

    pub fn set_offset(&self, el: FakeEl, top: f64) {
        self.nodes.borrow_mut()[el.0].offset_top = top;
    }

    pub fn style(&self, el: FakeEl, property: &str) -> Option<String> {
        self.nodes.borrow()[el.0].styles.get(property).cloned()
    }

    pub fn is_disabled(&self, el: FakeEl) -> bool {
        self.nodes.borrow()[el.0].attrs.contains_key("disabled")
    }

    pub fn children(&self, el: FakeEl) -> Vec<FakeEl> {
        self.nodes.borrow()[el.0].children.iter().map(|c| FakeEl(*c)).collect()
    }

    pub fn scroll_requests(&self) -> Vec<f64> {
        self.scroll_requests.borrow().clone()
    }

    pub fn set_aos_present(&self, present: bool) {
        self.aos_present.set(present);
    }

    pub fn aos_settings(&self) -> Option<AosSettings> {
        self.aos_settings.borrow().clone()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().iter().filter(|(_, k, _)| *k == kind).count()
    }

    pub fn observer_options(&self) -> Vec<VisibilityOptions> {
        self.observers.borrow().iter().map(|o| o.options.clone()).collect()
    }

    // number of observers still watching this element
    pub fn watchers(&self, el: FakeEl) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|o| o.targets.borrow().contains(&el))
            .count()
    }

    // user actions

    pub fn click(&self, el: FakeEl) -> bool {
        self.dispatch(EventKind::Click, Some(el), true)
    }

    pub fn submit(&self, form: FakeEl) -> bool {
        self.dispatch(EventKind::Submit, Some(form), true)
    }

    pub fn hover(&self, el: FakeEl) {
        self.dispatch(EventKind::MouseEnter, Some(el), false);
    }

    pub fn unhover(&self, el: FakeEl) {
        self.dispatch(EventKind::MouseLeave, Some(el), false);
    }

    pub fn scroll(&self, y: f64) {
        self.scroll_y.set(y);
        self.dispatch(EventKind::Scroll, None, false);
    }

    // brings the element into view for every observer still watching it
    pub fn reveal(&self, el: FakeEl) {
        let observers: Vec<Rc<Observer>> = self.observers.borrow().clone();
        for observer in observers {
            if !observer.targets.borrow().contains(&el) {
                continue;
            }
            let answer = (*observer.on_visible.borrow_mut())(&el);
            if answer == Observation::Done {
                observer.targets.borrow_mut().retain(|t| *t != el);
            }
        }
    }

    fn new_node(&self, tag: &str) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            tag: tag.to_lowercase(),
            ..Node::default()
        });
        nodes.len() - 1
    }

    fn attach(&self, parent: usize, child: usize) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(old) = nodes[child].parent.take() {
            nodes[old].children.retain(|c| *c != child);
        }
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
    }

    fn dispatch(&self, kind: EventKind, target: Option<FakeEl>, bubbles: bool) -> bool {
        let mut path = Vec::new();
        if let Some(el) = target {
            path.push(Target::Element(el));
            if bubbles {
                let nodes = self.nodes.borrow();
                let mut cur = nodes[el.0].parent;
                while let Some(idx) = cur {
                    path.push(Target::Element(FakeEl(idx)));
                    cur = nodes[idx].parent;
                }
                path.push(Target::Document);
                path.push(Target::Window);
            }
        } else {
            path.push(Target::Window);
        }

        let event = DomEvent::new(kind, target);
        for hop in path {
            let handlers: Vec<Handler> = self
                .listeners
                .borrow()
                .iter()
                .filter(|(t, k, _)| *t == hop && *k == kind)
                .map(|(_, _, h)| h.clone())
                .collect();
            for handler in handlers {
                (*handler.borrow_mut())(&event);
            }
        }
        event.default_prevented()
    }

    fn descendants(&self, root: usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<usize> = nodes[root].children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(nodes[idx].children.iter().rev());
        }
        out
    }

    fn matching(&self, root: usize, selector: &str) -> Vec<FakeEl> {
        let compounds: Vec<Compound> = selector.split(',').map(Compound::parse).collect();
        let candidates = self.descendants(root);
        let nodes = self.nodes.borrow();
        candidates
            .into_iter()
            .filter(|idx| compounds.iter().any(|c| c.matches(&nodes[*idx])))
            .map(FakeEl)
            .collect()
    }

    fn text_of(nodes: &[Node], idx: usize) -> String {
        let mut out = nodes[idx].text.clone();
        for child in &nodes[idx].children {
            out.push_str(&Self::text_of(nodes, *child));
        }
        out
    }
}

impl Page for FakePage {
    type Element = FakeEl;

    fn by_id(&self, id: &str) -> Option<FakeEl> {
        let nodes = self.nodes.borrow();
        self.descendants(HTML)
            .into_iter()
            .find(|idx| nodes[*idx].attrs.get("id").map(String::as_str) == Some(id))
            .map(FakeEl)
    }

    fn query(&self, selector: &str) -> Option<FakeEl> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<FakeEl> {
        self.matching(HTML, selector)
    }

    fn query_within(&self, root: &FakeEl, selector: &str) -> Vec<FakeEl> {
        self.matching(root.0, selector)
    }

    fn body(&self) -> Option<FakeEl> {
        Some(FakeEl(BODY))
    }

    fn head(&self) -> Option<FakeEl> {
        Some(FakeEl(HEAD))
    }

    fn create_element(&self, tag: &str) -> Result<FakeEl> {
        Ok(FakeEl(self.new_node(tag)))
    }

    fn append(&self, parent: &FakeEl, child: &FakeEl) -> Result<()> {
        self.attach(parent.0, child.0);
        Ok(())
    }

    fn remove(&self, el: &FakeEl) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[el.0].parent.take() {
            nodes[parent].children.retain(|c| *c != el.0);
        }
    }

    fn is_connected(&self, el: &FakeEl) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = el.0;
        loop {
            if cur == HTML {
                return true;
            }
            match nodes[cur].parent {
                Some(parent) => cur = parent,
                None => return false,
            }
        }
    }

    fn contains(&self, ancestor: &FakeEl, node: &FakeEl) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = Some(node.0);
        while let Some(idx) = cur {
            if idx == ancestor.0 {
                return true;
            }
            cur = nodes[idx].parent;
        }
        false
    }

    fn attribute(&self, el: &FakeEl, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        if name == "class" {
            return Some(nodes[el.0].classes.join(" "));
        }
        nodes[el.0].attrs.get(name).cloned()
    }

    fn set_attribute(&self, el: &FakeEl, name: &str, value: &str) {
        if name == "class" {
            return self.set_class_name(el, value);
        }
        self.nodes.borrow_mut()[el.0]
            .attrs
            .insert(name.to_owned(), value.to_owned());
    }

    fn set_class_name(&self, el: &FakeEl, class_name: &str) {
        self.nodes.borrow_mut()[el.0].classes =
            class_name.split_whitespace().map(str::to_owned).collect();
    }

    fn has_class(&self, el: &FakeEl, class: &str) -> bool {
        self.nodes.borrow()[el.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&self, el: &FakeEl, class: &str) {
        if !self.has_class(el, class) {
            self.nodes.borrow_mut()[el.0].classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, el: &FakeEl, class: &str) {
        self.nodes.borrow_mut()[el.0].classes.retain(|c| c != class);
    }

    fn set_style(&self, el: &FakeEl, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        if value.is_empty() {
            nodes[el.0].styles.remove(property);
        } else {
            nodes[el.0]
                .styles
                .insert(property.to_owned(), value.to_owned());
        }
    }

    fn text(&self, el: &FakeEl) -> String {
        Self::text_of(&self.nodes.borrow(), el.0)
    }

    fn set_text(&self, el: &FakeEl, text: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[el.0].children);
        for child in children {
            nodes[child].parent = None;
        }
        nodes[el.0].text = text.to_owned();
    }

    fn value(&self, el: &FakeEl) -> String {
        self.nodes.borrow()[el.0].value.clone()
    }

    fn set_value(&self, el: &FakeEl, value: &str) {
        self.nodes.borrow_mut()[el.0].value = value.to_owned();
    }

    fn set_disabled(&self, el: &FakeEl, disabled: bool) {
        let mut nodes = self.nodes.borrow_mut();
        if disabled {
            nodes[el.0]
                .attrs
                .insert(String::from("disabled"), String::new());
        } else {
            nodes[el.0].attrs.remove("disabled");
        }
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to_smooth(&self, top: f64) {
        self.scroll_requests.borrow_mut().push(top);
    }

    fn offset_top(&self, el: &FakeEl) -> f64 {
        self.nodes.borrow()[el.0].offset_top
    }

    fn listen(
        &self,
        target: Target<FakeEl>,
        kind: EventKind,
        handler: Box<dyn FnMut(&DomEvent<FakeEl>)>,
    ) {
        self.listeners
            .borrow_mut()
            .push((target, kind, Rc::new(RefCell::new(handler))));
    }

    fn observe_visibility(
        &self,
        targets: &[FakeEl],
        options: &VisibilityOptions,
        on_visible: Box<dyn FnMut(&FakeEl) -> Observation>,
    ) {
        self.observers.borrow_mut().push(Rc::new(Observer {
            options: options.clone(),
            targets: RefCell::new(targets.to_vec()),
            on_visible: RefCell::new(on_visible),
        }));
    }

    fn init_animate_on_scroll(&self, settings: &AosSettings) -> bool {
        if self.aos_present.get() {
            *self.aos_settings.borrow_mut() = Some(settings.clone());
        }
        self.aos_present.get()
    }
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
    prefixes: Vec<(String, String)>,
}

impl Compound {
    fn parse(compound: &str) -> Self {
        let compound = compound.trim();
        let mut out = Compound::default();
        let mut rest = compound;

        let tag_end = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '-')
            .unwrap_or(rest.len());
        if tag_end > 0 {
            out.tag = Some(rest[..tag_end].to_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    let name = body[..end].to_owned();
                    if c == '#' {
                        out.id = Some(name);
                    } else {
                        out.classes.push(name);
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let end = rest.find(']').unwrap_or(rest.len() - 1);
                    let inner = &rest[1..end];
                    let unquote = |v: &str| v.trim_matches('"').to_owned();
                    if let Some((name, value)) = inner.split_once("^=") {
                        out.prefixes.push((name.to_owned(), unquote(value)));
                    } else if let Some((name, value)) = inner.split_once('=') {
                        out.attrs.push((name.to_owned(), Some(unquote(value))));
                    } else {
                        out.attrs.push((inner.to_owned(), None));
                    }
                    rest = &rest[end + 1..];
                }
                _ => break,
            }
        }
        out
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != node.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attrs.get("id") != Some(id) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        let attrs_ok = self.attrs.iter().all(|(name, value)| match value {
            None => node.attrs.contains_key(name),
            Some(value) => node.attrs.get(name) == Some(value),
        });
        let prefixes_ok = self
            .prefixes
            .iter()
            .all(|(name, prefix)| node.attrs.get(name).is_some_and(|v| v.starts_with(prefix)));
        attrs_ok && prefixes_ok
    }
}

// deterministic scheduler: nothing runs until the test advances the clock
pub struct ManualClock {
    now: Cell<u64>,
    next_id: Cell<u64>,
    tasks: RefCell<BTreeMap<(u64, u64), Box<dyn FnOnce()>>>,
}

impl ManualClock {
    pub fn new() -> Rc<Self> {
        Rc::new(ManualClock {
            now: Cell::new(0),
            next_id: Cell::new(0),
            tasks: RefCell::new(BTreeMap::new()),
        })
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    // runs every task due within the next ms milliseconds, in due order, including tasks
    // scheduled by the tasks themselves
    pub fn advance(&self, ms: u64) {
        let until = self.now.get() + ms;
        loop {
            let due = {
                let mut tasks = self.tasks.borrow_mut();
                match tasks.keys().next().copied() {
                    Some(key) if key.0 <= until => tasks.remove(&key).map(|task| (key.0, task)),
                    _ => None,
                }
            };
            match due {
                Some((at, task)) => {
                    self.now.set(at);
                    task();
                }
                None => break,
            }
        }
        self.now.set(until);
    }
}

impl Scheduler for ManualClock {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.tasks
            .borrow_mut()
            .insert((self.now.get() + u64::from(delay_ms), id), task);
        TaskHandle(id)
    }

    fn cancel(&self, handle: TaskHandle) {
        self.tasks.borrow_mut().retain(|key, _| key.1 != handle.0);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    pub fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Rc<Self> {
        Rc::new(MemoryStore::default())
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(anyhow::Error::msg("storage quota exceeded"));
        }
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
