use std::{cell::Cell, rc::Rc};

use tracing::{Level, instrument, trace};

use crate::{
    config::ScrollConfig,
    dom::{EventKind, Page, Target},
    sched::{Scheduler, TaskHandle},
};

// coalesces a burst of triggers into one call, fired once the triggers stop for `wait_ms`
pub struct Debouncer<S: Scheduler> {
    sched: Rc<S>,
    wait_ms: u32,
    action: Rc<dyn Fn()>,
    pending: Rc<Cell<Option<TaskHandle>>>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new(sched: Rc<S>, wait_ms: u32, action: impl Fn() + 'static) -> Self {
        Debouncer {
            sched,
            wait_ms,
            action: Rc::new(action),
            pending: Rc::new(Cell::new(None)),
        }
    }

    pub fn trigger(&self) {
        if let Some(handle) = self.pending.take() {
            self.sched.cancel(handle);
        }

        let action = self.action.clone();
        let pending = self.pending.clone();
        let handle = self.sched.schedule(
            self.wait_ms,
            Box::new(move || {
                pending.set(None);
                action();
            }),
        );
        self.pending.set(Some(handle));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

// generic scroll hook: fires once the page has stopped scrolling
//
// the nav highlighter and the navbar effects deliberately stay on the raw scroll event; this
// hook only reports where scrolling settled
#[instrument(level=Level::DEBUG, skip_all)]
pub fn attach_settled_scroll<P: Page, S: Scheduler>(
    page: Rc<P>,
    sched: Rc<S>,
    config: &ScrollConfig,
) -> Rc<Debouncer<S>> {
    let inner = page.clone();
    let debouncer = Rc::new(Debouncer::new(sched, config.debounce_ms, move || {
        trace!("scroll settled at {}", inner.scroll_y());
    }));

    let handle = debouncer.clone();
    page.listen(
        Target::Window,
        EventKind::Scroll,
        Box::new(move |_| handle.trigger()),
    );

    debouncer
}
