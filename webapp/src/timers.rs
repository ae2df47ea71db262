use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
    rc::Rc,
};

use gloo_timers::callback::Timeout;

use common::sched::{Scheduler, TaskHandle};

// setTimeout-backed scheduler
//
// timeouts are forgotten as soon as they are armed, so cancelling a task only disarms it: the
// browser still fires the timeout, which then finds its id gone and does nothing
pub struct TimeoutScheduler {
    next_id: Cell<u64>,
    armed: Rc<RefCell<HashSet<u64>>>,
}

impl TimeoutScheduler {
    pub fn new() -> Self {
        TimeoutScheduler {
            next_id: Cell::new(0),
            armed: Rc::new(RefCell::new(HashSet::new())),
        }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.armed.borrow_mut().insert(id);

        let armed = self.armed.clone();
        Timeout::new(delay_ms, move || {
            let live = armed.borrow_mut().remove(&id);
            if live {
                task();
            }
        })
        .forget();

        TaskHandle(id)
    }

    fn cancel(&self, handle: TaskHandle) {
        self.armed.borrow_mut().remove(&handle.0);
    }
}
