// deferred tasks
//
// everything timed in the page (notification lifecycle, the simulated submit, the typing
// animation, the theme transition window, debouncing) goes through this trait.  in the browser
// it is backed by setTimeout; tests drive it with a manual clock.
pub trait Scheduler: 'static {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle;

    // cancelling a task that already ran (or never existed) does nothing
    fn cancel(&self, handle: TaskHandle);
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TaskHandle(pub u64);
