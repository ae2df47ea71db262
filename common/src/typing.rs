use std::{cell::RefCell, rc::Rc};

use tracing::{Level, debug, instrument};

use crate::{config::TypingConfig, dom::Page, sched::Scheduler};

// typewriter effect for the hero title
//
// runs exactly once per page load; there is no way to restart or interrupt it
pub struct Typewriter<P: Page, S: Scheduler> {
    page: Rc<P>,
    sched: Rc<S>,
    el: P::Element,
    chars: Vec<char>,
    typed: usize,
    char_delay_ms: u32,
}

impl<P: Page, S: Scheduler> Typewriter<P, S> {
    #[instrument(level=Level::DEBUG, skip_all)]
    pub fn attach(page: Rc<P>, sched: Rc<S>, config: &TypingConfig) -> Option<Rc<RefCell<Self>>> {
        let el = page.query(&config.selector)?;
        let chars: Vec<char> = page.text(&el).chars().collect();
        page.set_text(&el, "");
        debug!("typing {} characters into hero title", chars.len());

        let this = Rc::new(RefCell::new(Typewriter {
            page,
            sched: sched.clone(),
            el,
            chars,
            typed: 0,
            char_delay_ms: config.char_delay_ms,
        }));

        let handle = this.clone();
        sched.schedule(config.start_delay_ms, Box::new(move || Self::step(handle)));

        Some(this)
    }

    pub fn is_done(&self) -> bool {
        self.typed >= self.chars.len()
    }

    fn step(this: Rc<RefCell<Self>>) {
        let mut writer = this.borrow_mut();
        if writer.is_done() {
            return;
        }

        writer.typed += 1;
        let shown: String = writer.chars[..writer.typed].iter().collect();
        writer.page.set_text(&writer.el, &shown);

        if !writer.is_done() {
            let delay = writer.char_delay_ms;
            let sched = writer.sched.clone();
            drop(writer);
            sched.schedule(delay, Box::new(move || Self::step(this)));
        }
    }
}
