use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    config::NotifyConfig,
    dom::Page,
    sched::{Scheduler, TaskHandle},
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NoticeKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Success => "fas fa-check-circle",
            Self::Error => "fas fa-exclamation-circle",
            Self::Info => "fas fa-info-circle",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Success => "#10b981",
            Self::Error => "#ef4444",
            Self::Info => "#3b82f6",
        }
    }
}

const HIDDEN: &str = "translateX(100%)";
const SHOWN: &str = "translateX(0)";

struct Toast<E> {
    el: E,
    timers: Vec<TaskHandle>,
}

// toast notifications, anchored top-right
//
// at most one toast is ever on screen: a new one evicts its predecessor immediately rather
// than waiting for the exit slide
pub struct NotificationCenter<P: Page, S: Scheduler> {
    page: Rc<P>,
    sched: Rc<S>,
    config: NotifyConfig,
    current: RefCell<Option<Toast<P::Element>>>,
}

impl<P: Page, S: Scheduler> NotificationCenter<P, S> {
    pub fn new(page: Rc<P>, sched: Rc<S>, config: &NotifyConfig) -> Rc<Self> {
        Rc::new(NotificationCenter {
            page,
            sched,
            config: config.clone(),
            current: RefCell::new(None),
        })
    }

    pub fn notify(&self, message: &str, kind: NoticeKind) {
        self.dismiss_all();

        let el = match self.build(message, kind) {
            Ok(v) => v,
            Err(err) => {
                warn!("failed to show notification: {err}");
                return;
            }
        };
        debug!("showing {} notification", kind.as_str());

        let page = self.page.clone();
        let shown = el.clone();
        let enter = self.sched.schedule(
            self.config.enter_delay_ms,
            Box::new(move || page.set_style(&shown, "transform", SHOWN)),
        );

        let page = self.page.clone();
        let sched = self.sched.clone();
        let leaving = el.clone();
        let exit_ms = self.config.exit_ms;
        let exit = self.sched.schedule(
            self.config.visible_ms,
            Box::new(move || {
                page.set_style(&leaving, "transform", HIDDEN);
                let page = page.clone();
                sched.schedule(
                    exit_ms,
                    Box::new(move || {
                        if page.is_connected(&leaving) {
                            page.remove(&leaving);
                        }
                    }),
                );
            }),
        );

        *self.current.borrow_mut() = Some(Toast {
            el,
            timers: vec![enter, exit],
        });
    }

    // drops every toast on the page, including any the page itself rendered
    fn dismiss_all(&self) {
        if let Some(prior) = self.current.borrow_mut().take() {
            for handle in prior.timers {
                self.sched.cancel(handle);
            }
            if self.page.is_connected(&prior.el) {
                self.page.remove(&prior.el);
            }
        }
        for stale in self.page.query_all(".notification") {
            self.page.remove(&stale);
        }
    }

    fn build(&self, message: &str, kind: NoticeKind) -> Result<P::Element> {
        let page = self.page.as_ref();
        let body = page
            .body()
            .ok_or_else(|| anyhow::Error::msg("document has no body"))?;

        let el = page.create_element("div")?;
        page.set_class_name(&el, &format!("notification notification-{}", kind.as_str()));

        let content = page.create_element("div")?;
        page.set_class_name(&content, "notification-content");

        let icon = page.create_element("i")?;
        page.set_class_name(&icon, kind.icon_class());

        // the message is user-facing text, never markup
        let text = page.create_element("span")?;
        page.set_text(&text, message);

        page.append(&content, &icon)?;
        page.append(&content, &text)?;
        page.append(&el, &content)?;

        for (property, value) in [
            ("position", "fixed"),
            ("top", "20px"),
            ("right", "20px"),
            ("background", kind.background()),
            ("color", "white"),
            ("padding", "1rem 1.5rem"),
            ("border-radius", "8px"),
            ("box-shadow", "0 10px 25px rgba(0, 0, 0, 0.2)"),
            ("z-index", "10000"),
            ("transform", HIDDEN),
            ("transition", "transform 0.3s ease"),
            ("max-width", "400px"),
        ] {
            page.set_style(&el, property, value);
        }

        page.append(&body, &el)?;
        Ok(el)
    }
}
