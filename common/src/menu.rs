use std::rc::Rc;

use tracing::{Level, debug, instrument, trace};

use crate::{
    config::MenuConfig,
    dom::{EventKind, Page, Target},
};

// collapsible navigation for narrow screens
//
// open/closed lives entirely in the dom as a class on both the toggle and the panel
pub struct MobileMenu<P: Page> {
    page: Rc<P>,
    open_class: String,
    toggle: P::Element,
    menu: P::Element,
}

impl<P: Page> MobileMenu<P> {
    #[instrument(level=Level::DEBUG, skip_all)]
    pub fn attach(page: Rc<P>, config: &MenuConfig) -> Option<Rc<Self>> {
        let (Some(toggle), Some(menu)) =
            (page.by_id(&config.toggle_id), page.by_id(&config.menu_id))
        else {
            debug!("mobile menu incomplete, skipping");
            return None;
        };

        let this = Rc::new(MobileMenu {
            page: page.clone(),
            open_class: config.open_class.clone(),
            toggle: toggle.clone(),
            menu: menu.clone(),
        });

        let handle = this.clone();
        page.listen(
            Target::Element(toggle),
            EventKind::Click,
            Box::new(move |_| handle.toggle()),
        );

        for link in page.query_within(&menu, &config.link_selector) {
            let handle = this.clone();
            page.listen(
                Target::Element(link),
                EventKind::Click,
                Box::new(move |_| handle.close()),
            );
        }

        let handle = this.clone();
        page.listen(
            Target::Document,
            EventKind::Click,
            Box::new(move |event| {
                if let Some(target) = &event.target {
                    handle.on_document_click(target);
                }
            }),
        );

        debug!("mobile menu attached");
        Some(this)
    }

    pub fn is_open(&self) -> bool {
        self.page.has_class(&self.menu, &self.open_class)
    }

    pub fn toggle(&self) {
        let open = self.page.toggle_class(&self.menu, &self.open_class);
        if open {
            self.page.add_class(&self.toggle, &self.open_class);
        } else {
            self.page.remove_class(&self.toggle, &self.open_class);
        }
        trace!("mobile menu open: {open}");
    }

    pub fn close(&self) {
        self.page.remove_class(&self.menu, &self.open_class);
        self.page.remove_class(&self.toggle, &self.open_class);
    }

    fn on_document_click(&self, target: &P::Element) {
        let page = self.page.as_ref();
        let outside = !page.contains(&self.toggle, target) && !page.contains(&self.menu, target);
        if outside && self.is_open() {
            self.close();
        }
    }
}
