use std::rc::Rc;

use tracing::debug;

use crate::{
    config::HoverConfig,
    dom::{EventKind, Page, Target},
};

pub fn attach_card_hover<P: Page>(page: Rc<P>, config: &HoverConfig) -> usize {
    let cards = page.query_all(&config.selector);
    let count = cards.len();

    for card in cards {
        for (kind, transform) in [
            (EventKind::MouseEnter, config.raised.clone()),
            (EventKind::MouseLeave, config.resting.clone()),
        ] {
            let inner = page.clone();
            let el = card.clone();
            page.listen(
                Target::Element(card.clone()),
                kind,
                Box::new(move |_| inner.set_style(&el, "transform", &transform)),
            );
        }
    }

    debug!("hover effects attached to {count} cards");
    count
}
