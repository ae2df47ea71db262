use std::rc::Rc;

use tracing::{Level, debug, instrument, trace};

use crate::{
    config::NavConfig,
    dom::{EventKind, Page, Target},
};

// the section whose (biased) top the scroll position passed last, or None above all of them
//
// sections are expected in document order, which is what querySelectorAll hands back
pub fn active_section<'a>(
    scroll_y: f64,
    sections: &'a [(String, f64)],
    look_ahead: f64,
) -> Option<&'a str> {
    let mut current = None;
    for (id, top) in sections {
        if scroll_y >= top - look_ahead {
            current = Some(id.as_str());
        }
    }
    current
}

// keeps the "active" class on the nav link matching the current section
pub struct NavHighlighter<P: Page> {
    page: Rc<P>,
    config: NavConfig,
    links: Vec<P::Element>,
    sections: Vec<P::Element>,
}

impl<P: Page> NavHighlighter<P> {
    #[instrument(level=Level::DEBUG, skip_all)]
    pub fn attach(page: Rc<P>, config: &NavConfig) -> Rc<Self> {
        let links = page.query_all(&config.link_selector);
        let sections = page.query_all(&config.section_selector);
        debug!(
            "nav highlighter attached to {} links over {} sections",
            links.len(),
            sections.len()
        );

        let this = Rc::new(NavHighlighter {
            page: page.clone(),
            config: config.clone(),
            links,
            sections,
        });

        let handle = this.clone();
        page.listen(
            Target::Window,
            EventKind::Scroll,
            Box::new(move |_| handle.update()),
        );
        this.update();

        this
    }

    pub fn update(&self) {
        let page = self.page.as_ref();

        // offsets are re-read on every pass since layout can shift under us
        let sections: Vec<(String, f64)> = self
            .sections
            .iter()
            .filter_map(|s| Some((page.attribute(s, "id")?, page.offset_top(s))))
            .collect();

        let current = active_section(page.scroll_y(), &sections, self.config.look_ahead);
        let wanted = current.map(|id| format!("#{id}"));
        trace!("active section {current:?}");

        for link in &self.links {
            if wanted.is_some() && page.attribute(link, "href") == wanted {
                page.add_class(link, &self.config.active_class);
            } else {
                page.remove_class(link, &self.config.active_class);
            }
        }
    }
}

// turns in-page anchor jumps into smooth scrolls that clear the fixed header
#[instrument(level=Level::DEBUG, skip_all)]
pub fn attach_smooth_scroll<P: Page>(page: Rc<P>, config: &NavConfig) -> usize {
    let anchors = page.query_all(&config.anchor_selector);
    let count = anchors.len();

    for anchor in anchors {
        let inner = page.clone();
        let href = page.attribute(&anchor, "href").unwrap_or_default();
        let header_offset = config.header_offset;

        page.listen(
            Target::Element(anchor),
            EventKind::Click,
            Box::new(move |event| {
                event.prevent_default();

                let id = href.trim_start_matches('#');
                if id.is_empty() {
                    return;
                }
                if let Some(section) = inner.by_id(id) {
                    inner.scroll_to_smooth(inner.offset_top(&section) - header_offset);
                }
            }),
        );
    }

    debug!("smooth scroll attached to {count} anchors");
    count
}
