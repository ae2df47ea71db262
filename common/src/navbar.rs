use std::{cell::Cell, rc::Rc};

use tracing::{Level, debug, instrument};

use crate::{
    config::{NavbarConfig, ThemeConfig},
    dom::{EventKind, Page, Target},
    theme::{Theme, current_theme},
};

// header tint per theme, as an rgb triple for rgba()
fn tint(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "255, 255, 255",
        Theme::Dark => "17, 24, 39",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderLook {
    pub background: String,
    pub backdrop_filter: &'static str,
    pub transform: &'static str,
}

// what the fixed header should look like at scroll_y, given where the last event left it
pub fn header_look(config: &NavbarConfig, theme: Theme, last_y: f64, scroll_y: f64) -> HeaderLook {
    let (alpha, blur) = if scroll_y > config.solid_after {
        ("0.98", "blur(20px)")
    } else {
        ("0.95", "blur(10px)")
    };

    let transform = if scroll_y > last_y && scroll_y > config.hide_after {
        "translateY(-100%)"
    } else {
        "translateY(0)"
    };

    HeaderLook {
        background: format!("rgba({}, {alpha})", tint(theme)),
        backdrop_filter: blur,
        transform,
    }
}

pub struct NavbarEffects<P: Page> {
    page: Rc<P>,
    config: NavbarConfig,
    theme_attribute: String,
    header: P::Element,
    last_y: Cell<f64>,
}

impl<P: Page> NavbarEffects<P> {
    #[instrument(level=Level::DEBUG, skip_all)]
    pub fn attach(page: Rc<P>, config: &NavbarConfig, theme: &ThemeConfig) -> Option<Rc<Self>> {
        let Some(header) = page.by_id(&config.header_id) else {
            debug!("no fixed header on page");
            return None;
        };

        let this = Rc::new(NavbarEffects {
            page: page.clone(),
            config: config.clone(),
            theme_attribute: theme.attribute.clone(),
            header,
            last_y: Cell::new(page.scroll_y()),
        });

        let handle = this.clone();
        page.listen(
            Target::Window,
            EventKind::Scroll,
            Box::new(move |_| handle.on_scroll()),
        );

        debug!("navbar scroll effects attached");
        Some(this)
    }

    pub fn on_scroll(&self) {
        let page = self.page.as_ref();
        let y = page.scroll_y();
        let theme = current_theme(page, &self.theme_attribute).unwrap_or_default();
        let look = header_look(&self.config, theme, self.last_y.get(), y);

        page.set_style(&self.header, "background", &look.background);
        page.set_style(&self.header, "backdrop-filter", look.backdrop_filter);
        page.set_style(&self.header, "transform", look.transform);

        self.last_y.set(y);
    }
}

pub fn parallax_offset(scroll_y: f64, rate: f64) -> f64 {
    let offset = -rate * scroll_y;
    // keep "-0px" out of the style attribute
    if offset == 0.0 { 0.0 } else { offset }
}

// drifts the hero region upward at a fraction of the scroll speed
#[instrument(level=Level::DEBUG, skip_all)]
pub fn attach_parallax<P: Page>(page: Rc<P>, config: &NavbarConfig) -> bool {
    let Some(hero) = page.query(&config.hero_selector) else {
        return false;
    };

    let inner = page.clone();
    let rate = config.parallax_rate;
    page.listen(
        Target::Window,
        EventKind::Scroll,
        Box::new(move |_| {
            let offset = parallax_offset(inner.scroll_y(), rate);
            inner.set_style(&hero, "transform", &format!("translateY({offset}px)"));
        }),
    );

    debug!("hero parallax attached");
    true
}
