use std::rc::Rc;

use tracing::{Level, debug, instrument, trace};

use crate::{
    config::RevealConfig,
    dom::{AosSettings, Observation, Page, VisibilityOptions},
};

impl From<&RevealConfig> for AosSettings {
    fn from(config: &RevealConfig) -> Self {
        AosSettings {
            duration: config.aos_duration,
            easing: config.aos_easing.clone(),
            once: true,
            offset: config.aos_offset,
            delay: config.aos_delay,
        }
    }
}

// hands the fixed settings to the animate-on-scroll library when the page loaded it
pub fn init_animate_on_scroll<P: Page>(page: &P, config: &RevealConfig) -> bool {
    let present = page.init_animate_on_scroll(&AosSettings::from(config));
    if present {
        debug!("animate-on-scroll initialized");
    } else {
        debug!("animate-on-scroll not loaded, skipping");
    }
    present
}

// adds the entrance class the first time each element scrolls into view
//
// once revealed an element is never observed again, so leaving and re-entering the viewport
// does not restart the animation
#[instrument(level=Level::DEBUG, skip_all)]
pub fn attach_reveal<P: Page>(page: Rc<P>, config: &RevealConfig) -> usize {
    let targets = page.query_all(&config.selector);
    if targets.is_empty() {
        return 0;
    }

    let options = VisibilityOptions {
        threshold: config.threshold,
        root_margin: config.root_margin.clone(),
    };

    let inner = page.clone();
    let class = config.class.clone();
    page.observe_visibility(
        &targets,
        &options,
        Box::new(move |el| {
            if !inner.has_class(el, &class) {
                trace!("revealing element");
                inner.add_class(el, &class);
            }
            Observation::Done
        }),
    );

    debug!("observing {} elements for reveal", targets.len());
    targets.len()
}

// one-shot slide-in for skill items, with a stricter visibility requirement than the
// general reveal pass
#[instrument(level=Level::DEBUG, skip_all)]
pub fn attach_skill_progress<P: Page>(page: Rc<P>, config: &RevealConfig) -> usize {
    let items = page.query_all(&config.skill_selector);
    if items.is_empty() {
        return 0;
    }

    let options = VisibilityOptions {
        threshold: config.skill_threshold,
        root_margin: config.skill_root_margin.clone(),
    };

    let inner = page.clone();
    let animation = config.skill_animation.clone();
    page.observe_visibility(
        &items,
        &options,
        Box::new(move |el| {
            inner.set_style(el, "animation", &animation);
            Observation::Done
        }),
    );

    debug!("observing {} skill items", items.len());
    items.len()
}
