use std::{cell::RefCell, fmt, rc::Rc, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{Level, debug, instrument, warn};

use crate::{
    config::ThemeConfig,
    dom::{EventKind, Page, Target},
    sched::{Scheduler, TaskHandle},
    storage::PreferenceStore,
};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    // the icon advertises the theme a click would switch to
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Light => "fas fa-moon",
            Self::Dark => "fas fa-sun",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(anyhow::Error::msg(format!("unknown theme {other}"))),
        }
    }
}

// reads the theme currently applied to the document body, if any
pub fn current_theme<P: Page>(page: &P, attribute: &str) -> Option<Theme> {
    let body = page.body()?;
    page.attribute(&body, attribute)?.parse().ok()
}

pub struct ThemeToggle<P: Page, S: Scheduler, St: PreferenceStore> {
    page: Rc<P>,
    sched: Rc<S>,
    store: Rc<St>,
    config: ThemeConfig,
    toggle: P::Element,
    pending_clear: Option<TaskHandle>,
}

impl<P: Page, S: Scheduler, St: PreferenceStore> ThemeToggle<P, S, St> {
    // applies the stored theme and wires the toggle control; a page without the control
    // still gets its stored theme
    #[instrument(level=Level::DEBUG, skip_all)]
    pub fn attach(
        page: Rc<P>,
        sched: Rc<S>,
        store: Rc<St>,
        config: &ThemeConfig,
    ) -> Option<Rc<RefCell<Self>>> {
        let saved = match store.get(&config.storage_key) {
            Some(value) => value.parse().unwrap_or_else(|err| {
                warn!("ignoring stored theme: {err}");
                Theme::default()
            }),
            None => Theme::default(),
        };

        let Some(toggle) = page.by_id(&config.toggle_id) else {
            debug!("no theme toggle on page");
            apply(page.as_ref(), None, config, saved);
            return None;
        };

        apply(page.as_ref(), Some(&toggle), config, saved);
        debug!("theme toggle attached, initial theme {saved}");

        let this = Rc::new(RefCell::new(ThemeToggle {
            page: page.clone(),
            sched,
            store,
            config: config.clone(),
            toggle: toggle.clone(),
            pending_clear: None,
        }));

        let handle = this.clone();
        page.listen(
            Target::Element(toggle),
            EventKind::Click,
            Box::new(move |_| {
                handle.borrow_mut().flip();
            }),
        );

        Some(this)
    }

    pub fn flip(&mut self) -> Theme {
        let page = self.page.as_ref();
        let next = current_theme(page, &self.config.attribute)
            .unwrap_or_default()
            .flipped();

        apply(page, Some(&self.toggle), &self.config, next);

        if let Err(err) = self.store.set(&self.config.storage_key, next.as_str()) {
            warn!("failed to persist theme: {err}");
        }

        // animate the color change, then hand transitions back to the stylesheet
        if let Some(body) = page.body() {
            if let Some(handle) = self.pending_clear.take() {
                self.sched.cancel(handle);
            }
            page.set_style(&body, "transition", &self.config.transition);

            let page = self.page.clone();
            self.pending_clear = Some(self.sched.schedule(
                self.config.transition_ms,
                Box::new(move || page.set_style(&body, "transition", "")),
            ));
        }

        debug!("theme switched to {next}");
        next
    }
}

fn apply<P: Page>(page: &P, toggle: Option<&P::Element>, config: &ThemeConfig, theme: Theme) {
    if let Some(body) = page.body() {
        page.set_attribute(&body, &config.attribute, theme.as_str());
    }

    let icon = toggle.and_then(|t| page.query_within(t, "i").into_iter().next());
    if let Some(icon) = icon {
        page.set_class_name(&icon, theme.icon_class());
    }
}
