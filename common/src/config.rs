use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, error, instrument};

// page behavior configuration
//
// every selector, class name and timing constant used by the behaviors lives here.  the
// defaults reproduce the stock portfolio page, so an empty (or missing) document is valid.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PageConfig {
    pub theme: ThemeConfig,
    pub nav: NavConfig,
    pub reveal: RevealConfig,
    pub contact: ContactConfig,
    pub notify: NotifyConfig,
    pub navbar: NavbarConfig,
    pub menu: MenuConfig,
    pub typing: TypingConfig,
    pub hover: HoverConfig,
    pub scroll: ScrollConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub toggle_id: String,
    pub attribute: String,
    pub storage_key: String,
    pub transition: String,
    pub transition_ms: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            toggle_id: String::from("theme-toggle"),
            attribute: String::from("data-theme"),
            storage_key: String::from("theme"),
            transition: String::from("background-color 0.3s ease, color 0.3s ease"),
            transition_ms: 300,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NavConfig {
    pub link_selector: String,
    pub section_selector: String,
    pub anchor_selector: String,
    pub active_class: String,

    // a section becomes current once scrolled to within this many pixels of its top
    pub look_ahead: f64,

    // height reserved for the fixed header when jumping to an anchor
    pub header_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        NavConfig {
            link_selector: String::from(".nav-link"),
            section_selector: String::from("section[id]"),
            anchor_selector: String::from("a[href^=\"#\"]"),
            active_class: String::from("active"),
            look_ahead: 200.0,
            header_offset: 70.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub class: String,
    pub threshold: f64,
    pub root_margin: String,

    pub skill_selector: String,
    pub skill_animation: String,
    pub skill_threshold: f64,
    pub skill_root_margin: String,

    pub aos_duration: u32,
    pub aos_easing: String,
    pub aos_offset: u32,
    pub aos_delay: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            selector: String::from(".skill-item, .project-card, .stat, [data-aos]"),
            class: String::from("animate-in"),
            threshold: 0.1,
            root_margin: String::from("0px 0px -50px 0px"),
            skill_selector: String::from(".skill-item"),
            skill_animation: String::from("slideInLeft 0.6s ease-out"),
            skill_threshold: 0.5,
            skill_root_margin: String::from("0px 0px -100px 0px"),
            aos_duration: 1000,
            aos_easing: String::from("ease-in-out"),
            aos_offset: 100,
            aos_delay: 100,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ContactConfig {
    pub form_selector: String,
    pub submit_selector: String,
    pub pending_label: String,
    pub submit_delay_ms: u32,
    // unset means no length limit
    pub max_message_len: Option<usize>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        ContactConfig {
            form_selector: String::from(".contact-form"),
            submit_selector: String::from("button[type=\"submit\"]"),
            pending_label: String::from("Sending..."),
            submit_delay_ms: 2000,
            max_message_len: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enter_delay_ms: u32,
    pub visible_ms: u32,
    pub exit_ms: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        NotifyConfig {
            enter_delay_ms: 100,
            visible_ms: 5000,
            exit_ms: 300,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NavbarConfig {
    pub header_id: String,
    pub hero_selector: String,

    // past this offset the header gets the stronger blur/opacity
    pub solid_after: f64,

    // scrolling down past this offset hides the header
    pub hide_after: f64,

    pub parallax_rate: f64,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        NavbarConfig {
            header_id: String::from("navbar"),
            hero_selector: String::from(".hero"),
            solid_after: 100.0,
            hide_after: 200.0,
            parallax_rate: 0.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct MenuConfig {
    pub toggle_id: String,
    pub menu_id: String,
    pub link_selector: String,
    pub open_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        MenuConfig {
            toggle_id: String::from("nav-toggle"),
            menu_id: String::from("nav-menu"),
            link_selector: String::from(".nav-link"),
            open_class: String::from("active"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct TypingConfig {
    pub selector: String,
    pub start_delay_ms: u32,
    pub char_delay_ms: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        TypingConfig {
            selector: String::from(".hero-title"),
            start_delay_ms: 100,
            char_delay_ms: 70,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct HoverConfig {
    pub selector: String,
    pub raised: String,
    pub resting: String,
}

impl Default for HoverConfig {
    fn default() -> Self {
        HoverConfig {
            selector: String::from(".project-card"),
            raised: String::from("translateY(-10px) scale(1.02)"),
            resting: String::from("translateY(0) scale(1)"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub debounce_ms: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig { debounce_ms: 10 }
    }
}

// as with the server-side config files, the table of interest is nested under [config] so
// that the document can carry other tables without tripping the parser
#[derive(Debug, Deserialize, Serialize)]
struct TomlConfigDoc {
    #[serde(default)]
    config: PageConfig,
}

pub fn parse_config(doc: &str) -> Result<PageConfig> {
    let data: TomlConfigDoc = toml::from_str(doc)?;
    Ok(data.config)
}

// a broken config block must never take the page down, so any failure falls back to defaults
#[instrument(level=Level::DEBUG, skip(doc))]
pub fn read_config(doc: Option<&str>) -> PageConfig {
    let Some(doc) = doc else {
        debug!("no config block found, using defaults");
        return PageConfig::default();
    };

    match parse_config(doc) {
        Ok(config) => {
            debug!("successfully parsed config block");
            config
        }
        Err(err) => {
            error!("failed to parse config block, using defaults: {err}");
            PageConfig::default()
        }
    }
}
