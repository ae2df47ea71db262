use std::{cell::RefCell, rc::Rc};

use tracing::{Level, info, instrument, warn};

pub mod config;
pub mod contact;
pub mod debounce;
pub mod dom;
pub mod hover;
pub mod menu;
pub mod nav;
pub mod navbar;
pub mod notify;
pub mod reveal;
pub mod sched;
pub mod storage;
pub mod style;
pub mod theme;
pub mod typing;

#[cfg(test)]
mod testing;

use config::PageConfig;
use contact::ContactForm;
use debounce::Debouncer;
use dom::Page;
use menu::MobileMenu;
use nav::NavHighlighter;
use navbar::NavbarEffects;
use notify::NotificationCenter;
use sched::Scheduler;
use storage::PreferenceStore;
use theme::ThemeToggle;
use typing::Typewriter;

// page behaviors
//
// every behavior is attached independently and degrades on its own: a page missing the menu
// still gets its theme, a page missing the form still gets its nav highlight, and so on.  the
// listeners keep the behaviors alive, so dropping this struct does not detach anything; it
// only exists so callers (and tests) can reach into individual behaviors.
pub struct PageBehaviors<P: Page, S: Scheduler, St: PreferenceStore> {
    pub theme: Option<Rc<RefCell<ThemeToggle<P, S, St>>>>,
    pub nav: Rc<NavHighlighter<P>>,
    pub anchors: usize,
    pub aos: bool,
    pub revealed: usize,
    pub notices: Rc<NotificationCenter<P, S>>,
    pub contact: Option<Rc<RefCell<ContactForm<P, S>>>>,
    pub navbar: Option<Rc<NavbarEffects<P>>>,
    pub parallax: bool,
    pub menu: Option<Rc<MobileMenu<P>>>,
    pub typing: Option<Rc<RefCell<Typewriter<P, S>>>>,
    pub skills: usize,
    pub cards: usize,
    pub settled_scroll: Rc<Debouncer<S>>,
}

impl<P: Page, S: Scheduler, St: PreferenceStore> PageBehaviors<P, S, St> {
    // call once the document is ready
    #[instrument(level=Level::DEBUG, skip_all)]
    pub fn attach(page: Rc<P>, sched: Rc<S>, store: Rc<St>, config: &PageConfig) -> Self {
        if let Err(err) = style::inject_styles(page.as_ref()) {
            warn!("failed to inject behavior styles: {err}");
        }

        let theme = ThemeToggle::attach(page.clone(), sched.clone(), store, &config.theme);
        let nav = NavHighlighter::attach(page.clone(), &config.nav);
        let anchors = nav::attach_smooth_scroll(page.clone(), &config.nav);

        let aos = reveal::init_animate_on_scroll(page.as_ref(), &config.reveal);
        let revealed = reveal::attach_reveal(page.clone(), &config.reveal);

        let notices = NotificationCenter::new(page.clone(), sched.clone(), &config.notify);
        let contact = ContactForm::attach(
            page.clone(),
            sched.clone(),
            notices.clone(),
            &config.contact,
        );

        let navbar = NavbarEffects::attach(page.clone(), &config.navbar, &config.theme);
        let parallax = navbar::attach_parallax(page.clone(), &config.navbar);
        let menu = MobileMenu::attach(page.clone(), &config.menu);

        let typing = Typewriter::attach(page.clone(), sched.clone(), &config.typing);
        let skills = reveal::attach_skill_progress(page.clone(), &config.reveal);
        let cards = hover::attach_card_hover(page.clone(), &config.hover);

        let settled_scroll = debounce::attach_settled_scroll(page, sched, &config.scroll);

        info!("page behaviors attached");

        PageBehaviors {
            theme,
            nav,
            anchors,
            aos,
            revealed,
            notices,
            contact,
            navbar,
            parallax,
            menu,
            typing,
            skills,
            cards,
            settled_scroll,
        }
    }
}
