use std::rc::Rc;

use gloo_events::EventListener;
use tracing::{Level, error, info};

use common::{PageBehaviors, config::read_config};

mod page;
use page::WebPage;

mod storage;
use storage::LocalPreferences;

mod timers;
use timers::TimeoutScheduler;

// optional <script type="application/toml"> block carrying a [config] table
const CONFIG_ELEMENT_ID: &str = "page-config";

fn main() {
    dioxus_logger::init(Level::DEBUG).expect("failed to init logger");

    let Some(page) = WebPage::new() else {
        error!("no document to attach to");
        return;
    };

    // the module may load before or after parsing finishes, depending on how it is included
    if page.document().ready_state() == "loading" {
        let document = page.document().clone();
        EventListener::once(&document, "DOMContentLoaded", move |_| start(page)).forget();
    } else {
        start(page);
    }
}

fn start(page: WebPage) {
    let config = read_config(page.text_of(CONFIG_ELEMENT_ID).as_deref());

    PageBehaviors::attach(
        Rc::new(page),
        Rc::new(TimeoutScheduler::new()),
        Rc::new(LocalPreferences),
        &config,
    );

    info!("portfolio page behaviors running");
}
