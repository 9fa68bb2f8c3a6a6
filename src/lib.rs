//! Interactive behaviors for the marketing site: mobile menu, video player
//! controls, tabs, accordions, form acknowledgements, anchor scrolling and
//! page transitions, bound onto server-rendered markup.

use std::cell::RefCell;

use log::info;
use wasm_bindgen::prelude::*;
use web_sys::Element;

pub mod accordion;
pub mod api;
pub mod config;
pub mod dom;
pub mod error;
pub mod forms;
pub mod nav;
pub mod schedule;
pub mod scroll;
pub mod site;
pub mod tabs;
pub mod timing;
pub mod transition;
pub mod vendor;
pub mod video;

use config::Config;
use dom::Listener;
use site::Site;

/// The automatically mounted page and the window-level listeners that drive
/// it.
#[derive(Default)]
struct Page {
    site: Option<Site>,
    listeners: Vec<Listener>,
}

thread_local! {
    static PAGE: RefCell<Page> = RefCell::new(Page::default());
}

fn mount_page(config: Config) {
    let root: Element = match dom::body() {
        Ok(body) => body.into(),
        Err(e) => {
            log::error!("Not mounting: {}", e);
            return;
        }
    };
    let site = Site::mount(root, config);
    info!("Page bound with {} listener(s)", site.listener_count());
    PAGE.with(|page| page.borrow_mut().site = Some(site));
}

/// `pageshow` also fires for pages restored from the back/forward cache,
/// where the body may still carry the fade-out class.
fn on_page_show() {
    transition::reset();
    PAGE.with(|page| match page.try_borrow_mut() {
        Ok(mut page) => {
            if let Some(site) = page.site.as_mut() {
                site.refresh();
            }
        }
        Err(_) => log::warn!("Skipping refresh while the page is busy"),
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let (window, document) = match (dom::window(), dom::document()) {
        (Ok(window), Ok(document)) => (window, document),
        _ => return,
    };
    let config = Config::from_page(&document);
    // Initialize logging
    let _ = console_log::init_with_level(config.log_level());
    info!("Starting pagewire");

    let mut listeners = vec![Listener::new(&window, "pageshow", |_| on_page_show())];
    if document.ready_state() == "loading" {
        let pending = RefCell::new(Some(config));
        listeners.push(Listener::new(&document, "DOMContentLoaded", move |_| {
            if let Some(config) = pending.borrow_mut().take() {
                mount_page(config);
            }
        }));
    } else {
        mount_page(config);
    }
    PAGE.with(|page| page.borrow_mut().listeners.extend(listeners));
}
