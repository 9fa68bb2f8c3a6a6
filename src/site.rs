use chrono::Datelike;
use web_sys::{Element, HtmlElement};

use crate::config::Config;
use crate::dom::{self, Disposer};
use crate::{accordion, forms, nav, scroll, tabs, transition, vendor, video};

pub const CURRENT_YEAR_ID: &str = "current-year";

pub fn set_current_year(root: &Element) {
    if let Some(el) = dom::query::<HtmlElement>(root, &format!("#{}", CURRENT_YEAR_ID)) {
        let year = chrono::Local::now().year();
        el.set_text_content(Some(&year.to_string()));
    }
}

/// Runs every initializer against `root`. Elements bound by an earlier call
/// are skipped, so this is safe to repeat.
pub fn init_all(root: &Element, config: &Config) -> Disposer {
    set_current_year(root);

    let mut bindings = Disposer::new();
    bindings.absorb(nav::init(root));
    bindings.absorb(scroll::init(root, config.scroll_header_offset));
    bindings.absorb(forms::init(root, config));
    bindings.absorb(video::init(root));
    bindings.absorb(vendor::init_gallery(root));
    vendor::init_scroll_animations();
    bindings.absorb(tabs::init(root));
    bindings.absorb(accordion::init(root, config.accordion_transition_ms));
    bindings.absorb(transition::init(config.page_transition_ms));
    bindings
}

/// All behaviors of one page region, alive until dropped.
pub struct Site {
    root: Element,
    config: Config,
    bindings: Disposer,
}

impl Site {
    pub fn mount(root: Element, config: Config) -> Self {
        let mut site = Self {
            root,
            config,
            bindings: Disposer::new(),
        };
        site.refresh();
        site
    }

    /// Binds whatever appeared since the last call, e.g. after a restore
    /// from the back/forward cache or after markup was injected.
    pub fn refresh(&mut self) {
        let fresh = init_all(&self.root, &self.config);
        log::debug!("Refresh bound {} new listener(s)", fresh.listener_count());
        self.bindings.absorb(fresh);
    }

    pub fn listener_count(&self) -> usize {
        self.bindings.listener_count()
    }
}
