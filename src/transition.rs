use std::cell::Cell;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlAnchorElement, MouseEvent, Node};

use crate::dom::{self, Disposer};

pub const TRANSITION_CLASS: &str = "page-transition";

thread_local! {
    /// Bumped by every scheduled navigation and by `reset`; a deferred
    /// navigation only runs if nothing bumped it in the meantime.
    static GENERATION: Cell<u64> = Cell::new(0);
}

fn bump_generation() -> u64 {
    GENERATION.with(|generation| {
        let next = generation.get().wrapping_add(1);
        generation.set(next);
        next
    })
}

fn is_current(ticket: u64) -> bool {
    GENERATION.with(|generation| generation.get() == ticket)
}

/// The parts of an anchor that decide whether leaving through it gets the
/// fade-out treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    pub hostname: String,
    pub pathname: String,
    pub hash: String,
    pub target: String,
    pub download: bool,
    /// The raw `href` is a bare fragment such as `#` or `#team`.
    pub in_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    pub hostname: String,
    pub pathname: String,
}

/// Same host, not an in-page jump, not a new tab and not a download.
pub fn should_intercept(link: &LinkInfo, page: &PageLocation) -> bool {
    if link.in_page || link.hostname != page.hostname {
        return false;
    }
    if !link.hash.is_empty() && link.pathname == page.pathname {
        return false;
    }
    link.target != "_blank" && !link.download
}

/// Left button, no modifier, nobody else handled it already.
fn is_plain_click(e: &MouseEvent) -> bool {
    !e.default_prevented() && e.button() == 0 && !(e.ctrl_key() || e.meta_key() || e.shift_key() || e.alt_key())
}

fn link_info(anchor: &HtmlAnchorElement) -> LinkInfo {
    LinkInfo {
        hostname: anchor.hostname(),
        pathname: anchor.pathname(),
        hash: anchor.hash(),
        target: anchor.target(),
        download: anchor.has_attribute("download"),
        in_page: anchor
            .get_attribute("href")
            .map_or(false, |href| href.starts_with('#')),
    }
}

fn page_location() -> Option<PageLocation> {
    let location = dom::window().ok()?.location();
    Some(PageLocation {
        hostname: location.hostname().ok()?,
        pathname: location.pathname().ok()?,
    })
}

fn enclosing_anchor(e: &MouseEvent) -> Option<HtmlAnchorElement> {
    let node = e.target()?.dyn_into::<Node>().ok()?;
    let el = match node.dyn_ref::<Element>() {
        Some(el) => el.clone(),
        None => node.parent_element()?,
    };
    el.closest("a").ok().flatten()?.dyn_into::<HtmlAnchorElement>().ok()
}

fn navigate_after(href: String, delay_ms: u32) {
    if let Ok(body) = dom::body() {
        let _ = body.class_list().add_1(TRANSITION_CLASS);
    }
    let ticket = bump_generation();
    spawn_local(async move {
        TimeoutFuture::new(delay_ms).await;
        if !is_current(ticket) {
            log::debug!("Navigation to {} was cancelled", href);
            return;
        }
        if let Ok(window) = dom::window() {
            let _ = window.location().set_href(&href);
        }
    });
}

/// Removes the fade-out class, e.g. when the page comes back from the
/// back/forward cache with it still set, and cancels a navigation that is
/// still waiting for its delay.
pub fn reset() {
    bump_generation();
    if let Ok(body) = dom::body() {
        let _ = body.class_list().remove_1(TRANSITION_CLASS);
    }
}

/// One document-level click handler serves every link on the page, including
/// links added later.
pub fn init(delay_ms: u32) -> Disposer {
    let mut bindings = Disposer::new();
    let Ok(document) = dom::document() else {
        return bindings;
    };
    let Some(root) = document.document_element() else {
        return bindings;
    };
    if !bindings.claim(&root, "transitions") {
        return bindings;
    }
    bindings.listen(&document, "click", move |e| {
        let Some(e) = e.dyn_ref::<MouseEvent>() else {
            return;
        };
        if !is_plain_click(e) {
            return;
        }
        let Some(anchor) = enclosing_anchor(e) else {
            return;
        };
        let Some(page) = page_location() else {
            return;
        };
        if !should_intercept(&link_info(&anchor), &page) {
            return;
        }
        e.prevent_default();
        log::debug!("Leaving for {}", anchor.href());
        navigate_after(anchor.href(), delay_ms);
    });
    bindings
}
