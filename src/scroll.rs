use std::borrow::Cow;

use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlAnchorElement, ScrollBehavior, ScrollToOptions};

use crate::dom::{self, Disposer};
use crate::nav;

/// Element id an in-page `href` points at, or `None` for placeholders such
/// as `#` and `#!`.
pub fn fragment_target(href: &str) -> Option<Cow<'_, str>> {
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() || fragment == "!" {
        return None;
    }
    urlencoding::decode(fragment).ok()
}

/// Scroll position that puts an element `element_top` pixels below the
/// viewport top just under a fixed header.
pub fn scroll_target(element_top: f64, page_y_offset: f64, header_offset: f64) -> f64 {
    (element_top + page_y_offset - header_offset).max(0.0)
}

fn scroll_to_anchor(root: &Element, href: &str, header_offset: f64) -> bool {
    let Some(id) = fragment_target(href) else {
        return false;
    };
    let (Ok(window), Ok(document)) = (dom::window(), dom::document()) else {
        return false;
    };
    let Some(target) = document.get_element_by_id(&id) else {
        return false;
    };

    nav::close_menu(root);

    let top = target.get_bounding_client_rect().top();
    let offset = window.page_y_offset().unwrap_or(0.0);
    let options = ScrollToOptions::new();
    options.set_top(scroll_target(top, offset, header_offset));
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);

    if let Ok(history) = window.history() {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(href));
    }
    true
}

pub fn init(root: &Element, header_offset: f64) -> Disposer {
    let mut bindings = Disposer::new();
    for anchor in dom::query_all::<HtmlAnchorElement>(root, "a[href^=\"#\"]") {
        if !bindings.claim(&anchor, "scroll") {
            continue;
        }
        let root = root.clone();
        let link = anchor.clone();
        bindings.listen(&anchor, "click", move |e| {
            let href = link.get_attribute("href").unwrap_or_default();
            if scroll_to_anchor(&root, &href, header_offset) {
                e.prevent_default();
            }
        });
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_do_not_scroll() {
        assert_eq!(fragment_target("#"), None);
        assert_eq!(fragment_target("#!"), None);
        assert_eq!(fragment_target("/about#team"), None);
    }

    #[test]
    fn fragments_are_percent_decoded() {
        assert_eq!(fragment_target("#pricing").as_deref(), Some("pricing"));
        assert_eq!(fragment_target("#caf%C3%A9-menu").as_deref(), Some("café-menu"));
    }

    #[test]
    fn header_offset_is_subtracted_but_never_below_top() {
        assert_eq!(scroll_target(300.0, 1200.0, 80.0), 1420.0);
        assert_eq!(scroll_target(20.0, 0.0, 80.0), 0.0);
    }
}
