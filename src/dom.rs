//! Thin helpers over `web_sys`: global lookups, typed queries, event
//! listeners that unregister themselves, and the per-element markers that
//! keep repeated initialization from binding the same node twice.

use std::any::Any;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::error::{Error, Result};

/// Prefix of the attributes that mark an element as already bound.
pub const BOUND_ATTR_PREFIX: &str = "data-pagewire-";

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(Error::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(Error::NoDocument)
}

pub fn body() -> Result<HtmlElement> {
    document()?.body().ok_or(Error::NoBody)
}

/// First match of `selector` under `root`, cast to `T`. Invalid selectors and
/// wrong element types both read as "not there".
pub fn query<T: JsCast>(root: &Element, selector: &str) -> Option<T> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Every match of `selector` under `root` (document order) that casts to `T`.
pub fn query_all<T: JsCast>(root: &Element, selector: &str) -> Vec<T> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// Same as [`query_all`] but includes `root` itself when it matches, so an
/// initializer can be pointed straight at a single widget.
pub fn query_self_or_all<T: JsCast>(root: &Element, selector: &str) -> Vec<T> {
    let mut found = Vec::new();
    if root.matches(selector).unwrap_or(false) {
        if let Ok(el) = root.clone().dyn_into::<T>() {
            found.push(el);
        }
    }
    found.extend(query_all(root, selector));
    found
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let style = el.style();
    if value.is_empty() {
        let _ = style.remove_property(property);
    } else {
        let _ = style.set_property(property, value);
    }
}

/// An event listener that is removed from its target when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Self
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let _ = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            callback,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Everything one initializer call attached to the page. Dropping it removes
/// the listeners, drops (and so cancels) any timers it holds and clears the
/// bound markers so a later call can bind the same elements again.
#[derive(Default)]
pub struct Disposer {
    listeners: Vec<Listener>,
    claimed: Vec<(Element, String)>,
    held: Vec<Box<dyn Any>>,
    children: Vec<Disposer>,
}

impl Disposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `el` as bound for `role`. Returns `false` when an earlier call
    /// already claimed it, in which case the caller must not bind it again.
    pub fn claim(&mut self, el: &Element, role: &str) -> bool {
        let attr = format!("{}{}", BOUND_ATTR_PREFIX, role);
        if el.has_attribute(&attr) {
            return false;
        }
        let _ = el.set_attribute(&attr, "");
        self.claimed.push((el.clone(), attr));
        true
    }

    pub fn listen<F>(&mut self, target: &EventTarget, event: &'static str, handler: F)
    where
        F: FnMut(Event) + 'static,
    {
        self.listeners.push(Listener::new(target, event, handler));
    }

    /// Keeps `value` alive for as long as the bindings are.
    pub fn hold<T: 'static>(&mut self, value: T) {
        self.held.push(Box::new(value));
    }

    pub fn absorb(&mut self, other: Disposer) {
        if !other.is_empty() {
            self.children.push(other);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.claimed.is_empty() && self.held.is_empty() && self.children.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len() + self.children.iter().map(Disposer::listener_count).sum::<usize>()
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.listeners.clear();
        self.held.clear();
        for (el, attr) in self.claimed.drain(..) {
            let _ = el.remove_attribute(&attr);
        }
    }
}
