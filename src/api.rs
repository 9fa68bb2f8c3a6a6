//! Functions exported to page scripts. Every initializer takes an optional
//! root element (the document body when omitted) and hands back a handle
//! whose `dispose()` undoes the binding.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Function;
use web_sys::Element;

use crate::config::Config;
use crate::dom::{self, Disposer};
use crate::error::Result;
use crate::site::Site;
use crate::timing::{Debounce, Throttle, DEFAULT_DEBOUNCE_MS};
use crate::{accordion, forms, nav, scroll, tabs, transition, vendor, video};

fn resolve_root(root: Option<Element>) -> Result<Element> {
    match root {
        Some(root) => Ok(root),
        None => Ok(dom::body()?.into()),
    }
}

#[wasm_bindgen]
pub struct Bindings {
    inner: Disposer,
}

#[wasm_bindgen]
impl Bindings {
    /// Removes listeners, cancels pending timers and clears bound markers.
    pub fn dispose(self) {
        log::debug!("Disposing {} listener(s)", self.inner.listener_count());
        drop(self.inner);
    }

    #[wasm_bindgen(getter, js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.inner.listener_count()
    }
}

impl From<Disposer> for Bindings {
    fn from(inner: Disposer) -> Self {
        Self { inner }
    }
}

#[wasm_bindgen]
pub struct SiteHandle {
    site: Site,
}

#[wasm_bindgen]
impl SiteHandle {
    pub fn refresh(&mut self) {
        self.site.refresh();
    }

    pub fn dispose(self) {
        log::debug!("Disposing site with {} listener(s)", self.site.listener_count());
        drop(self.site);
    }

    #[wasm_bindgen(getter, js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.site.listener_count()
    }
}

/// Binds every component under `root`.
#[wasm_bindgen]
pub fn mount(root: Option<Element>, config: JsValue) -> std::result::Result<SiteHandle, JsValue> {
    let config = Config::from_js(config)?;
    let root = resolve_root(root)?;
    Ok(SiteHandle {
        site: Site::mount(root, config),
    })
}

#[wasm_bindgen(js_name = initNavigation)]
pub fn init_navigation(root: Option<Element>) -> std::result::Result<Bindings, JsValue> {
    Ok(nav::init(&resolve_root(root)?).into())
}

#[wasm_bindgen(js_name = initVideoPlayers)]
pub fn init_video_players(root: Option<Element>) -> std::result::Result<Bindings, JsValue> {
    Ok(video::init(&resolve_root(root)?).into())
}

#[wasm_bindgen(js_name = initTabs)]
pub fn init_tabs(root: Option<Element>) -> std::result::Result<Bindings, JsValue> {
    Ok(tabs::init(&resolve_root(root)?).into())
}

#[wasm_bindgen(js_name = initAccordions)]
pub fn init_accordions(root: Option<Element>, config: JsValue) -> std::result::Result<Bindings, JsValue> {
    let config = Config::from_js(config)?;
    Ok(accordion::init(&resolve_root(root)?, config.accordion_transition_ms).into())
}

#[wasm_bindgen(js_name = initForms)]
pub fn init_forms(root: Option<Element>, config: JsValue) -> std::result::Result<Bindings, JsValue> {
    let config = Config::from_js(config)?;
    Ok(forms::init(&resolve_root(root)?, &config).into())
}

#[wasm_bindgen(js_name = initSmoothScroll)]
pub fn init_smooth_scroll(root: Option<Element>, config: JsValue) -> std::result::Result<Bindings, JsValue> {
    let config = Config::from_js(config)?;
    Ok(scroll::init(&resolve_root(root)?, config.scroll_header_offset).into())
}

#[wasm_bindgen(js_name = initPageTransitions)]
pub fn init_page_transitions(config: JsValue) -> std::result::Result<Bindings, JsValue> {
    let config = Config::from_js(config)?;
    Ok(transition::init(config.page_transition_ms).into())
}

#[wasm_bindgen(js_name = initGallery)]
pub fn init_gallery(root: Option<Element>) -> std::result::Result<Bindings, JsValue> {
    Ok(vendor::init_gallery(&resolve_root(root)?).into())
}

/// Returns `false` when AOS is not loaded.
#[wasm_bindgen(js_name = initScrollAnimations)]
pub fn init_scroll_animations() -> bool {
    vendor::init_scroll_animations()
}

#[wasm_bindgen(js_name = validateEmail)]
pub fn validate_email(email: &str) -> bool {
    forms::validate_email(email)
}

/// Debounced wrapper around `func`. The wrapper forwards its first argument.
#[wasm_bindgen]
pub fn debounce(func: Function, wait: Option<u32>, immediate: Option<bool>) -> Function {
    let debounced = Debounce::new(
        wait.unwrap_or(DEFAULT_DEBOUNCE_MS),
        immediate.unwrap_or(true),
        move |arg: JsValue| {
            if let Err(e) = func.call1(&JsValue::UNDEFINED, &arg) {
                log::warn!("Debounced callback threw: {:?}", e);
            }
        },
    );
    Closure::wrap(Box::new(move |arg: JsValue| debounced.call(arg)) as Box<dyn FnMut(JsValue)>)
        .into_js_value()
        .unchecked_into()
}

/// Throttled wrapper around `func`. The wrapper forwards its first argument.
#[wasm_bindgen]
pub fn throttle(func: Function, limit: u32) -> Function {
    let throttled = Throttle::new(limit, move |arg: JsValue| {
        if let Err(e) = func.call1(&JsValue::UNDEFINED, &arg) {
            log::warn!("Throttled callback threw: {:?}", e);
        }
    });
    Closure::wrap(Box::new(move |arg: JsValue| throttled.call(arg)) as Box<dyn FnMut(JsValue)>)
        .into_js_value()
        .unchecked_into()
}
