//! Optional third-party scripts. They are used only when the page loaded
//! them; a missing library is not an error.

use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{self, Array, Function, Reflect};
use web_sys::Element;

use crate::dom::{self, Disposer};

pub const GALLERY_SELECTOR: &str = ".gallery-container";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AosOptions {
    pub duration: u32,
    pub easing: &'static str,
    pub once: bool,
    pub offset: u32,
    pub delay: u32,
}

impl Default for AosOptions {
    fn default() -> Self {
        Self {
            duration: 800,
            easing: "ease-in-out",
            once: true,
            offset: 100,
            delay: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideojsOptions {
    pub muted: bool,
    pub controls: bool,
}

/// `plugins` is filled in separately since it holds live JS objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryOptions {
    pub selector: &'static str,
    pub download: bool,
    pub videojs: bool,
    pub videojs_options: VideojsOptions,
    pub speed: u32,
    pub mode: &'static str,
    pub hide_bars_delay: u32,
    pub show_close_icon: bool,
    pub closable: bool,
    #[serde(rename = "loop")]
    pub loop_items: bool,
    pub esc_key: bool,
    pub key_press: bool,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            selector: ".gallery-item",
            download: false,
            videojs: true,
            videojs_options: VideojsOptions {
                muted: true,
                controls: true,
            },
            speed: 500,
            mode: "lg-fade",
            hide_bars_delay: 2000,
            show_close_icon: true,
            closable: true,
            loop_items: true,
            esc_key: true,
            key_press: true,
        }
    }
}

fn global(name: &str) -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &name.into())
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &name.into()).ok()?.dyn_into::<Function>().ok()
}

fn to_js<T: Serialize>(value: &T) -> Option<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| log::warn!("Could not encode library options: {}", e))
        .ok()
}

/// Starts AOS scroll animations when the library is on the page.
pub fn init_scroll_animations() -> bool {
    let Some(aos) = global("AOS") else {
        return false;
    };
    let (Some(init), Some(options)) = (method(&aos, "init"), to_js(&AosOptions::default())) else {
        return false;
    };
    match init.call1(&aos, &options) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("AOS.init failed: {:?}", e);
            false
        }
    }
}

/// A running lightGallery; destroyed together with its bindings.
struct Gallery(JsValue);

impl Drop for Gallery {
    fn drop(&mut self) {
        if let Some(destroy) = method(&self.0, "destroy") {
            let _ = destroy.call0(&self.0);
        }
    }
}

pub fn init_gallery(root: &Element) -> Disposer {
    let mut bindings = Disposer::new();
    let Some(light_gallery) = global("lightGallery").and_then(|v| v.dyn_into::<Function>().ok()) else {
        return bindings;
    };
    let Some(container) = dom::query::<Element>(root, GALLERY_SELECTOR) else {
        return bindings;
    };
    if !bindings.claim(&container, "gallery") {
        return bindings;
    }
    let Some(options) = to_js(&GalleryOptions::default()) else {
        return bindings;
    };
    if let Some(video_plugin) = global("lgVideo") {
        let _ = Reflect::set(&options, &"plugins".into(), &Array::of1(&video_plugin));
    }
    match light_gallery.call2(&JsValue::UNDEFINED, &container, &options) {
        Ok(instance) => bindings.hold(Gallery(instance)),
        Err(e) => log::warn!("lightGallery failed: {:?}", e),
    }
    bindings
}
