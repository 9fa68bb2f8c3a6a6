use log::Level;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::Document;

use crate::error::{Error, Result};

/// Id of the optional `<script type="application/json">` block the automatic
/// mount reads its settings from.
pub const PAGE_CONFIG_ID: &str = "pagewire-config";

#[cfg(debug_assertions)]
pub fn default_log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn default_log_level() -> Level {
    Level::Info
}

/// Timings and offsets shared by every component. Every key is optional on
/// the JS side; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Delay between adding the transition class and navigating away.
    pub page_transition_ms: u32,
    pub accordion_transition_ms: u32,
    /// Fake round-trip time of the contact form.
    pub contact_submit_delay_ms: u32,
    /// How long a success message stays fully visible.
    pub message_lifetime_ms: u32,
    pub message_fade_ms: u32,
    /// Height of the fixed header that smooth scrolling keeps clear of.
    pub scroll_header_offset: f64,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_transition_ms: 300,
            accordion_transition_ms: 300,
            contact_submit_delay_ms: 1500,
            message_lifetime_ms: 5000,
            message_fade_ms: 300,
            scroll_header_offset: 80.0,
            log_level: None,
        }
    }
}

impl Config {
    /// Reads a config object handed over from JS. `undefined` and `null`
    /// mean "all defaults".
    pub fn from_js(value: JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Looks for the page-level JSON block. A broken block is logged and
    /// ignored so the page still gets its behaviors.
    pub fn from_page(document: &Document) -> Self {
        let Some(text) = document
            .get_element_by_id(PAGE_CONFIG_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };
        match Self::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring #{}: {}", PAGE_CONFIG_ID, e);
                Self::default()
            }
        }
    }

    pub fn log_level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or_else(default_log_level)
    }
}
