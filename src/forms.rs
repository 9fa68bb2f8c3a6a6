//! Contact and newsletter forms. Nothing leaves the page: a submission is
//! logged, acknowledged after a short pause and the acknowledgement fades out.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::JsCast;
use web_sys::js_sys::{self, Array};
use web_sys::{Document, Element, FormData, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement, Node};

use crate::config::Config;
use crate::dom::{self, Disposer};
use crate::schedule::{InFlight, Sequence};

pub const CONTACT_FORM_ID: &str = "contact-form";
pub const NEWSLETTER_SELECTOR: &str = ".newsletter-form";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const SUBSCRIBED_MESSAGE: &str = "Thank you for subscribing!";
const ERROR_CLASS: &str = "text-red-600";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Loose syntax check: something, `@`, something, `.`, something, no spaces.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(&email.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStage {
    /// Put the acknowledgement on the page.
    Reveal,
    Fade,
    Remove,
}

/// Delays (each relative to the previous stage) for an acknowledgement.
/// `reveal_after` is `None` when the message is already on the page.
pub fn message_timeline(config: &Config, reveal_after: Option<u32>) -> Vec<(u32, MessageStage)> {
    let mut stages = Vec::with_capacity(3);
    if let Some(delay) = reveal_after {
        stages.push((delay, MessageStage::Reveal));
    }
    stages.push((config.message_lifetime_ms, MessageStage::Fade));
    stages.push((config.message_fade_ms, MessageStage::Remove));
    stages
}

fn schedule_message<F>(message: &HtmlElement, guard: &Node, timeline: Vec<(u32, MessageStage)>, on_reveal: F) -> Sequence
where
    F: FnOnce() + 'static,
{
    let mut on_reveal = Some(on_reveal);
    let mut sequence = Sequence::new().guarded_by(guard);
    for (delay, stage) in timeline {
        let message = message.clone();
        let reveal = match stage {
            MessageStage::Reveal => on_reveal.take(),
            _ => None,
        };
        sequence = sequence.then(delay, move || match stage {
            MessageStage::Reveal => {
                if let Some(reveal) = reveal {
                    reveal();
                }
            }
            MessageStage::Fade => dom::set_style(&message, "opacity", "0"),
            MessageStage::Remove => message.remove(),
        });
    }
    sequence.start()
}

fn create(document: &Document, tag: &str, class: &str) -> Option<HtmlElement> {
    let el = document.create_element(tag).ok()?.dyn_into::<HtmlElement>().ok()?;
    el.set_class_name(class);
    Some(el)
}

fn insert_after(anchor: &Node, node: &Node) {
    if let Some(parent) = anchor.parent_node() {
        let _ = parent.insert_before(node, anchor.next_sibling().as_ref());
    }
}

/// Named text fields of `form`, in form order.
fn form_fields(form: &HtmlFormElement) -> Map<String, Value> {
    let mut fields = Map::new();
    let Ok(data) = FormData::new_with_form(form) else {
        return fields;
    };
    let Ok(Some(entries)) = js_sys::try_iter(&data) else {
        return fields;
    };
    for entry in entries.flatten() {
        let pair = Array::from(&entry);
        if let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            fields.insert(key, Value::String(value));
        }
    }
    fields
}

fn log_submission(fields: &Map<String, Value>) {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match fields.serialize(&serializer) {
        Ok(value) => gloo_console::log!("Form submitted:", value),
        Err(_) => log::info!("Form submitted: {}", Value::Object(fields.clone())),
    }
}

struct ContactForm {
    form: HtmlFormElement,
    button: Option<HtmlButtonElement>,
    config: Config,
    in_flight: Rc<RefCell<InFlight>>,
}

impl ContactForm {
    fn submit(&self) {
        log_submission(&form_fields(&self.form));
        let Ok(document) = dom::document() else {
            return;
        };
        let Some(message) = create(&document, "div", "mt-4 p-4 bg-green-100 text-green-700 rounded-lg") else {
            return;
        };
        message.set_inner_html(
            "<p class=\"font-medium\">Thank you for your message!</p><p>We will get back to you soon.</p>",
        );

        let original_label = self.button.as_ref().and_then(|b| b.text_content());
        if let Some(button) = &self.button {
            button.set_disabled(true);
            button.set_inner_html("<i class=\"fas fa-spinner fa-spin mr-2\"></i> Sending...");
        }

        let form = self.form.clone();
        let button = self.button.clone();
        let shown = message.clone();
        let reveal = move || {
            insert_after(&form, &shown);
            form.reset();
            if let Some(button) = &button {
                button.set_disabled(false);
                button.set_text_content(original_label.as_deref());
            }
        };
        let timeline = message_timeline(&self.config, Some(self.config.contact_submit_delay_ms));
        let sequence = schedule_message(&message, &self.form, timeline, reveal);
        self.in_flight.borrow_mut().push(sequence);
    }
}

fn bind_contact(root: &Element, config: &Config, bindings: &mut Disposer) {
    let Some(form) = dom::query::<HtmlFormElement>(root, &format!("#{}", CONTACT_FORM_ID)) else {
        return;
    };
    if !bindings.claim(&form, "contact") {
        return;
    }
    let contact = ContactForm {
        button: dom::query::<HtmlButtonElement>(&form, "button[type=\"submit\"]"),
        form: form.clone(),
        config: config.clone(),
        in_flight: Rc::new(RefCell::new(InFlight::default())),
    };
    bindings.listen(&form, "submit", move |e| {
        e.prevent_default();
        contact.submit();
    });
}

struct NewsletterForm {
    form: HtmlFormElement,
    input: HtmlInputElement,
    config: Config,
    in_flight: Rc<RefCell<InFlight>>,
}

impl NewsletterForm {
    fn clear_error(&self) {
        if let Some(existing) = dom::query::<Element>(&self.form, &format!(".{}", ERROR_CLASS)) {
            existing.remove();
        }
    }

    fn submit(&self) {
        let Ok(document) = dom::document() else {
            return;
        };
        let email = self.input.value().trim().to_string();
        self.clear_error();

        if email.is_empty() || !validate_email(&email) {
            log::debug!("Rejected newsletter address {:?}", email);
            if let Some(error) = create(&document, "p", &format!("mt-2 text-sm {}", ERROR_CLASS)) {
                error.set_text_content(Some(INVALID_EMAIL_MESSAGE));
                insert_after(&self.input, &error);
            }
            let _ = self.input.focus();
            return;
        }

        log::info!("Newsletter subscription: {}", email);
        self.input.set_value("");
        let Some(message) = create(&document, "p", "mt-2 text-sm text-green-600") else {
            return;
        };
        message.set_text_content(Some(SUBSCRIBED_MESSAGE));
        let after = self.form.last_element_child().and_then(|el| el.next_sibling());
        let _ = self.form.insert_before(&message, after.as_ref());

        let sequence = schedule_message(&message, &message, message_timeline(&self.config, None), || ());
        self.in_flight.borrow_mut().push(sequence);
    }
}

fn bind_newsletter(form: &HtmlFormElement, config: &Config, bindings: &mut Disposer) {
    let Some(input) = dom::query::<HtmlInputElement>(form, "input[type=\"email\"]") else {
        return;
    };
    if !bindings.claim(form, "newsletter") {
        return;
    }
    let newsletter = NewsletterForm {
        form: form.clone(),
        input,
        config: config.clone(),
        in_flight: Rc::new(RefCell::new(InFlight::default())),
    };
    bindings.listen(form, "submit", move |e| {
        e.prevent_default();
        newsletter.submit();
    });
}

pub fn init(root: &Element, config: &Config) -> Disposer {
    let mut bindings = Disposer::new();
    bind_contact(root, config, &mut bindings);
    for form in dom::query_self_or_all::<HtmlFormElement>(root, NEWSLETTER_SELECTOR) {
        let mut own = Disposer::new();
        bind_newsletter(&form, config, &mut own);
        bindings.absorb(own);
    }
    bindings
}
