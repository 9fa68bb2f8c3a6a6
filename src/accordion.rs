use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Element, HtmlElement};

use crate::dom::{self, Disposer};
use crate::schedule::{Latest, Sequence};

pub const ACCORDION_SELECTOR: &str = ".accordion";

/// One inline style write. An empty value clears the property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleWrite {
    pub property: &'static str,
    pub value: String,
}

fn write(property: &'static str, value: impl Into<String>) -> StyleWrite {
    StyleWrite {
        property,
        value: value.into(),
    }
}

fn clear(property: &'static str) -> StyleWrite {
    write(property, "")
}

/// The measured-height transition, split at the points where the page has to
/// be touched between writes: measure `scrollHeight` after `prepare`, force a
/// reflow between `start` and `animate`, wait the transition out before
/// `settle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub prepare: Vec<StyleWrite>,
    pub start: Vec<StyleWrite>,
    pub animate: Vec<StyleWrite>,
    pub settle: Vec<StyleWrite>,
}

impl TransitionPlan {
    pub fn collapse(scroll_height: i32) -> Self {
        Self {
            prepare: vec![write("overflow", "hidden")],
            start: vec![write("height", format!("{}px", scroll_height))],
            animate: vec![write("height", "0"), write("opacity", "0")],
            settle: vec![write("display", "none"), clear("height"), clear("opacity"), clear("overflow")],
        }
    }

    pub fn expand(scroll_height: i32) -> Self {
        Self {
            prepare: vec![write("display", "block")],
            start: vec![write("height", "0"), write("opacity", "0"), write("overflow", "hidden")],
            animate: vec![write("height", format!("{}px", scroll_height)), write("opacity", "1")],
            settle: vec![clear("height"), clear("opacity"), clear("overflow")],
        }
    }

    pub fn for_direction(expand: bool, scroll_height: i32) -> Self {
        if expand {
            Self::expand(scroll_height)
        } else {
            Self::collapse(scroll_height)
        }
    }
}

fn apply(el: &HtmlElement, writes: &[StyleWrite]) {
    for w in writes {
        dom::set_style(el, w.property, &w.value);
    }
}

fn is_expanded(button: &Element) -> bool {
    button.get_attribute("aria-expanded").as_deref() == Some("true")
}

fn run_transition(content: &HtmlElement, expand: bool, duration_ms: u32) -> Sequence {
    // `prepare` never depends on the height, so it can run before measuring.
    apply(content, &TransitionPlan::for_direction(expand, 0).prepare);
    let plan = TransitionPlan::for_direction(expand, content.scroll_height());

    apply(content, &plan.start);
    let _ = content.offset_height(); // force reflow
    apply(content, &plan.animate);

    let target = content.clone();
    Sequence::new()
        .guarded_by(content)
        .then(duration_ms, move || apply(&target, &plan.settle))
        .start()
}

fn bind_accordion(accordion: &Element, duration_ms: u32, bindings: &mut Disposer) {
    let Some(button) = dom::query::<HtmlElement>(accordion, ".accordion-button") else {
        return;
    };
    let Some(content) = dom::query::<HtmlElement>(accordion, ".accordion-content") else {
        return;
    };
    if !bindings.claim(accordion, "accordion") {
        return;
    }

    dom::set_style(&content, "display", if is_expanded(&button) { "block" } else { "none" });

    let pending = Rc::new(RefCell::new(Latest::default()));
    let target = button.clone();
    bindings.listen(&button, "click", move |_| {
        let expand = !is_expanded(&target);
        let _ = target.set_attribute("aria-expanded", if expand { "true" } else { "false" });
        // Replacing cancels the settle step of a transition still running.
        pending
            .borrow_mut()
            .replace(run_transition(&content, expand, duration_ms));
    });
}

pub fn init(root: &Element, duration_ms: u32) -> Disposer {
    let mut bindings = Disposer::new();
    for accordion in dom::query_self_or_all::<Element>(root, ACCORDION_SELECTOR) {
        let mut own = Disposer::new();
        bind_accordion(&accordion, duration_ms, &mut own);
        bindings.absorb(own);
    }
    bindings
}
