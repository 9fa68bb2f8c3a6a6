use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node};

use crate::dom::{self, Disposer};

pub const MENU_BUTTON_ID: &str = "mobileMenuBtn";
pub const MENU_ID: &str = "navLinks";
pub const OPEN_CLASS: &str = "active";
const ICON_CLOSED: &str = "fa-bars";
const ICON_OPEN: &str = "fa-times";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    pub open: bool,
}

/// Everything the page shows for one menu state. Built from a single
/// [`MenuState`] so the four side effects can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuView {
    pub menu_active: bool,
    pub icon_add: &'static str,
    pub icon_remove: &'static str,
    pub body_overflow: &'static str,
    pub aria_expanded: &'static str,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        Self { open: !self.open }
    }

    pub fn closed(self) -> Self {
        Self { open: false }
    }

    pub fn view(self) -> MenuView {
        if self.open {
            MenuView {
                menu_active: true,
                icon_add: ICON_OPEN,
                icon_remove: ICON_CLOSED,
                body_overflow: "hidden",
                aria_expanded: "true",
            }
        } else {
            MenuView {
                menu_active: false,
                icon_add: ICON_CLOSED,
                icon_remove: ICON_OPEN,
                body_overflow: "",
                aria_expanded: "false",
            }
        }
    }
}

#[derive(Clone)]
struct MenuParts {
    button: Element,
    menu: Element,
}

impl MenuParts {
    fn find(root: &Element) -> Option<Self> {
        let button = dom::query::<Element>(root, &format!("#{}", MENU_BUTTON_ID))?;
        let menu = dom::query::<Element>(root, &format!("#{}", MENU_ID))?;
        Some(Self { button, menu })
    }

    /// The menu's class list is the source of truth for the current state.
    fn state(&self) -> MenuState {
        MenuState {
            open: self.menu.class_list().contains(OPEN_CLASS),
        }
    }

    fn apply(&self, state: MenuState) {
        let view = state.view();
        let _ = self.menu.class_list().toggle_with_force(OPEN_CLASS, view.menu_active);
        if let Some(icon) = dom::query::<Element>(&self.button, "i") {
            let _ = icon.class_list().remove_1(view.icon_remove);
            let _ = icon.class_list().add_1(view.icon_add);
        }
        if let Ok(body) = dom::body() {
            dom::set_style(&body, "overflow", view.body_overflow);
        }
        let _ = self.button.set_attribute("aria-expanded", view.aria_expanded);
    }

    fn contains(&self, target: Option<&Node>) -> bool {
        self.menu.contains(target) || self.button.contains(target)
    }
}

/// Closes the mobile menu under `root` if it is open. Used by other
/// components that move the page (anchor scrolling).
pub fn close_menu(root: &Element) {
    if let Some(parts) = MenuParts::find(root) {
        if parts.state().open {
            parts.apply(MenuState::default());
        }
    }
}

pub fn init(root: &Element) -> Disposer {
    let mut bindings = Disposer::new();
    let Some(parts) = MenuParts::find(root) else {
        log::debug!("No mobile menu on this page");
        return bindings;
    };
    if !bindings.claim(&parts.button, "nav") {
        return bindings;
    }

    {
        let parts = parts.clone();
        bindings.listen(&parts.button.clone(), "click", move |e| {
            e.stop_propagation();
            let next = parts.state().toggled();
            parts.apply(next);
        });
    }

    for link in dom::query_all::<HtmlElement>(&parts.menu, "a") {
        let parts = parts.clone();
        bindings.listen(&link, "click", move |_| {
            parts.apply(parts.state().closed());
        });
    }

    if let Ok(document) = dom::document() {
        let parts = parts.clone();
        bindings.listen(&document, "click", move |e| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            if !parts.contains(target.as_ref()) && parts.state().open {
                parts.apply(parts.state().closed());
            }
        });
    }

    log::debug!("Mobile menu bound");
    bindings
}
