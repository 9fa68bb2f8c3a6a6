use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use web_sys::{CustomEvent, CustomEventInit, Element, HtmlElement};

use crate::dom::{self, Disposer};

pub const CONTAINER_SELECTOR: &str = ".tabs-container";
pub const TAB_CHANGED_EVENT: &str = "tabChanged";
const ACTIVE_CLASS: &str = "active";
const HIDDEN_CLASS: &str = "hidden";

/// One tab handle: its own id and the id of the panel it controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSpec {
    pub id: String,
    pub controls: Option<String>,
}

/// Payload of the `tabChanged` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabChanged {
    pub tab_id: String,
    pub panel_id: String,
}

/// Outcome of activating one tab, ready to be written to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub tab: usize,
    /// Index into the group's panels of the panel to reveal, if it exists.
    pub panel: Option<usize>,
}

/// Exclusive selection over a fixed list of tabs and panels.
#[derive(Debug, Clone)]
pub struct TabGroup {
    tabs: Vec<TabSpec>,
    panel_ids: Vec<String>,
    active: Option<usize>,
}

impl TabGroup {
    pub fn new(tabs: Vec<TabSpec>, panel_ids: Vec<String>) -> Self {
        Self {
            tabs,
            panel_ids,
            active: None,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Makes `index` the only active tab. The panel is matched by id, never
    /// by position; a tab whose panel is missing still becomes active.
    pub fn activate(&mut self, index: usize) -> Option<Activation> {
        let tab = self.tabs.get(index)?;
        let panel = tab
            .controls
            .as_deref()
            .filter(|id| !id.is_empty())
            .and_then(|id| self.panel_ids.iter().position(|panel_id| panel_id == id));
        self.active = Some(index);
        Some(Activation { tab: index, panel })
    }

    pub fn changed_event(&self, activation: &Activation) -> Option<TabChanged> {
        let panel = activation.panel?;
        Some(TabChanged {
            tab_id: self.tabs[activation.tab].id.clone(),
            panel_id: self.panel_ids[panel].clone(),
        })
    }
}

struct BoundGroup {
    container: Element,
    tabs: Vec<HtmlElement>,
    panels: Vec<HtmlElement>,
    state: TabGroup,
}

impl BoundGroup {
    fn activate(&mut self, index: usize) {
        let Some(activation) = self.state.activate(index) else {
            return;
        };
        for panel in &self.panels {
            let _ = panel.class_list().add_1(HIDDEN_CLASS);
        }
        for tab in &self.tabs {
            let _ = tab.set_attribute("aria-selected", "false");
            let _ = tab.class_list().remove_1(ACTIVE_CLASS);
        }
        let tab = &self.tabs[activation.tab];
        let _ = tab.set_attribute("aria-selected", "true");
        let _ = tab.class_list().add_1(ACTIVE_CLASS);

        if let Some(panel) = activation.panel {
            let _ = self.panels[panel].class_list().remove_1(HIDDEN_CLASS);
        }
        if let Some(detail) = self.state.changed_event(&activation) {
            self.notify(&detail);
        }
    }

    fn notify(&self, detail: &TabChanged) {
        let init = CustomEventInit::new();
        match serde_wasm_bindgen::to_value(detail) {
            Ok(value) => init.set_detail(&value),
            Err(e) => log::warn!("Could not encode {} detail: {}", TAB_CHANGED_EVENT, e),
        }
        if let Ok(event) = CustomEvent::new_with_event_init_dict(TAB_CHANGED_EVENT, &init) {
            let _ = self.container.dispatch_event(&event);
        }
    }
}

fn bind_group(container: &Element, bindings: &mut Disposer) {
    let tabs = dom::query_all::<HtmlElement>(container, "[role=\"tab\"]");
    let panels = dom::query_all::<HtmlElement>(container, "[role=\"tabpanel\"]");
    if tabs.is_empty() || panels.is_empty() {
        return;
    }
    if !bindings.claim(container, "tabs") {
        return;
    }

    let specs = tabs
        .iter()
        .map(|tab| TabSpec {
            id: tab.id(),
            controls: tab.get_attribute("aria-controls"),
        })
        .collect();
    let panel_ids = panels.iter().map(|panel| panel.id()).collect();
    let group = Rc::new(RefCell::new(BoundGroup {
        container: container.clone(),
        tabs: tabs.clone(),
        panels,
        state: TabGroup::new(specs, panel_ids),
    }));

    for (index, tab) in tabs.iter().enumerate() {
        let group = group.clone();
        bindings.listen(tab, "click", move |e| {
            e.prevent_default();
            // A tabChanged listener that clicks another tab would re-enter here.
            match group.try_borrow_mut() {
                Ok(mut group) => group.activate(index),
                Err(_) => log::warn!("Ignoring nested tab activation"),
            }
        });
    }

    group.borrow_mut().activate(0);
}

pub fn init(root: &Element) -> Disposer {
    let mut bindings = Disposer::new();
    for container in dom::query_self_or_all::<Element>(root, CONTAINER_SELECTOR) {
        let mut group_bindings = Disposer::new();
        bind_group(&container, &mut group_bindings);
        bindings.absorb(group_bindings);
    }
    bindings
}
