#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use pagewire::config::Config;
use pagewire::dom::{self, Listener};
use pagewire::schedule::Sequence;
use pagewire::timing::{Debounce, Throttle};
use pagewire::site::Site;
use pagewire::{accordion, forms, nav, tabs, transition, video};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, Event, EventInit, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlMediaElement};

wasm_bindgen_test_configure!(run_in_browser);

fn fixture(html: &str) -> HtmlElement {
    let document = dom::document().unwrap();
    let root = document.create_element("div").unwrap().dyn_into::<HtmlElement>().unwrap();
    root.set_inner_html(html);
    document.body().unwrap().append_child(&root).unwrap();
    root
}

fn find<T: JsCast>(root: &Element, selector: &str) -> T {
    dom::query::<T>(root, selector).unwrap_or_else(|| panic!("missing {}", selector))
}

fn submit(form: &HtmlFormElement) {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict("submit", &init).unwrap();
    form.dispatch_event(&event).unwrap();
}

fn fast_config() -> Config {
    Config {
        accordion_transition_ms: 10,
        contact_submit_delay_ms: 10,
        message_lifetime_ms: 20,
        message_fade_ms: 10,
        ..Config::default()
    }
}

#[wasm_bindgen_test]
fn menu_aria_follows_every_toggle() {
    let root = fixture(
        r#"<button id="mobileMenuBtn" aria-expanded="false"><i class="fa-bars"></i></button>
            <ul id="navLinks"><li><a class="menu-link">Home</a></li></ul>
            <p class="outside">elsewhere</p>"#,
    );
    let bindings = nav::init(&root);
    let button = find::<HtmlElement>(&root, "#mobileMenuBtn");
    let menu = find::<Element>(&root, "#navLinks");
    let icon = find::<Element>(&root, "#mobileMenuBtn i");

    for expected in [true, false, true, false, true] {
        button.click();
        assert_eq!(menu.class_list().contains("active"), expected);
        let aria = button.get_attribute("aria-expanded");
        assert_eq!(aria.as_deref(), Some(if expected { "true" } else { "false" }));
        assert_eq!(icon.class_list().contains("fa-times"), expected);
    }

    find::<HtmlElement>(&root, "#navLinks a").click();
    assert!(!menu.class_list().contains("active"));
    assert_eq!(button.get_attribute("aria-expanded").as_deref(), Some("false"));

    button.click();
    find::<HtmlElement>(&root, ".outside").click();
    assert!(!menu.class_list().contains("active"));
    assert_eq!(dom::body().unwrap().style().get_property_value("overflow").unwrap(), "");

    drop(bindings);
    root.remove();
}

#[wasm_bindgen_test]
fn dropped_bindings_stop_reacting_and_can_rebind() {
    let root = fixture(
        r#"<button id="mobileMenuBtn"><i class="fa-bars"></i></button><ul id="navLinks"></ul>"#,
    );
    let button = find::<HtmlElement>(&root, "#mobileMenuBtn");
    let bindings = nav::init(&root);
    assert!(nav::init(&root).is_empty(), "second init must not bind again");

    drop(bindings);
    button.click();
    assert_eq!(button.get_attribute("aria-expanded"), None);

    let again = nav::init(&root);
    assert!(!again.is_empty());
    button.click();
    assert_eq!(button.get_attribute("aria-expanded").as_deref(), Some("true"));

    drop(again);
    nav::close_menu(&root);
    root.remove();
}

#[wasm_bindgen_test]
fn one_tab_and_at_most_one_panel_after_each_click() {
    let root = fixture(
        r#"<div class="tabs-container">
             <button role="tab" id="t1" aria-controls="p1">One</button>
             <button role="tab" id="t2" aria-controls="p2">Two</button>
             <button role="tab" id="t3" aria-controls="nowhere">Three</button>
             <div role="tabpanel" id="p1"></div>
             <div role="tabpanel" id="p2"></div>
           </div>"#,
    );
    let container = find::<Element>(&root, ".tabs-container");
    let events = Rc::new(Cell::new(0));
    let _listener = {
        let events = events.clone();
        Listener::new(&container, tabs::TAB_CHANGED_EVENT, move |_| events.set(events.get() + 1))
    };

    let bindings = tabs::init(&root);
    assert_eq!(events.get(), 1, "initial activation notifies");
    assert_eq!(find::<Element>(&root, "#t1").get_attribute("aria-selected").as_deref(), Some("true"));

    for id in ["t2", "t3", "t1", "t2"] {
        find::<HtmlElement>(&root, &format!("#{}", id)).click();
        let selected = dom::query_all::<Element>(&root, "[role=\"tab\"][aria-selected=\"true\"]");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id(), id);
        let visible = dom::query_all::<Element>(&root, "[role=\"tabpanel\"]:not(.hidden)");
        assert!(visible.len() <= 1);
    }
    // t3 has no panel, so it activates silently.
    assert_eq!(events.get(), 4);

    drop(bindings);
    root.remove();
}

#[wasm_bindgen_test]
async fn accordion_round_trip_clears_overrides() {
    let root = fixture(
        r#"<div class="accordion">
             <button class="accordion-button" aria-expanded="false">More</button>
             <div class="accordion-content"><p>Body</p></div>
           </div>"#,
    );
    let bindings = accordion::init(&root, fast_config().accordion_transition_ms);
    let button = find::<HtmlElement>(&root, ".accordion-button");
    let content = find::<HtmlElement>(&root, ".accordion-content");
    let style = content.style();
    assert_eq!(style.get_property_value("display").unwrap(), "none");

    button.click();
    assert_eq!(button.get_attribute("aria-expanded").as_deref(), Some("true"));
    TimeoutFuture::new(40).await;
    assert_eq!(style.get_property_value("display").unwrap(), "block");
    assert_eq!(style.get_property_value("height").unwrap(), "");

    button.click();
    assert_eq!(button.get_attribute("aria-expanded").as_deref(), Some("false"));
    TimeoutFuture::new(40).await;
    assert_eq!(style.get_property_value("display").unwrap(), "none");
    assert_eq!(style.get_property_value("height").unwrap(), "");
    assert_eq!(style.get_property_value("opacity").unwrap(), "");

    drop(bindings);
    root.remove();
}

#[wasm_bindgen_test]
fn newsletter_rejects_missing_tld_and_accepts_full_address() {
    let root = fixture(
        r#"<form class="newsletter-form"><input type="email" name="email"><button type="submit">Go</button></form>"#,
    );
    let bindings = forms::init(&root, &fast_config());
    let form = find::<HtmlFormElement>(&root, ".newsletter-form");
    let input = find::<HtmlInputElement>(&root, "input");

    input.set_value("user@example");
    submit(&form);
    assert_eq!(input.value(), "user@example");
    let errors = dom::query_all::<Element>(&root, ".text-red-600");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].text_content().as_deref(), Some(forms::INVALID_EMAIL_MESSAGE));

    submit(&form);
    assert_eq!(dom::query_all::<Element>(&root, ".text-red-600").len(), 1, "errors do not pile up");

    input.set_value("user@example.com");
    submit(&form);
    assert_eq!(input.value(), "");
    assert!(dom::query::<Element>(&root, ".text-red-600").is_none());
    let thanks = find::<Element>(&root, ".text-green-600");
    assert_eq!(thanks.text_content().as_deref(), Some(forms::SUBSCRIBED_MESSAGE));

    drop(bindings);
    root.remove();
}

#[wasm_bindgen_test]
async fn contact_form_acknowledges_then_cleans_up() {
    let root = fixture(
        r#"<section><form id="contact-form"><input name="name" value="Ada"><button type="submit">Send</button></form></section>"#,
    );
    let bindings = forms::init(&root, &fast_config());
    let form = find::<HtmlFormElement>(&root, "#contact-form");
    let button = find::<web_sys::HtmlButtonElement>(&root, "button");

    submit(&form);
    assert!(button.disabled());
    assert!(button.text_content().unwrap_or_default().contains("Sending..."));

    TimeoutFuture::new(15).await;
    assert!(!button.disabled());
    assert_eq!(button.text_content().as_deref(), Some("Send"));
    assert!(dom::query::<Element>(&root, ".bg-green-100").is_some());

    TimeoutFuture::new(60).await;
    assert!(dom::query::<Element>(&root, ".bg-green-100").is_none());

    drop(bindings);
    root.remove();
}

#[wasm_bindgen_test]
fn video_sliders_write_to_media_and_bind_once() {
    let root = fixture(
        r#"<div class="video-player">
             <video></video>
             <button class="play-button">▶</button>
             <input type="range" class="player-slider" name="volume" min="0" max="1" step="0.05" value="1">
           </div>
           <div class="video-player"><button class="play-button"></button></div>"#,
    );
    let bindings = video::init(&root);
    assert!(bindings.listener_count() > 0);
    assert_eq!(video::init(&root).listener_count(), 0);

    let media = find::<HtmlMediaElement>(&root, "video");
    let slider = find::<HtmlInputElement>(&root, ".player-slider");
    slider.set_value("0.3");
    slider.dispatch_event(&Event::new("input").unwrap()).unwrap();
    assert!((media.volume() - 0.3).abs() < 1e-6);

    drop(bindings);
    root.remove();
}

#[wasm_bindgen_test]
fn video_controls_follow_media_events_and_skip() {
    let root = fixture(
        r#"<div class="video-player">
             <video></video>
             <button class="play-button">?</button>
             <div class="progress"><div class="progress__filled"></div></div>
             <button data-skip="-10">-10</button>
             <button data-skip="25">25</button>
             <button data-skip="later">?</button>
           </div>"#,
    );
    let bindings = video::init(&root);
    let media = find::<HtmlMediaElement>(&root, "video");
    let play_button = find::<HtmlElement>(&root, ".play-button");
    let fill = find::<HtmlElement>(&root, ".progress__filled");

    media.dispatch_event(&Event::new("pause").unwrap()).unwrap();
    assert_eq!(play_button.text_content().as_deref(), Some(video::GLYPH_PAUSED));

    media.set_current_time(30.0);
    find::<HtmlElement>(&root, "[data-skip=\"-10\"]").click();
    assert!((media.current_time() - 20.0).abs() < 1e-6);
    find::<HtmlElement>(&root, "[data-skip=\"25\"]").click();
    assert!((media.current_time() - 45.0).abs() < 1e-6);
    find::<HtmlElement>(&root, "[data-skip=\"later\"]").click();
    assert!((media.current_time() - 45.0).abs() < 1e-6);

    // No source is loaded, so the duration is NaN and the fill stays put.
    assert!(media.duration().is_nan());
    media.dispatch_event(&Event::new("timeupdate").unwrap()).unwrap();
    assert_eq!(fill.style().get_property_value("flex-basis").unwrap(), "");

    find::<HtmlElement>(&root, ".progress").click();
    assert!((media.current_time() - 45.0).abs() < 1e-6);

    drop(bindings);
    root.remove();
}

/// Records whether the default was prevented once a click reaches the
/// window, then prevents it so the test page never navigates away.
fn record_default_prevented() -> (Rc<Cell<Option<bool>>>, Listener) {
    let seen = Rc::new(Cell::new(None));
    let window = dom::window().unwrap();
    let listener = {
        let seen = seen.clone();
        Listener::new(&window, "click", move |e| {
            seen.set(Some(e.default_prevented()));
            e.prevent_default();
        })
    };
    (seen, listener)
}

fn body_has_transition_class() -> bool {
    dom::body().unwrap().class_list().contains(transition::TRANSITION_CLASS)
}

#[wasm_bindgen_test]
fn external_link_click_is_left_alone() {
    let root = fixture(r#"<a href="https://other.example/x"><span>Elsewhere</span></a>"#);
    let bindings = transition::init(50);
    let (seen, _listener) = record_default_prevented();

    find::<HtmlElement>(&root, "span").click();
    assert_eq!(seen.get(), Some(false));
    assert!(!body_has_transition_class());

    drop(bindings);
    root.remove();
}

#[wasm_bindgen_test]
async fn same_host_link_fades_out_until_reset_cancels_it() {
    let root = fixture(r#"<a href="/next"><span>Next</span></a>"#);
    let bindings = transition::init(50);
    let (seen, _listener) = record_default_prevented();
    let pathname = dom::window().unwrap().location().pathname().unwrap();

    find::<HtmlElement>(&root, "span").click();
    assert_eq!(seen.get(), Some(true));
    assert!(body_has_transition_class());

    transition::reset();
    assert!(!body_has_transition_class());
    TimeoutFuture::new(400).await;
    assert_eq!(dom::window().unwrap().location().pathname().unwrap(), pathname);

    drop(bindings);
    root.remove();
}

#[wasm_bindgen_test]
fn site_refresh_binds_nothing_twice() {
    let root = fixture(
        r#"<div class="tabs-container">
             <button role="tab" id="rt1" aria-controls="rp1">One</button>
             <div role="tabpanel" id="rp1"></div>
           </div>"#,
    );
    let container = find::<Element>(&root, ".tabs-container");
    let events = Rc::new(Cell::new(0));
    let _listener = {
        let events = events.clone();
        Listener::new(&container, tabs::TAB_CHANGED_EVENT, move |_| events.set(events.get() + 1))
    };

    let mut site = Site::mount(root.clone().into(), fast_config());
    assert_eq!(events.get(), 1);
    let bound = site.listener_count();
    assert!(bound > 0);

    site.refresh();
    assert_eq!(site.listener_count(), bound);
    assert_eq!(events.get(), 1);

    drop(site);
    root.remove();
}

#[wasm_bindgen_test]
async fn guarded_sequence_stops_once_node_is_detached() {
    let root = fixture("<p>note</p>");
    let ran = Rc::new(Cell::new(false));
    let sequence = {
        let ran = ran.clone();
        Sequence::new().guarded_by(&root).then(10, move || ran.set(true)).start()
    };
    root.remove();
    TimeoutFuture::new(30).await;
    assert!(!ran.get());
    assert!(sequence.is_finished());
}

#[wasm_bindgen_test]
async fn leading_debounce_runs_once_per_burst() {
    let calls = Rc::new(Cell::new(0));
    let debounced = {
        let calls = calls.clone();
        Debounce::new(20, true, move |n: u32| calls.set(calls.get() + n))
    };
    debounced.call(1);
    debounced.call(1);
    debounced.call(1);
    assert_eq!(calls.get(), 1);
    TimeoutFuture::new(40).await;
    debounced.call(1);
    assert_eq!(calls.get(), 2);
}

#[wasm_bindgen_test]
async fn trailing_debounce_keeps_last_call() {
    let last = Rc::new(Cell::new(0));
    let debounced = {
        let last = last.clone();
        Debounce::new(20, false, move |n: u32| last.set(n))
    };
    debounced.call(1);
    debounced.call(2);
    debounced.call(3);
    assert_eq!(last.get(), 0);
    TimeoutFuture::new(40).await;
    assert_eq!(last.get(), 3);
}

#[wasm_bindgen_test]
async fn throttle_drops_calls_inside_the_window() {
    let calls = Rc::new(Cell::new(0));
    let throttled = {
        let calls = calls.clone();
        Throttle::new(20, move |_: ()| calls.set(calls.get() + 1))
    };
    throttled.call(());
    throttled.call(());
    assert_eq!(calls.get(), 1);
    TimeoutFuture::new(40).await;
    throttled.call(());
    assert_eq!(calls.get(), 2);
}
