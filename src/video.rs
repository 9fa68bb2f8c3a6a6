//! Custom controls for `.video-player` blocks.
//!
//! The media element stays the single owner of playback state; handlers only
//! read from and write to it. Each control is optional and bound on its own.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::js_sys::{Function, Reflect};
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlMediaElement, MouseEvent};

use crate::dom::{self, Disposer};

pub const PLAYER_SELECTOR: &str = ".video-player";
pub const GLYPH_PAUSED: &str = "▶";
pub const GLYPH_PLAYING: &str = "❚ ❚";

/// Fullscreen entry points, standard first, then vendor prefixes.
pub const FULLSCREEN_METHODS: [&str; 4] = [
    "requestFullscreen",
    "mozRequestFullScreen",
    "webkitRequestFullscreen",
    "msRequestFullscreen",
];

fn usable_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

/// Played share of the video in percent, or `None` while the duration is
/// still unknown.
pub fn progress_percent(current_time: f64, duration: f64) -> Option<f64> {
    let duration = usable_duration(duration)?;
    Some((current_time / duration * 100.0).clamp(0.0, 100.0))
}

/// Playback position for a pointer `offset_x` pixels into a track that is
/// `track_width` pixels wide.
pub fn scrub_time(offset_x: f64, track_width: f64, duration: f64) -> Option<f64> {
    let duration = usable_duration(duration)?;
    if track_width <= 0.0 {
        return None;
    }
    Some((offset_x / track_width).clamp(0.0, 1.0) * duration)
}

/// Reads a `data-skip` value such as `-10` or `25`.
pub fn parse_skip(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|delta| delta.is_finite())
}

pub fn glyph(paused: bool) -> &'static str {
    if paused {
        GLYPH_PAUSED
    } else {
        GLYPH_PLAYING
    }
}

/// First method name in `FULLSCREEN_METHODS` for which `available` says yes.
pub fn pick_fullscreen_method(available: impl Fn(&str) -> bool) -> Option<&'static str> {
    FULLSCREEN_METHODS.into_iter().find(|name| available(name))
}

fn fullscreen_function(video: &HtmlMediaElement, name: &str) -> Option<Function> {
    Reflect::get(video, &name.into())
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn request_fullscreen(video: &HtmlMediaElement) {
    let Some(name) = pick_fullscreen_method(|name| fullscreen_function(video, name).is_some()) else {
        log::debug!("Fullscreen is not available");
        return;
    };
    if let Some(request) = fullscreen_function(video, name) {
        // The standard call returns a promise that may reject; nothing to do then.
        let _ = request.call0(video);
    }
}

fn toggle_play(video: &HtmlMediaElement) {
    if video.paused() {
        let _ = video.play();
    } else {
        let _ = video.pause();
    }
}

fn bind_player(player: &Element, bindings: &mut Disposer) {
    let Some(video) = dom::query::<HtmlMediaElement>(player, "video") else {
        return;
    };
    if !bindings.claim(player, "video") {
        return;
    }

    let play_button = dom::query::<HtmlElement>(player, ".play-button");
    if let Some(button) = &play_button {
        let video = video.clone();
        bindings.listen(button, "click", move |_| toggle_play(&video));
    }
    {
        let target = video.clone();
        bindings.listen(&video, "click", move |_| toggle_play(&target));
    }
    for event in ["play", "pause"] {
        let target = video.clone();
        let button = play_button.clone();
        bindings.listen(&video, event, move |_| {
            if let Some(button) = &button {
                button.set_text_content(Some(glyph(target.paused())));
            }
        });
    }

    bind_progress(player, &video, bindings);

    for button in dom::query_all::<HtmlElement>(player, "[data-skip]") {
        let video = video.clone();
        let target = button.clone();
        bindings.listen(&button, "click", move |_| {
            let raw = target.get_attribute("data-skip").unwrap_or_default();
            match parse_skip(&raw) {
                Some(delta) => video.set_current_time(video.current_time() + delta),
                None => log::warn!("Ignoring data-skip={:?}", raw),
            }
        });
    }

    bind_slider(player, "volume", &video, bindings, |video, value| video.set_volume(value));
    bind_slider(player, "playbackRate", &video, bindings, |video, value| {
        video.set_playback_rate(value)
    });

    if let Some(button) = dom::query::<HtmlElement>(player, ".fullscreen-button") {
        let video = video.clone();
        bindings.listen(&button, "click", move |_| request_fullscreen(&video));
    }
}

fn bind_progress(player: &Element, video: &HtmlMediaElement, bindings: &mut Disposer) {
    let Some(track) = dom::query::<HtmlElement>(player, ".progress") else {
        return;
    };

    if let Some(fill) = dom::query::<HtmlElement>(player, ".progress__filled") {
        let target = video.clone();
        bindings.listen(video, "timeupdate", move |_| {
            if let Some(percent) = progress_percent(target.current_time(), target.duration()) {
                dom::set_style(&fill, "flex-basis", &format!("{}%", percent));
            }
        });
    }

    let scrub = {
        let video = video.clone();
        let track = track.clone();
        move |e: &MouseEvent| {
            let width = f64::from(track.offset_width());
            if let Some(time) = scrub_time(f64::from(e.offset_x()), width, video.duration()) {
                video.set_current_time(time);
            }
        }
    };
    let dragging = Rc::new(Cell::new(false));

    {
        let scrub = scrub.clone();
        bindings.listen(&track, "click", move |e| {
            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                scrub(e);
            }
        });
    }
    {
        let dragging = dragging.clone();
        bindings.listen(&track, "mousemove", move |e| {
            if !dragging.get() {
                return;
            }
            if let Some(e) = e.dyn_ref::<MouseEvent>() {
                scrub(e);
            }
        });
    }
    {
        let dragging = dragging.clone();
        bindings.listen(&track, "mousedown", move |_| dragging.set(true));
    }
    for event in ["mouseup", "mouseleave"] {
        let dragging = dragging.clone();
        bindings.listen(&track, event, move |_| dragging.set(false));
    }
}

fn bind_slider<F>(player: &Element, name: &str, video: &HtmlMediaElement, bindings: &mut Disposer, write: F)
where
    F: Fn(&HtmlMediaElement, f64) + 'static,
{
    let selector = format!(".player-slider[name=\"{}\"]", name);
    let Some(slider) = dom::query::<HtmlInputElement>(player, &selector) else {
        return;
    };
    let video = video.clone();
    let input = slider.clone();
    bindings.listen(&slider, "input", move |_| {
        if let Ok(value) = input.value().parse::<f64>() {
            write(&video, value);
        }
    });
}

/// Binds every `.video-player` under `root` (including `root` itself) that
/// has not been bound yet.
pub fn init(root: &Element) -> Disposer {
    let mut bindings = Disposer::new();
    let players = dom::query_self_or_all::<Element>(root, PLAYER_SELECTOR);
    for player in &players {
        let mut player_bindings = Disposer::new();
        bind_player(player, &mut player_bindings);
        bindings.absorb(player_bindings);
    }
    log::debug!("Found {} video player(s)", players.len());
    bindings
}
