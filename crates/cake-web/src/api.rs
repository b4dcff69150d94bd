//! JS-facing controls. Exports only queue requests; the frame loop owns the
//! scene and applies them at the start of the next frame.

use crate::audio::AudioTap;
use cake_core::interaction::{dispatch, InteractionEvent};
use cake_core::{HandCursor, InteractionSink};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use web_sys as web;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Command {
    SetAssembled(bool),
    Toggle,
}

#[derive(Default)]
pub(crate) struct Controls {
    pub(crate) commands: Vec<Command>,
    pub(crate) hand: Option<HandCursor>,
    /// Normalized canvas points, x right and y down.
    pub(crate) clicks: Vec<[f32; 2]>,
    pub(crate) progress: f32,
    pub(crate) audio: Option<AudioTap>,
    on_gesture: Option<js_sys::Function>,
    on_click: Option<js_sys::Function>,
}

thread_local! {
    static CONTROLS: RefCell<Controls> = RefCell::new(Controls::default());
}

pub(crate) fn with_controls<R>(f: impl FnOnce(&mut Controls) -> R) -> R {
    CONTROLS.with(|c| f(&mut c.borrow_mut()))
}

/// Registered JS callbacks, cloned out so they run without the controls borrowed.
pub(crate) struct JsSink {
    on_gesture: Option<js_sys::Function>,
    on_click: Option<js_sys::Function>,
}

impl JsSink {
    pub(crate) fn current() -> Self {
        with_controls(|c| Self {
            on_gesture: c.on_gesture.clone(),
            on_click: c.on_click.clone(),
        })
    }

    pub(crate) fn emit(&mut self, events: &[InteractionEvent]) {
        dispatch(events, self);
    }
}

impl InteractionSink for JsSink {
    fn on_gesture_interact(&mut self, active: bool) {
        if let Some(f) = &self.on_gesture {
            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_bool(active)) {
                log::warn!("onGestureInteract threw: {:?}", e);
            }
        }
    }

    fn on_object_click(&mut self) {
        if let Some(f) = &self.on_click {
            if let Err(e) = f.call0(&JsValue::NULL) {
                log::warn!("onObjectClick threw: {:?}", e);
            }
        }
    }
}

#[wasm_bindgen]
pub fn set_assembled(assembled: bool) {
    with_controls(|c| c.commands.push(Command::SetAssembled(assembled)));
}

#[wasm_bindgen]
pub fn toggle_assembled() {
    with_controls(|c| c.commands.push(Command::Toggle));
}

/// Assembly progress as of the last rendered frame, 0 = scattered, 1 = assembled.
#[wasm_bindgen]
pub fn progress() -> f32 {
    with_controls(|c| c.progress)
}

/// Latest hand sample from the page's hand tracker, in normalized video
/// coordinates (x right, y down).
#[wasm_bindgen]
pub fn set_hand_cursor(x: f32, y: f32, pinching: bool, detected: bool) {
    with_controls(|c| {
        c.hand = Some(HandCursor {
            x,
            y,
            pinching,
            detected,
        })
    });
}

/// Routes a playing `<audio>`/`<video>` element through an analyser so the
/// scene reacts to it. Replaces any previously connected element.
#[wasm_bindgen]
pub fn connect_audio_element(element: web::HtmlMediaElement) -> Result<(), JsValue> {
    let tap = AudioTap::connect(&element)?;
    log::info!("audio element connected");
    with_controls(|c| c.audio = Some(tap));
    Ok(())
}

#[wasm_bindgen]
pub fn on_gesture_interact(callback: js_sys::Function) {
    with_controls(|c| c.on_gesture = Some(callback));
}

#[wasm_bindgen]
pub fn on_object_click(callback: js_sys::Function) {
    with_controls(|c| c.on_click = Some(callback));
}
