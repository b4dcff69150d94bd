#![cfg(target_arch = "wasm32")]
//! WASM front-end: WebGPU canvas, WebAudio analyser and a small JS API for
//! the page (assembly toggle, hand samples, interaction callbacks).

mod api;
mod audio;
mod dom;
mod frame;
mod input;

pub use api::{
    connect_audio_element, on_gesture_interact, on_object_click, progress, set_assembled,
    set_hand_cursor, toggle_assembled,
};

use cake_core::{CakeScene, SceneConfig};
use cake_render::Renderer;
use frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

const CANVAS_ID: &str = "cake-canvas";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("cake-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    dom::sync_canvas_backing_size(&canvas);
    {
        let canvas_resize = canvas.clone();
        let resize_closure = Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas_resize);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        resize_closure.forget();
    }

    // Clicks pick gifts and ornaments; any click also resumes a suspended audio graph.
    {
        let canvas_click = canvas.clone();
        let click_closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let uv = input::pointer_canvas_uv(&ev, &canvas_click);
            api::with_controls(|c| {
                c.clicks.push(uv);
                if let Some(tap) = &c.audio {
                    tap.resume();
                }
            });
        }) as Box<dyn FnMut(web::MouseEvent)>);
        canvas
            .add_event_listener_with_callback("click", click_closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        click_closure.forget();
    }

    let config = SceneConfig::for_viewport_width(dom::viewport_width());
    let mut scene = CakeScene::new(config);
    let (width, height) = (canvas.width(), canvas.height());
    let gpu = Renderer::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), width, height, &scene).await?;
    scene.resize(width, height);
    // The page opens on the assembled cake; the first frames play the assembly.
    api::set_assembled(true);
    log::info!("renderer ready at {width}x{height}");

    let ctx = Rc::new(RefCell::new(FrameContext::new(scene, gpu, canvas)));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let Some(cb) = tick.borrow().as_ref() {
        window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    }
    Ok(())
}
