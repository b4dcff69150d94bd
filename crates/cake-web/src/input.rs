use web_sys as web;

/// Pointer position as a normalized canvas point (x right, y down).
#[inline]
pub fn pointer_canvas_uv(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> [f32; 2] {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let w = rect.width() as f32;
    let h = rect.height() as f32;
    if w > 0.0 && h > 0.0 {
        [(x_css / w).clamp(0.0, 1.0), (y_css / h).clamp(0.0, 1.0)]
    } else {
        [0.5, 0.5]
    }
}
