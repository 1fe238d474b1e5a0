/// Destination rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scales an image so it fills the whole canvas, keeping its aspect ratio.
/// The overflowing axis is centred, so the offset on that axis is negative
/// or zero. Returns `None` when either side has no area.
pub fn cover(canvas_w: f32, canvas_h: f32, image_w: f32, image_h: f32) -> Option<Rect> {
    if canvas_w <= 0.0 || canvas_h <= 0.0 || image_w <= 0.0 || image_h <= 0.0 {
        return None;
    }

    let canvas_aspect = canvas_w / canvas_h;
    let image_aspect = image_w / image_h;

    let rect = if canvas_aspect > image_aspect {
        // Canvas is wider: match widths, crop top and bottom
        let height = canvas_w / image_aspect;
        Rect { x: 0.0, y: (canvas_h - height) * 0.5, width: canvas_w, height }
    } else {
        // Canvas is taller (or equal): match heights, crop the sides
        let width = canvas_h * image_aspect;
        Rect { x: (canvas_w - width) * 0.5, y: 0.0, width, height: canvas_h }
    };

    Some(rect)
}
