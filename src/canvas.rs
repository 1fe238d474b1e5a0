use crate::fit::Rect;

/// Anything with pixel dimensions that a canvas can draw.
pub trait FrameImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// Drawing surface the player paints onto.
pub trait Canvas {
    type Frame: FrameImage;

    fn size(&self) -> (f32, f32);
    fn clear(&mut self);
    fn draw_frame(&mut self, frame: &Self::Frame, dest: Rect);
}
