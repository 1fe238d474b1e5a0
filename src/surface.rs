use raylib::prelude::*;
use crate::canvas::{Canvas, FrameImage};
use crate::constants::HUD_FONT_SIZE;
use crate::fit::Rect;
use crate::player::FrameSequencePlayer;

/// GPU texture for one frame, with the pixel size it was uploaded at.
pub struct FrameTexture {
    texture: Texture2D,
    width: u32,
    height: u32,
}

impl FrameTexture {
    pub fn new(texture: Texture2D, width: u32, height: u32) -> Self {
        Self { texture, width, height }
    }
}

impl FrameImage for FrameTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// The window's back buffer for the current frame.
pub struct ScreenCanvas<'a, 'b> {
    d: &'a mut RaylibDrawHandle<'b>,
    width: f32,
    height: f32,
}

impl<'a, 'b> ScreenCanvas<'a, 'b> {
    pub fn new(d: &'a mut RaylibDrawHandle<'b>) -> Self {
        let width = d.get_screen_width() as f32;
        let height = d.get_screen_height() as f32;
        Self { d, width, height }
    }
}

impl Canvas for ScreenCanvas<'_, '_> {
    type Frame = FrameTexture;

    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.d.clear_background(Color::BLACK);
    }

    fn draw_frame(&mut self, frame: &FrameTexture, dest: Rect) {
        self.d.draw_texture_pro(
            &frame.texture,
            Rectangle::new(0.0, 0.0, frame.width as f32, frame.height as f32), // Whole texture
            Rectangle::new(dest.x, dest.y, dest.width, dest.height),           // Cover rect, may overflow the screen
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }
}

pub fn draw_loading_indicator(d: &mut RaylibDrawHandle, settled: usize, total: usize) {
    let sw = d.get_screen_width();
    let sh = d.get_screen_height();

    let bar_width = (sw / 3).max(1);
    let bar_x = (sw - bar_width) / 2;
    let bar_y = sh / 2;
    let filled = if total > 0 { (bar_width as usize * settled / total) as i32 } else { 0 };

    let label = format!("Loading {} / {}", settled, total);
    d.draw_text(&label, bar_x, bar_y - HUD_FONT_SIZE - 8, HUD_FONT_SIZE, Color::RAYWHITE);
    d.draw_rectangle(bar_x, bar_y, bar_width, 6, Color::DARKGRAY);
    d.draw_rectangle(bar_x, bar_y, filled, 6, Color::RAYWHITE);
}

pub fn draw_hud(d: &mut RaylibDrawHandle, player: &FrameSequencePlayer<FrameTexture>) {
    let playback = player.playback();
    let (settled, total) = player.load_progress();

    let phases = player
        .trigger_progress()
        .iter()
        .map(|p| format!("{:.2}", p))
        .collect::<Vec<_>>()
        .join(" / ");

    let lines = [
        format!("State: {:?}", player.state()),
        format!("Frame: {} / {}  ({} settled)", playback.frame_index() + 1, total, settled),
        format!("Current: {:.2}  Target: {:.2}", playback.current(), playback.target()),
        format!(
            "Scroll: {:.0}px ({:.0}%)  Phases: {}",
            player.scroll_offset(),
            player.scroll_position() * 100.0,
            phases
        ),
    ];

    for (i, line) in lines.iter().enumerate() {
        d.draw_text(line, 10, 10 + i as i32 * (HUD_FONT_SIZE + 4), HUD_FONT_SIZE, Color::LIME);
    }
}
