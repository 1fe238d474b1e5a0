pub const WINDOW_WIDTH: i32 = 1280;           // Initial window width
pub const WINDOW_HEIGHT: i32 = 720;           // Initial window height
pub const FPS: u32 = 60;                      // Display refresh target

pub const SPAN_FACTOR: f32 = 1.2;             // Scroll span as a multiple of viewport height
pub const SETTLE_EPSILON: f32 = 0.05;         // Distance (frames) below which current snaps to target
pub const WHEEL_STEP: f32 = 80.0;             // Pixels scrolled per wheel notch / arrow key
pub const MAX_WORKERS: usize = 8;             // Upper bound on loader threads

pub const HUD_FONT_SIZE: i32 = 20;
pub const MAX_UPLOADS_PER_TICK: usize = 16;   // Texture uploads drained per display tick
