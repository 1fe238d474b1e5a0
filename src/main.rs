use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use raylib::prelude::*;

mod canvas;
mod config;
mod constants;
mod error;
mod fit;
mod frames;
mod playback;
mod player;
mod scroll;
mod state;
mod surface;
mod texture_loader;

use crate::config::{Args, Settings};
use crate::constants::MAX_UPLOADS_PER_TICK;
use crate::frames::frame_paths;
use crate::player::{FrameSequencePlayer, Viewport};
use crate::surface::{FrameTexture, ScreenCanvas, draw_hud, draw_loading_indicator};
use crate::texture_loader::{LoadEvent, spawn_frame_loaders, upload_texture};

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn viewport(rl: &RaylibHandle) -> Viewport {
    Viewport {
        width: rl.get_screen_width() as f32,
        height: rl.get_screen_height() as f32,
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = Settings::from_args(args).context("Invalid configuration")?;
    info!(
        "Playing {} x {} frames from {:?} ({:?} preset, smoothing {})",
        settings.frame_count, settings.format, settings.frames_dir, args.preset, settings.smoothing
    );

    let (mut rl, thread) = raylib::init()
        .size(settings.width, settings.height)
        .title("Scroll Sequence")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(settings.fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Start loading frames in the background ---
    let paths = frame_paths(&settings.frames_dir, settings.frame_count, &settings.format);
    let loads = spawn_frame_loaders(paths, settings.workers).context("Failed to start frame loaders")?;

    let mut player: FrameSequencePlayer<FrameTexture> = FrameSequencePlayer::new(&settings, viewport(&rl));
    let mut show_hud = false;

    // --- Main Loop ---
    while !rl.window_should_close() {
        // Upload a bounded batch of decoded frames so the window stays responsive
        for LoadEvent { index, result } in loads.try_iter().take(MAX_UPLOADS_PER_TICK) {
            let result = result.and_then(|frame| upload_texture(&mut rl, &thread, index, frame));
            player.settle(index, result);
        }

        if rl.is_window_resized() {
            player.resize(viewport(&rl));
        }

        // --- Input ---
        let wheel = rl.get_mouse_wheel_move();
        if wheel != 0.0 {
            // Wheel down reads as scrolling further into the sequence
            player.scroll_by(-wheel * settings.wheel_step);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_DOWN) {
            player.scroll_by(settings.wheel_step);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_UP) {
            player.scroll_by(-settings.wheel_step);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_PAGE_DOWN) {
            player.page_by(1.0);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_PAGE_UP) {
            player.page_by(-1.0);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_HOME) {
            player.scroll_to_start();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_END) {
            player.scroll_to_end();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F1) {
            show_hud = !show_hud;
        }

        player.update(rl.get_frame_time());

        // --- Render ---
        let mut d = rl.begin_drawing(&thread);
        player.render(&mut ScreenCanvas::new(&mut d));

        if player.indicator_visible() {
            let (settled, total) = player.load_progress();
            draw_loading_indicator(&mut d, settled, total);
        }
        if show_hud {
            draw_hud(&mut d, &player);
        }
    }

    Ok(())
}
