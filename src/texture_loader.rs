use std::fs;
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use exif::{In, Reader, Tag, Value};
use ::image::DynamicImage;
use ::image::metadata::Orientation;
use log::debug;
use raylib::prelude::*;
use crate::error::{FrameError, FrameResult};
use crate::surface::FrameTexture;

/// RGBA8 pixels ready for upload, already rotated upright.
#[derive(Debug)]
pub struct DecodedFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Outcome of one worker load, keyed by slot index.
#[derive(Debug)]
pub struct LoadEvent {
    pub index: usize,
    pub result: FrameResult<DecodedFrame>,
}

// --- Helper: EXIF orientation tag, 1 (upright) when absent ---
fn read_orientation(path: &Path, file_bytes: &[u8]) -> u8 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Value::Short(values) = &field.value {
                    if let Some(&value) = values.first() {
                        return u8::try_from(value).unwrap_or(1);
                    }
                }
            }
            1
        }
        Err(e) => {
            // Most frames carry no EXIF block at all
            debug!("No EXIF orientation for {:?}: {}", path.file_name().unwrap_or(path.as_os_str()), e);
            1
        }
    }
}

/// Applies an EXIF orientation value (1-8). Unknown values leave the image as is.
pub fn orient(mut image: DynamicImage, orientation: u8) -> DynamicImage {
    if let Some(orientation) = Orientation::from_exif(orientation) {
        image.apply_orientation(orientation);
    }
    image
}

// --- Read, decode and orient one frame ---
pub fn decode_frame(path: &Path) -> FrameResult<DecodedFrame> {
    let file_bytes = fs::read(path).map_err(|source| FrameError::Io { path: path.to_path_buf(), source })?;

    let orientation = read_orientation(path, &file_bytes);

    // Format comes from the content, not the extension
    let image = ::image::load_from_memory(&file_bytes)
        .map_err(|source| FrameError::Decode { path: path.to_path_buf(), source })?;

    let rgba = orient(image, orientation).into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedFrame { width, height, rgba: rgba.into_raw() })
}

type Decoder = fn(&Path) -> FrameResult<DecodedFrame>;

// A panicking decoder still has to settle its slot
fn decode_guarded(decode: Decoder, path: &Path) -> FrameResult<DecodedFrame> {
    panic::catch_unwind(AssertUnwindSafe(|| decode(path))).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(FrameError::Panicked { path: path.to_path_buf(), message })
    })
}

/// Decodes `paths` on `workers` background threads. Each slot produces
/// exactly one event; the channel closes once every worker has finished.
pub fn spawn_frame_loaders(paths: Vec<PathBuf>, workers: usize) -> std::io::Result<Receiver<LoadEvent>> {
    spawn_loaders_with(paths, workers, decode_frame)
}

fn spawn_loaders_with(paths: Vec<PathBuf>, workers: usize, decode: Decoder) -> std::io::Result<Receiver<LoadEvent>> {
    let (tx, rx) = mpsc::channel();
    let paths = Arc::new(paths);
    let next = Arc::new(AtomicUsize::new(0));

    for worker in 0..workers.max(1) {
        let tx = tx.clone();
        let paths = Arc::clone(&paths);
        let next = Arc::clone(&next);
        thread::Builder::new()
            .name(format!("frame-loader-{}", worker))
            .spawn(move || {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(path) = paths.get(index) else {
                        break;
                    };
                    let result = decode_guarded(decode, path);
                    if tx.send(LoadEvent { index, result }).is_err() {
                        // Player is gone, nobody is listening
                        break;
                    }
                }
            })?;
    }

    Ok(rx)
}

fn upload_error(index: usize, e: impl std::fmt::Display) -> FrameError {
    FrameError::Upload { index, message: e.to_string() }
}

// --- Upload decoded pixels into a GPU texture (UI thread only) ---
pub fn upload_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    index: usize,
    frame: DecodedFrame,
) -> FrameResult<FrameTexture> {
    let width = i32::try_from(frame.width).map_err(|e| upload_error(index, e))?;
    let height = i32::try_from(frame.height).map_err(|e| upload_error(index, e))?;

    // Allocate an RGBA8 texture of the right size, then overwrite its pixels
    let blank = Image::gen_image_color(width, height, Color::BLANK);
    let mut texture = rl.load_texture_from_image(thread, &blank).map_err(|e| upload_error(index, e))?;
    drop(blank);

    texture.update_texture(&frame.rgba).map_err(|e| upload_error(index, e))?;

    Ok(FrameTexture::new(texture, frame.width, frame.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use crate::frames::frame_paths;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("scrollseq-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Baseline JPEG with an APP1 Exif block holding a single Orientation tag.
    fn write_jpeg_with_orientation(path: &Path, width: u32, height: u32, orientation: u8) {
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 200, 10])))
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();

        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2a");            // Big-endian TIFF header
        tiff.extend_from_slice(&8u32.to_be_bytes());        // IFD0 right after the header
        tiff.extend_from_slice(&1u16.to_be_bytes());        // One entry
        tiff.extend_from_slice(&0x0112u16.to_be_bytes());   // Orientation
        tiff.extend_from_slice(&3u16.to_be_bytes());        // SHORT
        tiff.extend_from_slice(&1u32.to_be_bytes());        // Count
        tiff.extend_from_slice(&[0, orientation, 0, 0]);    // Value, left-justified
        tiff.extend_from_slice(&0u32.to_be_bytes());        // No next IFD

        let mut app1 = vec![0xFF, 0xE1];
        app1.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
        app1.extend_from_slice(b"Exif\x00\x00");
        app1.extend_from_slice(&tiff);

        // Right after SOI
        jpeg.splice(2..2, app1);
        fs::write(path, jpeg).unwrap();
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255])).save(path).unwrap();
    }

    #[test]
    fn decodes_png_to_rgba() {
        let dir = scratch_dir("decode");
        let path = dir.join("frame001.png");
        write_png(&path, 4, 3);

        let frame = decode_frame(&path).unwrap();
        assert_eq!((frame.width, frame.height), (4, 3));
        assert_eq!(frame.rgba.len(), 4 * 3 * 4);
        assert_eq!(&frame.rgba[..4], &[200, 10, 10, 255]);
    }

    #[test]
    fn exif_orientation_rotates_decoded_frame() {
        let dir = scratch_dir("exif");
        let rotated = dir.join("frame001.jpg");
        write_jpeg_with_orientation(&rotated, 8, 4, 6);
        let frame = decode_frame(&rotated).unwrap();
        assert_eq!((frame.width, frame.height), (4, 8));
        assert_eq!(frame.rgba.len(), 4 * 8 * 4);

        let upright = dir.join("frame002.jpg");
        write_jpeg_with_orientation(&upright, 8, 4, 1);
        let frame = decode_frame(&upright).unwrap();
        assert_eq!((frame.width, frame.height), (8, 4));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = scratch_dir("missing");
        let err = decode_frame(&dir.join("frame001.webp")).unwrap_err();
        assert!(matches!(err, FrameError::Io { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = scratch_dir("garbage");
        let path = dir.join("frame001.png");
        fs::write(&path, b"definitely not an image").unwrap();
        assert!(matches!(decode_frame(&path), Err(FrameError::Decode { .. })));
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(4, 2));
        let rotated = orient(image.clone(), 6);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
        let rotated = orient(image.clone(), 8);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
        let upside_down = orient(image.clone(), 3);
        assert_eq!((upside_down.width(), upside_down.height()), (4, 2));
        let untouched = orient(image, 42);
        assert_eq!((untouched.width(), untouched.height()), (4, 2));
    }

    #[test]
    fn orientation_moves_pixels() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let flipped = orient(DynamicImage::ImageRgba8(image), 2).into_rgba8();
        assert_eq!(flipped.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn every_slot_reports_exactly_once() {
        let dir = scratch_dir("workers");
        let paths = frame_paths(&dir, 5, "png");
        for path in paths.iter().filter(|p| !p.ends_with("frame003.png")) {
            write_png(path, 2, 2);
        }

        let rx = spawn_frame_loaders(paths, 3).unwrap();
        let mut events: Vec<LoadEvent> = rx.iter().collect();
        events.sort_by_key(|e| e.index);

        assert_eq!(events.iter().map(|e| e.index).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(events[2].result.is_err());
        assert_eq!(events.iter().filter(|e| e.result.is_ok()).count(), 4);
    }

    fn decode_or_panic(path: &Path) -> FrameResult<DecodedFrame> {
        if path.ends_with("frame002.png") {
            panic!("decoder blew up");
        }
        Ok(DecodedFrame { width: 1, height: 1, rgba: vec![0; 4] })
    }

    #[test]
    fn panicking_decoder_still_settles_its_slot() {
        let paths = frame_paths(Path::new("unused"), 4, "png");
        let rx = spawn_loaders_with(paths, 2, decode_or_panic).unwrap();
        let mut events: Vec<LoadEvent> = rx.iter().collect();
        events.sort_by_key(|e| e.index);

        assert_eq!(events.iter().map(|e| e.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        match &events[1].result {
            Err(FrameError::Panicked { message, .. }) => assert!(message.contains("blew up")),
            other => panic!("expected a panic failure, got {:?}", other),
        }
        assert_eq!(events.iter().filter(|e| e.result.is_ok()).count(), 3);
    }

}
