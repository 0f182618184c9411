//! End-to-end scans against the rqrr engine
//!
//! QR codes are rendered with the `qrcode` crate straight into the frame
//! buffer, the way a capture loop would write camera pixels.

use image::{GrayImage, Luma};
use qr_driver::tools::scan_file;
use qr_driver::{ConfigError, DecoderContext, ScanDriver, ScanOutcome, ScannerConfig};
use qrcode::{Color, QrCode};

/// Draw `data` as dark-on-light modules at (ox, oy) with `scale` px per module.
fn draw_code(pixels: &mut [u8], stride: usize, ox: usize, oy: usize, scale: usize, data: &str) {
    let code = QrCode::new(data.as_bytes()).expect("failed to encode test payload");
    let width = code.width();
    let colors = code.to_colors();
    for my in 0..width {
        for mx in 0..width {
            let value = if colors[my * width + mx] == Color::Dark { 0 } else { 255 };
            for dy in 0..scale {
                let row = (oy + my * scale + dy) * stride;
                for dx in 0..scale {
                    pixels[row + ox + mx * scale + dx] = value;
                }
            }
        }
    }
}

fn configured(hor_res: usize, ver_res: usize) -> DecoderContext {
    let mut ctx = DecoderContext::new();
    ctx.configure(hor_res, ver_res).expect("resolution within maxima");
    ctx
}

#[test]
fn test_decodes_single_code() {
    let mut ctx = configured(128, 128);
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 128, 24, 24, 3, "HELLO");

    let mut driver = ScanDriver::new();
    assert_eq!(driver.scan(&mut ctx).as_deref(), Some("HELLO"));
}

#[test]
fn test_found_payload_metadata() {
    let mut ctx = configured(128, 128);
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 128, 24, 24, 3, "HELLO");

    let mut driver = ScanDriver::new();
    match driver.scan_outcome(&mut ctx) {
        ScanOutcome::Found(payload) => {
            assert_eq!(payload.bytes, b"HELLO");
            assert_eq!(payload.version, 1);
            assert!(payload.mask < 8);
        }
        other => panic!("expected a payload, got {other:?}"),
    }
    assert_eq!(driver.stats().found, 1);
}

#[test]
fn test_blank_and_zero_frames_not_found() {
    let mut ctx = configured(128, 128);
    let mut driver = ScanDriver::new();

    ctx.frame_buffer_mut().fill(0);
    assert_eq!(driver.scan(&mut ctx), None);

    ctx.frame_buffer_mut().fill(255);
    assert_eq!(driver.scan(&mut ctx), None);
}

#[test]
fn test_noise_frame_not_found() {
    let mut ctx = configured(128, 128);
    let mut state = 0x2545_f491_u32;
    for byte in ctx.frame_buffer_mut().as_mut_bytes() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *byte = (state >> 24) as u8;
    }

    let mut driver = ScanDriver::new();
    assert_eq!(driver.scan(&mut ctx), None);
}

#[test]
fn test_two_codes_report_one() {
    let mut ctx = configured(128, 128);
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 128, 8, 8, 2, "FIRST");
    draw_code(fb.as_mut_bytes(), 128, 76, 76, 2, "SECOND");

    let mut driver = ScanDriver::new();
    let text = driver.scan(&mut ctx).expect("one of the two codes");
    assert!(text == "FIRST" || text == "SECOND", "unexpected payload {text}");
}

#[test]
fn test_reconfigure_reinterprets_same_buffer() {
    let mut ctx = configured(128, 128);
    let mut driver = ScanDriver::new();

    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 128, 24, 24, 3, "WIDE");
    assert_eq!(driver.scan(&mut ctx).as_deref(), Some("WIDE"));

    // Same bytes, new stride
    ctx.configure(96, 96).unwrap();
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 96, 16, 16, 3, "NARROW");
    assert_eq!(driver.scan(&mut ctx).as_deref(), Some("NARROW"));
    assert_eq!(ctx.frame_buffer().capacity(), 128 * 128);
    assert_eq!(ctx.resolution(), Some((96, 96)));
}

#[test]
fn test_configure_twice_same_behavior() {
    let mut ctx = configured(100, 100);
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 100, 10, 10, 3, "AGAIN");

    let mut driver = ScanDriver::new();
    let first = driver.scan_outcome(&mut ctx);
    ctx.configure(100, 100).unwrap();
    let second = driver.scan_outcome(&mut ctx);
    assert_eq!(first, second);
    assert_eq!(first.into_text().as_deref(), Some("AGAIN"));
}

#[test]
fn test_out_of_bounds_leaves_previous_configuration() {
    let mut ctx = configured(100, 100);
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 100, 10, 10, 3, "KEPT");

    let err = ctx.configure(640, 480).unwrap_err();
    assert_eq!(err.to_string(), "Maximum resolution for the QR scanner is 128x128");
    assert!(matches!(err, ConfigError::OutOfBounds { .. }));

    let mut driver = ScanDriver::new();
    assert_eq!(driver.scan(&mut ctx).as_deref(), Some("KEPT"));
}

#[test]
fn test_larger_maxima() {
    let config = ScannerConfig::default().with_max_resolution(320, 240);
    let mut ctx = DecoderContext::with_config(config).expect("320x240 fits in usize");
    ctx.configure(320, 240).unwrap();
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 320, 100, 60, 4, "https://example.com");

    let mut driver = ScanDriver::new();
    assert_eq!(driver.scan(&mut ctx).as_deref(), Some("https://example.com"));
}

#[test]
fn test_scan_file_downscales_into_buffer() {
    let mut image = GrayImage::from_pixel(256, 256, Luma([255u8]));
    let stride = image.width() as usize;
    draw_code(&mut image, stride, 12, 12, 8, "FROM FILE");

    let path = std::env::temp_dir().join(format!("qr_driver_scan_{}.png", std::process::id()));
    image.save(&path).expect("failed to write test image");

    let outcome = scan_file(&path, ScannerConfig::default()).expect("image loads and fits");
    let _ = std::fs::remove_file(&path);
    assert_eq!(outcome.into_text().as_deref(), Some("FROM FILE"));
}
