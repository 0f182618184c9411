use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qr_driver::{DecoderContext, ScanDriver, ScannerConfig};
use qrcode::{Color, QrCode};

fn draw_code(pixels: &mut [u8], stride: usize, offset: usize, scale: usize, data: &str) {
    let code = QrCode::new(data.as_bytes()).unwrap();
    let width = code.width();
    for (i, color) in code.to_colors().into_iter().enumerate() {
        let value = if color == Color::Dark { 0 } else { 255 };
        let (mx, my) = (i % width, i / width);
        for dy in 0..scale {
            let row = (offset + my * scale + dy) * stride;
            for dx in 0..scale {
                pixels[row + offset + mx * scale + dx] = value;
            }
        }
    }
}

fn bench_scan_blank(c: &mut Criterion) {
    let mut ctx = DecoderContext::new();
    ctx.configure(128, 128).unwrap();
    ctx.frame_buffer_mut().fill(255);
    let mut driver = ScanDriver::new();
    c.bench_function("scan_128x128_blank", |b| {
        b.iter(|| driver.scan(black_box(&mut ctx)))
    });
}

fn bench_scan_code(c: &mut Criterion) {
    let mut ctx = DecoderContext::new();
    ctx.configure(128, 128).unwrap();
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 128, 20, 3, "HELLO");
    let mut driver = ScanDriver::new();
    c.bench_function("scan_128x128_hello", |b| {
        b.iter(|| driver.scan(black_box(&mut ctx)))
    });
}

fn bench_scan_code_vga(c: &mut Criterion) {
    let config = ScannerConfig::default().with_max_resolution(640, 480);
    let mut ctx = DecoderContext::with_config(config).unwrap();
    ctx.configure(640, 480).unwrap();
    let fb = ctx.frame_buffer_mut();
    fb.fill(255);
    draw_code(fb.as_mut_bytes(), 640, 60, 12, "https://example.com/scan");
    let mut driver = ScanDriver::new();
    c.bench_function("scan_640x480_url", |b| {
        b.iter(|| driver.scan(black_box(&mut ctx)))
    });
}

criterion_group!(
    benches,
    bench_scan_blank,
    bench_scan_code,
    bench_scan_code_vga
);
criterion_main!(benches);
