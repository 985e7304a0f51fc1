//! End-to-end rendering tests against in-memory framebuffers.
//! Run: cargo test --test render

use testcard::ycbcr::{rgb_to_ycbcr, Planes};
use testcard::{
    render, render_with, CardConfig, EdgePolicy, Error, Framebuffer, NoText, PixelFormat, Rgb,
    SubsamplingMode, Surface, SurfaceLock, Variant,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rendered(width: usize, height: usize, mode: SubsamplingMode) -> Framebuffer {
    let mut fb = Framebuffer::new(width, height, PixelFormat::bgra32()).unwrap();
    render(&mut fb, mode).unwrap();
    fb
}

#[test]
fn corner_is_black_with_white_neighbours() {
    init_logging();
    let fb = rendered(800, 600, SubsamplingMode::Rgb);
    assert_eq!(fb.pixel(0, 0), Rgb::BLACK);
    assert_eq!(fb.pixel(1, 0), Rgb::WHITE);
    assert_eq!(fb.pixel(0, 1), Rgb::WHITE);
}

#[test]
fn alignment_ring_encloses_centre() {
    init_logging();
    let config = CardConfig::default();
    let mut fb = Framebuffer::new(800, 600, PixelFormat::bgra32()).unwrap();
    render_with(&mut fb, SubsamplingMode::Rgb, &config, &mut NoText).unwrap();

    let ring = Rgb::gray(180);
    let (cx, cy, r) = (399, 299, 240);
    assert_eq!(fb.pixel(0, 0), Rgb::BLACK);

    // top: highlight above the body, shadow below
    assert_eq!(fb.pixel(cx, cy - r - 1), Rgb::WHITE);
    for y in cy - r..cy - r + 3 {
        assert_eq!(fb.pixel(cx, y), ring, "top ring at y {y}");
    }
    assert_eq!(fb.pixel(cx, cy - r + 3), Rgb::BLACK);

    // left
    assert_eq!(fb.pixel(cx - r - 1, cy), Rgb::WHITE);
    for x in cx - r..cx - r + 3 {
        assert_eq!(fb.pixel(x, cy), ring, "left ring at x {x}");
    }
    assert_eq!(fb.pixel(cx - r + 3, cy), Rgb::BLACK);

    // right
    assert_eq!(fb.pixel(cx + r - 1, cy), Rgb::WHITE);
    for x in cx + r..cx + r + 3 {
        assert_eq!(fb.pixel(x, cy), ring, "right ring at x {x}");
    }
    assert_eq!(fb.pixel(cx + r + 3, cy), Rgb::BLACK);

    // bottom
    assert_eq!(fb.pixel(cx, cy + r - 1), Rgb::WHITE);
    for y in cy + r..cy + r + 3 {
        assert_eq!(fb.pixel(cx, y), ring, "bottom ring at y {y}");
    }
    assert_eq!(fb.pixel(cx, cy + r + 3), Rgb::BLACK);

    let centre = fb.pixel(cx, cy);
    assert_eq!(centre, config.background);
    assert!(![ring, Rgb::WHITE, Rgb::BLACK].contains(&centre));
}

#[test]
fn render_is_deterministic() {
    init_logging();
    for mode in SubsamplingMode::ALL {
        let a = rendered(320, 240, mode);
        let b = rendered(320, 240, mode);
        assert_eq!(a.as_bytes(), b.as_bytes(), "{mode} differs between runs");
    }
}

#[test]
fn rerender_overwrites_previous_frame() {
    init_logging();
    let mut fb = Framebuffer::new(320, 240, PixelFormat::bgra32()).unwrap();
    render(&mut fb, SubsamplingMode::YCbCr420).unwrap();
    render(&mut fb, SubsamplingMode::Rgb).unwrap();
    assert_eq!(fb.as_bytes(), rendered(320, 240, SubsamplingMode::Rgb).as_bytes());
}

#[test]
fn each_render_locks_once_and_releases() {
    let mut fb = Framebuffer::new(64, 64, PixelFormat::bgra32()).unwrap();
    render(&mut fb, SubsamplingMode::Rgb).unwrap();
    assert_eq!(fb.lock_count(), 1);
    assert!(!fb.is_locked());
    render(&mut fb, SubsamplingMode::YCbCr422Horizontal).unwrap();
    assert_eq!(fb.lock_count(), 2);
    assert!(!fb.is_locked());
}

#[test]
fn row_padding_is_never_written() {
    init_logging();
    for variant in [Variant::Classic, Variant::Chroma] {
        let config = CardConfig::default().with_variant(variant);
        for (w, h) in [(64, 64), (100, 75), (333, 201)] {
            for mode in SubsamplingMode::ALL {
                let stride = w * 4 + 12;
                let mut fb = Framebuffer::with_stride(w, h, stride, PixelFormat::bgra32()).unwrap();
                render_with(&mut fb, mode, &config, &mut NoText).unwrap();
                for row in fb.as_bytes().chunks(stride) {
                    assert!(
                        row[w * 4..].iter().all(|&b| b == 0),
                        "padding written at {w}x{h} {mode} {variant:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn tiny_surfaces_do_not_panic() {
    for (w, h) in [(0, 0), (1, 1), (2, 2), (3, 5), (17, 4), (45, 45), (90, 30)] {
        for mode in SubsamplingMode::ALL {
            let mut fb = Framebuffer::new(w, h, PixelFormat::bgra32()).unwrap();
            render(&mut fb, mode).unwrap();
        }
    }
}

#[test]
fn full_chroma_stays_close_to_rgb() {
    let rgb = rendered(320, 240, SubsamplingMode::Rgb);
    let full = rendered(320, 240, SubsamplingMode::YCbCr444);
    for (a, b) in rgb.to_rgb24().iter().zip(full.to_rgb24()) {
        assert!(a.abs_diff(b) <= 2, "{a} vs {b}");
    }
}

#[test]
fn subsampled_modes_change_the_image() {
    let rgb = rendered(320, 240, SubsamplingMode::Rgb);
    for mode in [
        SubsamplingMode::YCbCr422Horizontal,
        SubsamplingMode::YCbCr422Vertical,
        SubsamplingMode::YCbCr420,
    ] {
        assert_ne!(rgb.as_bytes(), rendered(320, 240, mode).as_bytes(), "{mode}");
    }
}

#[test]
fn quarter_chroma_planes_are_uniform_per_block() {
    let mut fb = rendered(200, 150, SubsamplingMode::Rgb);
    let mut lock = SurfaceLock::new(&mut fb).unwrap();
    let canvas = lock.canvas().unwrap();
    let mut planes = Planes::from_canvas(&canvas).unwrap();
    planes.subsample(2, 2, EdgePolicy::Truncate);
    for by in (0..150).step_by(2) {
        for bx in (0..200).step_by(2) {
            for (dx, dy) in [(1, 0), (0, 1), (1, 1)] {
                assert_eq!(planes.cb.get(bx, by), planes.cb.get(bx + dx, by + dy));
                assert_eq!(planes.cr.get(bx, by), planes.cr.get(bx + dx, by + dy));
            }
        }
    }
}

#[test]
fn quarter_chroma_output_is_near_uniform_per_block() {
    let fb = rendered(200, 150, SubsamplingMode::YCbCr420);
    let mut checked = 0;
    for by in (0..150).step_by(2) {
        for bx in (0..200).step_by(2) {
            let block = [
                fb.pixel(bx, by),
                fb.pixel(bx + 1, by),
                fb.pixel(bx, by + 1),
                fb.pixel(bx + 1, by + 1),
            ];
            // saturated channels lose the chroma they carried
            let clamped = block
                .iter()
                .any(|c| [c.r, c.g, c.b].iter().any(|&v| v == 0 || v == 255));
            if clamped {
                continue;
            }
            let first = rgb_to_ycbcr(block[0]);
            for c in &block[1..] {
                let s = rgb_to_ycbcr(*c);
                assert!(first.cb.abs_diff(s.cb) <= 3, "cb at ({bx}, {by})");
                assert!(first.cr.abs_diff(s.cr) <= 3, "cr at ({bx}, {by})");
            }
            checked += 1;
        }
    }
    assert!(checked > 100, "only {checked} blocks checked");
}

#[test]
fn png_export_matches_framebuffer() {
    let fb = rendered(96, 64, SubsamplingMode::YCbCr422Vertical);
    let mut encoded = Vec::new();
    fb.write_png(&mut encoded).unwrap();

    let decoder = png::Decoder::new(encoded.as_slice());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!((info.width, info.height), (96, 64));
    assert_eq!(info.color_type, png::ColorType::Rgb);
    assert_eq!(&buf[..info.buffer_size()], fb.to_rgb24().as_slice());
}

/// A backend reporting a format the renderer cannot pack.
struct OddSurface {
    data: Vec<u8>,
    unlocked: bool,
}

impl Surface for OddSurface {
    fn width(&self) -> usize {
        4
    }

    fn height(&self) -> usize {
        4
    }

    fn format(&self) -> PixelFormat {
        PixelFormat {
            bits_per_pixel: 12,
            ..PixelFormat::rgb565()
        }
    }

    fn stride(&self) -> usize {
        8
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn unlock(&mut self) {
        self.unlocked = true;
    }
}

#[test]
fn unsupported_surface_format_is_reported_and_unlocked() {
    let mut surface = OddSurface {
        data: vec![0; 32],
        unlocked: false,
    };
    let result = render(&mut surface, SubsamplingMode::Rgb);
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    assert!(surface.unlocked);
    assert!(surface.data.iter().all(|&b| b == 0));
}

#[test]
fn quarter_chroma_matches_block_mean_of_rgb_render() {
    init_logging();
    let (w, h) = (800, 600);
    let rgb = rendered(w, h, SubsamplingMode::Rgb);
    let sub = rendered(w, h, SubsamplingMode::YCbCr420);
    assert_ne!(rgb.as_bytes(), sub.as_bytes());

    let mut checked = 0;
    for by in (0..h).step_by(2) {
        for bx in (0..w).step_by(2) {
            let coords = [(bx, by), (bx + 1, by), (bx, by + 1), (bx + 1, by + 1)];
            let out: Vec<Rgb> = coords.iter().map(|&(x, y)| sub.pixel(x, y)).collect();
            if out.iter().any(|c| [c.r, c.g, c.b].iter().any(|&v| v == 0 || v == 255)) {
                continue;
            }
            let source: Vec<_> = coords.iter().map(|&(x, y)| rgb_to_ycbcr(rgb.pixel(x, y))).collect();
            let mean_cb = source.iter().map(|s| u32::from(s.cb)).sum::<u32>() / 4;
            let mean_cr = source.iter().map(|s| u32::from(s.cr)).sum::<u32>() / 4;
            for (c, s) in out.iter().zip(&source) {
                let o = rgb_to_ycbcr(*c);
                assert!(u32::from(o.cb).abs_diff(mean_cb) <= 2, "cb at ({bx}, {by})");
                assert!(u32::from(o.cr).abs_diff(mean_cr) <= 2, "cr at ({bx}, {by})");
                assert!(o.y.abs_diff(s.y) <= 2, "luma at ({bx}, {by})");
            }
            checked += 1;
        }
    }
    assert!(checked > 10_000, "only {checked} blocks checked");
}
