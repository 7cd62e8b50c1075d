use lumen_engine::{Color, EmbossDirection, Operation, PixelBuffer, Size, MAX_FILTER_RADIUS};
use pretty_assertions::assert_eq;

// ========================================================================
// Helpers
// ========================================================================

fn all_filters(radius: u32) -> Vec<Operation> {
    let mut ops = vec![
        Operation::mean_filter(radius).unwrap(),
        Operation::gaussian_filter(radius).unwrap(),
        Operation::median_filter(radius).unwrap(),
        Operation::sharpen(),
    ];
    for denoise in [false, true] {
        ops.push(Operation::sobel_horizontal(denoise));
        ops.push(Operation::sobel_vertical(denoise));
        ops.push(Operation::sobel_orientation(denoise));
        for direction in EmbossDirection::ALL {
            ops.push(Operation::emboss(direction, denoise));
        }
    }
    ops
}

/// Non-trivial test image: diagonal ramp with a bright square.
fn pattern(width: i32, height: i32) -> PixelBuffer {
    let mut buf = PixelBuffer::new((width, height));
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y) * 255 / (width + height)) as u8;
            buf.set_pixel((x, y), Color::new(v, 255 - v, v / 2, 255));
        }
    }
    for y in height / 4..height / 2 {
        for x in width / 4..width / 2 {
            buf.set_pixel((x, y), Color::WHITE);
        }
    }
    buf
}

// ========================================================================
// Flat regions
// ========================================================================

#[test]
fn test_mean_filter_on_white() {
    let src = PixelBuffer::filled((4, 4), Color::WHITE);
    let out = Operation::mean_filter(1).unwrap().apply(&src).unwrap();
    assert_eq!(out, src);
}

#[test]
fn test_uniform_image_is_unchanged_by_every_filter() {
    let src = PixelBuffer::filled((9, 7), Color::new(90, 140, 33, 200));
    for radius in [1, 2, 5] {
        for op in all_filters(radius) {
            let out = op.apply(&src).unwrap();
            assert_eq!(out, src, "{op} changed a uniform image");
        }
    }
}

#[test]
fn test_large_radius_on_tiny_image() {
    let src = PixelBuffer::filled((2, 3), Color::BLUE);
    for op in [
        Operation::mean_filter(MAX_FILTER_RADIUS).unwrap(),
        Operation::gaussian_filter(MAX_FILTER_RADIUS).unwrap(),
        Operation::median_filter(MAX_FILTER_RADIUS).unwrap(),
    ] {
        assert_eq!(op.apply(&src).unwrap(), src);
    }
}

// ========================================================================
// Dimensions
// ========================================================================

#[test]
fn test_filters_preserve_dimensions() {
    for (w, h) in [(1, 1), (1, 9), (13, 4), (32, 32)] {
        let src = pattern(w, h);
        for op in all_filters(3) {
            let out = op.apply(&src).unwrap();
            assert_eq!(out.size(), Size::new(w, h), "{op} on {w}x{h}");
        }
    }
}

#[test]
fn test_filters_keep_alpha() {
    let mut src = pattern(8, 8);
    src.set_pixel((3, 3), Color::new(10, 10, 10, 17));
    for op in all_filters(2) {
        let out = op.apply(&src).unwrap();
        assert_eq!(out.get_pixel((3, 3)).unwrap().a, 17, "{op}");
        assert_eq!(out.get_pixel((0, 0)).unwrap().a, 255, "{op}");
    }
}

// ========================================================================
// Behaviour
// ========================================================================

#[test]
fn test_filters_do_not_touch_input() {
    let src = pattern(10, 10);
    let copy = src.clone();
    for op in all_filters(2) {
        let _ = op.apply(&src).unwrap();
    }
    assert_eq!(src, copy);
}

#[test]
fn test_gaussian_smooths_edges() {
    let mut src = PixelBuffer::filled((8, 1), Color::BLACK);
    for x in 4..8 {
        src.set_pixel((x, 0), Color::WHITE);
    }
    let out = Operation::gaussian_filter(1).unwrap().apply(&src).unwrap();
    // 1-2-1 / 4 across the edge
    assert_eq!(out.get_pixel((3, 0)), Some(Color::rgb(64, 64, 64)));
    assert_eq!(out.get_pixel((4, 0)), Some(Color::rgb(191, 191, 191)));
    assert_eq!(out.get_pixel((0, 0)), Some(Color::BLACK));
    assert_eq!(out.get_pixel((7, 0)), Some(Color::WHITE));
}

#[test]
fn test_sharpen_increases_edge_contrast() {
    let mut src = PixelBuffer::filled((6, 6), Color::rgb(100, 100, 100));
    for y in 0..6 {
        for x in 3..6 {
            src.set_pixel((x, y), Color::rgb(150, 150, 150));
        }
    }
    let out = Operation::sharpen().apply(&src).unwrap();
    assert_eq!(out.get_pixel((2, 2)), Some(Color::rgb(50, 50, 50)));
    assert_eq!(out.get_pixel((3, 2)), Some(Color::rgb(200, 200, 200)));
    assert_eq!(out.get_pixel((0, 2)), Some(Color::rgb(100, 100, 100)));
}

#[test]
fn test_emboss_directions_are_mirrored() {
    let src = pattern(12, 12);
    let east = Operation::emboss(EmbossDirection::East, false).apply(&src).unwrap();
    let west = Operation::emboss(EmbossDirection::West, false).apply(&src).unwrap();
    // opposite kernels produce inverted rescaled responses
    for (e, w) in east.pixels().iter().zip(west.pixels()) {
        assert!((i32::from(e.r) + i32::from(w.r) - 255).abs() <= 1);
    }
}

#[test]
fn test_sobel_orientation_hues() {
    // a white disc on black produces all four anchor hues around its rim
    let mut src = PixelBuffer::filled((21, 21), Color::BLACK);
    for y in 0..21 {
        for x in 0..21 {
            if (x - 10) * (x - 10) + (y - 10) * (y - 10) <= 36 {
                src.set_pixel((x, y), Color::WHITE);
            }
        }
    }
    let out = Operation::sobel_orientation(false).apply(&src).unwrap();
    let dominant = |x: i32, y: i32| {
        let c = out.get_pixel((x, y)).unwrap();
        (c.r > 100, c.g > 100, c.b > 100)
    };
    // left rim: intensity grows towards +x -> red
    assert_eq!(dominant(4, 10), (true, false, false));
    // right rim: grows towards -x -> green
    assert_eq!(dominant(16, 10), (false, true, false));
    // top rim: grows towards +y -> yellow
    assert_eq!(dominant(10, 4), (true, true, false));
    // bottom rim: grows towards -y -> blue
    assert_eq!(dominant(10, 16), (false, false, true));
    // far away from the disc nothing happens
    assert_eq!(out.get_pixel((0, 0)), Some(Color::BLACK));
}
