use lumen_engine::{
    Brush, Color, EngineError, Macro, Operation, OperationKind, PixelBuffer, Position, Rectangle, Rotation, Size,
};
use pretty_assertions::assert_eq;

// ========================================================================
// Helpers
// ========================================================================

fn gradient_image(width: i32, height: i32) -> PixelBuffer {
    let mut buf = PixelBuffer::new((width, height));
    for y in 0..height {
        for x in 0..width {
            buf.set_pixel((x, y), Color::new((x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 255));
        }
    }
    buf
}

// ========================================================================
// Geometry
// ========================================================================

#[test]
fn test_resize_150() {
    let src = PixelBuffer::filled((100, 100), Color::WHITE);
    let out = Operation::resize_150().apply(&src).unwrap();
    assert_eq!(out.size(), Size::new(150, 150));
}

#[test]
fn test_resize_50_rounds() {
    let src = gradient_image(5, 3);
    let out = Operation::resize_50().apply(&src).unwrap();
    assert_eq!(out.size(), Size::new(3, 2));
}

#[test]
fn test_rotate_swaps_dimensions() {
    let src = gradient_image(100, 50);
    assert_eq!(Operation::rotate(Rotation::Right90).apply(&src).unwrap().size(), Size::new(50, 100));
    assert_eq!(Operation::rotate(Rotation::Left90).apply(&src).unwrap().size(), Size::new(50, 100));
    assert_eq!(Operation::rotate(Rotation::Half).apply(&src).unwrap().size(), Size::new(100, 50));
}

#[test]
fn test_four_right_rotations_are_identity() {
    let src = gradient_image(7, 4);
    let quarter = Operation::rotate(Rotation::Right90);
    let mut out = src.clone();
    for _ in 0..4 {
        out = quarter.apply(&out).unwrap();
    }
    assert_eq!(out, src);
}

#[test]
fn test_crop_outside_fails() {
    let src = gradient_image(10, 10);
    let crop = Operation::crop(Rectangle::from(5, 5, 10, 10)).unwrap();
    let err = crop.apply(&src).unwrap_err();
    assert!(matches!(err, EngineError::Geometry { parameter: "rect", .. }));
}

#[test]
fn test_crop_with_overflowing_edge_from_log() {
    let src = gradient_image(4, 4);
    let crop: Operation = serde_json::from_str(
        r#"{"Crop":{"rect":{"start":{"x":2147483647,"y":0},"size":{"width":1,"height":1}}}}"#,
    )
    .unwrap();
    assert!(matches!(crop.apply(&src), Err(EngineError::Geometry { parameter: "rect", .. })));
}

#[test]
fn test_crop_after_explicit_clamp() {
    let src = gradient_image(10, 10);
    let rect = Rectangle::from(5, 5, 10, 10).clamped_to(src.size()).unwrap();
    let out = Operation::crop(rect).unwrap().apply(&src).unwrap();
    assert_eq!(out.size(), Size::new(5, 5));
    assert_eq!(out.get_pixel((0, 0)), src.get_pixel((5, 5)));
}

// ========================================================================
// Point operations
// ========================================================================

#[test]
fn test_brightness_then_negative_brightness() {
    let src = PixelBuffer::filled((2, 2), Color::new(100, 150, 200, 128));
    let up = Operation::brightness(30).unwrap().apply(&src).unwrap();
    let down = Operation::brightness(-30).unwrap().apply(&up).unwrap();
    assert_eq!(down, src);
}

#[test]
fn test_greyscale_is_idempotent() {
    let src = gradient_image(6, 6);
    let grey = Operation::greyscale();
    let once = grey.apply(&src).unwrap();
    assert_eq!(grey.apply(&once).unwrap(), once);
    assert!(once.pixels().iter().all(|c| c.r == c.g && c.g == c.b));
}

// ========================================================================
// Draw operations
// ========================================================================

#[test]
fn test_draw_line_with_wide_brush() {
    let src = PixelBuffer::filled((10, 10), Color::WHITE);
    let brush = Brush::new(Color::RED, 3).unwrap();
    let out = Operation::draw_line(Position::new(0, 5), Position::new(9, 5), brush)
        .unwrap()
        .apply(&src)
        .unwrap();
    for x in 0..10 {
        assert_eq!(out.get_pixel((x, 4)), Some(Color::RED));
        assert_eq!(out.get_pixel((x, 6)), Some(Color::RED));
        assert_eq!(out.get_pixel((x, 7)), Some(Color::WHITE));
    }
}

#[test]
fn test_draw_is_pure() {
    let src = PixelBuffer::filled((8, 8), Color::WHITE);
    let op = Operation::draw_ellipse(Position::new(1, 1), Position::new(6, 6), Brush::new(Color::BLACK, 1).unwrap(), false).unwrap();
    let a = op.apply(&src).unwrap();
    let b = op.apply(&src).unwrap();
    assert_eq!(a, b);
    assert!(src.is_uniform());
    assert_ne!(a, src);
}

#[test]
fn test_translucent_rectangle_blends() {
    let src = PixelBuffer::filled((4, 4), Color::BLUE);
    let brush = Brush::new(Color::new(255, 0, 0, 128), 1).unwrap();
    let out = Operation::draw_rectangle(Position::new(0, 0), Position::new(3, 3), brush, true)
        .unwrap()
        .apply(&src)
        .unwrap();
    let c = out.get_pixel((2, 2)).unwrap();
    assert_eq!(c.a, 255);
    assert!(c.r > 120 && c.r < 135);
    assert!(c.b > 120 && c.b < 135);
}

#[test]
fn test_shapes_far_beyond_the_canvas() {
    let src = PixelBuffer::filled((4, 4), Color::WHITE);
    let brush = Brush::new(Color::RED, 1).unwrap();
    let huge = Operation::draw_rectangle(Position::new(-1_000_000, -1_000_000), Position::new(1_000_000, 1_000_000), brush, true)
        .unwrap()
        .apply(&src)
        .unwrap();
    assert!(huge.pixels().iter().all(|c| *c == Color::RED));

    // only the outline is drawn and it never crosses the canvas
    let outline = Operation::draw_ellipse(Position::new(-1_000_000, -1_000_000), Position::new(1_000_000, 1_000_000), brush, false)
        .unwrap()
        .apply(&src)
        .unwrap();
    assert_eq!(outline, src);

    let line = Operation::draw_line(Position::new(-1_000_000, 2), Position::new(1_000_000, 2), brush)
        .unwrap()
        .apply(&src)
        .unwrap();
    assert!((0..4).all(|x| line.get_pixel((x, 2)) == Some(Color::RED)));
    assert_eq!(line.get_pixel((0, 1)), Some(Color::WHITE));
}

#[test]
fn test_logged_shape_with_overflowing_coordinates() {
    let src = PixelBuffer::filled((4, 4), Color::WHITE);
    let brush = Brush::new(Color::RED, 1).unwrap();
    let op = Operation::from(OperationKind::DrawLine {
        from: Position::new(-2_000_000_000, 0),
        to: Position::new(2_000_000_000, 0),
        brush,
    });
    assert!(matches!(op.apply(&src), Err(EngineError::Parameter { name: "from", .. })));
}

// ========================================================================
// Macros
// ========================================================================

#[test]
fn test_macro_equals_sequential_application() {
    let src = gradient_image(20, 12);
    let a = Operation::gaussian_filter(2).unwrap();
    let b = Operation::rotate(Rotation::Right90);
    let m = Macro::from_operations("ab", vec![a.clone(), b.clone()]);
    let expected = b.apply(&a.apply(&src).unwrap()).unwrap();
    assert_eq!(Operation::from_macro(m).apply(&src).unwrap(), expected);
}

#[test]
fn test_nested_macros() {
    let src = gradient_image(9, 9);
    let inner = Macro::from_operations("inner", vec![Operation::greyscale(), Operation::flip_horizontal()]);
    let outer = Macro::from_operations("outer", vec![Operation::from_macro(inner.clone()), Operation::sharpen()]);
    let expected = Operation::sharpen().apply(&inner.apply(&src).unwrap()).unwrap();
    assert_eq!(outer.apply(&src).unwrap(), expected);
    assert_eq!(outer.description(), "outer: inner: Greyscale, Flip horizontal, Sharpen");
}

#[test]
fn test_failing_macro_member_reports_error() {
    let src = gradient_image(4, 4);
    let m = Macro::from_operations("bad", vec![Operation::greyscale(), Operation::crop(Rectangle::from(0, 0, 8, 8)).unwrap()]);
    assert!(matches!(m.apply(&src), Err(EngineError::Geometry { .. })));
    assert!(Operation::from_macro(m).affects_geometry());
}

// ========================================================================
// Serialization
// ========================================================================

#[test]
fn test_log_round_trip_by_value() {
    let ops = vec![
        Operation::brightness(10).unwrap(),
        Operation::crop(Rectangle::from(1, 2, 3, 4)).unwrap(),
        Operation::draw_ellipse(Position::new(0, 0), Position::new(5, 3), Brush::new(Color::GREEN, 2).unwrap(), true).unwrap(),
        Operation::from_macro(Macro::from_operations("m", vec![Operation::sobel_orientation(true)])),
    ];
    let json = serde_json::to_string(&ops).unwrap();
    let back: Vec<Operation> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ops);
    assert!(back.iter().zip(&ops).all(|(a, b)| !a.is_same(b)));
    assert!(back[1].affects_geometry());
    assert!(matches!(back[3].kind(), OperationKind::Macro(m) if m.name() == "m"));
}
