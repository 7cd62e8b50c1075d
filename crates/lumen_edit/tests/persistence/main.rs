use std::fs;

use lumen_edit::{EditHistory, EditorSettings, EngineError, ImageStore};
use lumen_engine::{Brush, Color, Macro, Operation, PixelBuffer, Position, Rectangle, Rotation};
use pretty_assertions::assert_eq;

// ========================================================================
// Helpers
// ========================================================================

fn test_image() -> PixelBuffer {
    let mut buf = PixelBuffer::new((12, 8));
    for y in 0..8 {
        for x in 0..12 {
            buf.set_pixel((x, y), Color::new((x * 20) as u8, (y * 30) as u8, 77, 255));
        }
    }
    buf
}

fn edited_history() -> EditHistory {
    let mut history = EditHistory::new();
    history.open(test_image());
    history.apply(Operation::brightness(-15).unwrap()).unwrap();
    history.apply(Operation::rotate(Rotation::Right90)).unwrap();
    history
        .apply(Operation::draw_line(Position::new(0, 0), Position::new(7, 11), Brush::new(Color::RED, 2).unwrap()).unwrap())
        .unwrap();
    history
}

// ========================================================================
// Image and log
// ========================================================================

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    let store = ImageStore::default();

    let mut history = edited_history();
    assert!(history.is_dirty());
    store.save_history(&mut history, &path).unwrap();
    assert!(!history.is_dirty());
    assert!(store.log_path(&path).exists());

    let (original, ops) = store.load(&path).unwrap();
    assert_eq!(&original, history.original().unwrap());
    assert_eq!(ops.as_deref(), Some(history.ops()));

    let mut reloaded = EditHistory::new();
    store.load_into(&mut reloaded, &path).unwrap();
    assert!(!reloaded.is_dirty());
    assert_eq!(reloaded.current(), history.current());
}

#[test]
fn test_export_writes_no_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.png");
    let store = ImageStore::default();

    let history = edited_history();
    store.export_history(&history, &path).unwrap();
    assert!(!store.log_path(&path).exists());
    assert!(history.is_dirty());

    let (exported, ops) = store.load(&path).unwrap();
    assert!(ops.is_none());
    assert_eq!(&exported, history.current().unwrap());

    let mut plain = EditHistory::new();
    store.load_into(&mut plain, &path).unwrap();
    assert!(!plain.has_ops());
}

#[test]
fn test_export_over_saved_image_drops_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    let store = ImageStore::default();

    let mut history = EditHistory::new();
    history.open(PixelBuffer::filled((3, 3), Color::rgb(100, 100, 100)));
    history.apply(Operation::brightness(50).unwrap()).unwrap();
    store.save_history(&mut history, &path).unwrap();
    assert!(store.log_path(&path).exists());

    store.export_history(&history, &path).unwrap();
    assert!(!store.log_path(&path).exists());

    let mut reloaded = EditHistory::new();
    store.load_into(&mut reloaded, &path).unwrap();
    assert!(!reloaded.has_ops());
    assert_eq!(reloaded.current(), history.current());
    assert_eq!(reloaded.current().unwrap().get_pixel((1, 1)), Some(Color::rgb(150, 150, 150)));
}

#[test]
fn test_failed_save_keeps_previous_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    let store = ImageStore::default();
    store.save(&path, &test_image(), &[Operation::greyscale()]).unwrap();

    // the raster can't be staged while its temp name is taken by a directory
    fs::create_dir(dir.path().join(".photo.png.tmp")).unwrap();
    let other = PixelBuffer::filled((2, 2), Color::RED);
    assert!(store.save(&path, &other, &[Operation::sharpen()]).is_err());

    let (original, ops) = store.load(&path).unwrap();
    assert_eq!(original, test_image());
    assert_eq!(ops, Some(vec![Operation::greyscale()]));
    assert!(!dir.path().join(".photo.png.ops.tmp").exists());
}

#[test]
fn test_unknown_log_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    let store = ImageStore::default();
    store.export(&path, &test_image()).unwrap();
    fs::write(store.log_path(&path), r#"{ "version": 7, "operations": [] }"#).unwrap();

    let err = store.load(&path).unwrap_err();
    assert!(matches!(err, EngineError::Persistence { .. }));
}

#[test]
fn test_log_that_no_longer_applies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.png");
    let store = ImageStore::default();
    let crop = Operation::crop(Rectangle::from(0, 0, 100, 100)).unwrap();
    store.save(&path, &test_image(), &[crop]).unwrap();

    let mut history = EditHistory::new();
    assert!(matches!(store.load_into(&mut history, &path), Err(EngineError::Geometry { .. })));
    assert!(!history.has_image());
}

#[test]
fn test_custom_log_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    let settings = EditorSettings {
        ops_extension: "history".to_string(),
        ..Default::default()
    };
    let store = ImageStore::from_settings(&settings);
    store.save(&path, &test_image(), &[Operation::greyscale()]).unwrap();
    assert!(dir.path().join("photo.png.history").exists());
    assert_eq!(store.load(&path).unwrap().1, Some(vec![Operation::greyscale()]));
}

#[test]
fn test_save_without_image() {
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::default();
    let mut history = EditHistory::new();
    assert!(matches!(store.save_history(&mut history, &dir.path().join("x.png")), Err(EngineError::NoImage)));
    assert!(matches!(store.export_history(&history, &dir.path().join("x.png")), Err(EngineError::NoImage)));
}

// ========================================================================
// Macro files
// ========================================================================

#[test]
fn test_macro_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prep.macro");
    let store = ImageStore::default();

    let inner = Macro::from_operations("soften", vec![Operation::median_filter(2).unwrap(), Operation::sobel_orientation(false)]);
    let m = Macro::from_operations("prep", vec![Operation::greyscale(), Operation::from_macro(inner), Operation::resize(75).unwrap()]);
    store.save_macro(&path, &m).unwrap();

    let loaded = store.load_macro(&path).unwrap();
    assert_eq!(loaded, m);
    assert_eq!(loaded.to_string(), "prep: Greyscale, soften: Median filter (radius 2), Sobel orientation, Resize 75%");
    assert!(Operation::from_macro(loaded).affects_geometry());
}

#[test]
fn test_malformed_macro_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.macro");
    fs::write(&path, "not json").unwrap();
    assert!(matches!(ImageStore::default().load_macro(&path), Err(EngineError::Persistence { .. })));
}
