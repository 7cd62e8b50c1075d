//! Reading and writing images, operation logs and macro files.
//!
//! An image saved with its history is stored as two files: the original
//! raster (`photo.png`) and the operation log next to it
//! (`photo.png.ops`). The log is JSON:
//!
//! ```json
//! { "version": 1, "operations": [ { "Brightness": { "amount": 10 } }, "Greyscale" ] }
//! ```
//!
//! Exporting writes the current pixels only and drops a log saved earlier
//! under the same name. All files are written to a temporary sibling first
//! and renamed into place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use lumen_engine::{EngineError, Macro, Operation, PixelBuffer, Result};
use serde::{Deserialize, Serialize};

use crate::{EditHistory, EditorSettings};

pub const LOG_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct OperationLog {
    version: u32,
    operations: Vec<Operation>,
}

#[derive(Serialize, Deserialize)]
struct MacroFile {
    version: u32,
    #[serde(rename = "macro")]
    content: Macro,
}

/// Writes `data` to a hidden sibling of `path` and returns the staged file.
fn stage(path: &Path, data: &[u8]) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| EngineError::persistence(path, "path has no file name"))?
        .to_string_lossy();
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let write_result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(())
    })();
    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(EngineError::persistence(path, err.to_string()));
    }
    Ok(temp_path)
}

/// Moves a staged file into place.
fn commit(staged: &Path, path: &Path) -> Result<()> {
    if let Err(err) = fs::rename(staged, path) {
        let _ = fs::remove_file(staged);
        return Err(EngineError::persistence(path, err.to_string()));
    }
    Ok(())
}

/// Writes `data` to `path` through a temporary file in the same directory.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let staged = stage(path, data)?;
    commit(&staged, path)
}

/// Encodes `buffer` in the format named by the extension of `path`.
fn encode(path: &Path, buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let format = ImageFormat::from_path(path)?;
    let mut img = DynamicImage::ImageRgba8(buffer.to_rgba_image());
    if format == ImageFormat::Jpeg {
        // no alpha channel in jpeg
        img = DynamicImage::ImageRgb8(img.to_rgb8());
    }
    let mut data = std::io::Cursor::new(Vec::new());
    img.write_to(&mut data, format)?;
    Ok(data.into_inner())
}

#[derive(Clone, Debug)]
pub struct ImageStore {
    ops_extension: String,
    macro_extension: String,
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::from_settings(&EditorSettings::default())
    }
}

impl ImageStore {
    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self {
            ops_extension: settings.ops_extension.clone(),
            macro_extension: settings.macro_extension.clone(),
        }
    }

    /// Sibling log file of an image: `<path>.<ops_extension>`.
    pub fn log_path(&self, image_path: &Path) -> PathBuf {
        let mut name = image_path.as_os_str().to_owned();
        name.push(".");
        name.push(&self.ops_extension);
        PathBuf::from(name)
    }

    pub fn macro_extension(&self) -> &str {
        &self.macro_extension
    }

    /// Reads the raster at `path` and, if present, its operation log.
    ///
    /// # Errors
    ///
    /// I/O and decoding errors of the raster, `Persistence` for an unreadable
    /// log.
    pub fn load(&self, path: &Path) -> Result<(PixelBuffer, Option<Vec<Operation>>)> {
        let img = image::open(path)?.to_rgba8();
        let buffer = PixelBuffer::from_rgba_image(&img);

        let log_path = self.log_path(path);
        let ops = if log_path.exists() {
            Some(Self::read_log(&log_path)?)
        } else {
            None
        };
        log::info!(
            "loaded {} ({}, {} logged operations)",
            path.display(),
            buffer.size(),
            ops.as_ref().map_or(0, Vec::len)
        );
        Ok((buffer, ops))
    }

    fn read_log(path: &Path) -> Result<Vec<Operation>> {
        let text = fs::read_to_string(path)?;
        let log: OperationLog = serde_json::from_str(&text).map_err(|err| EngineError::persistence(path, err.to_string()))?;
        if log.version != LOG_VERSION {
            return Err(EngineError::persistence(path, format!("unsupported log version {}", log.version)));
        }
        Ok(log.operations)
    }

    /// Writes `original` to `path` and the log next to it. Both files are
    /// staged before either is renamed into place, so a failed save leaves
    /// the previous pair untouched.
    ///
    /// # Errors
    ///
    /// Encoding and I/O errors.
    pub fn save(&self, path: &Path, original: &PixelBuffer, ops: &[Operation]) -> Result<()> {
        let raster = encode(path, original)?;
        let log = OperationLog {
            version: LOG_VERSION,
            operations: ops.to_vec(),
        };
        let log_path = self.log_path(path);
        let staged_log = stage(&log_path, serde_json::to_string_pretty(&log)?.as_bytes())?;
        let staged_raster = match stage(path, &raster) {
            Ok(staged) => staged,
            Err(err) => {
                let _ = fs::remove_file(&staged_log);
                return Err(err);
            }
        };
        if let Err(err) = commit(&staged_log, &log_path) {
            let _ = fs::remove_file(&staged_raster);
            return Err(err);
        }
        commit(&staged_raster, path)?;
        log::info!("saved {} with {} operations", path.display(), ops.len());
        Ok(())
    }

    /// Writes pixels only; the format follows the file extension. A log
    /// left next to `path` by an earlier save is removed, it would replay
    /// over pixels that already contain its edits.
    ///
    /// # Errors
    ///
    /// Unknown extension, encoding and I/O errors.
    pub fn export(&self, path: &Path, buffer: &PixelBuffer) -> Result<()> {
        write_atomic(path, &encode(path, buffer)?)?;
        let log_path = self.log_path(path);
        match fs::remove_file(&log_path) {
            Ok(()) => log::info!("removed stale log {}", log_path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(EngineError::persistence(&log_path, err.to_string())),
        }
        log::info!("exported {} ({})", path.display(), buffer.size());
        Ok(())
    }

    /// # Errors
    ///
    /// I/O errors.
    pub fn save_macro(&self, path: &Path, m: &Macro) -> Result<()> {
        let file = MacroFile {
            version: LOG_VERSION,
            content: m.clone(),
        };
        write_atomic(path, serde_json::to_string_pretty(&file)?.as_bytes())?;
        log::info!("saved macro {}", path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// I/O errors, `Persistence` for malformed or unsupported files.
    pub fn load_macro(&self, path: &Path) -> Result<Macro> {
        let text = fs::read_to_string(path)?;
        let file: MacroFile = serde_json::from_str(&text).map_err(|err| EngineError::persistence(path, err.to_string()))?;
        if file.version != LOG_VERSION {
            return Err(EngineError::persistence(path, format!("unsupported macro version {}", file.version)));
        }
        Ok(file.content)
    }

    // === EditHistory helpers ===

    /// Loads `path` into `history`; a logged history is replayed and clean.
    ///
    /// # Errors
    ///
    /// See [`ImageStore::load`] and [`EditHistory::open_with_log`].
    pub fn load_into(&self, history: &mut EditHistory, path: &Path) -> Result<()> {
        let (buffer, ops) = self.load(path)?;
        match ops {
            Some(ops) => history.open_with_log(buffer, ops),
            None => {
                history.open(buffer);
                Ok(())
            }
        }
    }

    /// Saves the original image and the log, then marks the history saved.
    ///
    /// # Errors
    ///
    /// `NoImage` without an open image, otherwise see [`ImageStore::save`].
    pub fn save_history(&self, history: &mut EditHistory, path: &Path) -> Result<()> {
        let original = history.original().ok_or(EngineError::NoImage)?;
        self.save(path, original, history.ops())?;
        history.mark_saved();
        Ok(())
    }

    /// Writes the current image without a log. Doesn't change the dirty state.
    ///
    /// # Errors
    ///
    /// `NoImage` without an open image, otherwise see [`ImageStore::export`].
    pub fn export_history(&self, history: &EditHistory, path: &Path) -> Result<()> {
        let current = history.current().ok_or(EngineError::NoImage)?;
        self.export(path, current)
    }
}
