//! Raster storage shared by every operation.
//!
//! A [`PixelBuffer`] has fixed dimensions; only its pixel content changes.
//! `Clone` always produces an independent deep copy, so an original image and
//! a derived image never share pixel data.

use crate::{Color, EngineError, Position, Result, Size};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: Size,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Creates a fully transparent buffer.
    pub fn new(size: impl Into<Size>) -> Self {
        Self::filled(size, Color::TRANSPARENT)
    }

    pub fn filled(size: impl Into<Size>, color: Color) -> Self {
        let size = size.into();
        Self {
            size,
            pixels: vec![color; size.area()],
        }
    }

    /// Wraps row-major pixel data.
    ///
    /// # Errors
    ///
    /// Fails if the pixel count doesn't match `width * height`.
    pub fn from_pixels(size: impl Into<Size>, pixels: Vec<Color>) -> Result<Self> {
        let size = size.into();
        if size.width < 0 || size.height < 0 {
            return Err(EngineError::parameter("size", format!("negative dimensions {size}")));
        }
        if pixels.len() != size.area() {
            return Err(EngineError::parameter(
                "pixels",
                format!("expected {} pixels for {size}, got {}", size.area(), pixels.len()),
            ));
        }
        Ok(Self { size, pixels })
    }

    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let pixels = img.pixels().map(|p| Color::new(p[0], p[1], p[2], p[3])).collect();
        Self {
            size: Size::from((img.width(), img.height())),
            pixels,
        }
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let raw: Vec<u8> = self.pixels.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect();
        image::RgbaImage::from_raw(self.width() as u32, self.height() as u32, raw).unwrap_or_else(|| image::RgbaImage::new(0, 0))
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    pub fn is_valid(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size.width && pos.y < self.size.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    pub fn get_pixel(&self, pos: impl Into<Position>) -> Option<Color> {
        let pos = pos.into();
        if !self.is_valid(pos) {
            return None;
        }
        Some(self.pixels[self.index(pos.x, pos.y)])
    }

    /// Sets a pixel. Positions outside the canvas are ignored.
    pub fn set_pixel(&mut self, pos: impl Into<Position>, color: Color) {
        let pos = pos.into();
        if self.is_valid(pos) {
            let idx = self.index(pos.x, pos.y);
            self.pixels[idx] = color;
        }
    }

    /// Unchecked access for in-bounds coordinate loops.
    pub(crate) fn pixel(&self, x: i32, y: i32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Builds a new buffer of `size` by pulling every output pixel from a
    /// source coordinate.
    pub(crate) fn remap(&self, size: Size, source: impl Fn(i32, i32) -> (i32, i32)) -> PixelBuffer {
        let mut pixels = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                let (sx, sy) = source(x, y);
                pixels.push(self.pixel(sx, sy));
            }
        }
        PixelBuffer { size, pixels }
    }

    /// Applies `f` to every pixel, producing a new buffer of the same size.
    pub(crate) fn map_pixels(&self, f: impl Fn(Color) -> Color) -> PixelBuffer {
        PixelBuffer {
            size: self.size,
            pixels: self.pixels.iter().map(|c| f(*c)).collect(),
        }
    }

    /// Returns `true` if every pixel has the same colour.
    pub fn is_uniform(&self) -> bool {
        self.pixels.windows(2).all(|w| w[0] == w[1])
    }
}
