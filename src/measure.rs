use std::fmt;

use crate::{Error, Result};

/// Opaque handle to one capturable section of the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionRef(String);

impl SectionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rasterizer output: RGBA8 pixels, row major, no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self::new(width, height, rgba.repeat(count))
    }

    fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &format_args!("{} bytes", self.pixels.len()))
            .finish()
    }
}

/// One measured section, ready to be packed. Never mutated after [`measure`].
#[derive(Debug, Clone)]
pub struct Block {
    order: usize,
    source: SectionRef,
    mm_height: f32,
    bitmap: Bitmap,
}

impl Block {
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn source(&self) -> &SectionRef {
        &self.source
    }

    pub fn pixel_width(&self) -> u32 {
        self.bitmap.width
    }

    pub fn pixel_height(&self) -> u32 {
        self.bitmap.height
    }

    pub fn mm_height(&self) -> f32 {
        self.mm_height
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

/// Scales the bitmap to `usable_width_mm`, keeping its aspect ratio.
pub fn measure(
    order: usize,
    source: SectionRef,
    bitmap: Bitmap,
    usable_width_mm: f32,
) -> Result<Block> {
    if bitmap.width == 0 {
        return Err(Error::InvalidBitmap {
            section: source.to_string(),
            reason: "pixel width is zero".into(),
        });
    }

    if bitmap.expected_len() != Some(bitmap.pixels.len()) {
        return Err(Error::InvalidBitmap {
            section: source.to_string(),
            reason: format!(
                "{} pixel bytes do not match {}x{} RGBA",
                bitmap.pixels.len(),
                bitmap.width,
                bitmap.height
            ),
        });
    }

    let mm_height = bitmap.height as f32 * (usable_width_mm / bitmap.width as f32);

    Ok(Block {
        order,
        source,
        mm_height,
        bitmap,
    })
}

#[cfg(test)]
pub(crate) fn block_of_height(order: usize, mm_height: f32) -> Block {
    Block {
        order,
        source: SectionRef::new(format!("section-{order}")),
        mm_height,
        bitmap: Bitmap::filled(2, 2, [255, 255, 255, 255]),
    }
}
