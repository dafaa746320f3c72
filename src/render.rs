mod context;
pub use context::*;

mod renderer;
pub use renderer::*;

#[cfg(test)]
pub(crate) mod recording;

use crate::{Bitmap, Color, PageGeometry, ReportMetadata, Result};

/// Rectangle in page space: millimetres, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Horizontal anchoring of text relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    pub align: Align,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            bold: false,
            color,
            align: Align::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Sink for draw commands. Pages are addressed by zero-based index; all
/// drawing goes to the page most recently opened or selected.
pub trait DocumentWriter {
    /// Appends a page, makes it current and returns its index.
    fn new_page(&mut self) -> Result<usize>;

    fn set_page(&mut self, index: usize) -> Result<()>;

    fn page_count(&self) -> usize;

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) -> Result<()>;

    /// Draws a single line of text with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    fn outline_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    fn serialize(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// Creates a fresh writer for every export run.
pub trait WriterFactory {
    type Writer: DocumentWriter;

    fn create(&self, metadata: &ReportMetadata, geometry: &PageGeometry) -> Result<Self::Writer>;
}

impl<F, W> WriterFactory for F
where
    F: Fn(&ReportMetadata, &PageGeometry) -> Result<W>,
    W: DocumentWriter,
{
    type Writer = W;

    fn create(&self, metadata: &ReportMetadata, geometry: &PageGeometry) -> Result<W> {
        self(metadata, geometry)
    }
}

fn from_mm(mm: f32) -> printpdf::Mm {
    printpdf::Mm(mm)
}

fn from_color(color: &Color) -> printpdf::Color {
    printpdf::Color::Rgb(printpdf::Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}
