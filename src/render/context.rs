use std::borrow::Cow;

use image::{ImageBuffer, Rgb, Rgba};
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Polygon, Px,
    path::{PaintMode, WindingOrder},
};

use crate::{Bitmap, Color, Error, PageGeometry, ReportMetadata, Result};

use super::{Align, DocumentWriter, Rect, TextStyle, from_color, from_mm};

const PT_TO_MM: f32 = 25.4 / 72.0;
const IMAGE_DPI: f32 = 96.0;

/// Factory signature used by the assembler for PDF output.
pub type PdfWriterFactory = fn(&ReportMetadata, &PageGeometry) -> Result<PdfWriter>;

/// [`DocumentWriter`] producing PDF through printpdf, using the builtin
/// Helvetica faces. Page space is top-left based and flipped here.
pub struct PdfWriter {
    document: PdfDocumentReference,
    pages: Vec<PdfLayerReference>,
    current: Option<usize>,

    page_width: f32,
    page_height: f32,

    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfWriter {
    pub fn new(document_title: &str, page_width: f32, page_height: f32) -> Result<Self> {
        let document = PdfDocument::empty(document_title);

        let regular = document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|error| Error::Render(error.to_string()))?;
        let bold = document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|error| Error::Render(error.to_string()))?;

        Ok(Self {
            document,
            pages: vec![],
            current: None,
            page_width,
            page_height,
            regular,
            bold,
        })
    }

    pub fn for_report(metadata: &ReportMetadata, geometry: &PageGeometry) -> Result<Self> {
        Self::new(&metadata.title, geometry.page_width, geometry.page_height)
    }

    fn layer(&self) -> Result<&PdfLayerReference> {
        self.current
            .and_then(|index| self.pages.get(index))
            .ok_or_else(|| Error::Render("no page is open".into()))
    }

    fn swap_y(&self, y: f32) -> f32 {
        self.page_height - y
    }

    fn rect_polygon(&self, rect: Rect, mode: PaintMode) -> Polygon {
        let top = self.swap_y(rect.y);
        let bottom = self.swap_y(rect.y + rect.height);
        let right = rect.x + rect.width;

        let points = [
            (rect.x, bottom),
            (right, bottom),
            (right, top),
            (rect.x, top),
        ]
        .into_iter()
        .map(|(x, y)| (Point::new(from_mm(x), from_mm(y)), false))
        .collect();

        Polygon {
            rings: vec![points],
            mode,
            winding_order: WindingOrder::NonZero,
        }
    }
}

impl DocumentWriter for PdfWriter {
    fn new_page(&mut self) -> Result<usize> {
        let (page, layer) = self.document.add_page(
            from_mm(self.page_width),
            from_mm(self.page_height),
            "default",
        );
        self.pages
            .push(self.document.get_page(page).get_layer(layer));

        let index = self.pages.len() - 1;
        self.current = Some(index);
        Ok(index)
    }

    fn set_page(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(Error::Render(format!(
                "page {index} does not exist, document has {} pages",
                self.pages.len()
            )));
        }
        self.current = Some(index);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) -> Result<()> {
        if bitmap.width == 0 || bitmap.height == 0 {
            return Ok(());
        }

        let layer = self.layer()?.clone();

        let rgba = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(
            bitmap.width,
            bitmap.height,
            bitmap.pixels.as_slice(),
        )
        .ok_or_else(|| Error::Render("bitmap pixel buffer is truncated".into()))?;

        // PDF images here carry no soft mask, so alpha is composited onto white.
        let rgb = ImageBuffer::from_fn(bitmap.width, bitmap.height, |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let blend = |channel: u8| {
                ((channel as u32 * a as u32 + 255 * (255 - a as u32)) / 255) as u8
            };
            Rgb([blend(r), blend(g), blend(b)])
        });

        let image = Image::from(ImageXObject {
            width: Px(bitmap.width as usize),
            height: Px(bitmap.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        let natural_width = bitmap.width as f32 / IMAGE_DPI * 25.4;
        let natural_height = bitmap.height as f32 / IMAGE_DPI * 25.4;

        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(from_mm(rect.x)),
                translate_y: Some(from_mm(self.swap_y(rect.y + rect.height))),
                scale_x: Some(rect.width / natural_width),
                scale_y: Some(rect.height / natural_height),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );

        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let text = printable(text);
        let width = text_width(&text, style.size, style.bold);
        let x = match style.align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let font = if style.bold { &self.bold } else { &self.regular };

        let layer = self.layer()?;
        layer.set_fill_color(from_color(&style.color));
        layer.use_text(
            text.as_ref(),
            style.size,
            from_mm(x),
            from_mm(self.swap_y(y)),
            font,
        );

        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let polygon = self.rect_polygon(rect, PaintMode::Fill);

        let layer = self.layer()?;
        layer.set_fill_color(from_color(&color));
        layer.add_polygon(polygon);

        Ok(())
    }

    fn outline_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let polygon = self.rect_polygon(rect, PaintMode::Stroke);

        let layer = self.layer()?;
        layer.set_outline_color(from_color(&color));
        layer.set_outline_thickness(0.25);
        layer.add_polygon(polygon);

        Ok(())
    }

    fn serialize(self) -> Result<Vec<u8>> {
        self.document
            .save_to_bytes()
            .map_err(|error| Error::Serialization(error.to_string()))
    }
}

/// Builtin fonts are written as single-byte strings, so anything outside
/// printable ASCII would come out garbled. Common Latin letters and typographic
/// punctuation are folded to their ASCII form; everything else becomes `?`.
fn printable(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
        return Cow::Borrowed(text);
    }

    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' => folded.push(' '),
            c if c.is_ascii_graphic() => folded.push(c),
            '\u{a0}' | '\u{2007}' | '\u{2009}' | '\u{202f}' | '\t' => folded.push(' '),
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{2032}' => folded.push('\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{2033}' | '«' | '»' => folded.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => folded.push('-'),
            '\u{2022}' | '·' => folded.push('*'),
            '\u{2026}' => folded.push_str("..."),
            '€' => folded.push_str("EUR"),
            '£' => folded.push_str("GBP"),
            'ß' => folded.push_str("ss"),
            'æ' => folded.push_str("ae"),
            'Æ' => folded.push_str("AE"),
            'œ' => folded.push_str("oe"),
            'Œ' => folded.push_str("OE"),
            c => folded.push(latin_base(c).unwrap_or('?')),
        }
    }

    Cow::Owned(folded)
}

fn latin_base(c: char) -> Option<char> {
    let base = match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'À'..='Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'č' => 'c',
        'Ç' | 'Ć' | 'Č' => 'C',
        'ď' | 'đ' => 'd',
        'Ď' | 'Đ' => 'D',
        'è'..='ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'È'..='Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'ì'..='ï' | 'ī' | 'į' | 'ı' => 'i',
        'Ì'..='Ï' | 'Ī' | 'Į' | 'İ' => 'I',
        'ł' | 'ľ' | 'ĺ' => 'l',
        'Ł' | 'Ľ' | 'Ĺ' => 'L',
        'ñ' | 'ń' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ň' => 'N',
        'ò'..='ö' | 'ø' | 'ō' | 'ő' => 'o',
        'Ò'..='Ö' | 'Ø' | 'Ō' | 'Ő' => 'O',
        'ř' | 'ŕ' => 'r',
        'Ř' | 'Ŕ' => 'R',
        'ś' | 'š' | 'ş' => 's',
        'Ś' | 'Š' | 'Ş' => 'S',
        'ť' | 'ţ' => 't',
        'Ť' | 'Ţ' => 'T',
        'ù'..='ü' | 'ū' | 'ů' | 'ű' | 'ų' => 'u',
        'Ù'..='Ü' | 'Ū' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' | 'Ÿ' => 'Y',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        _ => return None,
    };
    Some(base)
}

/// Approximate Helvetica advance of `text` in millimetres. Builtin fonts carry
/// no metrics, so alignment is computed from coarse per-class widths.
fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let em: f32 = text.chars().map(glyph_width).sum();
    let em = if bold { em * 1.06 } else { em };

    em * size * PT_TO_MM
}

fn glyph_width(c: char) -> f32 {
    match c {
        ' ' | 'f' | 't' | 'I' | '/' | '(' | ')' | '-' => 0.30,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.24,
        'r' => 0.35,
        'm' | 'M' | 'W' => 0.84,
        'w' => 0.72,
        c if c.is_ascii_digit() => 0.556,
        c if c.is_uppercase() => 0.68,
        _ => 0.54,
    }
}
