use crate::{Document, Error, PageGeometry, ReportConfig, Result, Theme};

use super::{Align, DocumentWriter, Rect, TextStyle};

/// Draws a packed [`Document`] in two passes: cover and content pages first,
/// then footers, which need the final page total.
pub struct Renderer {
    geometry: PageGeometry,
    theme: Theme,
    confidentiality_label: String,
    debug_frame: bool,
}

impl Renderer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            geometry: config.geometry.clone(),
            theme: config.theme.clone(),
            confidentiality_label: config.confidentiality_label.clone(),
            debug_frame: config.debug_frame,
        }
    }

    pub fn with_debug_frame(mut self, debug_frame: bool) -> Self {
        self.debug_frame = debug_frame;
        self
    }

    pub fn render<W: DocumentWriter>(&self, document: &Document, writer: &mut W) -> Result<()> {
        writer.new_page()?;
        self.cover(document, writer)?;

        for page in document.content_pages() {
            writer.new_page()?;
            self.header(document, writer)?;

            for placement in page.placements.iter() {
                let block = document.block(placement.block).ok_or_else(|| {
                    Error::Render(format!(
                        "page {} refers to unknown block {}",
                        page.index, placement.block
                    ))
                })?;

                let rect = Rect::new(
                    self.geometry.margin_x,
                    self.geometry.content_top() + placement.y_offset,
                    self.geometry.usable_width(),
                    block.mm_height(),
                );
                writer.draw_image(block.bitmap(), rect)?;

                if self.debug_frame {
                    writer.outline_rect(rect, self.theme.debug_frame)?;
                }
            }
        }

        let total_pages = document.total_pages();
        if writer.page_count() != total_pages {
            return Err(Error::Render(format!(
                "writer holds {} pages, document needs {total_pages}",
                writer.page_count()
            )));
        }

        for index in 1..total_pages {
            writer.set_page(index)?;
            self.footer(document, index + 1, total_pages, writer)?;
        }

        Ok(())
    }

    fn cover<W: DocumentWriter>(&self, document: &Document, writer: &mut W) -> Result<()> {
        let geometry = &self.geometry;
        let metadata = document.metadata();
        let center = geometry.page_width / 2.0;
        let title_y = geometry.page_height * 0.4;

        writer.fill_rect(
            Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height),
            self.theme.cover_background,
        )?;

        writer.draw_text(
            &metadata.title,
            center,
            title_y,
            &TextStyle::new(28.0, self.theme.cover_text)
                .bold()
                .align(Align::Center),
        )?;
        writer.draw_text(
            &metadata.subtitle,
            center,
            title_y + 14.0,
            &TextStyle::new(16.0, self.theme.cover_text).align(Align::Center),
        )?;

        let period_line = if metadata.period_label.is_empty() {
            format!("Generated {}", metadata.generated_label())
        } else {
            format!("{}  |  Generated {}", metadata.period_label, metadata.generated_label())
        };
        writer.draw_text(
            &period_line,
            center,
            title_y + 26.0,
            &TextStyle::new(11.0, self.theme.cover_text).align(Align::Center),
        )
    }

    fn header<W: DocumentWriter>(&self, document: &Document, writer: &mut W) -> Result<()> {
        let geometry = &self.geometry;
        let metadata = document.metadata();
        let right = geometry.page_width - geometry.margin_x;
        let upper = geometry.header_height * 0.45;
        let lower = geometry.header_height * 0.8;

        writer.fill_rect(
            Rect::new(0.0, 0.0, geometry.page_width, geometry.header_height),
            self.theme.band_background,
        )?;

        writer.draw_text(
            &metadata.title,
            geometry.margin_x,
            upper,
            &TextStyle::new(11.0, self.theme.band_text).bold(),
        )?;
        writer.draw_text(
            &metadata.domain,
            geometry.margin_x,
            lower,
            &TextStyle::new(8.0, self.theme.muted_text),
        )?;
        writer.draw_text(
            &metadata.period_label,
            right,
            upper,
            &TextStyle::new(9.0, self.theme.band_text).align(Align::Right),
        )?;
        writer.draw_text(
            &metadata.generated_label(),
            right,
            lower,
            &TextStyle::new(8.0, self.theme.muted_text).align(Align::Right),
        )
    }

    fn footer<W: DocumentWriter>(
        &self,
        document: &Document,
        page_number: usize,
        total_pages: usize,
        writer: &mut W,
    ) -> Result<()> {
        let geometry = &self.geometry;
        let baseline = geometry.footer_top() + geometry.footer_height * 0.6;

        writer.fill_rect(
            Rect::new(0.0, geometry.footer_top(), geometry.page_width, geometry.footer_height),
            self.theme.band_background,
        )?;

        writer.draw_text(
            &document.metadata().generated_label(),
            geometry.margin_x,
            baseline,
            &TextStyle::new(8.0, self.theme.muted_text),
        )?;
        writer.draw_text(
            &format!("Page {page_number} of {total_pages}"),
            geometry.page_width / 2.0,
            baseline,
            &TextStyle::new(8.0, self.theme.band_text).align(Align::Center),
        )?;
        writer.draw_text(
            &self.confidentiality_label,
            geometry.page_width - geometry.margin_x,
            baseline,
            &TextStyle::new(8.0, self.theme.muted_text)
                .bold()
                .align(Align::Right),
        )
    }
}
