use std::{
    cell::Cell,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    Bitmap, Block, Document, DocumentWriter, Error, Packer, PdfWriter, PdfWriterFactory, Renderer,
    ReportConfig, ReportMetadata, Result, SectionRef, WriterFactory, measure,
    report_filename,
};

use super::{
    ExportState, InFlight, LayoutSurface, OverrideScope, Rasterizer, ReportSink, Settle,
};

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub metadata: ReportMetadata,
    pub client_name: Option<String>,
    pub sections: Vec<SectionRef>,
}

impl ExportRequest {
    pub fn new(metadata: ReportMetadata, sections: Vec<SectionRef>) -> Self {
        Self {
            metadata,
            client_name: None,
            sections,
        }
    }

    pub fn with_client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub filename: String,
    pub total_pages: usize,
    pub size: usize,
}

/// Runs exports end to end: capture, measure, pack, render, serialize, save.
/// One export at a time; a request arriving while another is in flight is
/// rejected with [`Error::ExportInProgress`].
pub struct Assembler<R, L, S, F = PdfWriterFactory> {
    rasterizer: R,
    surface: L,
    sink: S,
    writer_factory: F,
    config: ReportConfig,

    in_flight: AtomicBool,
    state: Cell<ExportState>,
}

impl<R, L, S> Assembler<R, L, S>
where
    R: Rasterizer,
    L: LayoutSurface,
    S: ReportSink,
{
    pub fn new(rasterizer: R, surface: L, sink: S, config: ReportConfig) -> Self {
        Self {
            rasterizer,
            surface,
            sink,
            writer_factory: PdfWriter::for_report,
            config,
            in_flight: AtomicBool::new(false),
            state: Cell::new(ExportState::Idle),
        }
    }
}

impl<R, L, S, F> Assembler<R, L, S, F>
where
    R: Rasterizer,
    L: LayoutSurface,
    S: ReportSink,
    F: WriterFactory,
{
    pub fn with_writer_factory<G: WriterFactory>(self, writer_factory: G) -> Assembler<R, L, S, G> {
        Assembler {
            rasterizer: self.rasterizer,
            surface: self.surface,
            sink: self.sink,
            writer_factory,
            config: self.config,
            in_flight: self.in_flight,
            state: self.state,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn surface(&self) -> &L {
        &self.surface
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn state(&self) -> ExportState {
        self.state.get()
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn export(&self, request: ExportRequest) -> Result<SavedReport> {
        let _in_flight = InFlight::acquire(&self.in_flight)?;
        let _settle = Settle::new(&self.state);

        if request.sections.is_empty() {
            tracing::warn!("Export requested without sections");
            return Err(Error::EmptyContent);
        }

        match self.run(request).await {
            Ok(saved) => {
                self.transition(ExportState::Saved);
                self.transition(ExportState::Idle);
                Ok(saved)
            }
            Err(error) => {
                self.transition(ExportState::Failed);
                tracing::warn!("Export failed: {error}");
                Err(error)
            }
        }
    }

    async fn run(&self, request: ExportRequest) -> Result<SavedReport> {
        self.transition(ExportState::Capturing);
        let captures = self.capture_all(&request.sections).await?;

        self.transition(ExportState::Measuring);
        let usable_width = self.config.geometry.usable_width();
        let blocks = captures
            .into_iter()
            .enumerate()
            .map(|(order, (section, bitmap))| measure(order, section, bitmap, usable_width))
            .collect::<Result<Vec<Block>>>()?;

        self.transition(ExportState::Packing);
        let pages = Packer::new(
            self.config.geometry.usable_height(),
            self.config.geometry.block_gap,
        )
        .with_debug_page_breaks(self.config.debug_page_breaks)
        .pack(&blocks);
        let document = Document::new(request.metadata, blocks, pages);
        tracing::debug!(
            "Packed {} blocks into {} content pages",
            document.blocks().len(),
            document.content_pages().len()
        );

        self.transition(ExportState::Rendering);
        let mut writer = self
            .writer_factory
            .create(document.metadata(), &self.config.geometry)?;
        Renderer::new(&self.config).render(&document, &mut writer)?;

        self.transition(ExportState::Serializing);
        let bytes = writer.serialize()?;

        let filename = report_filename(
            request.client_name.as_deref(),
            document.metadata().generated_on,
            &self.config.fallback_client_slug,
            &self.config.file_extension,
        );
        self.sink.save(&filename, &bytes)?;

        Ok(SavedReport {
            filename,
            total_pages: document.total_pages(),
            size: bytes.len(),
        })
    }

    async fn capture_all(&self, sections: &[SectionRef]) -> Result<Vec<(SectionRef, Bitmap)>> {
        let mut captures = Vec::with_capacity(sections.len());

        for section in sections {
            let _scope =
                OverrideScope::acquire(&self.surface, section, self.config.capture_min_width_px);

            let bitmap = self
                .rasterizer
                .capture(section)
                .await
                .map_err(|error| Error::Capture {
                    section: section.to_string(),
                    reason: error.to_string(),
                })?;
            tracing::debug!(
                "Captured section {section}: {}x{} px",
                bitmap.width,
                bitmap.height
            );

            captures.push((section.clone(), bitmap));
        }

        Ok(captures)
    }

    fn transition(&self, next: ExportState) {
        let previous = self.state.replace(next);
        tracing::debug!("Export state {previous:?} -> {next:?}");
    }
}
