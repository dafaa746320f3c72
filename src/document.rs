use chrono::NaiveDate;

use crate::{Block, Page};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportMetadata {
    pub title: String,
    pub subtitle: String,
    pub domain: String,
    pub period_label: String,
    pub generated_on: NaiveDate,
}

impl ReportMetadata {
    pub fn generated_label(&self) -> String {
        self.generated_on.format("%d %b %Y").to_string()
    }
}

/// Everything one export run renders: cover metadata, measured blocks and
/// their page assignment. Only ever built after packing completed, so the
/// page total it reports is final.
#[derive(Debug, Clone)]
pub struct Document {
    metadata: ReportMetadata,
    blocks: Vec<Block>,
    content_pages: Vec<Page>,
}

impl Document {
    pub fn new(metadata: ReportMetadata, blocks: Vec<Block>, content_pages: Vec<Page>) -> Self {
        Self {
            metadata,
            blocks,
            content_pages,
        }
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, order: usize) -> Option<&Block> {
        self.blocks.get(order)
    }

    pub fn content_pages(&self) -> &[Page] {
        &self.content_pages
    }

    /// Content pages plus the cover.
    pub fn total_pages(&self) -> usize {
        self.content_pages.len() + 1
    }
}
