use crate::Block;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Order of the placed block, which is also its index in the block list.
    pub block: usize,
    /// Offset from the top of the content area.
    pub y_offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    pub placements: Vec<Placement>,
}

impl Page {
    fn new(index: usize) -> Self {
        Self {
            index,
            placements: vec![],
        }
    }
}

/// Greedy sequential packer. Blocks are never reordered, split or rescaled; a
/// block taller than the usable height gets a page of its own and overflows it.
///
/// A page counts as empty while it holds no placement, not while the cursor
/// is at zero, so zero-height blocks are still separated by the gap.
#[derive(Debug, Clone)]
pub struct Packer {
    usable_height: f32,
    gap: f32,
    debug_page_breaks: bool,
}

impl Packer {
    pub fn new(usable_height: f32, gap: f32) -> Self {
        Self {
            usable_height,
            gap,
            debug_page_breaks: false,
        }
    }

    pub fn with_debug_page_breaks(mut self, debug_page_breaks: bool) -> Self {
        self.debug_page_breaks = debug_page_breaks;
        self
    }

    pub fn pack(&self, blocks: &[Block]) -> Vec<Page> {
        let mut pages: Vec<Page> = vec![];
        let mut cursor = 0.0;

        for (position, block) in blocks.iter().enumerate() {
            let height = block.mm_height();

            let y_offset = match pages.last() {
                Some(page) if !page.placements.is_empty() => {
                    let candidate = cursor + self.gap;
                    if candidate + height <= self.usable_height {
                        if self.debug_page_breaks {
                            tracing::debug!(
                                "Page fill CHECK block {position} at {candidate}mm, height {height}mm, usable {}mm",
                                self.usable_height
                            );
                        }
                        Some(candidate)
                    } else {
                        if self.debug_page_breaks {
                            tracing::debug!(
                                "Page BREAK before block {position} at {candidate}mm, height {height}mm, usable {}mm",
                                self.usable_height
                            );
                        }
                        None
                    }
                }
                _ => None,
            };

            let y_offset = match y_offset {
                Some(y_offset) => y_offset,
                None => {
                    pages.push(Page::new(pages.len()));
                    if height > self.usable_height {
                        tracing::debug!(
                            "Block {position} ({height}mm) exceeds usable height {}mm and will overflow its page",
                            self.usable_height
                        );
                    }
                    0.0
                }
            };

            if let Some(page) = pages.last_mut() {
                page.placements.push(Placement {
                    block: position,
                    y_offset,
                });
            }
            cursor = y_offset + height;
        }

        pages
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Packer, Page, Placement};
    use crate::{Block, measure::block_of_height};

    fn blocks(heights: &[f32]) -> Vec<Block> {
        heights
            .iter()
            .enumerate()
            .map(|(order, height)| block_of_height(order, *height))
            .collect()
    }

    fn layout(pages: &[Page]) -> Vec<Vec<(usize, f32)>> {
        pages
            .iter()
            .map(|page| {
                page.placements
                    .iter()
                    .map(|placement| (placement.block, placement.y_offset))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn tall_neighbours_get_their_own_pages() {
        let pages = Packer::new(210.0, 4.0).pack(&blocks(&[80.0, 150.0, 60.0]));

        assert_eq!(
            layout(&pages),
            vec![vec![(0, 0.0)], vec![(1, 0.0)], vec![(2, 0.0)]]
        );
        assert_eq!(pages.len() + 1, 4);
    }

    #[test]
    fn fills_page_with_gaps() {
        let pages = Packer::new(210.0, 4.0).pack(&blocks(&[49.0, 49.0, 49.0, 49.0, 49.0]));

        assert_eq!(
            layout(&pages),
            vec![
                vec![(0, 0.0), (1, 53.0), (2, 106.0), (3, 159.0)],
                vec![(4, 0.0)],
            ]
        );
    }

    #[test]
    fn breaks_when_gap_pushes_past_bottom() {
        let pages = Packer::new(210.0, 4.0).pack(&blocks(&[50.0, 50.0, 50.0, 50.0, 50.0]));

        assert_eq!(
            layout(&pages),
            vec![
                vec![(0, 0.0), (1, 54.0), (2, 108.0)],
                vec![(3, 0.0), (4, 54.0)],
            ]
        );
    }

    #[test]
    fn exact_fit_stays_on_page() {
        let pages = Packer::new(210.0, 4.0).pack(&blocks(&[100.0, 106.0]));

        assert_eq!(layout(&pages), vec![vec![(0, 0.0), (1, 104.0)]]);
    }

    #[test]
    fn no_blocks_no_pages() {
        let pages = Packer::new(210.0, 4.0).pack(&[]);

        assert!(pages.is_empty());
    }

    #[test]
    fn oversized_block_overflows_alone() {
        let pages = Packer::new(210.0, 4.0)
            .with_debug_page_breaks(true)
            .pack(&blocks(&[20.0, 500.0, 20.0]));

        assert_eq!(
            layout(&pages),
            vec![vec![(0, 0.0)], vec![(1, 0.0)], vec![(2, 0.0)]]
        );
        assert_eq!(
            pages[1].placements,
            vec![Placement {
                block: 1,
                y_offset: 0.0
            }]
        );
    }

    #[test]
    fn zero_height_blocks_keep_gaps() {
        let pages = Packer::new(10.0, 4.0).pack(&blocks(&[0.0, 0.0, 0.0, 0.0]));

        assert_eq!(
            layout(&pages),
            vec![vec![(0, 0.0), (1, 4.0), (2, 8.0)], vec![(3, 0.0)]]
        );
    }

    #[test]
    fn order_preserved_without_duplicates() {
        let heights: Vec<f32> = (0..40).map(|i| ((i * 37) % 230) as f32 + 1.0).collect();
        let blocks = blocks(&heights);
        let packer = Packer::new(210.0, 4.0);

        let pages = packer.pack(&blocks);

        let flattened: Vec<usize> = pages
            .iter()
            .flat_map(|page| page.placements.iter().map(|placement| placement.block))
            .collect();
        assert_eq!(flattened, (0..blocks.len()).collect::<Vec<_>>());

        for (index, page) in pages.iter().enumerate() {
            assert_eq!(page.index, index);
            assert!(!page.placements.is_empty());
            for pair in page.placements.windows(2) {
                let previous_end = pair[0].y_offset + blocks[pair[0].block].mm_height();
                assert!(pair[1].y_offset >= previous_end + 4.0 - 1e-3);
                assert!(pair[1].y_offset + blocks[pair[1].block].mm_height() <= 210.0);
            }
        }

        assert_eq!(packer.pack(&blocks), pages);
    }
}
