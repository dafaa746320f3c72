mod assembler;
pub use assembler::*;

mod scope;
pub use scope::*;

mod sink;
pub use sink::*;

use async_trait::async_trait;

use crate::{Bitmap, CaptureError, SectionRef};

/// Produces a bitmap of one section of the live UI. Calls are never
/// overlapped: the assembler awaits each capture before starting the next.
#[async_trait(?Send)]
pub trait Rasterizer {
    async fn capture(&self, section: &SectionRef) -> Result<Bitmap, CaptureError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Visible,
    Hidden,
    Auto,
    Scroll,
}

/// The layout properties the assembler may override on a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionStyle {
    pub overflow: Overflow,
    pub min_width_px: Option<u32>,
}

impl SectionStyle {
    /// Style that lets the whole section render: nothing clipped, and at least
    /// `min_width_px` wide when given.
    pub fn expanded(&self, min_width_px: Option<u32>) -> Self {
        Self {
            overflow: Overflow::Visible,
            min_width_px: match (self.min_width_px, min_width_px) {
                (Some(current), Some(pinned)) => Some(current.max(pinned)),
                (current, pinned) => pinned.or(current),
            },
        }
    }
}

impl Default for SectionStyle {
    fn default() -> Self {
        Self {
            overflow: Overflow::Visible,
            min_width_px: None,
        }
    }
}

/// The host UI surface sections are captured from.
pub trait LayoutSurface {
    fn style(&self, section: &SectionRef) -> SectionStyle;

    fn set_style(&self, section: &SectionRef, style: &SectionStyle);
}

/// Lifecycle of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Capturing,
    Measuring,
    Packing,
    Rendering,
    Serializing,
    Saved,
    Failed,
}

impl ExportState {
    /// True between entering `Capturing` and leaving `Serializing`.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            Self::Capturing | Self::Measuring | Self::Packing | Self::Rendering | Self::Serializing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ExportState, Overflow, SectionStyle};

    #[test]
    fn expanded_style() {
        let clipped = SectionStyle {
            overflow: Overflow::Hidden,
            min_width_px: None,
        };
        assert_eq!(
            clipped.expanded(Some(1024)),
            SectionStyle {
                overflow: Overflow::Visible,
                min_width_px: Some(1024)
            }
        );

        let wide = SectionStyle {
            overflow: Overflow::Scroll,
            min_width_px: Some(1400),
        };
        assert_eq!(wide.expanded(Some(1024)).min_width_px, Some(1400));
        assert_eq!(wide.expanded(None).min_width_px, Some(1400));
    }

    #[test]
    fn running_states() {
        assert!(!ExportState::Idle.is_running());
        assert!(ExportState::Capturing.is_running());
        assert!(ExportState::Serializing.is_running());
        assert!(!ExportState::Saved.is_running());
        assert!(!ExportState::Failed.is_running());
    }
}
