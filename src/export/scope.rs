use std::{
    cell::Cell,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{Error, Result, SectionRef};

use super::{ExportState, LayoutSurface, SectionStyle};

/// Temporary layout override on one section. The saved style is written back
/// when the scope is dropped, on success, error and cancellation alike.
pub struct OverrideScope<'a, L: LayoutSurface + ?Sized> {
    surface: &'a L,
    section: &'a SectionRef,
    saved: SectionStyle,
}

impl<'a, L: LayoutSurface + ?Sized> OverrideScope<'a, L> {
    pub fn acquire(surface: &'a L, section: &'a SectionRef, min_width_px: Option<u32>) -> Self {
        let saved = surface.style(section);
        let expanded = saved.expanded(min_width_px);

        if expanded != saved {
            tracing::debug!("Expanding section {section} for capture: {expanded:?}");
            surface.set_style(section, &expanded);
        }

        Self {
            surface,
            section,
            saved,
        }
    }
}

impl<L: LayoutSurface + ?Sized> Drop for OverrideScope<'_, L> {
    fn drop(&mut self) {
        if self.surface.style(self.section) != self.saved {
            tracing::debug!("Restoring section {}", self.section);
            self.surface.set_style(self.section, &self.saved);
        }
    }
}

/// Holds the single export slot of an assembler until dropped.
pub(crate) struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| Error::ExportInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Moves a run that is abandoned mid-stage to `Failed`. Covers the export
/// future being dropped while a capture is pending.
pub(crate) struct Settle<'a>(&'a Cell<ExportState>);

impl<'a> Settle<'a> {
    pub(crate) fn new(state: &'a Cell<ExportState>) -> Self {
        Self(state)
    }
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        let state = self.0.get();
        if state.is_running() {
            tracing::warn!("Export abandoned while {state:?}");
            self.0.set(ExportState::Failed);
        }
    }
}
