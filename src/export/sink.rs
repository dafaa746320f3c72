use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::Result;

/// Receives the finished report. Only called once serialization succeeded.
pub trait ReportSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<()>;
}

/// Saves reports into a directory. Content is written to a `.part` file and
/// renamed into place, so a failed save never leaves a truncated report.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ReportSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        let target = self.directory.join(filename);
        let partial = self.directory.join(format!("{filename}.part"));

        let written = fs::File::create(&partial).and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        });
        if let Err(error) = written.and_then(|_| fs::rename(&partial, &target)) {
            let _ = fs::remove_file(&partial);
            return Err(error.into());
        }

        tracing::info!("Saved report {} ({} bytes)", target.display(), bytes.len());
        Ok(())
    }
}
