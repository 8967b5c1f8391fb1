//! JSON reports for headless scenario runs

use crate::site::SiteSnapshot;
use aethel_animation::MotionValue;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Result of one scenario run, including the final site state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    /// Hover category when the run ended
    #[serde(default)]
    pub category: Option<String>,
    /// Every named output when the run ended
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, MotionValue>,
}

impl HeadlessReport {
    pub fn passed(elapsed_frames: u64, elapsed_ms: u64) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            code: None,
            message: None,
            elapsed_frames,
            elapsed_ms,
            category: None,
            outputs: BTreeMap::new(),
        }
    }

    /// A run stopped by the assertion at `step`
    pub fn failed(
        assertion: &str,
        step: usize,
        code: String,
        message: String,
        elapsed_frames: u64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(step),
            assertion: Some(assertion.into()),
            code: Some(code),
            message: Some(message),
            ..Self::passed(elapsed_frames, elapsed_ms)
        }
    }

    /// Attach the final state of the site
    pub fn with_snapshot(self, snapshot: SiteSnapshot) -> Self {
        Self {
            category: Some(snapshot.category),
            outputs: snapshot.outputs,
            ..self
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self.status, ReportStatus::Passed)
    }

    /// Write pretty JSON under the working directory
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        ensure_contained(path)?;
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
            _ => {}
        }
        let mut file = std::fs::File::create(path)?;
        self.write_to_writer(&mut file)
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Reports only land below the current directory
fn ensure_contained(path: &Path) -> Result<()> {
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            other => bail!(
                "report path {} escapes the working directory ({other:?})",
                path.display()
            ),
        }
    }
    Ok(())
}
