pub mod csv;
pub mod project;

use anyhow::Result;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::detect::Marker;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// start_time,end_time,label rows (LosslessCut "CSV segments" import)
    Csv,
    /// LosslessCut project file
    Llc,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Llc => "llc",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "llc" | "json" => Some(ExportFormat::Llc),
            _ => None,
        }
    }
}

/// `<input stem>_markers.<ext>` in the current directory.
pub fn default_output_path(input: &Path, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from(format!("{}_markers.{}", stem, format.extension()))
}

pub fn export(markers: &[Marker], format: ExportFormat, media: &Path, output: &Path) -> Result<()> {
    let written = match format {
        ExportFormat::Csv => csv::export_csv(markers, output),
        ExportFormat::Llc => project::export_project(markers, media, output),
    };
    written?;
    log::info!("Wrote {} markers to {}", markers.len(), output.display());
    Ok(())
}
