use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::detect::Marker;

pub const PROJECT_VERSION: u32 = 1;

/// LosslessCut project document (`.llc`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project<'a> {
    pub version: u32,
    pub media_file_name: String,
    pub cut_segments: Vec<CutSegment<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CutSegment<'a> {
    pub start: f64,
    pub end: f64,
    pub name: &'a str,
}

impl<'a> Project<'a> {
    pub fn new(media: &Path, markers: &'a [Marker]) -> Self {
        let media_file_name = media
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            version: PROJECT_VERSION,
            media_file_name,
            cut_segments: markers
                .iter()
                .map(|m| CutSegment {
                    start: m.start_time,
                    end: m.end_time,
                    name: &m.label,
                })
                .collect(),
        }
    }
}

pub fn export_project(markers: &[Marker], media: &Path, path: &Path) -> Result<()> {
    let project = Project::new(media, markers);
    let json = serde_json::to_string_pretty(&project).context("Failed to serialize project")?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))
}
