use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::detect::Marker;

const HEADER: &str = "start_time,end_time,label";

/// Write markers as `start_time,end_time,label` rows, times in seconds with
/// two decimals.
pub fn write_csv<W: Write>(mut out: W, markers: &[Marker]) -> Result<()> {
    writeln!(out, "{}", HEADER)?;
    for marker in markers {
        writeln!(
            out,
            "{:.2},{:.2},{}",
            marker.start_time,
            marker.end_time,
            escape_field(&marker.label)
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn export_csv(markers: &[Marker], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(std::io::BufWriter::new(file), markers)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
