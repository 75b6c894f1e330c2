use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::metrics::PressureMetrics;
use crate::data::model::PressureDataset;

// ---------------------------------------------------------------------------
// Overwrite policy / errors
// ---------------------------------------------------------------------------

/// What a save does when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverwritePolicy {
    /// Replace the existing file.
    #[default]
    Allow,
    /// Refuse and report [`ExportError::AlreadyExists`].
    Deny,
    /// Write `stem_1.ext`, `stem_2.ext`, … whichever is free first.
    Version,
}

impl OverwritePolicy {
    pub const ALL: [OverwritePolicy; 3] = [
        OverwritePolicy::Allow,
        OverwritePolicy::Deny,
        OverwritePolicy::Version,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OverwritePolicy::Allow => "Overwrite",
            OverwritePolicy::Deny => "Never overwrite",
            OverwritePolicy::Version => "Numbered copy",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: expected columns Metric,Value", .0.display())]
    UnexpectedHeader(PathBuf),
}

/// Upper bound on numbered copies tried by [`OverwritePolicy::Version`].
const MAX_VERSIONS: u32 = 10_000;

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write the whole dataset: header row, all columns in source order, no index.
/// Returns the path actually written.
pub fn save_dataset(
    dataset: &PressureDataset,
    path: &Path,
    policy: OverwritePolicy,
) -> Result<PathBuf, ExportError> {
    let (target, file) = open_target(path, policy)?;
    let csv_err = |source| ExportError::Csv {
        path: target.clone(),
        source,
    };

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(dataset.column_names())
        .map_err(csv_err)?;
    for row in 0..dataset.len() {
        writer
            .write_record(dataset.columns.iter().map(|c| c.values[row].to_string()))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: target.clone(),
        source,
    })?;

    log::info!("Saved {} rows to {}", dataset.len(), target.display());
    Ok(target)
}

/// Write the six metrics as a `Metric,Value` table. Returns the path actually written.
pub fn save_metrics(
    metrics: &PressureMetrics,
    path: &Path,
    policy: OverwritePolicy,
) -> Result<PathBuf, ExportError> {
    let (target, file) = open_target(path, policy)?;
    let csv_err = |source| ExportError::Csv {
        path: target.clone(),
        source,
    };

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["Metric", "Value"]).map_err(csv_err)?;
    for (name, value) in metrics.named_values() {
        writer.write_record([name, value.as_str()]).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: target.clone(),
        source,
    })?;

    log::info!("Saved analysis results to {}", target.display());
    Ok(target)
}

/// Read a `Metric,Value` table written by [`save_metrics`].
pub fn read_metrics(path: &Path) -> Result<Vec<(String, String)>, ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?;
    if headers.iter().collect::<Vec<_>>() != ["Metric", "Value"] {
        return Err(ExportError::UnexpectedHeader(path.to_path_buf()));
    }

    reader
        .records()
        .map(|record| -> Result<(String, String), ExportError> {
            let record = record.map_err(csv_err)?;
            Ok((
                record.get(0).unwrap_or_default().to_string(),
                record.get(1).unwrap_or_default().to_string(),
            ))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Target resolution
// ---------------------------------------------------------------------------

fn open_target(path: &Path, policy: OverwritePolicy) -> Result<(PathBuf, File), ExportError> {
    let io_err = |path: &Path, source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    match policy {
        OverwritePolicy::Allow => {
            let file = File::create(path).map_err(|e| io_err(path, e))?;
            Ok((path.to_path_buf(), file))
        }
        OverwritePolicy::Deny => match create_new(path) {
            Ok(file) => Ok((path.to_path_buf(), file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(ExportError::AlreadyExists(path.to_path_buf()))
            }
            Err(e) => Err(io_err(path, e)),
        },
        OverwritePolicy::Version => {
            for n in 0..=MAX_VERSIONS {
                let candidate = if n == 0 {
                    path.to_path_buf()
                } else {
                    versioned_path(path, n)
                };
                match create_new(&candidate) {
                    Ok(file) => return Ok((candidate, file)),
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                    Err(e) => return Err(io_err(&candidate, e)),
                }
            }
            Err(ExportError::AlreadyExists(versioned_path(path, MAX_VERSIONS)))
        }
    }
}

fn create_new(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// `dir/name.csv` → `dir/name_<n>.csv`
fn versioned_path(path: &Path, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{n}"),
    };
    path.with_file_name(name)
}
