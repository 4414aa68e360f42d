//! Persisting report artifacts under per-run unique file names.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::error::ReportError;

use super::render::Reporter;
use super::AggregateReport;

const FILE_PREFIX: &str = "classification_results";

/// A file written for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Reporter that produced it ("json", "csv")
    pub format: &'static str,
    pub path: PathBuf,
}

/// Writes every registered representation of a report into one directory.
pub struct ArtifactWriter {
    dir: PathBuf,
    reporters: Vec<Box<dyn Reporter>>,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>, reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self {
            dir: dir.into(),
            reporters,
        }
    }

    /// Render and write all artifacts.
    ///
    /// Everything is rendered in memory first, so a serialization failure
    /// leaves the output directory untouched. All files of a run are
    /// reserved with create-new semantics before any byte is written; if
    /// another writer already holds one of them the reservation is released
    /// and the next `_N` stem is tried. A write failure part way through
    /// leaves what was written in place.
    pub fn write(&self, report: &AggregateReport) -> Result<Vec<Artifact>, ReportError> {
        let rendered = self
            .reporters
            .iter()
            .map(|r| r.render(report).map(|bytes| (&**r, bytes)))
            .collect::<Result<Vec<_>, ReportError>>()?;

        std::fs::create_dir_all(&self.dir).map_err(|source| ReportError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let reserved = self.reserve(&report.run_id)?;
        let mut artifacts = Vec::with_capacity(rendered.len());

        for ((reporter, bytes), (path, file)) in rendered.into_iter().zip(reserved) {
            write_into(file, &bytes).map_err(|source| ReportError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!("Wrote {} report to {:?}", reporter.name(), path);
            artifacts.push(Artifact {
                format: reporter.name(),
                path,
            });
        }

        Ok(artifacts)
    }

    /// Create one empty file per reporter under the first free
    /// `classification_results_<run_id>[_N]` stem.
    fn reserve(&self, run_id: &str) -> Result<Vec<(PathBuf, File)>, ReportError> {
        let base = format!("{FILE_PREFIX}_{run_id}");
        let mut n = 0u32;

        loop {
            let stem = if n == 0 {
                base.clone()
            } else {
                format!("{base}_{n}")
            };
            n += 1;

            let paths: Vec<PathBuf> = self
                .reporters
                .iter()
                .map(|r| self.dir.join(format!("{stem}.{}", r.extension())))
                .collect();
            if paths.iter().any(|p| p.exists()) {
                continue;
            }

            match reserve_all(paths) {
                Ok(files) => return Ok(files),
                Err((path, e)) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!("{:?} claimed concurrently, trying next name", path);
                }
                Err((path, source)) => return Err(ReportError::Write { path, source }),
            }
        }
    }
}

/// Create every path with create-new semantics, all or nothing.
fn reserve_all(
    paths: Vec<PathBuf>,
) -> Result<Vec<(PathBuf, File)>, (PathBuf, std::io::Error)> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => files.push((path, file)),
            Err(e) => {
                release(files);
                return Err((path, e));
            }
        }
    }
    Ok(files)
}

/// Remove files reserved by an abandoned attempt; they are still empty.
fn release(files: Vec<(PathBuf, File)>) {
    for (path, file) in files {
        drop(file);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!("Cannot remove reserved file {:?}: {}", path, e);
        }
    }
}

fn write_into(mut file: File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes)?;
    file.sync_all()
}
