use crate::block::FileBlock;
use crate::report::ProgressReporter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of probing one candidate path. Absence is an ordinary,
/// expected result, never an error.
#[derive(Debug)]
pub enum Candidate {
    Present(FileBlock),
    Absent { path: PathBuf, reason: SkipReason },
}

#[derive(Debug, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    NotAFile,
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "not present"),
            SkipReason::NotAFile => write!(f, "not a regular file"),
            SkipReason::Unreadable(err) => write!(f, "unreadable: {}", err),
        }
    }
}

/// Check a single candidate and read its content if it is a regular,
/// readable file. The read happens exactly once; there are no retries.
pub fn probe(project_root: &Path, relative: &Path) -> Candidate {
    let absolute = project_root.join(relative);
    let metadata = match fs::metadata(&absolute) {
        Ok(metadata) => metadata,
        Err(_) => {
            return Candidate::Absent {
                path: relative.to_path_buf(),
                reason: SkipReason::Missing,
            };
        }
    };
    if !metadata.is_file() {
        return Candidate::Absent {
            path: relative.to_path_buf(),
            reason: SkipReason::NotAFile,
        };
    }
    match fs::read(&absolute) {
        Ok(content) => Candidate::Present(FileBlock {
            path: relative.to_string_lossy().into_owned(),
            content,
        }),
        Err(e) => Candidate::Absent {
            path: relative.to_path_buf(),
            reason: SkipReason::Unreadable(e.to_string()),
        },
    }
}

/// Filter candidates down to the files present on disk, reporting each
/// skip once through the side channel. Returns the blocks in candidate
/// order and the number of candidates dropped.
pub fn collect(
    project_root: &Path,
    candidates: &[PathBuf],
    reporter: &dyn ProgressReporter,
) -> (Vec<FileBlock>, usize) {
    let mut blocks = Vec::new();
    let mut skipped = 0;
    for path in candidates {
        match probe(project_root, path) {
            Candidate::Present(block) => {
                log::trace!("Collected {}", block);
                blocks.push(block);
            }
            Candidate::Absent { path, reason } => {
                skipped += 1;
                match reason {
                    SkipReason::Missing => {
                        reporter.info(&format!("  skipping {} ({})", path.display(), reason));
                    }
                    _ => {
                        reporter.warn(&format!("skipping {} ({})", path.display(), reason));
                    }
                }
            }
        }
    }
    (blocks, skipped)
}
