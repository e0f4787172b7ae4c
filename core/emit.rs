use crate::block;
use crate::category::{self, Category};
use crate::classify;
use crate::collect;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::report::ProgressReporter;
use crate::tree::{FlatListing, TreeRenderer};
use chrono::Local;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const STRUCTURE_LABEL: &str = "### PROJECT STRUCTURE";

#[derive(Debug, Deserialize)]
struct PreambleText {
    goal: String,
    instructions: String,
}

static PREAMBLE_TEXT: Lazy<PreambleText> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/preamble.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/preamble.yaml")
});

/// Linear section sequence of one run. Every transition except artifact
/// writes is infallible; the machine always reaches `Complete` unless the
/// destination itself cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Empty,
    PreambleWritten,
    StructureWritten,
    Category(usize),
    Complete,
}

/// Owns the destination artifact for the lifetime of one run: created
/// fresh, append-only, closed on every exit path. Each run gets its own
/// timestamped file, so reruns never disturb prior outputs.
pub struct OutputSession {
    path: PathBuf,
    file: File,
}

impl OutputSession {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AppError::ArtifactWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let file = File::create(path).map_err(|e| AppError::ArtifactWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Run artifact created: {}", path.display());
        Ok(OutputSession {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes).map_err(|e| AppError::ArtifactWrite {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn finish(mut self) -> Result<PathBuf> {
        self.file.flush().map_err(|e| AppError::ArtifactWrite {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(self.path)
    }
}

/// Final run statistics, read back from the closed artifact.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub artifact_path: PathBuf,
    pub files_emitted: usize,
    pub skipped: usize,
    pub categories: Vec<(String, usize)>,
    pub artifact_bytes: u64,
    pub artifact_lines: usize,
}

/// Sequences the document sections into an [`OutputSession`]:
/// preamble, structure snapshot, then one pass per category.
pub struct Emitter<'a> {
    session: OutputSession,
    state: SessionState,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> Emitter<'a> {
    pub fn new(session: OutputSession, reporter: &'a dyn ProgressReporter) -> Self {
        Emitter {
            session,
            state: SessionState::Empty,
            reporter,
        }
    }

    fn advance(&mut self, next: SessionState) {
        log::trace!("Session state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// `Empty -> PreambleWritten`. Static content; only an artifact write
    /// failure can stop it.
    pub fn write_preamble(&mut self) -> Result<()> {
        debug_assert_eq!(self.state, SessionState::Empty);
        let preamble = &*PREAMBLE_TEXT;
        self.session.append(preamble.goal.as_bytes())?;
        self.session.append(b"\n")?;
        self.session.append(preamble.instructions.as_bytes())?;
        self.session.append(b"\n")?;
        self.advance(SessionState::PreambleWritten);
        Ok(())
    }

    /// `PreambleWritten -> StructureWritten`. Collaborator absence is
    /// recovered by the flat-listing fallback; this transition never
    /// fails the run.
    pub fn write_structure(
        &mut self,
        renderer: &dyn TreeRenderer,
        project_root: &Path,
        config: &Config,
    ) -> Result<()> {
        debug_assert_eq!(self.state, SessionState::PreambleWritten);
        let rendered = match renderer.render(project_root, config.tree_depth, &config.tree_excludes)
        {
            Ok(text) => text,
            Err(_) => {
                log::warn!("Tree renderer unavailable, using flat listing fallback.");
                self.reporter
                    .warn("directory tree renderer unavailable, falling back to a flat listing");
                FlatListing
                    .render(project_root, config.tree_depth, &config.tree_excludes)
                    .unwrap_or_default()
            }
        };
        self.session.append(STRUCTURE_LABEL.as_bytes())?;
        self.session.append(b"\n")?;
        self.session.append(rendered.as_bytes())?;
        if !rendered.ends_with('\n') {
            self.session.append(b"\n")?;
        }
        self.session.append(b"\n")?;
        self.advance(SessionState::StructureWritten);
        Ok(())
    }

    /// One category pass: classify, filter, format, append. An empty
    /// category still advances the state. Returns (emitted, skipped).
    pub fn write_category(
        &mut self,
        project_root: &Path,
        index: usize,
        category: &Category,
    ) -> Result<(usize, usize)> {
        debug_assert!(matches!(
            self.state,
            SessionState::StructureWritten | SessionState::Category(_)
        ));
        log::debug!("Collecting category \"{}\"...", category.name);
        let candidates = match classify::enumerate(project_root, category) {
            Ok(paths) => paths,
            Err(e) => {
                // Classifier failure (a malformed embedded pattern) is
                // reported and treated as an empty category, never fatal.
                self.reporter
                    .warn(&format!("category \"{}\" skipped: {}", category.name, e));
                Vec::new()
            }
        };
        let (blocks, skipped) = collect::collect(project_root, &candidates, self.reporter);
        for file_block in &blocks {
            self.session.append(&block::format_block(file_block))?;
        }
        self.reporter.info(&format!(
            "[{}] {} file(s)",
            category.name,
            blocks.len()
        ));
        self.advance(SessionState::Category(index));
        Ok((blocks.len(), skipped))
    }

    /// Terminal transition: close the artifact and read the statistics
    /// back from it. Stats reads are best-effort.
    pub fn complete(
        mut self,
        files_emitted: usize,
        skipped: usize,
        categories: Vec<(String, usize)>,
    ) -> Result<RunSummary> {
        self.advance(SessionState::Complete);
        let artifact_path = self.session.finish()?;
        let artifact_bytes = fs::metadata(&artifact_path).map(|m| m.len()).unwrap_or_else(|e| {
            log::warn!("Could not stat artifact for summary: {}", e);
            0
        });
        let artifact_lines = fs::read(&artifact_path)
            .map(|bytes| bytes.iter().filter(|&&b| b == b'\n').count())
            .unwrap_or_else(|e| {
                log::warn!("Could not read artifact back for summary: {}", e);
                0
            });
        Ok(RunSummary {
            artifact_path,
            files_emitted,
            skipped,
            categories,
            artifact_bytes,
            artifact_lines,
        })
    }
}

/// Run the full pipeline over the built-in category table.
pub fn run(
    project_root: &Path,
    config: &Config,
    renderer: &dyn TreeRenderer,
    reporter: &dyn ProgressReporter,
) -> Result<RunSummary> {
    run_with_categories(project_root, config, category::categories(), renderer, reporter)
}

/// Same pipeline over an explicit category list. The artifact name embeds
/// the run's start time at second resolution.
pub fn run_with_categories(
    project_root: &Path,
    config: &Config,
    categories: &[Category],
    renderer: &dyn TreeRenderer,
    reporter: &dyn ProgressReporter,
) -> Result<RunSummary> {
    let started_at = Local::now();
    let artifact_path = config.artifact_path(project_root, started_at);
    log::info!(
        "Assembling context for {} into {}",
        project_root.display(),
        artifact_path.display()
    );

    let session = OutputSession::create(&artifact_path)?;
    let mut emitter = Emitter::new(session, reporter);
    emitter.write_preamble()?;
    emitter.write_structure(renderer, project_root, config)?;

    let mut files_emitted = 0;
    let mut skipped = 0;
    let mut per_category = Vec::with_capacity(categories.len());
    for (index, category) in categories.iter().enumerate() {
        let (emitted, misses) = emitter.write_category(project_root, index, category)?;
        files_emitted += emitted;
        skipped += misses;
        per_category.push((category.name.clone(), emitted));
    }

    let summary = emitter.complete(files_emitted, skipped, per_category)?;
    log::info!(
        "Run complete: {} file(s), {} bytes.",
        summary.files_emitted,
        summary.artifact_bytes
    );
    reporter.summary(&summary);
    Ok(summary)
}
