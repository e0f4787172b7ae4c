use crate::error::{AppError, Result};
use chrono::{DateTime, Local};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_ARTIFACT_PREFIX: &str = "codepack";
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "txt";
pub const DEFAULT_TREE_DEPTH: usize = 2;

/// Fixed run parameters. There is deliberately no configuration file
/// (the category table is baked in at build time); this struct only
/// carries the knobs the CLI exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub artifact_prefix: String,
    pub artifact_extension: String,
    /// Directory the artifact lands in. Relative paths are resolved
    /// against the project root; `None` means the project root itself.
    pub output_dir: Option<PathBuf>,
    pub tree_depth: usize,
    pub tree_excludes: Vec<String>,
    /// Skip the external tree command and use the flat listing directly.
    pub flat_structure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            artifact_extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            output_dir: None,
            tree_depth: DEFAULT_TREE_DEPTH,
            tree_excludes: vec![
                "__pycache__".to_string(),
                ".git".to_string(),
                "venv".to_string(),
                ".venv".to_string(),
            ],
            flat_structure: false,
        }
    }
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    /// Artifact filename for a run started at `started_at`. Second
    /// resolution; two runs inside the same second race to the same name,
    /// which is an accepted limitation.
    pub fn artifact_name(&self, started_at: DateTime<Local>) -> String {
        format!(
            "{}-{}.{}",
            self.artifact_prefix,
            started_at.format("%Y%m%d-%H%M%S"),
            self.artifact_extension
        )
    }

    pub fn artifact_path(&self, project_root: &Path, started_at: DateTime<Local>) -> PathBuf {
        let dir = match &self.output_dir {
            Some(d) if d.is_absolute() => d.clone(),
            Some(d) => project_root.join(d),
            None => project_root.to_path_buf(),
        };
        dir.join(self.artifact_name(started_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn artifact_name_embeds_second_resolution_timestamp() {
        let config = Config::default();
        let started_at = Local.with_ymd_and_hms(2026, 8, 29, 14, 3, 7).unwrap();
        assert_eq!(
            config.artifact_name(started_at),
            "codepack-20260829-140307.txt"
        );
    }

    #[test]
    fn artifact_path_resolves_relative_output_dir_against_root() {
        let config = Config {
            output_dir: Some(PathBuf::from("out")),
            ..Config::default()
        };
        let started_at = Local.with_ymd_and_hms(2026, 8, 29, 14, 3, 7).unwrap();
        let path = config.artifact_path(Path::new("/project"), started_at);
        assert_eq!(
            path,
            PathBuf::from("/project/out/codepack-20260829-140307.txt")
        );
    }
}
