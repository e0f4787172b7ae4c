use crate::config::Config;
use std::fs;
use std::path::Path;
use std::process::Command;

/// The external renderer could not produce a view. A recoverable
/// condition: callers fall back to the flat listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeUnavailable;

/// Capability interface for the structure snapshot. Selected once at
/// configuration time, not branched on inside the emitter.
pub trait TreeRenderer {
    fn render(
        &self,
        root: &Path,
        depth: usize,
        excludes: &[String],
    ) -> Result<String, TreeUnavailable>;
}

/// Subprocess-backed renderer invoking the external `tree` binary with a
/// depth bound and an exclusion pattern set.
pub struct TreeCommand {
    command: String,
}

impl TreeCommand {
    pub fn new() -> Self {
        TreeCommand {
            command: "tree".to_string(),
        }
    }

    /// Use a different binary name. Mostly useful to exercise the
    /// unavailable path without uninstalling `tree`.
    pub fn with_command(command: impl Into<String>) -> Self {
        TreeCommand {
            command: command.into(),
        }
    }
}

impl Default for TreeCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeRenderer for TreeCommand {
    fn render(
        &self,
        root: &Path,
        depth: usize,
        excludes: &[String],
    ) -> Result<String, TreeUnavailable> {
        let mut command = Command::new(&self.command);
        command.arg("-L").arg(depth.to_string());
        if !excludes.is_empty() {
            command.arg("-I").arg(excludes.join("|"));
        }
        command.arg(root);
        let output = command.output().map_err(|e| {
            log::debug!("Failed to invoke `{}`: {}", self.command, e);
            TreeUnavailable
        })?;
        if !output.status.success() {
            log::debug!("`{}` exited with {}", self.command, output.status);
            return Err(TreeUnavailable);
        }
        String::from_utf8(output.stdout).map_err(|e| {
            log::debug!("`{}` produced non-UTF-8 output: {}", self.command, e);
            TreeUnavailable
        })
    }
}

/// Fallback renderer: a flat, non-recursive, sorted listing of the root.
/// Never reports `TreeUnavailable`; an unreadable root renders as an
/// explanatory line instead.
pub struct FlatListing;

impl TreeRenderer for FlatListing {
    fn render(
        &self,
        root: &Path,
        _depth: usize,
        _excludes: &[String],
    ) -> Result<String, TreeUnavailable> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => return Ok(format!("(unable to list {}: {})\n", root.display(), e)),
        };
        let mut names = Vec::new();
        for entry in entries.flatten() {
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().is_ok_and(|ft| ft.is_dir()) {
                name.push('/');
            }
            names.push(name);
        }
        names.sort();
        let mut listing = String::new();
        for name in &names {
            listing.push_str(name);
            listing.push('\n');
        }
        Ok(listing)
    }
}

pub fn select_renderer(config: &Config) -> Box<dyn TreeRenderer> {
    if config.flat_structure {
        log::debug!("Structure renderer: flat listing (forced).");
        Box::new(FlatListing)
    } else {
        log::debug!("Structure renderer: external tree command.");
        Box::new(TreeCommand::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn flat_listing_is_sorted_with_dir_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("config.py"), "x").unwrap();
        fs::write(dir.path().join("bot.py"), "y").unwrap();
        let listing = FlatListing.render(dir.path(), 2, &[]).unwrap();
        assert_eq!(listing, "bot.py\nconfig.py\nsrc/\n");
    }

    #[test]
    fn missing_binary_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TreeCommand::with_command("codepack-no-such-tree-binary");
        assert_eq!(
            renderer.render(dir.path(), 2, &[]),
            Err(TreeUnavailable)
        );
    }

    #[test]
    fn flat_listing_survives_unreadable_root() {
        let listing = FlatListing
            .render(Path::new("/no/such/dir/anywhere"), 2, &[])
            .unwrap();
        assert!(listing.starts_with("(unable to list"));
    }
}
