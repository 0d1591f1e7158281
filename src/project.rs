//! Project-folder ingestion for the coding-assistant mode.
//!
//! Reads every UTF-8 file under a project root, honoring `.gitignore`-style
//! exclude patterns, and folds the contents into an opening prompt so the
//! model starts the conversation with the project in context.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{Error, Result};

/// A snapshot of a project folder's text files.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    root: PathBuf,
    files: Vec<(String, String)>,
}

impl ProjectContext {
    /// Walks `root` and collects relative path / content pairs.
    ///
    /// Patterns from `<root>/.gitignore` (one per line, `#` comments and
    /// blank lines skipped) exclude matching paths; `.git` is always
    /// excluded. Files that are not valid UTF-8 are silently skipped.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::configuration(format!(
                "project folder does not exist: {}",
                root.display()
            )));
        }

        let patterns = load_ignore_patterns(&root);
        let mut files = Vec::new();
        visit(&root, &root, &patterns, &mut files)?;
        files.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Self { root, files })
    }

    /// The ingested files, sorted by relative path.
    pub fn files(&self) -> &[(String, String)] {
        &self.files
    }

    /// The project root this context was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Builds the opening prompt carrying the project contents.
    pub fn initial_prompt(&self) -> String {
        let file_contents = self
            .files
            .iter()
            .map(|(path, content)| format!("# {path}\n{content}"))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "You are a coding assistant. You will be provided with the content of the \
             project located at: {root}. You can use the project files and your coding \
             knowledge to assist with coding tasks. You cannot interact with the files \
             directly; suggest changes by sending code snippets.\n\n\
             <project-files>\n{file_contents}\n</project-files>\n\n\
             Please confirm that you can see the content of the files, and whether you \
             are familiar with the languages used in the project.",
            root = self.root.display(),
        )
    }
}

fn load_ignore_patterns(root: &Path) -> Vec<Pattern> {
    let gitignore = root.join(".gitignore");
    let Ok(contents) = fs::read_to_string(&gitignore) else {
        return Vec::new();
    };
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| Pattern::new(line.trim_end_matches('/')).ok())
        .collect()
}

fn is_ignored(relative: &str, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|pattern| pattern.matches(relative))
}

fn visit(
    root: &Path,
    dir: &Path,
    patterns: &[Pattern],
    files: &mut Vec<(String, String)>,
) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|err| Error::io("failed to read project directory", err))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();

        if path.is_dir() {
            if path.file_name().is_some_and(|name| name == ".git")
                || is_ignored(&relative, patterns)
            {
                continue;
            }
            visit(root, &path, patterns, files)?;
        } else {
            if is_ignored(&relative, patterns) {
                continue;
            }
            // Binary files fail UTF-8 decoding and are skipped.
            if let Ok(content) = fs::read_to_string(&path) {
                files.push((relative, content));
            }
        }
    }
    Ok(())
}
