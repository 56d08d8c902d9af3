//! Candidate file enumeration
//!
//! Walks the working copy, pruning excluded directories, keeping only
//! scannable file types under the size cap, and stopping once the per-scan
//! file limit is reached.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory-name components that are never scanned.
const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "venv",
    ".venv",
    "env",
    ".env",
    "__pycache__",
    ".git",
    ".svn",
    ".hg",
    "vendor",
    "bower_components",
    "dist",
    "build",
    "target",
    ".idea",
    ".vscode",
    "coverage",
    ".nyc_output",
];

/// Extensions of source, markup, and config files worth scanning.
const SCANNABLE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", // JavaScript/TypeScript
    "py",    // Python
    "java",  // Java
    "go",    // Go
    "rb",    // Ruby
    "php",   // PHP
    "cs",    // C#
    "c", "cpp", "h", "hpp", // C/C++
    "swift", // Swift
    "kt", "kts", // Kotlin
    "rs",    // Rust
    "sql",   // SQL
    "html", "htm", // HTML
    "xml",   // XML
    "json", "yaml", "yml", "toml", // Config files
];

/// A file selected for scanning.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Absolute path on disk.
    pub absolute: PathBuf,
    /// Path relative to the scan root, used in reports.
    pub relative: String,
}

/// Enumerates candidate files under a working copy root.
pub struct FileWalker {
    max_file_size: u64,
    max_files: usize,
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(max_file_size: u64, max_files: usize) -> Self {
        Self {
            max_file_size,
            max_files,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Restrict the walk with request-supplied glob patterns. Invalid
    /// patterns are dropped with a warning.
    pub fn with_patterns(mut self, include: &[String], exclude: &[String]) -> Self {
        self.include = compile_patterns(include);
        self.exclude = compile_patterns(exclude);
        self
    }

    /// Walk the tree and collect candidate files.
    pub fn enumerate(&self, root: &Path) -> Vec<CandidateFile> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| EXCLUDED_DIRS.contains(&name))
                    .unwrap_or(false))
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let extension = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase());
            let scannable = extension
                .as_deref()
                .map(|e| SCANNABLE_EXTENSIONS.contains(&e))
                .unwrap_or(false);
            if !scannable {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) if metadata.len() > self.max_file_size => continue,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping unreadable file");
                    continue;
                }
                _ => {}
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");

            if !self.matches_patterns(&relative) {
                continue;
            }

            files.push(CandidateFile {
                absolute: entry.into_path(),
                relative,
            });

            if files.len() >= self.max_files {
                warn!(limit = self.max_files, "File limit reached, stopping enumeration");
                break;
            }
        }

        debug!(file_count = files.len(), "File enumeration completed");
        files
    }

    fn matches_patterns(&self, relative: &str) -> bool {
        let path = Path::new(relative);
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches_path(path)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches_path(path))
    }
}

fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|raw| match glob::Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(pattern = raw, error = %e, "Ignoring invalid glob pattern");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn keeps_only_scannable_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "print('hi')");
        write(dir.path(), "notes.md", "# notes");
        write(dir.path(), "binary.bin", "xx");

        let files = FileWalker::new(1024, 100).enumerate(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, "app.py");
    }

    #[test]
    fn prunes_excluded_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/app.js", "ok");
        write(dir.path(), "node_modules/lib/index.js", "skip");
        write(dir.path(), ".git/hooks/pre-commit.py", "skip");

        let files = FileWalker::new(1024, 100).enumerate(dir.path());
        let relatives: Vec<_> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(relatives, vec!["src/app.js"]);
    }

    #[test]
    fn drops_files_over_the_size_cap() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "small.py", "x = 1");
        write(dir.path(), "big.py", &"x".repeat(2048));

        let files = FileWalker::new(1024, 100).enumerate(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, "small.py");
    }

    #[test]
    fn stops_at_the_file_count_cap() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..10 {
            write(dir.path(), &format!("f{}.py", i), "x = 1");
        }

        let files = FileWalker::new(1024, 3).enumerate(dir.path());
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn request_globs_filter_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/app.py", "x");
        write(dir.path(), "src/app.js", "x");
        write(dir.path(), "docs/gen.py", "x");

        let include = vec!["**/*.py".to_string()];
        let exclude = vec!["docs/**".to_string()];
        let files = FileWalker::new(1024, 100)
            .with_patterns(&include, &exclude)
            .enumerate(dir.path());

        let relatives: Vec<_> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(relatives, vec!["src/app.py"]);
    }
}
