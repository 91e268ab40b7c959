//! Source discovery: find ingestible images under an input root.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;

/// Information about a discovered source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Discovers source images under an input root.
///
/// The pipeline's own output directories and the manifest file are hard
/// exclusions: with a broad input root (e.g. the whole uploads tree) the
/// previously generated artifacts would otherwise be re-ingested on every
/// run.
pub struct SourceDiscovery {
    config: ProcessingConfig,
    excluded_dirs: Vec<PathBuf>,
    manifest_path: PathBuf,
}

impl SourceDiscovery {
    /// Create a new discovery instance.
    ///
    /// `excluded_dirs` are the output directories whose contents must never
    /// be treated as sources; `manifest_path` is excluded as a single file.
    pub fn new(
        config: ProcessingConfig,
        excluded_dirs: Vec<PathBuf>,
        manifest_path: PathBuf,
    ) -> Self {
        Self {
            config,
            excluded_dirs,
            manifest_path,
        }
    }

    /// Recursively list all supported source files under `root`.
    ///
    /// A missing root is created empty rather than treated as an error, so
    /// a first run against a fresh project succeeds with zero sources.
    /// Results are sorted by path for deterministic ordering.
    pub fn discover(&self, root: &Path) -> std::io::Result<Vec<SourceFile>> {
        std::fs::create_dir_all(root)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if self.is_excluded(path) || !self.is_supported(path) {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                files.push(SourceFile {
                    path: path.to_path_buf(),
                    size: meta.len(),
                });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Filter discovered files against an explicit allowlist.
    ///
    /// Entries match either the path relative to the input root (POSIX
    /// separators) or the bare filename. Returns the retained files plus
    /// the allowlist entries that matched nothing; unmatched entries are a
    /// warning for the caller, never an abort.
    pub fn apply_allowlist(
        root: &Path,
        files: Vec<SourceFile>,
        allowlist: &[String],
    ) -> (Vec<SourceFile>, Vec<String>) {
        let mut present: Vec<String> = Vec::new();
        let kept: Vec<SourceFile> = files
            .into_iter()
            .filter(|f| {
                let rel = f
                    .path
                    .strip_prefix(root)
                    .map(to_posix)
                    .unwrap_or_else(|_| to_posix(&f.path));
                let base = f
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let matched = allowlist.contains(&rel) || allowlist.contains(&base);
                if matched {
                    present.push(rel);
                    present.push(base);
                }
                matched
            })
            .collect();

        let unmatched: Vec<String> = allowlist
            .iter()
            .filter(|name| !present.contains(name))
            .cloned()
            .collect();

        (kept, unmatched)
    }

    /// Check whether a path falls under an excluded output directory or is
    /// the manifest file itself.
    fn is_excluded(&self, path: &Path) -> bool {
        if path == self.manifest_path {
            return true;
        }
        self.excluded_dirs.iter().any(|dir| path.starts_with(dir))
    }

    /// Check if a file has a supported extension (case-insensitive).
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}

/// Render a path with forward slashes, as stored in the manifest.
pub fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;

    fn discovery_at(root: &Path) -> SourceDiscovery {
        SourceDiscovery::new(
            ProcessingConfig::default(),
            vec![root.join("gallery/full"), root.join("gallery/thumb")],
            root.join("gallery/manifest.json"),
        )
    }

    #[test]
    fn test_is_supported() {
        let discovery = discovery_at(Path::new("."));

        assert!(discovery.is_supported(Path::new("test.jpg")));
        assert!(discovery.is_supported(Path::new("test.JPG")));
        assert!(discovery.is_supported(Path::new("test.jpeg")));
        assert!(discovery.is_supported(Path::new("test.png")));
        assert!(discovery.is_supported(Path::new("test.webp")));
        assert!(discovery.is_supported(Path::new("test.TIFF")));
        assert!(!discovery.is_supported(Path::new("test.txt")));
        assert!(!discovery.is_supported(Path::new("test.heic")));
        // No AVIF decoder in the default build, so not a default format
        assert!(!discovery.is_supported(Path::new("test.avif")));
        assert!(!discovery.is_supported(Path::new("noext")));
    }

    #[test]
    fn test_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("incoming");
        let discovery = discovery_at(dir.path());

        let files = discovery.discover(&root).unwrap();
        assert!(files.is_empty());
        assert!(root.is_dir());
    }

    #[test]
    fn test_excludes_outputs_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("incoming")).unwrap();
        std::fs::create_dir_all(root.join("gallery/full")).unwrap();
        std::fs::create_dir_all(root.join("gallery/thumb")).unwrap();
        std::fs::write(root.join("incoming/a.png"), b"x").unwrap();
        std::fs::write(root.join("gallery/full/a-full.webp"), b"x").unwrap();
        std::fs::write(root.join("gallery/thumb/a-thumb.webp"), b"x").unwrap();
        std::fs::write(root.join("gallery/manifest.json"), b"{}").unwrap();

        let discovery = discovery_at(root);
        // Broad root covering the outputs, like --input pointed at uploads/
        let files = discovery.discover(root).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("incoming/a.png"));
    }

    #[test]
    fn test_sorted_output() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("b.png"), b"x").unwrap();
        std::fs::write(root.join("a.png"), b"x").unwrap();
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("sub/c.png"), b"x").unwrap();

        let discovery = discovery_at(Path::new("/nonexistent-exclusions"));
        let files = discovery.discover(root).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| to_posix(f.path.strip_prefix(root).unwrap()))
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "sub/c.png"]);
    }

    #[test]
    fn test_allowlist_matches_relative_and_bare() {
        let root = Path::new("/in");
        let files = vec![
            SourceFile {
                path: PathBuf::from("/in/sub/a.png"),
                size: 1,
            },
            SourceFile {
                path: PathBuf::from("/in/b.jpg"),
                size: 1,
            },
        ];

        let allow = vec!["sub/a.png".to_string(), "b.jpg".to_string()];
        let (kept, unmatched) = SourceDiscovery::apply_allowlist(root, files, &allow);
        assert_eq!(kept.len(), 2);
        assert!(unmatched.is_empty());
    }

    #[test]
    fn test_allowlist_reports_unmatched() {
        let root = Path::new("/in");
        let files = vec![SourceFile {
            path: PathBuf::from("/in/a.png"),
            size: 1,
        }];

        let allow = vec!["a.png".to_string(), "ghost.jpg".to_string()];
        let (kept, unmatched) = SourceDiscovery::apply_allowlist(root, files, &allow);
        assert_eq!(kept.len(), 1);
        assert_eq!(unmatched, vec!["ghost.jpg".to_string()]);
    }

    #[test]
    fn test_to_posix() {
        assert_eq!(to_posix(Path::new("a/b/c.png")), "a/b/c.png");
    }
}
