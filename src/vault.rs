use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read-only view of a directory of markdown notes
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every `.md` file under the root, recursively
    ///
    /// Entries are sorted by file name within each directory so the order is
    /// the same from one run to the next. Symlinked notes are listed and read
    /// through the link; symlinked directories are not descended into.
    pub fn markdown_files(&self) -> io::Result<Vec<PathBuf>> {
        if !fs::metadata(&self.root)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("vault root is not a directory: {}", self.root.display()),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let file_type = entry.file_type();
            if (file_type.is_file() || file_type.is_symlink()) && is_markdown(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Path of `file` relative to the root, with `/` separators
    pub fn relative_path(&self, file: &Path) -> String {
        let relative = file.strip_prefix(&self.root).unwrap_or(file);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// File contents; invalid UTF-8 is replaced rather than rejected
    pub fn read(&self, file: &Path) -> io::Result<String> {
        let bytes = fs::read(file)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}
