use anyhow::Context;
use std::path::{Path, PathBuf};

/// A text file loaded for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    pub fn new(path: PathBuf, text: String) -> Self {
        Document { path, text }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines split on `\n` only; a `\r` before it stays part of the line
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read `file_path`, resolved against the workspace root when relative
    pub fn read_document(&self, file_path: &Path) -> anyhow::Result<Document> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            anyhow::bail!("The specified path is a directory: {:?}", file_path);
        }

        let text = std::fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Document::new(file_path.to_path_buf(), text))
    }
}
