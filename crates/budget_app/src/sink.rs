use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use budget_docs::FileSink;
use std::path::PathBuf;
use tracing::debug;

/// Saves exported documents into a fixed directory, the way a browser drops
/// downloads into the user's download folder.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        validate_file_name(file_name)?;

        let path = self.dir.join(file_name);
        debug!("Writing {} bytes to {}", bytes.len(), path.display());
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(path)
    }
}

/// The name is written verbatim, so it must stay inside the export directory.
fn validate_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        bail!("Invalid file name: {name:?}");
    }
    if name.contains(['/', '\\']) || name.chars().any(char::is_control) {
        bail!("File name must not contain path separators: {name:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_into_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());

        let path = sink.save("Obra_es.md", b"# hola\n").await.unwrap();
        assert_eq!(path, tmp.path().join("Obra_es.md"));
        assert_eq!(std::fs::read(&path).unwrap(), b"# hola\n");
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("gone"));
        let err = sink.save("x_es.md", b"x").await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to write file"));
    }

    #[tokio::test]
    async fn rejects_names_that_leave_the_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        assert!(sink.save("..", b"x").await.is_err());
        assert!(sink.save("../x_es.md", b"x").await.is_err());
        assert!(sink.save("a\\b_es.md", b"x").await.is_err());
        assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
    }
}
