use std::convert::Infallible;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::info;
use thiserror::Error;

/// A finished export handed to a sink.
/// 交給輸出端的完成檔案。
#[derive(Debug, Clone, Copy)]
pub struct Artifact<'a> {
    pub file_name: &'a str,
    pub media_type: &'a str,
    pub data: &'a [u8],
}

/// Destination for finished exports. Only called once rendering succeeded.
/// 匯出結果的目的地，僅在渲染成功後呼叫。
pub trait ArtifactSink {
    type Error;

    fn deliver(&self, artifact: &Artifact<'_>) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid file name '{0}'")]
    InvalidName(String),
}

/// Writes artifacts into a directory. Each file is written to a temporary
/// sibling first and renamed into place, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl ArtifactSink for FileSink {
    type Error = SinkError;

    fn deliver(&self, artifact: &Artifact<'_>) -> Result<(), Self::Error> {
        let name = artifact.file_name;
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(SinkError::InvalidName(name.to_string()));
        }

        fs::create_dir_all(&self.dir).map_err(|source| SinkError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(name);
        let tmp_path = self.dir.join(format!(".{name}.tmp"));
        let write = |target: &Path| -> io::Result<()> {
            let mut file = fs::File::create(target)?;
            file.write_all(artifact.data)?;
            file.sync_all()
        };
        if let Err(source) = write(&tmp_path).and_then(|()| fs::rename(&tmp_path, &path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(SinkError::Write { path, source });
        }

        info!(
            "wrote {} ({} bytes, {})",
            path.display(),
            artifact.data.len(),
            artifact.media_type
        );
        Ok(())
    }
}

/// Accepts everything and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl ArtifactSink for DiscardSink {
    type Error = Infallible;

    fn deliver(&self, _artifact: &Artifact<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Owned copy of a delivered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredArtifact {
    pub file_name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Keeps delivered artifacts in memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Arc<Mutex<Vec<DeliveredArtifact>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<DeliveredArtifact> {
        match self.delivered.lock() {
            Ok(mut delivered) => delivered.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

impl ArtifactSink for MemorySink {
    type Error = Infallible;

    fn deliver(&self, artifact: &Artifact<'_>) -> Result<(), Self::Error> {
        let copy = DeliveredArtifact {
            file_name: artifact.file_name.to_string(),
            media_type: artifact.media_type.to_string(),
            data: artifact.data.to_vec(),
        };
        match self.delivered.lock() {
            Ok(mut delivered) => delivered.push(copy),
            Err(poisoned) => poisoned.into_inner().push(copy),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_sink_writes_without_leftovers() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out"));
        let artifact = Artifact {
            file_name: "moon_pie_recipe.pdf",
            media_type: "application/pdf",
            data: b"%PDF-1.4",
        };
        sink.deliver(&artifact).unwrap();

        let written = fs::read(sink.path_for("moon_pie_recipe.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.4");
        let names: Vec<_> = fs::read_dir(sink.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn file_sink_rejects_path_like_names() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path());
        let artifact = Artifact {
            file_name: "../escape.pdf",
            media_type: "application/pdf",
            data: b"",
        };
        assert!(matches!(
            sink.deliver(&artifact),
            Err(SinkError::InvalidName(_))
        ));
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        let shared = sink.clone();
        for name in ["a.pdf", "b.png"] {
            sink.deliver(&Artifact {
                file_name: name,
                media_type: "application/octet-stream",
                data: b"x",
            })
            .unwrap();
        }
        let names: Vec<_> = shared.drain().into_iter().map(|a| a.file_name).collect();
        assert_eq!(names, vec!["a.pdf", "b.png"]);
    }
}
