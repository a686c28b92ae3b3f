use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ARTIFACT_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)_(.+)$").unwrap());

const PARTIAL_SUFFIX: &str = ".partial";

/// Audio for one segment stored in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedArtifact {
    pub index: usize,
    pub path: PathBuf,
}

/// On-disk cache of synthesized segments, one file per segment index.
///
/// Entries are named `<index:03>_<output file name>` inside the scratch
/// directory, so several outputs can share one directory. A present entry
/// is taken to be complete audio: `store` writes to a temporary name and
/// renames it into place.
#[derive(Debug, Clone)]
pub struct SegmentCache {
    dir: PathBuf,
    output_name: String,
}

impl SegmentCache {
    pub fn new(dir: impl Into<PathBuf>, output: &Path) -> Self {
        let output_name = output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output.mp3".to_string());

        Self {
            dir: dir.into(),
            output_name,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the scratch directory if it does not exist yet
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{:03}_{}", index, self.output_name))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.path_for(index).is_file()
    }

    pub fn store(&self, index: usize, audio: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(index);
        let mut partial = path.clone().into_os_string();
        partial.push(PARTIAL_SUFFIX);

        fs::write(&partial, audio)?;
        fs::rename(&partial, &path)?;

        tracing::debug!(
            segment_index = index,
            audio_size = audio.len(),
            path = %path.display(),
            "Segment audio cached"
        );

        Ok(path)
    }

    /// All cached artifacts for this output, ordered by numeric index
    pub fn entries(&self) -> io::Result<Vec<CachedArtifact>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut artifacts = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            if let Some(index) = self.parse_index(file_name) {
                artifacts.push(CachedArtifact {
                    index,
                    path: entry.path(),
                });
            }
        }

        artifacts.sort_by_key(|artifact| artifact.index);
        Ok(artifacts)
    }

    pub fn remove(&self, artifact: &CachedArtifact) -> io::Result<()> {
        fs::remove_file(&artifact.path)
    }

    /// Remove the scratch directory when nothing is left in it.
    ///
    /// Returns `false` when the directory still holds files (for instance
    /// another output's artifacts) or does not exist.
    pub fn remove_if_empty(&self) -> io::Result<bool> {
        let mut read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };

        if read_dir.next().is_some() {
            return Ok(false);
        }

        fs::remove_dir(&self.dir)?;
        Ok(true)
    }

    fn parse_index(&self, file_name: &str) -> Option<usize> {
        let captures = ARTIFACT_NAME.captures(file_name)?;
        if &captures[2] != self.output_name {
            return None;
        }
        captures[1].parse().ok()
    }
}
