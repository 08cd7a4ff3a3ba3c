use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::errors::{NarratorError, NarratorResult};
use crate::models::NarrationEntry;

const SLUG_MAX_CHARS: usize = 40;
const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "opus", "pcm", "ulaw", "wav"];
const MAX_COLLISION_SUFFIX: u32 = 999;

/// Owns the narrations directory: naming, writing and listing artifacts.
#[derive(Debug, Clone)]
pub struct OutputManager {
    dir: PathBuf,
}

impl OutputManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> NarratorResult<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            NarratorError::Filesystem(format!("Failed to create {}: {}", self.dir.display(), e))
        })
    }

    /// `{YYYYMMDD-HHMMSS}_{slug}` where the slug comes from the first sentence.
    pub fn derive_basename(narrative: &str, now: DateTime<Local>) -> String {
        let first_sentence = narrative.split('.').next().unwrap_or_default();
        let mut slug = crate::utils::common::sanitize_filename(first_sentence.trim(), SLUG_MAX_CHARS);
        if slug.is_empty() {
            slug = "narration".to_string();
        }
        format!("{}_{}", now.format("%Y%m%d-%H%M%S"), slug)
    }

    /// Pick a basename whose text and audio paths are both unused.
    pub async fn reserve_basename(&self, narrative: &str, audio_ext: &str) -> NarratorResult<String> {
        self.ensure_dir().await?;

        let base = Self::derive_basename(narrative, Local::now());
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.is_taken(&candidate, audio_ext).await? {
            if suffix > MAX_COLLISION_SUFFIX {
                return Err(NarratorError::Filesystem(format!(
                    "No free name for {} in {}",
                    base,
                    self.dir.display()
                )));
            }
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        debug!("Reserved basename {}", candidate);
        Ok(candidate)
    }

    async fn is_taken(&self, basename: &str, audio_ext: &str) -> NarratorResult<bool> {
        for path in [self.text_path(basename), self.audio_path(basename, audio_ext)] {
            let exists = fs::try_exists(&path).await.map_err(|e| {
                NarratorError::Filesystem(format!("Failed to check {}: {}", path.display(), e))
            })?;
            if exists {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn text_path(&self, basename: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", basename))
    }

    pub fn audio_path(&self, basename: &str, audio_ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", basename, audio_ext))
    }

    pub async fn write_text(&self, basename: &str, text: &str) -> NarratorResult<PathBuf> {
        let path = self.text_path(basename);
        fs::write(&path, text).await.map_err(|e| {
            NarratorError::Filesystem(format!("Failed to write {}: {}", path.display(), e))
        })?;
        info!("Narrative saved to {}", path.display());
        Ok(path)
    }

    /// Audio files in the output directory, newest first.
    pub async fn list_narrations(&self) -> NarratorResult<Vec<NarrationEntry>> {
        let mut entries = Vec::new();

        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => {
                return Err(NarratorError::Filesystem(format!(
                    "Failed to read {}: {}",
                    self.dir.display(),
                    e
                )));
            }
        };

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let is_audio = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
            if !is_audio {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let modified = metadata
                .modified()
                .map(DateTime::<Local>::from)
                .unwrap_or_else(|_| Local::now());

            let basename = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text_path = self.text_path(&basename);
            let text_path = fs::try_exists(&text_path)
                .await
                .unwrap_or(false)
                .then_some(text_path);

            entries.push(NarrationEntry {
                basename,
                audio_path: path,
                text_path,
                modified,
            });
        }

        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.basename.cmp(&a.basename)));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_derive_basename() {
        let now = Local.with_ymd_and_hms(2024, 10, 31, 23, 59, 1).unwrap();
        assert_eq!(
            OutputManager::derive_basename("The Raven Knocked. Nevermore.", now),
            "20241031-235901_the_raven_knocked"
        );
        assert_eq!(OutputManager::derive_basename("...", now), "20241031-235901_narration");
        let long = "a".repeat(200);
        assert_eq!(
            OutputManager::derive_basename(&long, now),
            format!("20241031-235901_{}", "a".repeat(40))
        );
    }

    #[tokio::test]
    async fn test_reserve_basename_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputManager::new(dir.path().join("narrations"));

        let first = output.reserve_basename("Dread.", "mp3").await.unwrap();
        output.write_text(&first, "Dread.").await.unwrap();
        let second = output.reserve_basename("Dread.", "mp3").await.unwrap();

        assert_ne!(first, second);
        assert!(second.starts_with(&first));
        assert!(second.ends_with("-2"));
    }

    #[tokio::test]
    async fn test_unsearchable_dir_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        // stat under a regular file fails with ENOTDIR, even for root
        let output = OutputManager::new(&blocker);
        let err = output.is_taken("tale", "mp3").await.unwrap_err();
        assert_eq!(err.kind(), "filesystem");

        let err = output.reserve_basename("Dread.", "mp3").await.unwrap_err();
        assert_eq!(err.kind(), "filesystem");
    }

    #[tokio::test]
    async fn test_list_narrations() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputManager::new(dir.path());
        assert!(output.list_narrations().await.unwrap().is_empty());

        std::fs::write(dir.path().join("a.txt"), "text").unwrap();
        std::fs::write(dir.path().join("a.mp3"), "audio").unwrap();
        std::fs::write(dir.path().join("b.mp3"), "audio").unwrap();
        std::fs::write(dir.path().join("c.mp3.part"), "partial").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let entries = output.list_narrations().await.unwrap();
        assert_eq!(entries.len(), 2);
        let a = entries.iter().find(|e| e.basename == "a").unwrap();
        assert_eq!(a.text_path.as_deref(), Some(dir.path().join("a.txt").as_path()));
        let b = entries.iter().find(|e| e.basename == "b").unwrap();
        assert!(b.text_path.is_none());
    }

    #[tokio::test]
    async fn test_missing_output_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputManager::new(dir.path().join("does-not-exist"));
        assert!(output.list_narrations().await.unwrap().is_empty());
    }
}
