//! JSONL (JSON Lines) storage.
//!
//! Each line is one JSON object. Team snapshots and LFT sign-ups are kept
//! this way so a hand-edited bad line costs one record, not the file.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};

/// Record kinds stored as JSONL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Team,
    LftPlayer,
}

impl EntityType {
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Team => "teams.jsonl",
            EntityType::LftPlayer => "lft_players.jsonl",
        }
    }
}

/// Writes a whole JSONL file at once.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for an entity file inside a season directory.
    pub fn for_season(config: &StorageConfig, entity: EntityType, season: u32) -> Self {
        Self::new(config.season_dir(season).join(entity.filename()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replace the file with `entities`, one per line. Contents are staged
    /// in a sibling `.tmp` file and renamed into place.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let staging = self.staging_path();
        let mut out = BufWriter::new(File::create(&staging)?);
        for entity in entities {
            serde_json::to_writer(&mut out, entity)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        drop(out);
        fs::rename(&staging, &self.path)?;

        info!("Wrote {} records to {}", entities.len(), self.path.display());
        Ok(entities.len())
    }
}

/// Reads a JSONL file, tolerating bad lines.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for an entity file inside a season directory.
    pub fn for_season(config: &StorageConfig, entity: EntityType, season: u32) -> Self {
        Self::new(config.season_dir(season).join(entity.filename()))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every record. A missing file reads as empty; blank lines are
    /// ignored and lines that fail to parse are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    warn!("{}:{}: {}", self.path.display(), index + 1, e);
                }
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {} unreadable lines in {}",
                skipped,
                self.path.display()
            );
        }
        debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestEntity {
        id: String,
        value: u32,
    }

    fn entity(id: &str, value: u32) -> TestEntity {
        TestEntity {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("test.jsonl");

        let entities = vec![entity("1", 100), entity("2", 200)];

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&entities).unwrap(), 2);

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert!(reader.exists());
        assert_eq!(reader.read_all().unwrap(), entities);
    }

    #[test]
    fn test_write_all_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("replace.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        writer.write_all(&[entity("1", 1), entity("2", 2)]).unwrap();
        writer.write_all(&[entity("3", 3)]).unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), vec![entity("3", 3)]);
        assert!(!temp_dir.path().join("replace.jsonl.tmp").exists());
    }

    #[test]
    fn test_jsonl_read_missing() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<TestEntity> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_jsonl_skips_bad_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.jsonl");
        fs::write(
            &path,
            "{\"id\":\"1\",\"value\":1}\n\nnot json\n{\"id\":\"2\",\"value\":2}\n",
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), vec![entity("1", 1), entity("2", 2)]);
    }

    #[test]
    fn test_for_season_path() {
        let config = StorageConfig::new(PathBuf::from("/data"));
        let writer: JsonlWriter<TestEntity> = JsonlWriter::for_season(&config, EntityType::Team, 4);
        assert_eq!(
            writer.path(),
            Path::new("/data/seasons/season-4/teams.jsonl")
        );
    }
}
