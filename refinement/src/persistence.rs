//! Run persistence: the dated run directory and everything written into it.
//!
//! History files are rewritten in full after every append (last-writer-wins,
//! never an incremental format), so a crash loses at most the in-flight
//! invocation. Artifacts and the summary are written once at run end.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::{HistoryStore, RoundRecord, Track};
use crate::pipeline::Topic;

/// Unified history file name.
pub const HISTORY_FILE: &str = "history.json";
/// Style-track history file name.
pub const HISTORY_STYLE_FILE: &str = "history_style.json";
/// Object-track history file name.
pub const HISTORY_OBJECT_FILE: &str = "history_object.json";
/// Topic snapshot file name.
pub const TOPIC_FILE: &str = "topic.json";
/// Run summary file name.
pub const SUMMARY_FILE: &str = "run_summary.json";
/// Terminal style artifact file name.
pub const STYLE_ARTIFACT_FILE: &str = "final_style_prompt.txt";
/// Terminal object artifact file name.
pub const OBJECT_ARTIFACT_FILE: &str = "final_object_prompt.txt";

/// Error during run persistence. Always fatal to the run.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// End-of-run snapshot written next to the artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique run id.
    pub run_id: String,
    /// The topic text as given by the caller.
    pub topic: String,
    /// Pipeline variant name.
    pub variant: String,
    /// Number of rounds executed.
    pub rounds: u32,
    /// UTC start time.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the whole run.
    pub elapsed_ms: u64,
}

/// Writer for one run's output directory.
#[derive(Debug)]
pub struct RunPersister {
    run_dir: PathBuf,
}

impl RunPersister {
    /// Build and create the dated run directory `outdir/YYYYMMDD/HHMMSS`
    /// (local time).
    pub fn create(outdir: &Path) -> Result<Self, PersistenceError> {
        let now = Local::now();
        let run_dir = outdir
            .join(now.format("%Y%m%d").to_string())
            .join(now.format("%H%M%S").to_string());
        fs::create_dir_all(&run_dir)?;
        Ok(Self { run_dir })
    }

    /// The directory this run writes into.
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Rewrite all three history files from the store's current views.
    pub fn write_history(&self, store: &HistoryStore) -> Result<(), PersistenceError> {
        self.write_records(HISTORY_FILE, store.unified())?;
        self.write_records(HISTORY_STYLE_FILE, store.track(Track::Style))?;
        self.write_records(HISTORY_OBJECT_FILE, store.track(Track::Object))?;
        Ok(())
    }

    fn write_records(&self, name: &str, records: &[RoundRecord]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(self.run_dir.join(name), json)?;
        Ok(())
    }

    /// Record the immutable topic (and any classifier split) once.
    pub fn write_topic(&self, topic: &Topic) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(topic)?;
        fs::write(self.run_dir.join(TOPIC_FILE), json)?;
        Ok(())
    }

    /// Write a track's terminal artifact as raw text, returning its path.
    pub fn write_artifact(&self, track: Track, text: &str) -> Result<PathBuf, PersistenceError> {
        let name = match track {
            Track::Style => STYLE_ARTIFACT_FILE,
            Track::Object => OBJECT_ARTIFACT_FILE,
        };
        let path = self.run_dir.join(name);
        fs::write(&path, text)?;
        Ok(path)
    }

    /// Write the end-of-run summary.
    pub fn write_summary(&self, summary: &RunSummary) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(self.run_dir.join(SUMMARY_FILE), json)?;
        Ok(())
    }
}
