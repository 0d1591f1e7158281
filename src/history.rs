//! Transcript persistence.
//!
//! At the end of a session the user may save the full turn sequence. Each
//! save produces a timestamped JSON file (the serialized turn list) and a
//! Markdown rendering next to it. Saving is all-or-nothing; there is no
//! partial persistence.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::error::{Error, Result};
use crate::types::{Role, Turn};

/// On-disk transcript format.
#[derive(Serialize, Deserialize)]
struct TranscriptFile {
    version: u8,
    turns: Vec<Turn>,
}

impl TranscriptFile {
    fn new(turns: &[Turn]) -> Self {
        Self {
            version: 1,
            turns: turns.to_vec(),
        }
    }
}

/// Saves a transcript into `directory`, creating it if absent.
///
/// Writes `chat_history_<YYYYMMDD_HHMMSS>.json` and a matching `.md` file.
/// Returns the extension-less base path of the pair.
pub fn save_transcript(turns: &[Turn], directory: impl AsRef<Path>) -> Result<PathBuf> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)
        .map_err(|err| Error::io("failed to create transcript directory", err))?;

    let base = directory.join(format!("chat_history_{}", timestamp()?));

    let json_path = base.with_extension("json");
    let file = File::create(&json_path)
        .map_err(|err| Error::io("failed to create transcript file", err))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &TranscriptFile::new(turns)).map_err(|err| {
        Error::serialization("failed to serialize transcript", Some(Box::new(err)))
    })?;

    let md_path = base.with_extension("md");
    let file = File::create(&md_path)
        .map_err(|err| Error::io("failed to create transcript file", err))?;
    let mut writer = BufWriter::new(file);
    for turn in turns {
        let label = match turn.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        writeln!(writer, "**{label}:** {}\n", turn.content)
            .map_err(|err| Error::io("failed to write transcript", err))?;
    }
    writer
        .flush()
        .map_err(|err| Error::io("failed to write transcript", err))?;

    Ok(base)
}

fn timestamp() -> Result<String> {
    let format = format_description!("[year][month][day]_[hour][minute][second]");
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format).map_err(|err| {
        Error::serialization("failed to format timestamp", Some(Box::new(err)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_turns() -> Vec<Turn> {
        vec![
            Turn::user("What is Rust?"),
            Turn::assistant("A systems programming language."),
        ]
    }

    #[test]
    fn save_writes_json_and_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let base = save_transcript(&sample_turns(), dir.path()).unwrap();

        assert!(base.with_extension("json").exists());
        assert!(base.with_extension("md").exists());

        let markdown = fs::read_to_string(base.with_extension("md")).unwrap();
        assert!(markdown.contains("**User:** What is Rust?"));
        assert!(markdown.contains("**Assistant:** A systems programming language."));
    }

    #[test]
    fn json_transcript_preserves_turn_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let turns = sample_turns();
        let base = save_transcript(&turns, dir.path()).unwrap();

        let file = File::open(base.with_extension("json")).unwrap();
        let transcript: TranscriptFile = serde_json::from_reader(file).unwrap();
        assert_eq!(transcript.version, 1);
        assert_eq!(transcript.turns, turns);
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("chat_histories");
        let base = save_transcript(&sample_turns(), &nested).unwrap();
        assert!(base.starts_with(&nested));
        assert!(base.with_extension("json").exists());
    }
}
