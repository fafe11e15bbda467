//! Replay payload parser.
//!
//! A replay is the JSON the acquisition side persists after a successful
//! fetch: an ordered array of play records, each carrying narration text
//! and occasional embedded card metadata. This module only reads that
//! payload; fetching and rendering belong to the acquisition tool.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

/// Username the replay service narrates under. Entries authored by it are
/// service commentary, never player actions, and are excluded everywhere.
pub const SYSTEM_USERNAME: &str = "Duelingbook";

/// One unit of recorded action in a replay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayRecord {
    /// Narration for this record. Absent on pure bookkeeping records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogField>,
    /// Card metadata observed opportunistically. May appear before or
    /// after the log lines that mention the card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardMeta>,
    /// Play type tag, e.g. "RPS" for the opening rock-paper-scissors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1_choice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2_choice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// The `log` field comes in two shapes across replay variants: a single
/// entry, or an ordered sequence wrapped into one record. Wrapper records
/// are one of the observed game-boundary signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogField {
    One(LogEntry),
    Many(Vec<LogEntry>),
}

impl LogField {
    /// Iterate the contained entries in order.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        match self {
            LogField::One(entry) => std::slice::from_ref(entry).iter(),
            LogField::Many(entries) => entries.iter(),
        }
    }

    /// True when this is the sequence-shaped variant.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, LogField::Many(_))
    }
}

/// One narration entry: who acted, what both players saw, and what only
/// the acting player saw.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogEntry {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub public_log: String,
    #[serde(default)]
    pub private_log: String,
}

impl LogEntry {
    /// True when this entry was authored by the replay service itself.
    pub fn is_system(&self) -> bool {
        self.username == SYSTEM_USERNAME
    }
}

/// Card name and its stable identifier, as embedded in the payload.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CardMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "serial_number")]
    pub serial: String,
}

/// A parsed replay: the ordered play records of one match.
#[derive(Debug, Clone, Default)]
pub struct Replay {
    pub records: Vec<PlayRecord>,
}

/// The persisted payload is usually the bare `plays` array, but some
/// captures keep the service envelope around it.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Records(Vec<PlayRecord>),
    Envelope { plays: Vec<PlayRecord> },
}

impl Replay {
    /// Load a replay from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open replay file: {:?}", path))?;
        Self::parse_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse replay file: {:?}", path))
    }

    /// Parse a replay from a reader.
    pub fn parse_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .context("Failed to read replay data")?;
        Self::parse_str(&contents)
    }

    /// Parse a replay from a string.
    pub fn parse_str(contents: &str) -> Result<Self> {
        let payload: Payload = serde_json::from_str(contents)
            .context("Replay data is not a play-record array")?;
        let records = match payload {
            Payload::Records(records) => records,
            Payload::Envelope { plays } => plays,
        };
        Ok(Replay { records })
    }

    /// Distinct non-system usernames in first-seen order.
    pub fn players(&self) -> Vec<&str> {
        let mut players: Vec<&str> = Vec::new();
        for record in &self.records {
            let Some(log) = &record.log else { continue };
            for entry in log.entries() {
                if entry.username.is_empty() || entry.is_system() {
                    continue;
                }
                if !players.contains(&entry.username.as_str()) {
                    players.push(&entry.username);
                }
            }
        }
        players
    }

    /// Records tagged as rock-paper-scissors results.
    pub fn rps_records(&self) -> impl Iterator<Item = &PlayRecord> {
        self.records
            .iter()
            .filter(|r| r.play.as_deref() == Some("RPS"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_replay() -> &'static str {
        r#"[
            {"play":"RPS","player1":"Alice","player2":"Bob","player1_choice":"Rock","player2_choice":"Scissors","winner":"Alice"},
            {"log":{"username":"Duelingbook","public_log":"Alice chose to go first","private_log":""}},
            {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Sangan\""}},
            {"log":{"username":"Bob","public_log":"Banished \"Kuriboh\" from Deck","private_log":""},
             "card":{"name":"Kuriboh","serial_number":"40640057"}}
        ]"#
    }

    #[test]
    fn parse_record_array() {
        let replay = Replay::parse_str(sample_replay()).unwrap();
        assert_eq!(replay.records.len(), 4);
    }

    #[test]
    fn parse_service_envelope() {
        let wrapped = format!(r#"{{"plays":{}}}"#, sample_replay());
        let replay = Replay::parse_str(&wrapped).unwrap();
        assert_eq!(replay.records.len(), 4);
    }

    #[test]
    fn rejects_non_replay_json() {
        assert!(Replay::parse_str(r#"{"plays":"nope"}"#).is_err());
        assert!(Replay::parse_str("42").is_err());
    }

    #[test]
    fn log_field_single_entry() {
        let replay = Replay::parse_str(sample_replay()).unwrap();
        let log = replay.records[2].log.as_ref().unwrap();
        assert!(!log.is_wrapper());
        assert_eq!(log.entries().count(), 1);
        assert_eq!(log.entries().next().unwrap().username, "Alice");
    }

    #[test]
    fn log_field_entry_sequence() {
        let json = r#"[{"log":[
            {"username":"Alice","public_log":"a","private_log":""},
            {"username":"Bob","public_log":"b","private_log":""}
        ]}]"#;
        let replay = Replay::parse_str(json).unwrap();
        let log = replay.records[0].log.as_ref().unwrap();
        assert!(log.is_wrapper());
        assert_eq!(log.entries().count(), 2);
    }

    #[test]
    fn card_meta_accepts_both_serial_keys() {
        let replay = Replay::parse_str(sample_replay()).unwrap();
        let card = replay.records[3].card.as_ref().unwrap();
        assert_eq!(card.serial, "40640057");

        let json = r#"[{"card":{"name":"Sangan","serial":"26202165"}}]"#;
        let replay = Replay::parse_str(json).unwrap();
        assert_eq!(replay.records[0].card.as_ref().unwrap().serial, "26202165");
    }

    #[test]
    fn players_excludes_service_and_preserves_order() {
        let replay = Replay::parse_str(sample_replay()).unwrap();
        assert_eq!(replay.players(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn rps_records_found() {
        let replay = Replay::parse_str(sample_replay()).unwrap();
        let rps: Vec<_> = replay.rps_records().collect();
        assert_eq!(rps.len(), 1);
        assert_eq!(rps[0].winner.as_deref(), Some("Alice"));
    }

    #[test]
    fn missing_log_fields_default_empty() {
        let json = r#"[{"log":{"username":"Alice"}}]"#;
        let replay = Replay::parse_str(json).unwrap();
        let entry = replay.records[0].log.as_ref().unwrap();
        let entry = entry.entries().next().unwrap();
        assert_eq!(entry.public_log, "");
        assert_eq!(entry.private_log, "");
    }
}
