//! Replay Deck Reconstructor (RDR) Library
//!
//! A Rust library for reconstructing deck lists from recorded match replays.

pub mod config;
pub mod export;
pub mod pipeline;
pub mod replay;

pub use config::Config;
pub use export::{DeckFormat, Exporter};
pub use pipeline::{DeckPipeline, MatchDecks, PipelineOptions, ScanStats};
pub use replay::{LogEntry, LogField, PlayRecord, Replay, SYSTEM_USERNAME};
