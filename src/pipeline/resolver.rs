//! Card name to serial resolution.
//!
//! Serials arrive opportunistically: a record's card metadata may show up
//! anywhere in the input relative to the log lines that mention the card,
//! so the resolver harvests the whole record sequence up front and only
//! then answers lookups. Names with no metadata anywhere resolve to a
//! sentinel rather than failing.

use std::collections::HashMap;

use crate::replay::PlayRecord;

/// Serial reported for card names that never appear in any metadata.
pub const UNKNOWN_SERIAL: &str = "UNKNOWN";

/// Accumulated name to serial mapping for one reconstruction run.
///
/// The map only ever grows, and an entry that holds a real serial is
/// never downgraded back to the sentinel. Exports written before a later
/// harvest supplied a serial are not rewritten.
#[derive(Debug, Clone, Default)]
pub struct SerialResolver {
    serials: HashMap<String, String>,
}

impl SerialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resolver by harvesting every record's card metadata,
    /// including records not yet scanned by the caller.
    pub fn from_records(records: &[PlayRecord]) -> Self {
        let mut resolver = Self::new();
        resolver.harvest(records);
        resolver
    }

    /// Harvest card metadata from a record sequence. Entries currently
    /// holding the sentinel are upgraded when real metadata appears.
    pub fn harvest(&mut self, records: &[PlayRecord]) {
        for record in records {
            let Some(card) = &record.card else { continue };
            if card.name.is_empty() || card.serial.is_empty() {
                continue;
            }
            self.serials
                .insert(card.name.clone(), card.serial.clone());
        }
    }

    /// Resolve a card name to its serial, storing and returning the
    /// sentinel when no metadata was harvested for it. Idempotent until
    /// a later harvest supplies the real value.
    pub fn resolve(&mut self, name: &str) -> &str {
        self.serials
            .entry(name.to_string())
            .or_insert_with(|| UNKNOWN_SERIAL.to_string())
    }

    /// Look up a name without mutating the map.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.serials.get(name).map(String::as_str)
    }

    /// The serial for a name, falling back to the sentinel. Read-only
    /// companion to [`resolve`](Self::resolve) for export passes.
    pub fn serial_or_unknown(&self, name: &str) -> &str {
        self.lookup(name).unwrap_or(UNKNOWN_SERIAL)
    }

    /// True when the name resolved to a real serial.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|s| s != UNKNOWN_SERIAL)
    }

    /// Names currently stuck at the sentinel, sorted for stable output.
    pub fn unresolved(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .serials
            .iter()
            .filter(|(_, serial)| serial.as_str() == UNKNOWN_SERIAL)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.serials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }
}
