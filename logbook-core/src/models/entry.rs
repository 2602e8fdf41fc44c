//! LogEntry: one time-stamped record from a source system.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A logbook record as ingested from a source system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Identifier assigned by the source system. Unique per store.
    pub id: String,
    pub source_system: String,
    pub timestamp: DateTime<Utc>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl LogEntry {
    pub fn new(
        id: impl Into<String>,
        source_system: impl Into<String>,
        timestamp: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_system: source_system.into(),
            timestamp,
            author: None,
            title: None,
            content: content.into(),
            tags: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// blake3 hash over every field a source can change. Used to tell a real
    /// update apart from a re-delivery of the same record.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in [
            self.source_system.as_str(),
            &self.timestamp.to_rfc3339(),
            self.author.as_deref().unwrap_or(""),
            self.title.as_deref().unwrap_or(""),
            self.content.as_str(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(&[0]);
        }
        for tag in &self.tags {
            hasher.update(tag.as_bytes());
            hasher.update(&[0]);
        }
        // BTreeMap serializes in key order, so the hash is stable.
        if let Ok(metadata) = serde_json::to_vec(&self.metadata) {
            hasher.update(&metadata);
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// What `upsert_entry` did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// Same id and same content hash as the stored row.
    Unchanged,
}
