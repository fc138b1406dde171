use std::fmt;

use chrono::{DateTime, Utc};

/// Opaque chapter identifier. The feed sends either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChapterId(String);

impl ChapterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ChapterId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ChapterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChapterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One entry of the update feed: a newly uploaded chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    pub chapter_id: ChapterId,
    pub manga_title: String,
    pub chapter_title: String,
    /// Kept in the textual form the feed sent ("12", "12.5", "Extra").
    pub chapter_number: String,
    /// Upstream image location; callers route it through the image proxy.
    pub cover_url: String,
    pub uploaded_at: DateTime<Utc>,
}
