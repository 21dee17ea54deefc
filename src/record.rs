use crate::date::{day_from_timestamp, CalendarDay};
use anyhow::Result;
use serde::Deserialize;

/// Minimal line-level schema for the post corpus.
/// Extra fields are ignored by serde; no field is required by the file
/// format itself. Each query decides which of these it needs and skips
/// records that lack them.
#[derive(Debug, Deserialize)]
pub struct Post {
    pub date: Option<String>,
    pub content: Option<String>,
    pub user: Option<PostUser>,
}

#[derive(Debug, Deserialize)]
pub struct PostUser {
    pub username: Option<String>,
}

/// Parse a JSON line into `Post` using serde_json.
#[inline]
pub fn parse_post(line: &str) -> Result<Post> {
    Ok(serde_json::from_str(line)?)
}

impl Post {
    /// Body text; empty when the field is absent.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Author handle from the nested user object. Empty handles count as
    /// absent.
    pub fn username(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Calendar day of the post, when the timestamp parses under either
    /// grammar in [`day_from_timestamp`].
    pub fn day(&self) -> Option<CalendarDay> {
        self.date.as_deref().and_then(day_from_timestamp)
    }

    /// Grouping key for the date query. `None` is a schema failure: the
    /// record is skipped and counted, never repaired.
    pub fn day_and_author(&self) -> Option<(CalendarDay, &str)> {
        Some((self.day()?, self.username()?))
    }
}
