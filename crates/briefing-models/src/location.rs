//! Kitchen locations a briefing can be scoped to.

use serde::{Deserialize, Serialize};

/// A kitchen location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier from the kitchen app.
    pub id: String,
    /// URL-safe slug used to request briefings.
    pub slug: String,
    /// Display name.
    pub name: String,
}

impl Location {
    /// Creates a new location.
    pub fn new(id: impl Into<String>, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
        }
    }
}
