//! Prioritized action items derived from agent results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of an action item.
///
/// Rank 0 is the most urgent; action lists are sorted by ascending rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: HIGH=0, MEDIUM=1, LOW=2.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        };
        f.write_str(s)
    }
}

/// One human-actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub priority: Priority,
    /// Agent whose output produced the item.
    pub source: String,
    pub title: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
}

impl ActionItem {
    /// Creates an action item without date or recipe references.
    pub fn new(
        priority: Priority,
        source: impl Into<String>,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            source: source.into(),
            title: title.into(),
            detail: detail.into(),
            date: None,
            recipe_id: None,
        }
    }

    /// Attaches a date reference.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Attaches a recipe reference.
    pub fn with_recipe(mut self, recipe_id: impl Into<String>) -> Self {
        self.recipe_id = Some(recipe_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn test_priority_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"MEDIUM\"");
    }

    #[test]
    fn test_action_builder() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let item = ActionItem::new(Priority::Low, "rotation_fill", "Vary menu", "Low variety")
            .with_date(date)
            .with_recipe("rcp-1");
        assert_eq!(item.date, Some(date));
        assert_eq!(item.recipe_id.as_deref(), Some("rcp-1"));
    }
}
