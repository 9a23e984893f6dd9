//! Rule engine.

use std::fmt;

use briefing_models::{ActionItem, AgentPayload, AgentRunResult, Priority};
use chrono::NaiveDate;
use tracing::debug;

use crate::rules::{self, ResolverThresholds};

/// What a rule extracts from one payload, before priority and source are
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub title: String,
    pub detail: String,
    pub date: Option<NaiveDate>,
    pub recipe_id: Option<String>,
}

impl Finding {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            date: None,
            recipe_id: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_recipe(mut self, recipe_id: impl Into<String>) -> Self {
        self.recipe_id = Some(recipe_id.into());
        self
    }
}

type Extractor = Box<dyn Fn(&AgentPayload, &ResolverThresholds) -> Vec<Finding> + Send + Sync>;

/// One resolution rule: which agent it reads, the priority of what it
/// emits and how findings are extracted.
pub struct Rule {
    pub name: &'static str,
    /// Agent whose completed results the rule inspects.
    pub source: &'static str,
    pub priority: Priority,
    extract: Extractor,
}

impl Rule {
    pub fn new<F>(name: &'static str, source: &'static str, priority: Priority, extract: F) -> Self
    where
        F: Fn(&AgentPayload, &ResolverThresholds) -> Vec<Finding> + Send + Sync + 'static,
    {
        Self {
            name,
            source,
            priority,
            extract: Box::new(extract),
        }
    }

    fn apply(&self, result: &AgentRunResult, thresholds: &ResolverThresholds) -> Vec<ActionItem> {
        (self.extract)(&result.data, thresholds)
            .into_iter()
            .map(|finding| ActionItem {
                priority: self.priority,
                source: result.agent_name.clone(),
                title: finding.title,
                detail: finding.detail,
                date: finding.date,
                recipe_id: finding.recipe_id,
            })
            .collect()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Ordered rule list applied to a run's agent results.
#[derive(Debug)]
pub struct ConflictResolver {
    rules: Vec<Rule>,
    thresholds: ResolverThresholds,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl ConflictResolver {
    /// The standard kitchen rules with default thresholds.
    pub fn with_default_rules() -> Self {
        Self::with_thresholds(ResolverThresholds::default())
    }

    /// The standard kitchen rules with custom thresholds.
    pub fn with_thresholds(thresholds: ResolverThresholds) -> Self {
        Self {
            rules: rules::default_rules(),
            thresholds,
        }
    }

    /// Appends a rule after the existing ones.
    pub fn push_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Derives the prioritized action list.
    ///
    /// Only completed results are inspected. Items are grouped by rule
    /// order, then stably sorted by priority rank. Nothing is deduplicated.
    pub fn resolve(&self, results: &[AgentRunResult]) -> Vec<ActionItem> {
        let mut actions = Vec::new();

        for rule in &self.rules {
            for result in results
                .iter()
                .filter(|r| r.is_completed() && r.agent_name == rule.source)
            {
                let items = rule.apply(result, &self.thresholds);
                if !items.is_empty() {
                    debug!(rule = rule.name, count = items.len(), "rule matched");
                }
                actions.extend(items);
            }
        }

        actions.sort_by_key(|a| a.priority.rank());
        actions
    }
}
