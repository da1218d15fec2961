//! Data model for timeline extraction and conflict detection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Conflict id for a deadline that already passed
pub const PAST_DEADLINE_CONFLICT: &str = "TL-C-PAST";
/// Conflict id for a deadline that falls on the reference date
pub const DEADLINE_TODAY_CONFLICT: &str = "TL-C-TODAY";
/// Conflict id for urgency language without any explicit deadline
pub const AMBIGUOUS_URGENCY_CONFLICT: &str = "TL-C-AMBIGUOUS-URGENCY";
/// Conflict id for multiple high-certainty deadlines on different dates
pub const CONFLICTING_DEADLINES_CONFLICT: &str = "TL-C-MULTIPLE-DEADLINES";

/// How the date was expressed in the source text
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateKind {
    /// A concrete calendar date ("March 3rd", "2026-09-01")
    Explicit,
    /// Relative to the reference date ("next Friday", "in two weeks")
    Relative,
    /// A span rather than a point ("Q3", "next sprint")
    Period,
}

/// Extractor confidence in the normalized date
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DateConfidence {
    Low,
    Medium,
    High,
}

/// A date mention with its normalized form
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NormalizedDate {
    /// The text as it appeared in the message
    pub raw: String,
    /// ISO `YYYY-MM-DD` form, best effort
    pub normalized: String,
    #[serde(rename = "type")]
    pub kind: DateKind,
    pub certainty: DateConfidence,
}

fn default_urgency() -> u8 {
    1
}

/// A single time-related mention extracted from a message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TimelineEvent {
    pub event_id: String,
    pub description: String,
    pub date: NormalizedDate,
    #[serde(default)]
    pub is_deadline: bool,
    /// 1 (routine) through 10 (drop everything)
    #[serde(default = "default_urgency")]
    pub urgency_score: u8,
}

impl TimelineEvent {
    /// Parse the normalized date, if it is a well-formed ISO date
    pub fn normalized_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date.normalized, "%Y-%m-%d").ok()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

/// A contradiction or pressure point found among the extracted events
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TimelineConflict {
    pub conflict_id: String,
    pub description: String,
    pub severity: ConflictSeverity,
}

/// The full result of timeline analysis for one message
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimelineAnalysis {
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    #[serde(default)]
    pub conflicts: Vec<TimelineConflict>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl TimelineAnalysis {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.conflicts.is_empty() && self.recommendations.is_empty()
    }

    /// Highest conflict severity present, if any
    pub fn max_severity(&self) -> Option<ConflictSeverity> {
        self.conflicts.iter().map(|c| c.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(normalized: &str) -> TimelineEvent {
        TimelineEvent {
            event_id: "TE-001".to_string(),
            description: "ship release".to_string(),
            date: NormalizedDate {
                raw: "Friday".to_string(),
                normalized: normalized.to_string(),
                kind: DateKind::Relative,
                certainty: DateConfidence::Medium,
            },
            is_deadline: true,
            urgency_score: 5,
        }
    }

    #[test]
    fn test_normalized_date_parsing() {
        assert_eq!(
            event("2026-08-28").normalized_date(),
            NaiveDate::from_ymd_opt(2026, 8, 28)
        );
        assert_eq!(event("2024-XX-XX").normalized_date(), None);
        assert_eq!(event("soon").normalized_date(), None);
    }

    #[test]
    fn test_event_deserialization_defaults() {
        let json = r#"{
            "event_id": "TE-002",
            "description": "standup",
            "date": {"raw": "tomorrow", "normalized": "2026-08-26", "type": "relative", "certainty": "high"}
        }"#;
        let event: TimelineEvent = serde_json::from_str(json).unwrap();
        assert!(!event.is_deadline);
        assert_eq!(event.urgency_score, 1);
        assert_eq!(event.date.kind, DateKind::Relative);
        assert_eq!(event.date.certainty, DateConfidence::High);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ConflictSeverity::High > ConflictSeverity::Medium);
        assert!(ConflictSeverity::Medium > ConflictSeverity::Low);

        let analysis = TimelineAnalysis {
            conflicts: vec![
                TimelineConflict {
                    conflict_id: PAST_DEADLINE_CONFLICT.to_string(),
                    description: "past".to_string(),
                    severity: ConflictSeverity::High,
                },
                TimelineConflict {
                    conflict_id: DEADLINE_TODAY_CONFLICT.to_string(),
                    description: "today".to_string(),
                    severity: ConflictSeverity::Medium,
                },
            ],
            ..Default::default()
        };
        assert_eq!(analysis.max_severity(), Some(ConflictSeverity::High));
    }

    #[test]
    fn test_empty_analysis() {
        let analysis = TimelineAnalysis::default();
        assert!(analysis.is_empty());
        assert_eq!(analysis.max_severity(), None);
    }
}
