//! Timeline engine: one LLM pass to pull out time mentions, then purely
//! local rules to flag conflicts and produce recommendations.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::llm::{CompletionRequest, LLMClient, extract_json};
use crate::prompts::{TIMELINE_SYSTEM_PROMPT, timeline_extraction_prompt};
use crate::timeline::types::{
    AMBIGUOUS_URGENCY_CONFLICT, CONFLICTING_DEADLINES_CONFLICT, ConflictSeverity,
    DEADLINE_TODAY_CONFLICT, DateConfidence, PAST_DEADLINE_CONFLICT, TimelineAnalysis,
    TimelineConflict, TimelineEvent,
};

/// Low temperature keeps date normalization stable
const TIMELINE_TEMPERATURE: f32 = 0.1;

/// Extracts timeline events from message content and derives conflicts
/// and recommendations from them.
///
/// Extraction goes through the LLM; conflict detection and recommendations
/// are deterministic so they can be tested without a model.
pub struct TimelineEngine {
    client: Arc<dyn LLMClient>,
}

impl TimelineEngine {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Run the full analysis: extract events, then derive conflicts and
    /// recommendations locally. Extraction failures degrade to an empty
    /// analysis rather than aborting the pipeline.
    pub async fn analyze(&self, content: &str) -> TimelineAnalysis {
        info!("analyzing content for timeline events");
        let events = self.extract_events(content).await;
        let today = Utc::now().date_naive();
        let conflicts = Self::detect_conflicts(&events, content, today);
        let recommendations = Self::recommendations(&events, &conflicts);
        info!(
            "timeline analysis found {} events, {} conflicts",
            events.len(),
            conflicts.len()
        );
        TimelineAnalysis {
            events,
            conflicts,
            recommendations,
        }
    }

    async fn extract_events(&self, content: &str) -> Vec<TimelineEvent> {
        let current_date = Utc::now().format("%Y-%m-%d").to_string();
        let prompt = timeline_extraction_prompt(&current_date, content);
        let request = CompletionRequest::new(TIMELINE_SYSTEM_PROMPT, prompt)
            .with_temperature(TIMELINE_TEMPERATURE);

        let raw = match self.client.complete(request).await {
            Ok(raw) => raw,
            Err(err) => {
                error!("timeline extraction failed: {}", err);
                return Vec::new();
            }
        };

        let value = match extract_json(&raw) {
            Ok(value) => value,
            Err(err) => {
                error!("timeline response was not JSON: {}", err);
                return Vec::new();
            }
        };

        let Some(items) = value.get("events").and_then(|v| v.as_array()) else {
            warn!("timeline response had no events array");
            return Vec::new();
        };

        let mut events = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<TimelineEvent>(item.clone()) {
                Ok(event) if (1..=10).contains(&event.urgency_score) => events.push(event),
                Ok(event) => {
                    warn!(
                        "dropping event {} with out-of-range urgency {}",
                        event.event_id, event.urgency_score
                    );
                }
                Err(err) => {
                    warn!("invalid timeline event: {}", err);
                }
            }
        }
        debug!("extracted {} timeline events", events.len());
        events
    }

    /// Pure conflict detection over extracted events. `today` is passed in
    /// so the rules are testable with fixed dates.
    fn detect_conflicts(
        events: &[TimelineEvent],
        content: &str,
        today: NaiveDate,
    ) -> Vec<TimelineConflict> {
        let mut conflicts = Vec::new();

        for event in events.iter().filter(|e| e.is_deadline) {
            let Some(date) = event.normalized_date() else {
                continue;
            };
            if date < today {
                conflicts.push(TimelineConflict {
                    conflict_id: PAST_DEADLINE_CONFLICT.to_string(),
                    description: format!(
                        "Deadline '{}' ({}) is in the past.",
                        event.description, event.date.normalized
                    ),
                    severity: ConflictSeverity::High,
                });
            } else if date == today {
                conflicts.push(TimelineConflict {
                    conflict_id: DEADLINE_TODAY_CONFLICT.to_string(),
                    description: format!(
                        "Deadline '{}' is today. High pressure.",
                        event.description
                    ),
                    severity: ConflictSeverity::Medium,
                });
            }
        }

        let lowered = content.to_lowercase();
        let has_urgency_language = lowered.contains("asap") || lowered.contains("urgent");
        if has_urgency_language && !events.iter().any(|e| e.is_deadline) {
            conflicts.push(TimelineConflict {
                conflict_id: AMBIGUOUS_URGENCY_CONFLICT.to_string(),
                description: "Message is marked URGENT/ASAP but has no explicit deadline."
                    .to_string(),
                severity: ConflictSeverity::Medium,
            });
        }

        let mut firm_dates: Vec<&str> = events
            .iter()
            .filter(|e| e.is_deadline && e.date.certainty == DateConfidence::High)
            .map(|e| e.date.normalized.as_str())
            .collect();
        firm_dates.sort_unstable();
        firm_dates.dedup();
        if firm_dates.len() > 1 {
            conflicts.push(TimelineConflict {
                conflict_id: CONFLICTING_DEADLINES_CONFLICT.to_string(),
                description: format!(
                    "Multiple conflicting deadlines found: {}",
                    firm_dates.join(", ")
                ),
                severity: ConflictSeverity::High,
            });
        }

        conflicts
    }

    fn recommendations(events: &[TimelineEvent], conflicts: &[TimelineConflict]) -> Vec<String> {
        if events.is_empty() && conflicts.is_empty() {
            return Vec::new();
        }
        let mut recommendations = Vec::new();

        if conflicts
            .iter()
            .any(|c| c.severity == ConflictSeverity::High)
        {
            recommendations.push("URGENT: Clarify timeline conflicts immediately.".to_string());
        }

        let ambiguous: Vec<&str> = events
            .iter()
            .filter(|e| e.date.certainty == DateConfidence::Low)
            .map(|e| e.date.raw.as_str())
            .collect();
        if !ambiguous.is_empty() {
            recommendations.push(format!("Clarify ambiguous dates: {}", ambiguous.join(", ")));
        }

        if events.iter().any(|e| e.urgency_score >= 8) {
            recommendations
                .push("High urgency detected. Prioritize risk assessment.".to_string());
        }

        recommendations
    }
}
