//! JSON-file persistence for plans, extraction records, and rendered maps.
//!
//! Layout under the store root:
//!
//! ```text
//! tasks/<message_id>/<task_id>.json        upserted on every plan
//! extractions/<task_id>/<record_id>.json   append-only
//! maps/<message_id>/<millis>-<id>.json     append-only, latest wins
//! ```
//!
//! File and directory names derive from caller-supplied ids, so every id
//! is sanitized before it touches the filesystem.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::agents::ExtractionOutput;
use crate::env::store::{EXTRACTIONS_DIR_NAME, MAPS_DIR_NAME, TASKS_DIR_NAME};
use crate::plan::{TaskDomain, TaskPlan, TaskPriority};

/// A planned task as persisted at planning time
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredTask {
    pub message_id: String,
    pub task_id: String,
    pub domain: TaskDomain,
    #[serde(default)]
    pub l3_agent: Option<String>,
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub depends_on: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One extraction output as persisted after execution
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredExtraction {
    pub record_id: Uuid,
    pub task_id: String,
    /// Agent name or domain label the output came from
    pub extraction_type: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

/// A rendered orchestration map as persisted
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredMap {
    pub message_id: String,
    pub map_text: String,
    pub created_at: DateTime<Utc>,
}

/// File-backed store rooted at a single directory.
pub struct OrchestrationStore {
    root: PathBuf,
}

impl OrchestrationStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for dir in [TASKS_DIR_NAME, EXTRACTIONS_DIR_NAME, MAPS_DIR_NAME] {
            let path = root.join(dir);
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create store directory {}", path.display()))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist every task in a plan, one file per task. Re-planning the
    /// same message overwrites the earlier records.
    pub async fn save_task_plan(&self, plan: &TaskPlan) -> Result<()> {
        let message_dir = self
            .root
            .join(TASKS_DIR_NAME)
            .join(sanitize_component(&plan.source_message_id));
        for task in &plan.tasks {
            let record = StoredTask {
                message_id: plan.source_message_id.clone(),
                task_id: task.task_id.clone(),
                domain: task.domain,
                l3_agent: task.l3_agent.clone(),
                description: task.description.clone(),
                priority: task.priority,
                depends_on: task.depends_on.clone(),
                created_at: Utc::now(),
            };
            let path = message_dir.join(format!("{}.json", sanitize_component(&task.task_id)));
            write_json(&path, &record).await?;
        }
        debug!(
            "persisted {} tasks for message {}",
            plan.len(),
            plan.source_message_id
        );
        Ok(())
    }

    /// Persist one extraction output under its task. Records are
    /// append-only; the new record id comes back.
    pub async fn save_extraction(
        &self,
        task_id: &str,
        extraction_type: &str,
        output: &ExtractionOutput,
    ) -> Result<Uuid> {
        let record = StoredExtraction {
            record_id: Uuid::new_v4(),
            task_id: task_id.to_string(),
            extraction_type: extraction_type.to_string(),
            data: serde_json::to_value(output).context("Failed to serialize extraction output")?,
            created_at: Utc::now(),
        };
        let path = self
            .root
            .join(EXTRACTIONS_DIR_NAME)
            .join(sanitize_component(task_id))
            .join(format!("{}.json", record.record_id));
        write_json(&path, &record).await?;
        Ok(record.record_id)
    }

    /// Persist a rendered map. Keeps every version; readers take the latest.
    pub async fn save_orchestration_map(
        &self,
        message_id: &str,
        map_text: &str,
    ) -> Result<PathBuf> {
        let record = StoredMap {
            message_id: message_id.to_string(),
            map_text: map_text.to_string(),
            created_at: Utc::now(),
        };
        let path = self
            .root
            .join(MAPS_DIR_NAME)
            .join(sanitize_component(message_id))
            .join(format!(
                "{}-{}.json",
                record.created_at.timestamp_millis(),
                Uuid::new_v4()
            ));
        write_json(&path, &record).await?;
        Ok(path)
    }

    /// Planned tasks for a message, ordered by task id. Empty when the
    /// message was never planned.
    pub async fn tasks_for_message(&self, message_id: &str) -> Result<Vec<StoredTask>> {
        let dir = self
            .root
            .join(TASKS_DIR_NAME)
            .join(sanitize_component(message_id));
        let mut tasks: Vec<StoredTask> = read_records(&dir).await?;
        tasks.sort_by(|a, b| a.task_id.cmp(&b.task_id));
        Ok(tasks)
    }

    /// Extraction records for a task, oldest first
    pub async fn extractions_for_task(&self, task_id: &str) -> Result<Vec<StoredExtraction>> {
        let dir = self
            .root
            .join(EXTRACTIONS_DIR_NAME)
            .join(sanitize_component(task_id));
        let mut records: Vec<StoredExtraction> = read_records(&dir).await?;
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    /// The most recently written map for a message, if any
    pub async fn latest_orchestration_map(&self, message_id: &str) -> Result<Option<StoredMap>> {
        let dir = self
            .root
            .join(MAPS_DIR_NAME)
            .join(sanitize_component(message_id));
        let records: Vec<StoredMap> = read_records(&dir).await?;
        Ok(records.into_iter().max_by_key(|r| r.created_at))
    }
}

async fn write_json<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(record).context("Failed to serialize record")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Read every `.json` record in a directory; a missing directory reads as
/// empty, and corrupt records are skipped with a warning.
async fn read_records<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read store directory {}", dir.display()));
        }
    };
    let mut records = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to list store directory {}", dir.display()))?
    {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let contents = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match serde_json::from_str(&contents) {
            Ok(record) => records.push(record),
            Err(err) => warn!("skipping corrupt record {}: {}", path.display(), err),
        }
    }
    Ok(records)
}

/// Replace anything outside `[A-Za-z0-9._-]` so ids cannot escape the
/// store root or collide with path syntax
fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}
