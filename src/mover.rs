//! Executes a rename plan on disk, one entry at a time, and undoes it.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::rename_engine::RenamePlan;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndoOperation {
    pub original_path: PathBuf,
    pub renamed_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRename {
    pub source: PathBuf,
    pub target: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub completed: Vec<UndoOperation>,
    pub failed: Vec<FailedRename>,
}

impl MoveReport {
    pub fn renamed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Applies the plan in list order.
///
/// Each step re-checks the file system: a target that appeared since planning, or a
/// source that vanished, fails that step and leaves both files alone.
pub fn apply_plan(plan: &RenamePlan) -> MoveReport {
    let mut report = MoveReport::default();

    for entry in &plan.entries {
        let refusal = if entry.target.exists() {
            Some("target already exists".to_string())
        } else if !entry.source.exists() {
            Some("source file not found".to_string())
        } else {
            None
        };

        if let Some(reason) = refusal {
            warn!(source = %entry.source.display(), target = %entry.target.display(), %reason, "skipping rename");
            report.failed.push(FailedRename {
                source: entry.source.clone(),
                target: entry.target.clone(),
                reason,
            });
            continue;
        }

        match fs::rename(&entry.source, &entry.target) {
            Ok(()) => {
                info!(source = %entry.source_name(), target = %entry.target_name, "renamed");
                report.completed.push(UndoOperation {
                    original_path: entry.source.clone(),
                    renamed_path: entry.target.clone(),
                });
            }
            Err(e) => {
                error!(source = %entry.source.display(), "rename failed: {}", e);
                report.failed.push(FailedRename {
                    source: entry.source.clone(),
                    target: entry.target.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

/// Reverts completed renames, newest first. Returns the operations that could not be undone.
pub fn undo(report: &MoveReport) -> Vec<FailedRename> {
    let mut failed = Vec::new();

    for op in report.completed.iter().rev() {
        let result = if op.original_path.exists() {
            Err("original name is taken again".to_string())
        } else {
            fs::rename(&op.renamed_path, &op.original_path).map_err(|e| e.to_string())
        };

        if let Err(reason) = result {
            error!(path = %op.renamed_path.display(), %reason, "failed to undo rename");
            failed.push(FailedRename {
                source: op.renamed_path.clone(),
                target: op.original_path.clone(),
                reason,
            });
        }
    }

    failed
}
