//! Live task store backed by YAML files under a `.skew` directory.
//!
//! Directory layout:
//!
//! ```text
//! .skew/
//!   ├── tasks/       one YAML record per task
//!   ├── followups/   one marker file per (task, revision) pair
//!   ├── log/         one append-only log per task
//!   └── last.json    snapshot of the most recent check report
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::drift::FollowupRequest;
use crate::ports::tasks::{TaskRecord, TaskStore};

/// Name of the store directory searched for upward from the working dir.
pub const STORE_DIR_NAME: &str = ".skew";

/// Task store persisting YAML records under a store directory.
pub struct FsTaskStore {
    root: PathBuf,
}

impl FsTaskStore {
    /// Creates a store rooted at the given `.skew` directory.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    fn task_path(&self, id: &str) -> PathBuf {
        self.root.join("tasks").join(format!("{id}.yaml"))
    }

    fn marker_path(&self, task_id: &str, revision: &str) -> PathBuf {
        self.root.join("followups").join(format!("{task_id}@{revision}"))
    }
}

impl TaskStore for FsTaskStore {
    fn load_task(
        &self,
        id: &str,
    ) -> Result<Option<TaskRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let path = self.task_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read task {id}: {e}"))?;
        let record: TaskRecord = serde_yaml::from_str(&contents)
            .map_err(|e| format!("failed to parse task {id}: {e}"))?;
        Ok(Some(record))
    }

    fn followup_exists(
        &self,
        task_id: &str,
        revision: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.marker_path(task_id, revision).exists())
    }

    fn create_followup(
        &self,
        request: &FollowupRequest,
        revision: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let marker = self.marker_path(&request.origin_task, revision);
        if marker.exists() {
            return Ok(());
        }

        // The follow-up record itself is keyed by task id, not revision:
        // an unresolved follow-up is reused when drift recurs.
        let task_path = self.task_path(&request.task_id);
        if !task_path.exists() {
            let record = TaskRecord {
                id: request.task_id.clone(),
                title: request.title.clone(),
                description: request.rationale.clone(),
                status: "open".to_string(),
                tags: vec!["drift".to_string(), "spec".to_string()],
                blocked_by: vec![request.origin_task.clone()],
            };
            let yaml = serde_yaml::to_string(&record)
                .map_err(|e| format!("failed to serialize follow-up {}: {e}", record.id))?;
            write_file(&task_path, &yaml)
                .map_err(|e| format!("failed to write follow-up {}: {e}", record.id))?;
        }

        write_file(&marker, &format!("{}\n", Utc::now().to_rfc3339()))
            .map_err(|e| format!("failed to record follow-up marker: {e}"))?;
        Ok(())
    }

    fn append_log(
        &self,
        task_id: &str,
        line: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let dir = self.root.join("log");
        fs::create_dir_all(&dir).map_err(|e| format!("failed to create log dir: {e}"))?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{task_id}.log")))
            .map_err(|e| format!("failed to open log for {task_id}: {e}"))?;
        writeln!(file, "[{}] {line}", Utc::now().to_rfc3339())
            .map_err(|e| format!("failed to write log for {task_id}: {e}"))?;
        Ok(())
    }

    fn write_state(&self, json: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        fs::write(self.root.join("last.json"), format!("{json}\n"))
            .map_err(|e| format!("failed to write state snapshot: {e}").into())
    }
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Locates the store directory.
///
/// With an explicit `dir`, accepts either the `.skew` directory itself or
/// a project directory containing one. Without it, searches upward from
/// the current working directory.
///
/// # Errors
///
/// Returns an error when no store directory can be found.
pub fn find_store_dir(
    dir: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(dir) = dir {
        if dir.file_name().is_some_and(|name| name == STORE_DIR_NAME) && dir.is_dir() {
            return Ok(dir.to_path_buf());
        }
        let candidate = dir.join(STORE_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        return Err(format!("no {STORE_DIR_NAME} directory under {}", dir.display()).into());
    }

    let mut current = std::env::current_dir()?;
    loop {
        let candidate = current.join(STORE_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(format!(
                "no {STORE_DIR_NAME} directory found (run inside a project with one, or pass --dir)"
            )
            .into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FsTaskStore) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(STORE_DIR_NAME);
        fs::create_dir_all(&root).unwrap();
        (dir, FsTaskStore::new(&root))
    }

    fn request() -> FollowupRequest {
        FollowupRequest {
            task_id: "drift-spec-T-1".to_string(),
            origin_task: "T-1".to_string(),
            title: "spec: Widget work".to_string(),
            rationale: "Update the task specs/docs.".to_string(),
        }
    }

    #[test]
    fn load_task_round_trips_yaml() {
        let (_dir, store) = store();
        let record = TaskRecord {
            id: "T-1".to_string(),
            title: "Widget work".to_string(),
            description: "Touch the widget.".to_string(),
            status: "open".to_string(),
            tags: vec![],
            blocked_by: vec![],
        };
        write_file(
            &store.task_path("T-1"),
            &serde_yaml::to_string(&record).unwrap(),
        )
        .unwrap();

        let loaded = store.load_task("T-1").unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn load_missing_task_returns_none() {
        let (_dir, store) = store();
        assert!(store.load_task("nope").unwrap().is_none());
    }

    #[test]
    fn load_task_applies_record_defaults() {
        let (_dir, store) = store();
        write_file(&store.task_path("T-2"), "id: T-2\ntitle: Minimal\n").unwrap();

        let loaded = store.load_task("T-2").unwrap().unwrap();
        assert_eq!(loaded.status, "open");
        assert!(loaded.description.is_empty());
        assert!(loaded.blocked_by.is_empty());
    }

    #[test]
    fn create_followup_writes_record_and_marker() {
        let (_dir, store) = store();
        store.create_followup(&request(), "abc123").unwrap();

        assert!(store.followup_exists("T-1", "abc123").unwrap());
        let record = store.load_task("drift-spec-T-1").unwrap().unwrap();
        assert_eq!(record.blocked_by, vec!["T-1"]);
        assert_eq!(record.tags, vec!["drift", "spec"]);
    }

    #[test]
    fn create_followup_is_idempotent_per_revision() {
        let (_dir, store) = store();
        store.create_followup(&request(), "abc123").unwrap();
        store.create_followup(&request(), "abc123").unwrap();

        let followups = fs::read_dir(store.root.join("followups")).unwrap().count();
        assert_eq!(followups, 1);
    }

    #[test]
    fn recurring_drift_reuses_the_open_followup_record() {
        let (_dir, store) = store();
        store.create_followup(&request(), "rev-one").unwrap();
        let mut changed = request();
        changed.title = "spec: renamed".to_string();
        store.create_followup(&changed, "rev-two").unwrap();

        // Both revisions recorded, but the record keeps its original title.
        assert!(store.followup_exists("T-1", "rev-one").unwrap());
        assert!(store.followup_exists("T-1", "rev-two").unwrap());
        let record = store.load_task("drift-spec-T-1").unwrap().unwrap();
        assert_eq!(record.title, "spec: Widget work");
    }

    #[test]
    fn append_log_accumulates_lines() {
        let (_dir, store) = store();
        store.append_log("T-1", "skew: OK (spec file touched)").unwrap();
        store.append_log("T-1", "skew: drift").unwrap();

        let log = fs::read_to_string(store.root.join("log").join("T-1.log")).unwrap();
        assert_eq!(log.lines().count(), 2);
        assert!(log.contains("skew: OK"));
    }

    #[test]
    fn write_state_overwrites_snapshot() {
        let (_dir, store) = store();
        store.write_state("{\"a\":1}").unwrap();
        store.write_state("{\"b\":2}").unwrap();

        let state = fs::read_to_string(store.root.join("last.json")).unwrap();
        assert_eq!(state, "{\"b\":2}\n");
    }

    #[test]
    fn find_store_dir_accepts_project_or_store_path() {
        let (dir, _store) = store();
        let root = dir.path().join(STORE_DIR_NAME);

        assert_eq!(find_store_dir(Some(dir.path())).unwrap(), root);
        assert_eq!(find_store_dir(Some(&root)).unwrap(), root);
        assert!(find_store_dir(Some(&dir.path().join("elsewhere"))).is_err());
    }
}
