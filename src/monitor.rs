//! The daily event monitor: a date-keyed record of observed headlines.
//!
//! One JSON object on disk, mapping `YYYY-MM-DD` local dates to the headline
//! observed that day. The map is insertion-ordered (serde_json's
//! `preserve_order` feature), so untouched entries keep their on-disk order
//! across a load/mutate/save cycle and new dates append at the end.
//!
//! Loading fails open: a missing or mangled backing file yields an empty
//! monitor rather than an error, since a bad on-disk state must never stop
//! today's observation from being recorded. Saving is the opposite — write
//! failures propagate, because losing the day's entry silently is the one
//! unacceptable outcome.

use crate::errors::StoreError;
use crate::utils::atomic_write_json;
use chrono::Local;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Append-only record of one observed headline per calendar date.
///
/// The date key is computed from wall-clock time at the moment of mutation,
/// never passed by the caller, so repeated runs on the same day overwrite
/// the day's value instead of duplicating it. The monitor tracks "the
/// headline as of each day", not every scrape event.
#[derive(Debug)]
pub struct DailyEventMonitor {
    file_path: PathBuf,
    entries: Map<String, Value>,
}

impl DailyEventMonitor {
    /// Load the monitor from its backing file.
    ///
    /// A missing, unreadable, or malformed file logs a diagnostic and yields
    /// an empty monitor. Never returns an error.
    pub fn load<P: Into<PathBuf>>(path: P) -> Self {
        let file_path = path.into();
        let entries = match fs::read_to_string(&file_path) {
            Ok(raw) => match serde_json::from_str::<Map<String, Value>>(&raw) {
                Ok(map) if map.values().all(Value::is_string) => map,
                Ok(_) => {
                    warn!(
                        path = %file_path.display(),
                        "Backing file holds non-string values; starting empty"
                    );
                    Map::new()
                }
                Err(e) => {
                    warn!(
                        path = %file_path.display(),
                        error = %e,
                        "Backing file is not a valid JSON object; starting empty"
                    );
                    Map::new()
                }
            },
            Err(e) => {
                info!(
                    path = %file_path.display(),
                    error = %e,
                    "No readable backing file; starting empty"
                );
                Map::new()
            }
        };
        Self { file_path, entries }
    }

    /// Path of the backing file this monitor loads from and saves to.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Record `headline` under today's local date, replacing any value
    /// already recorded for the date.
    ///
    /// Empty headlines are ignored with a warning. Callers are expected to
    /// pre-filter empties, but the guard keeps a failed scrape from ever
    /// blanking out a day that already has a value.
    pub fn add_today(&mut self, headline: &str) {
        let date = Local::now().date_naive().to_string();
        self.add(&date, headline);
    }

    fn add(&mut self, date: &str, headline: &str) {
        if headline.is_empty() {
            warn!(%date, "Ignoring empty headline");
            return;
        }
        // Insert keeps the key's original position when overwriting.
        self.entries
            .insert(date.to_string(), Value::String(headline.to_string()));
        info!(%date, %headline, "Recorded headline");
    }

    /// Persist the full record to the backing file.
    ///
    /// The write goes through a temp file and an atomic rename, so a
    /// concurrent reader sees either the old complete file or the new one,
    /// never a partial write.
    #[instrument(level = "info", skip(self), fields(path = %self.file_path.display()))]
    pub fn save(&self) -> Result<(), StoreError> {
        atomic_write_json(&self.file_path, &self.entries)?;
        info!(entries = self.entries.len(), "Saved daily event monitor");
        Ok(())
    }

    /// Current in-memory state in on-disk order, for diagnostics.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(date, value)| (date.as_str(), value.as_str().unwrap_or_default()))
    }

    /// Number of recorded dates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn data_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("headlines.json")
    }

    #[test]
    fn load_missing_file_yields_empty_monitor() {
        let temp = tempdir().unwrap();
        let monitor = DailyEventMonitor::load(data_path(&temp));

        assert!(monitor.is_empty());
    }

    #[test]
    fn load_malformed_file_yields_empty_monitor() {
        let temp = tempdir().unwrap();
        let path = data_path(&temp);
        fs::write(&path, "not json at all {{{").unwrap();

        let monitor = DailyEventMonitor::load(&path);

        assert!(monitor.is_empty());
    }

    #[test]
    fn load_rejects_non_string_values() {
        let temp = tempdir().unwrap();
        let path = data_path(&temp);
        fs::write(&path, r#"{"2024-01-01": 42}"#).unwrap();

        let monitor = DailyEventMonitor::load(&path);

        assert!(monitor.is_empty());
    }

    #[test]
    fn load_never_touches_the_backing_file() {
        let temp = tempdir().unwrap();
        let path = data_path(&temp);
        let original = r#"{"2024-01-01": "Old headline"}"#;
        fs::write(&path, original).unwrap();

        let mut monitor = DailyEventMonitor::load(&path);
        monitor.add_today("");

        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn add_today_save_load_round_trip() {
        let temp = tempdir().unwrap();
        let path = data_path(&temp);

        let mut monitor = DailyEventMonitor::load(&path);
        monitor.add_today("Penn announces new dean");
        monitor.save().unwrap();

        let reloaded = DailyEventMonitor::load(&path);
        let today = Local::now().date_naive().to_string();
        let entries: Vec<_> = reloaded.entries().collect();

        assert_eq!(entries, vec![(today.as_str(), "Penn announces new dean")]);
    }

    #[test]
    fn same_day_rerun_overwrites_without_duplicating() {
        let temp = tempdir().unwrap();
        let mut monitor = DailyEventMonitor::load(data_path(&temp));

        monitor.add("2024-01-03", "Headline A");
        monitor.add("2024-01-03", "Headline B");

        let entries: Vec<_> = monitor.entries().collect();
        assert_eq!(entries, vec![("2024-01-03", "Headline B")]);
    }

    #[test]
    fn rerun_last_write_wins_across_save_load_cycles() {
        let temp = tempdir().unwrap();
        let path = data_path(&temp);

        let mut first = DailyEventMonitor::load(&path);
        first.add("2024-01-03", "Headline A");
        first.save().unwrap();

        let mut second = DailyEventMonitor::load(&path);
        second.add("2024-01-03", "Headline B");
        second.save().unwrap();

        let on_disk: Map<String, Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk["2024-01-03"], "Headline B");
    }

    #[test]
    fn empty_headline_is_a_no_op() {
        let temp = tempdir().unwrap();
        let mut monitor = DailyEventMonitor::load(data_path(&temp));
        monitor.add("2024-01-01", "Old headline");

        monitor.add("2024-01-01", "");
        monitor.add_today("");

        let entries: Vec<_> = monitor.entries().collect();
        assert_eq!(entries, vec![("2024-01-01", "Old headline")]);
    }

    #[test]
    fn new_date_appends_after_existing_entries() {
        let temp = tempdir().unwrap();
        let path = data_path(&temp);
        fs::write(&path, r#"{"2024-01-01": "Old headline"}"#).unwrap();

        let mut monitor = DailyEventMonitor::load(&path);
        monitor.add("2024-01-02", "New headline");
        monitor.save().unwrap();

        let on_disk: Map<String, Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<_> = on_disk.keys().cloned().collect();

        assert_eq!(keys, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(on_disk["2024-01-01"], "Old headline");
        assert_eq!(on_disk["2024-01-02"], "New headline");
    }

    #[test]
    fn overwrite_preserves_entry_order() {
        let temp = tempdir().unwrap();
        let path = data_path(&temp);
        fs::write(
            &path,
            r#"{"2024-01-01": "First", "2024-01-02": "Second", "2024-01-03": "Third"}"#,
        )
        .unwrap();

        let mut monitor = DailyEventMonitor::load(&path);
        monitor.add("2024-01-02", "Second, revised");
        monitor.save().unwrap();

        let reloaded = DailyEventMonitor::load(&path);
        let entries: Vec<_> = reloaded.entries().collect();
        assert_eq!(
            entries,
            vec![
                ("2024-01-01", "First"),
                ("2024-01-02", "Second, revised"),
                ("2024-01-03", "Third"),
            ]
        );
    }

    #[test]
    fn saved_file_is_valid_json() {
        let temp = tempdir().unwrap();
        let path = data_path(&temp);

        let mut monitor = DailyEventMonitor::load(&path);
        monitor.add("2024-01-01", "Quotes \"and\" newlines\nsurvive");
        monitor.save().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: Map<String, Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["2024-01-01"], "Quotes \"and\" newlines\nsurvive");
    }

    #[test]
    #[cfg(unix)]
    fn failed_save_leaves_previous_file_intact() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let path = data_path(&temp);

        let mut monitor = DailyEventMonitor::load(&path);
        monitor.add("2024-01-01", "Old headline");
        monitor.save().unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A read-only directory rejects the temp file, so the rename never happens.
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o555)).unwrap();
        monitor.add("2024-01-02", "New headline");
        let result = monitor.save();
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o755)).unwrap();

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
