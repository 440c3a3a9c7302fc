//! File system helpers: atomic JSON writes, directory validation, and the
//! end-of-run diagnostic dumps.

use crate::errors::StoreError;
use std::error::Error;
use std::fs as stdfs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Atomically write a value as pretty-printed JSON using a temp file +
/// rename strategy.
///
/// The temp file is created in the destination directory so the final
/// rename stays on one filesystem and replaces the target in a single step.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    stdfs::create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&mut temp_file);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    // Persist replaces the destination path atomically
    temp_file.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Data directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Directories skipped by the tree dump.
const IGNORED_DIRS: &[&str] = &[".git", "target"];

/// Log a recursive listing of `root`, one entry per line, for operator
/// visibility in the run log.
pub fn log_tree(root: &Path) {
    info!(path = %root.display(), "Printing tree of files/dirs");
    log_tree_level(root, 0);
}

fn log_tree_level(dir: &Path, depth: usize) {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    let indent = "    ".repeat(depth);
    info!("{indent}+--{name}/");

    let Ok(read) = stdfs::read_dir(dir) else {
        warn!(path = %dir.display(), "Could not read directory");
        return;
    };
    let mut paths: Vec<_> = read.flatten().map(|entry| entry.path()).collect();
    paths.sort();

    for path in &paths {
        if path.is_dir() {
            let skip = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| IGNORED_DIRS.contains(&n));
            if !skip {
                log_tree_level(path, depth + 1);
            }
        } else if let Some(file_name) = path.file_name() {
            info!("{indent}    +--{}", file_name.to_string_lossy());
        }
    }
}

/// Log the contents of a file, typically the persisted data file.
pub fn log_file_contents(path: &Path) {
    info!(path = %path.display(), "Printing contents of data file");
    match stdfs::read_to_string(path) {
        Ok(contents) => info!("\n{contents}"),
        Err(e) => warn!(path = %path.display(), error = %e, "Could not read data file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_json_round_trips() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("out.json");

        atomic_write_json(&path, &json!({"a": 1, "b": "two"})).unwrap();

        let raw = stdfs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["a"], 1);
        assert_eq!(value["b"], "two");
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn atomic_write_json_creates_missing_parent_dirs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested/deeper/out.json");

        atomic_write_json(&path, &json!({})).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn atomic_write_json_replaces_existing_content() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("out.json");

        atomic_write_json(&path, &json!({"v": "old"})).unwrap();
        atomic_write_json(&path, &json!({"v": "new"})).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&stdfs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["v"], "new");
    }

    #[tokio::test]
    async fn ensure_writable_dir_creates_and_probes() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("data");

        ensure_writable_dir(dir.to_str().unwrap()).await.unwrap();

        assert!(dir.is_dir());
        // The probe file is cleaned up.
        assert_eq!(stdfs::read_dir(&dir).unwrap().count(), 0);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn ensure_writable_dir_rejects_read_only_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let dir = temp.path().join("data");
        stdfs::create_dir(&dir).unwrap();
        stdfs::set_permissions(&dir, stdfs::Permissions::from_mode(0o555)).unwrap();

        let result = ensure_writable_dir(dir.to_str().unwrap()).await;
        stdfs::set_permissions(&dir, stdfs::Permissions::from_mode(0o755)).unwrap();

        assert!(result.is_err());
    }
}
