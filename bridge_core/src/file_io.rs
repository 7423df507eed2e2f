//! # File I/O
//!
//! Project files live on shared drives and are edited by several engineers,
//! so every write goes through the same guarded path:
//!
//! - **Atomic writes**: write `.tmp`, fsync, rename over the target
//! - **Advisory locks**: an OS lock via `fs2` plus a `.bwp.lock` file naming
//!   the holder
//! - **Schema check**: files written by a newer schema are refused
//!
//! ## Example
//!
//! ```rust,no_run
//! use bridge_core::file_io::{load_project, save_project, FileLock};
//! use bridge_core::project::Project;
//! use std::path::Path;
//!
//! let path = Path::new("kherwara.bwp");
//! let project = Project::new("R. Sharma", "BR-0425", "PWD Udaipur");
//!
//! let lock = FileLock::acquire(path, "rsharma")?;
//! save_project(&project, path)?;
//! drop(lock);
//!
//! let loaded = load_project(path)?;
//! assert_eq!(loaded.meta.job_id, "BR-0425");
//! # Ok::<(), bridge_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Locks older than this are taken over regardless of holder.
const STALE_LOCK_HOURS: i64 = 24;

/// Contents of a `.lock` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (login or email)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process.
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// "user (machine)"
    pub fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive lock on a project file, released on drop.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    // Holds the OS-level lock for the guard's lifetime
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// # Errors
    ///
    /// `FileLocked` if a live lock is held by someone else.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Some(existing) = live_lock(&lock_path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                existing.holder(),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| io_error("create lock", &lock_path, e))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        lock_file
            .write_all(lock_json.as_bytes())
            .map_err(|e| io_error("write lock", &lock_path, e))?;
        lock_file.sync_all().map_err(|e| io_error("sync lock", &lock_path, e))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "lock acquired");

        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Current holder of a live lock, if any, without acquiring it.
    pub fn check(path: &Path) -> Option<LockInfo> {
        live_lock(&lock_path_for(path))
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        tracing::debug!(path = %self.project_path.display(), "lock released");
    }
}

/// `project.bwp` → `project.bwp.lock`
fn lock_path_for(project_path: &Path) -> PathBuf {
    sibling_with_suffix(project_path, "lock")
}

/// `project.bwp` → `project.bwp.<suffix>`
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let extension = sibling
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_extension(extension);
    sibling
}

fn live_lock(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    let info: LockInfo = serde_json::from_str(&contents).ok()?;
    if is_lock_stale(&info) {
        tracing::info!(holder = %info.holder(), "ignoring stale lock");
        None
    } else {
        Some(info)
    }
}

/// A lock is stale when its process is gone (same machine) or it is too old.
fn is_lock_stale(info: &LockInfo) -> bool {
    #[cfg(unix)]
    {
        if hostname().is_some_and(|h| h == info.machine) && fs::metadata(format!("/proc/{}", info.pid)).is_err() {
            return true;
        }
    }
    (Utc::now() - info.locked_at).num_hours() > STALE_LOCK_HOURS
}

fn io_error(operation: &str, path: &Path, e: std::io::Error) -> CalcError {
    CalcError::file_error(operation, path.display().to_string(), e.to_string())
}

/// Write bytes to `path` atomically (tmp file, fsync, rename).
///
/// Used for project files and generated reports alike.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = sibling_with_suffix(path, "tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp_file
        .write_all(bytes)
        .map_err(|e| io_error("write temp file", &tmp_path, e))?;
    tmp_file.sync_all().map_err(|e| io_error("sync temp file", &tmp_path, e))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(())
}

/// Save a project as pretty JSON with atomic write semantics.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(CalcError::serialization)?;
    write_atomic(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), items = project.item_count(), "project saved");
    Ok(())
}

/// Load a project and check its schema version.
///
/// # Errors
///
/// - `FileError` on I/O failure
/// - `SerializationError` on malformed JSON
/// - `VersionMismatch` if the file was written by an incompatible schema
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;

    let project: Project = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid project file {}: {}", path.display(), e)))?;

    validate_version(&project.meta.version)?;

    tracing::debug!(path = %path.display(), items = project.item_count(), "project loaded");
    Ok(project)
}

/// Load a project and report who holds its lock, if anyone.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Accept files with the same major version and, while the schema is 0.x,
/// a minor version no newer than ours.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file = parse_version(file_version).ok_or_else(mismatch)?;
    let current = parse_version(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file.0 != current.0 || (current.0 == 0 && file.1 > current.1) {
        return Err(mismatch());
    }
    Ok(())
}

fn parse_version(v: &str) -> Option<(u32, u32)> {
    let mut parts = v.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{AbutmentInput, CalculationItem};
    use std::env::temp_dir;

    fn temp_project_path(name: &str) -> PathBuf {
        temp_dir().join(format!("bridgeworks_test_{}_{}.bwp", name, std::process::id()))
    }

    #[test]
    fn test_sibling_paths() {
        let project_path = Path::new("/jobs/br-0425/kherwara.bwp");
        assert_eq!(lock_path_for(project_path), Path::new("/jobs/br-0425/kherwara.bwp.lock"));
        assert_eq!(
            sibling_with_suffix(project_path, "tmp"),
            Path::new("/jobs/br-0425/kherwara.bwp.tmp")
        );
        assert_eq!(lock_path_for(Path::new("noext")), Path::new("noext.lock"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_project_path("roundtrip");

        let mut project = Project::new("Test Engineer", "TEST-001", "Test Client");
        let id = project.add_item(CalculationItem::Abutment(AbutmentInput::default()));
        project.settings.criteria.clear_cover_mm = 50.0;
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        assert_eq!(loaded.meta.job_id, "TEST-001");
        assert_eq!(loaded.settings.criteria.clear_cover_mm, 50.0);
        assert_eq!(loaded.get_item(&id).map(|i| i.label()), Some("A1"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_project_path("atomic");
        let tmp_path = sibling_with_suffix(&path, "tmp");

        save_project(&Project::new("Test", "TEST", "Client"), &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_project_path("lock");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "rsharma").unwrap();
        assert_eq!(lock.info.user_id, "rsharma");
        assert_eq!(lock.project_path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());
        assert_eq!(FileLock::check(&path).map(|i| i.user_id), Some("rsharma".to_string()));

        let err = FileLock::acquire(&path, "arao").err().unwrap();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        drop(lock);
        assert!(!lock_path.exists());
        assert!(FileLock::check(&path).is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_old_lock_is_stale() {
        let mut info = LockInfo::new("someone");
        info.machine = "elsewhere".to_string();
        assert!(!is_lock_stale(&info));
        info.locked_at = Utc::now() - chrono::Duration::hours(STALE_LOCK_HOURS + 1);
        assert!(is_lock_stale(&info));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());

        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        let err = validate_version("garbage").unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_project_path("newer");
        let mut project = Project::new("Test", "TEST", "Client");
        project.meta.version = "0.9.0".to_string();
        save_project(&project, &path).unwrap();

        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_project_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_project(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_project_path("lock_check");
        save_project(&Project::new("Test", "TEST", "Client"), &path).unwrap();

        let (loaded, lock_info) = load_project_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.job_id, "TEST");
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }
}
