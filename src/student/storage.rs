use super::types::Snapshot;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get the default snapshot path (~/.config/college-ready/snapshot.yaml)
pub fn get_snapshot_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("snapshot.yaml"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Load a student snapshot from a YAML or JSON file (chosen by extension).
///
/// Collections missing from the file load as empty. A snapshot written by an
/// unsupported version is rejected.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        anyhow::bail!(
            "Snapshot not found at {}. Run `college-ready init` to create one",
            path.display()
        );
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot at {}", path.display()))?;

    let snapshot: Snapshot = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: invalid JSON in {}", path.display()))?,
        SnapshotFormat::Yaml => serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: invalid YAML in {}", path.display()))?,
    };

    if snapshot.version != Snapshot::VERSION {
        anyhow::bail!("Unsupported snapshot version: {}", snapshot.version);
    }

    tracing::debug!(
        path = %path.display(),
        activities = snapshot.activities.len(),
        colleges = snapshot.colleges.len(),
        essays = snapshot.essays.len(),
        scholarships = snapshot.scholarships.len(),
        tasks = snapshot.tasks.len(),
        "loaded snapshot"
    );

    Ok(snapshot)
}

/// Save a snapshot atomically so a crash never leaves a half-written file.
/// Creates the parent directory if needed.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => {
            serde_json::to_writer_pretty(&mut file, snapshot)
                .context("Failed to serialize snapshot")?;
        }
        SnapshotFormat::Yaml => {
            let yaml = serde_saphyr::to_string(snapshot)
                .map_err(|e| anyhow::anyhow!("Failed to serialize snapshot: {}", e))?;
            file.write_all(yaml.as_bytes())
                .context("Failed to write snapshot")?;
        }
    }

    file.commit().context("Failed to save snapshot")?;
    tracing::debug!(path = %path.display(), "saved snapshot");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::types::{Activity, CollegeCategory, CollegeListEntry, ApplicationType};
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.activities.push(Activity {
            name: "Robotics".to_string(),
            ..Activity::default()
        });
        snapshot.colleges.push(CollegeListEntry {
            id: "c1".to_string(),
            college_name: "Carleton College".to_string(),
            city: Some("Northfield".to_string()),
            state: Some("MN".to_string()),
            category: CollegeCategory::Target,
            application_type: ApplicationType::RD,
        });
        snapshot
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let err = load_snapshot(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("Snapshot not found"));
    }

    #[test]
    fn test_save_and_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("snapshot.yaml");

        save_snapshot(&path, &sample_snapshot()).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, sample_snapshot());
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");

        save_snapshot(&path, &sample_snapshot()).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.trim_start().starts_with('{'));

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.colleges.len(), 1);
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.yaml");
        fs::write(&path, "version: 7\n").unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported snapshot version: 7"));
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.yaml");
        fs::write(&path, "version: [unclosed\n").unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));
    }
}
