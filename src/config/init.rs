use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, ColorMode, Config};
use crate::dashboard::DEFAULT_UPCOMING_LIMIT;
use crate::student::{save_snapshot, Snapshot, StudentProfile};

/// Answers for the starter profile. Anything left `None` is asked for when
/// stdin is a terminal, and left blank otherwise.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub config_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
    pub first_name: Option<String>,
    pub grade: Option<u8>,
    pub force: bool,
}

/// What init wrote
#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub config_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub snapshot_created: bool,
}

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Ask for a grade until the answer is blank or between 6 and 12.
fn prompt_grade() -> Result<Option<u8>> {
    loop {
        let input = prompt("Grade (6-12, blank to skip): ")?;
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<u8>() {
            Ok(g) if (6..=12).contains(&g) => return Ok(Some(g)),
            _ => println!("  Invalid: enter a whole number from 6 to 12. Try again."),
        }
    }
}

fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

/// Write a starter config and, if none exists yet, an empty snapshot.
///
/// An existing config is only replaced with `force`. An existing snapshot is
/// never replaced: it holds the student's data.
pub fn run_init(options: InitOptions) -> Result<InitOutcome> {
    let config_path = match options.config_path {
        Some(p) => crate::config::expand_home(&p),
        None => get_config_path()?,
    };
    let snapshot_path = match options.snapshot_path {
        Some(p) => crate::config::expand_home(&p),
        None => config_path
            .parent()
            .map(|dir| dir.join("snapshot.yaml"))
            .unwrap_or_else(|| PathBuf::from("snapshot.yaml")),
    };

    if config_path.exists() && !options.force {
        anyhow::bail!(
            "Config already exists at {}. Pass --force to overwrite",
            config_path.display()
        );
    }

    let config = Config {
        snapshot: Some(snapshot_path.clone()),
        upcoming_limit: Some(DEFAULT_UPCOMING_LIMIT),
        colors: Some(ColorMode::Auto),
        source_dir: None,
    };
    write_config(&config_path, &config)?;
    tracing::info!(path = %config_path.display(), "wrote config");

    let snapshot_created = if snapshot_path.exists() {
        tracing::info!(path = %snapshot_path.display(), "keeping existing snapshot");
        false
    } else {
        let interactive = std::io::stdin().is_terminal();
        let first_name = match options.first_name {
            Some(name) => Some(name),
            None if interactive => Some(prompt("First name (blank to skip): ")?).filter(|s| !s.is_empty()),
            None => None,
        };
        let grade = match options.grade {
            Some(g) => Some(g),
            None if interactive => prompt_grade()?,
            None => None,
        };

        let mut snapshot = Snapshot::new();
        snapshot.profile = Some(StudentProfile {
            first_name,
            grade,
            ..StudentProfile::default()
        });
        save_snapshot(&snapshot_path, &snapshot)?;
        tracing::info!(path = %snapshot_path.display(), "wrote starter snapshot");
        true
    };

    Ok(InitOutcome {
        config_path,
        snapshot_path,
        snapshot_created,
    })
}
