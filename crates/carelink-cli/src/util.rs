//! Utility functions for CLI operations.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use carelink_core::CareLinkSnapshot;

/// Read the whole input document from `path`, or stdin when `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot from {}", path.display())),
        _ => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read snapshot from stdin")?;
            Ok(content)
        }
    }
}

/// Parse a snapshot document, naming its source on failure.
pub fn parse_snapshot(content: &str, path: Option<&Path>) -> Result<CareLinkSnapshot> {
    let source = match path {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => "stdin".to_string(),
    };
    serde_json::from_str(content)
        .with_context(|| format!("Failed to parse CareLink snapshot from {}", source))
}

/// Read and parse a snapshot from `path` or stdin.
pub fn load_snapshot(path: Option<&Path>) -> Result<CareLinkSnapshot> {
    let content = read_input(path)?;
    parse_snapshot(&content, path)
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), "{}");
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Some(Path::new("/nonexistent/snapshot.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read snapshot"));
    }

    #[test]
    fn test_parse_snapshot_names_source() {
        let err = parse_snapshot("not json", Some(Path::new("snap.json"))).unwrap_err();
        assert!(err.to_string().contains("snap.json"));

        let err = parse_snapshot("not json", None).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn test_parse_snapshot() {
        let snapshot = parse_snapshot(
            r#"{
                "currentServerTime": 5,
                "lastMedicalDeviceDataUpdateServerTime": 4,
                "medicalDeviceFamily": "Paradigm"
            }"#,
            None,
        )
        .unwrap();
        assert_eq!(snapshot.current_server_time, 5);
        assert_eq!(snapshot.medical_device_family, "Paradigm");
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output(Some(&path), "[]\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }
}
