//! Tests for debug trace logging
//! Verifies log file creation, text and JSON formats, and that a disabled logger stays silent

use orapass::logging::{LogLevel, Logger};
use orapass::types::LogFormat;
use orapass::{CredentialQuery, CredentialResolver, Environment, PlatformProfile};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_orapass(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("orapass");
    fs::write(
        &path,
        "# test file\nlocalhost:1521:emp:walter:nope\nlocalhost:1521:emp:scott:tiger\n",
    )
    .unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
    }
    path
}

fn lookup(logger: Arc<Logger>, file: &Path) {
    let resolver = CredentialResolver::new(Environment::new())
        .with_platform(PlatformProfile::UNIX)
        .with_logger(Arc::clone(&logger));
    let record = resolver
        .resolve(
            &CredentialQuery::new()
                .with_database("emp")
                .with_username("scott")
                .with_file(file),
        )
        .unwrap();
    assert_eq!(record.password, "tiger");
    logger.flush();
}

#[test]
fn test_trace_written_to_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_orapass(temp_dir.path());
    let log_file = temp_dir.path().join("trace.log");

    let logger = Logger::new(true, LogFormat::Text).with_log_file(log_file.to_str().unwrap());
    lookup(Arc::new(logger), &file);

    let content = fs::read_to_string(&log_file).unwrap();
    assert!(content.contains("Adding"));
    assert!(content.contains("Found"));
    assert!(content.contains("Parsing line 2"));
    assert!(content.contains("Username does not match"));
    assert!(content.contains("Match detected"));
    assert!(content.contains("[DEBUG]"));
    // The comment line is skipped before parsing
    assert!(!content.contains("Parsing line 1"));
    // Passwords never reach the trace
    assert!(!content.contains("tiger"));
}

#[test]
fn test_disabled_logger_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_orapass(temp_dir.path());
    let log_file = temp_dir.path().join("trace.log");

    let logger = Logger::new(false, LogFormat::Text).with_log_file(log_file.to_str().unwrap());
    assert!(!logger.is_enabled());
    lookup(Arc::new(logger), &file);

    assert!(!log_file.exists(), "Disabled logger should not create the log file");
}

#[test]
fn test_json_trace_lines() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_orapass(temp_dir.path());
    let log_file = temp_dir.path().join("trace.jsonl");

    let logger = Logger::new(true, LogFormat::Json).with_log_file(log_file.to_str().unwrap());
    lookup(Arc::new(logger), &file);

    let content = fs::read_to_string(&log_file).unwrap();
    let events: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(!events.is_empty());
    for event in &events {
        assert!(event.get("timestamp").is_some());
        assert!(event.get("level").is_some());
        assert!(event.get("message").is_some());
    }

    let matched = events
        .iter()
        .find(|e| e["status"] == "matched")
        .expect("match event");
    assert_eq!(matched["line_number"], 3);
    assert_eq!(matched["level"], "INFO");

    let mismatch = events
        .iter()
        .find(|e| e["status"] == "mismatch")
        .expect("mismatch event");
    assert_eq!(mismatch["field"], "Username");
}

#[test]
fn test_error_level_is_flushed_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let log_file = temp_dir.path().join("errors.log");

    let logger = Logger::new(true, LogFormat::Text).with_log_file(log_file.to_str().unwrap());
    logger.log_failure("Could not find a suitable password entry");

    // No explicit flush and the logger is still alive
    let content = fs::read_to_string(&log_file).unwrap();
    assert!(content.contains("[ERROR] Lookup failed: Could not find a suitable password entry"));

    logger.log(LogLevel::Info, "still usable");
    drop(logger);
    let content = fs::read_to_string(&log_file).unwrap();
    assert!(content.contains("[INFO] still usable"));
}

#[test]
fn test_log_file_is_appended() {
    let temp_dir = TempDir::new().unwrap();
    let log_file = temp_dir.path().join("append.log");
    fs::write(&log_file, "existing line\n").unwrap();

    let logger = Logger::new(true, LogFormat::Text).with_log_file(log_file.to_str().unwrap());
    logger.log(LogLevel::Warning, "new line");
    drop(logger);

    let content = fs::read_to_string(&log_file).unwrap();
    assert!(content.starts_with("existing line\n"));
    assert!(content.contains("[WARN] new line"));
}
