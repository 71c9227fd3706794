use crate::types::LogFormat;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Context for structured logging with optional fields
#[derive(Default)]
pub struct LogContext<'a> {
    pub path: Option<&'a str>,
    pub candidate: Option<usize>,
    pub line_number: Option<usize>,
    pub field: Option<&'a str>,
    pub username: Option<&'a str>,
    pub database: Option<&'a str>,
    pub status: Option<&'a str>,
    pub error: Option<&'a str>,
}

/// JSON log event structure
#[derive(Serialize)]
struct LogEvent<'a> {
    timestamp: &'a str,
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

// Buffer size for BufWriter (8KB default)
const LOG_BUFFER_SIZE: usize = 8192;

/// Debug trace sink. Writes to stderr and, optionally, a log file.
/// A logger that is not enabled writes nothing at all.
#[derive(Clone)]
pub struct Logger {
    enabled: bool,
    json_mode: bool,
    log_file: Option<String>,
    file_handle: Arc<Mutex<Option<BufWriter<File>>>>,
}

impl Logger {
    pub fn new(enabled: bool, log_format: LogFormat) -> Self {
        Self {
            enabled,
            json_mode: log_format == LogFormat::Json,
            log_file: None,
            file_handle: Arc::new(Mutex::new(None)),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, LogFormat::Text)
    }

    /// Also append every trace line to `log_file`
    pub fn with_log_file(mut self, log_file: impl Into<String>) -> Self {
        self.log_file = Some(log_file.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Ensure the file handle is initialized, creating it if necessary.
    /// Returns true if the file handle is available, false otherwise.
    fn ensure_file_handle(&self) -> bool {
        let Some(log_file) = self.log_file.as_deref() else {
            return false;
        };

        let mut guard = match self.file_handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if guard.is_some() {
            return true;
        }

        match OpenOptions::new().create(true).append(true).open(log_file) {
            Ok(file) => {
                *guard = Some(BufWriter::with_capacity(LOG_BUFFER_SIZE, file));
                true
            }
            Err(e) => {
                eprintln!(
                    "Failed to open log file '{}': {}. Logging to file will be disabled.",
                    log_file, e
                );
                false
            }
        }
    }

    fn get_timestamp(&self) -> String {
        chrono::Utc::now()
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string()
    }

    fn format_message(&self, level: LogLevel, message: &str, context: &LogContext<'_>) -> String {
        let timestamp = self.get_timestamp();
        let level_str = level.as_str();

        if self.json_mode {
            let event = LogEvent {
                timestamp: &timestamp,
                level: level_str,
                message,
                path: context.path,
                candidate: context.candidate,
                line_number: context.line_number,
                field: context.field,
                username: context.username,
                database: context.database,
                status: context.status,
                error: context.error,
            };
            format!(
                "{}\n",
                serde_json::to_string(&event).unwrap_or_else(|_| {
                    // Fallback to a minimal event on serialization error
                    format!(
                        "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{:?}}}",
                        timestamp, level_str, message
                    )
                })
            )
        } else {
            format!("[{}] [{}] {}\n", timestamp, level_str, message)
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        self.log_with_context(level, message, LogContext::default());
    }

    pub fn log_with_context(&self, level: LogLevel, message: &str, context: LogContext<'_>) {
        if !self.enabled {
            return;
        }

        let formatted_message = self.format_message(level, message, &context);

        // stdout carries the password, traces go to stderr
        eprint!("{}", formatted_message);

        if self.ensure_file_handle() {
            let mut guard = match self.file_handle.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };

            if let Some(ref mut writer) = *guard {
                if let Err(e) = writer.write_all(formatted_message.as_bytes()) {
                    eprintln!("Failed to write to log file: {}", e);
                    *guard = None;
                } else if matches!(level, LogLevel::Error)
                    && let Err(e) = writer.flush()
                {
                    eprintln!("Failed to flush log file: {}", e);
                }
            }
        }
    }

    pub fn flush(&self) {
        let mut guard = match self.file_handle.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(ref mut writer) = *guard
            && let Err(e) = writer.flush()
        {
            eprintln!("Failed to flush log file: {}", e);
        }
    }

    pub fn log_candidate_added(&self, candidate: usize, path: &Path) {
        let path = path.display().to_string();
        let context = LogContext {
            path: Some(&path),
            candidate: Some(candidate),
            status: Some("queued"),
            ..Default::default()
        };
        self.log_with_context(
            LogLevel::Debug,
            &format!("Adding {:?} to search list", path),
            context,
        );
    }

    pub fn log_candidate_check(&self, path: &Path) {
        let path = path.display().to_string();
        let context = LogContext {
            path: Some(&path),
            status: Some("checking"),
            ..Default::default()
        };
        self.log_with_context(
            LogLevel::Debug,
            &format!("Looking for file {:?}", path),
            context,
        );
    }

    pub fn log_file_found(&self, path: &Path) {
        let path = path.display().to_string();
        let context = LogContext {
            path: Some(&path),
            status: Some("found"),
            ..Default::default()
        };
        self.log_with_context(LogLevel::Info, &format!("Found {:?}", path), context);
    }

    pub fn log_not_regular_file(&self, path: &Path) {
        let path = path.display().to_string();
        let context = LogContext {
            path: Some(&path),
            status: Some("skipped"),
            ..Default::default()
        };
        self.log_with_context(
            LogLevel::Warning,
            &format!("{:?} is not a regular file", path),
            context,
        );
    }

    pub fn log_no_file_found(&self, searched: usize) {
        let context = LogContext {
            candidate: Some(searched),
            status: Some("not_found"),
            ..Default::default()
        };
        self.log_with_context(
            LogLevel::Warning,
            &format!("No orapass file found ({} locations searched)", searched),
            context,
        );
    }

    pub fn log_search_start(&self, path: &Path, username: &str, database: &str) {
        let path = path.display().to_string();
        let context = LogContext {
            path: Some(&path),
            username: Some(username),
            database: Some(database),
            status: Some("searching"),
            ..Default::default()
        };
        self.log_with_context(
            LogLevel::Info,
            &format!("Searching {:?} for {}/{}", path, username, database),
            context,
        );
    }

    pub fn log_line_parsed(&self, line_number: usize) {
        let context = LogContext {
            line_number: Some(line_number),
            ..Default::default()
        };
        self.log_with_context(
            LogLevel::Debug,
            &format!("    Parsing line {}", line_number),
            context,
        );
    }

    pub fn log_field_mismatch(&self, line_number: usize, field: &str) {
        let context = LogContext {
            line_number: Some(line_number),
            field: Some(field),
            status: Some("mismatch"),
            ..Default::default()
        };
        self.log_with_context(
            LogLevel::Debug,
            &format!("        {} does not match", field),
            context,
        );
    }

    pub fn log_match(&self, line_number: usize) {
        let context = LogContext {
            line_number: Some(line_number),
            status: Some("matched"),
            ..Default::default()
        };
        self.log_with_context(LogLevel::Info, "        Match detected", context);
    }

    pub fn log_failure(&self, error: &str) {
        let context = LogContext {
            status: Some("failed"),
            error: Some(error),
            ..Default::default()
        };
        self.log_with_context(
            LogLevel::Error,
            &format!("Lookup failed: {}", error),
            context,
        );
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}
