//! Credentials module for password retrieval from an orapass file
//!
//! The orapass file is a colon separated file with one entry per line:
//!
//! ```text
//! host:port:database:username:password
//! ```
//!
//! Each of the first four fields is a case-insensitive literal or `*`, which
//! matches anything. Blank, malformed and commented out lines are ignored.

use crate::config::{
    COMMENT_MARKER, DEFAULT_ORACLE_HOST, DEFAULT_ORACLE_PORT, ENV_ORACLE_HOST, ENV_ORACLE_PORT,
    ENV_ORACLE_SID, ENV_ORACLE_USER, ENV_ORAPASSFILE, FIELD_COUNT, FIELD_SEPARATOR,
    REQUIRED_FILE_MODE, WILDCARD,
};
use crate::environment::Environment;
use crate::errors::{Error, Result};
use crate::logging::Logger;
use crate::platform::PlatformProfile;
use crate::types::{CredentialQuery, CredentialRecord, WildcardPolicy};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One parsed line of an orapass file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry<'a> {
    pub host: &'a str,
    pub port: &'a str,
    pub database: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> FileEntry<'a> {
    /// Split a line into its five fields. The password keeps any further
    /// separators. Returns `None` for lines with fewer than five fields.
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut fields = line.splitn(FIELD_COUNT, FIELD_SEPARATOR);
        Some(Self {
            host: fields.next()?,
            port: fields.next()?,
            database: fields.next()?,
            username: fields.next()?,
            password: fields.next()?,
        })
    }
}

/// Comment lines start with optional spaces followed by `#`
pub fn is_comment(line: &str) -> bool {
    line.trim_start_matches(' ').starts_with(COMMENT_MARKER)
}

/// Compare a search key against the same field from the file
pub fn field_matches(query_value: &str, file_value: &str, policy: WildcardPolicy) -> bool {
    if query_value.to_uppercase() == file_value.to_uppercase() {
        return true;
    }
    file_value == WILDCARD
        && match policy {
            WildcardPolicy::Unconditional => true,
            WildcardPolicy::RequireQueryValue => !query_value.is_empty(),
        }
}

/// The file's value unless it is a wildcard or empty, then the search key
pub fn pick_field(query_value: &str, file_value: &str) -> String {
    if file_value != WILDCARD && !file_value.is_empty() {
        file_value.to_string()
    } else {
        query_value.to_string()
    }
}

fn coalesce<'a>(values: &[Option<&'a str>]) -> &'a str {
    values
        .iter()
        .flatten()
        .find(|v| !v.is_empty())
        .copied()
        .unwrap_or_default()
}

/// Finds the orapass entry for a query.
pub struct CredentialResolver {
    environment: Environment,
    platform: PlatformProfile,
    wildcard_policy: WildcardPolicy,
    logger: Arc<Logger>,
}

impl CredentialResolver {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            platform: PlatformProfile::current(),
            wildcard_policy: WildcardPolicy::default(),
            logger: Arc::new(Logger::disabled()),
        }
    }

    pub fn with_platform(mut self, platform: PlatformProfile) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_wildcard_policy(mut self, policy: WildcardPolicy) -> Self {
        self.wildcard_policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Look up the password entry for `query`.
    ///
    /// Empty search keys are filled from the environment and defaults, the
    /// first orapass file found is permission checked and then scanned. The
    /// first matching entry wins.
    pub fn resolve(&self, query: &CredentialQuery) -> Result<CredentialRecord> {
        let effective = self.effective_query(query);

        let candidates = self.candidate_files(&effective);
        let Some(path) = self.locate_file(&candidates)? else {
            return Err(Error::NoEntryFound { path: None });
        };

        self.check_permissions(&path)?;
        self.search_file(&path, &effective)
    }

    /// Substitute environment overrides and defaults into empty search keys
    pub fn effective_query(&self, query: &CredentialQuery) -> CredentialQuery {
        let env = &self.environment;
        CredentialQuery {
            host: coalesce(&[
                Some(query.host.as_str()),
                env.var(ENV_ORACLE_HOST),
                Some(DEFAULT_ORACLE_HOST),
            ])
            .to_string(),
            port: coalesce(&[
                Some(query.port.as_str()),
                env.var(ENV_ORACLE_PORT),
                Some(DEFAULT_ORACLE_PORT),
            ])
            .to_string(),
            database: coalesce(&[Some(query.database.as_str()), env.var(ENV_ORACLE_SID)])
                .to_string(),
            username: coalesce(&[
                Some(query.username.as_str()),
                env.var(ENV_ORACLE_USER),
                env.os_user(),
            ])
            .to_string(),
            file: query.file.clone(),
        }
    }

    /// Ordered orapass locations: explicit file, `ORAPASSFILE`, then the
    /// platform defaults
    pub fn candidate_files(&self, query: &CredentialQuery) -> Vec<PathBuf> {
        let explicit = query
            .file
            .clone()
            .filter(|f| !f.as_os_str().is_empty());
        let from_env = self.environment.var(ENV_ORAPASSFILE).map(PathBuf::from);

        let candidates: Vec<PathBuf> = explicit
            .into_iter()
            .chain(from_env)
            .chain(self.platform.default_paths(&self.environment))
            .collect();

        for (i, candidate) in candidates.iter().enumerate() {
            self.logger.log_candidate_added(i + 1, candidate);
        }
        candidates
    }

    /// The first candidate that exists and is a regular file
    pub fn locate_file(&self, candidates: &[PathBuf]) -> Result<Option<PathBuf>> {
        for candidate in candidates {
            self.logger.log_candidate_check(candidate);

            let metadata = match fs::metadata(candidate) {
                Ok(metadata) => metadata,
                // A missing file just means trying the next location
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(Error::FileAccess {
                        path: candidate.clone(),
                        source: e,
                    });
                }
            };

            if metadata.is_file() {
                self.logger.log_file_found(candidate);
                return Ok(Some(candidate.clone()));
            }
            self.logger.log_not_regular_file(candidate);
        }

        self.logger.log_no_file_found(candidates.len());
        Ok(None)
    }

    /// Reject files that anyone but the owner can read or write. A no-op
    /// when the platform profile does not enforce permissions.
    pub fn check_permissions(&self, path: &Path) -> Result<()> {
        if !self.platform.enforce_permissions {
            return Ok(());
        }

        let metadata = fs::metadata(path).map_err(|e| Error::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })?;

        match permission_bits(&metadata) {
            Some(actual) if actual != REQUIRED_FILE_MODE => Err(Error::PermissionPolicy {
                path: path.to_path_buf(),
                expected: REQUIRED_FILE_MODE,
                actual,
            }),
            _ => Ok(()),
        }
    }

    /// Scan the orapass file at `path` for the first entry matching `query`
    pub fn search_file(&self, path: &Path, query: &CredentialQuery) -> Result<CredentialRecord> {
        self.logger
            .log_search_start(path, &query.username, &query.database);

        let file = File::open(path).map_err(|e| Error::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.search_reader(BufReader::new(file), path, query)
    }

    /// Scan orapass lines from any reader. `origin` names the source in errors.
    pub fn search_reader<R: BufRead>(
        &self,
        reader: R,
        origin: &Path,
        query: &CredentialQuery,
    ) -> Result<CredentialRecord> {
        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|e| Error::Read {
                path: origin.to_path_buf(),
                source: e,
            })?;

            if is_comment(&line) {
                continue;
            }

            self.logger.log_line_parsed(line_number);
            let Some(entry) = FileEntry::parse(&line) else {
                continue;
            };

            if let Some(record) = self.match_entry(line_number, &entry, query) {
                return Ok(record);
            }
        }

        Err(Error::NoEntryFound {
            path: Some(origin.to_path_buf()),
        })
    }

    fn match_entry(
        &self,
        line_number: usize,
        entry: &FileEntry<'_>,
        query: &CredentialQuery,
    ) -> Option<CredentialRecord> {
        let policy = self.wildcard_policy;
        let checks = [
            ("Host", field_matches(&query.host, entry.host, policy)),
            ("Port", field_matches(&query.port, entry.port, policy)),
            ("DB name", field_matches(&query.database, entry.database, policy)),
            ("Username", field_matches(&query.username, entry.username, policy)),
        ];

        let mut all_match = true;
        for (field, matched) in checks {
            if !matched {
                self.logger.log_field_mismatch(line_number, field);
                all_match = false;
            }
        }
        if !all_match {
            return None;
        }

        self.logger.log_match(line_number);
        Some(CredentialRecord {
            host: pick_field(&query.host, entry.host),
            port: pick_field(&query.port, entry.port),
            database: pick_field(&query.database, entry.database),
            username: entry.username.to_string(),
            password: entry.password.to_string(),
        })
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &fs::Metadata) -> Option<u32> {
    None
}
