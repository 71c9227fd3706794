/// Application-wide configuration constants and settings

// Connection defaults
pub const DEFAULT_ORACLE_HOST: &str = "localhost";
pub const DEFAULT_ORACLE_PORT: &str = "1521";

// Environment overrides for the search keys
pub const ENV_ORACLE_HOST: &str = "ORACLE_HOST";
pub const ENV_ORACLE_PORT: &str = "ORACLE_PORT";
pub const ENV_ORACLE_SID: &str = "ORACLE_SID";
pub const ENV_ORACLE_USER: &str = "ORACLE_USER";

// Environment override for the orapass file location
pub const ENV_ORAPASSFILE: &str = "ORAPASSFILE";

// Per-user base directories
pub const ENV_HOME: &str = "HOME";
pub const ENV_APPDATA: &str = "APPDATA";

// Variables consulted, in order, for the logged in user
pub const OS_USER_VARS: [&str; 3] = ["USER", "USERNAME", "LOGNAME"];

// File names checked under the per-user directory, in order
pub const ORAPASS_FILE_NAMES: [&str; 2] = [".orapass", "orapass"];
pub const WINDOWS_ORAPASS_SUBDIR: &str = "oracle";

// File format
pub const FIELD_SEPARATOR: char = ':';
pub const FIELD_COUNT: usize = 5;
pub const WILDCARD: &str = "*";
pub const COMMENT_MARKER: char = '#';

// Owner read/write only
pub const REQUIRED_FILE_MODE: u32 = 0o600;

// Port bounds for command-line validation
pub const MIN_PORT: u32 = 1;
pub const MAX_PORT: u32 = 65535;
