use crate::config::{ENV_APPDATA, ENV_HOME, ORAPASS_FILE_NAMES, WINDOWS_ORAPASS_SUBDIR};
use crate::environment::Environment;
use std::path::PathBuf;

/// Platform capabilities the resolver depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    /// Variable naming the per-user directory the default files live under
    pub base_dir_var: &'static str,
    /// Directory between the base directory and the file names
    pub subdirectory: Option<&'static str>,
    /// Reject files whose mode is not exactly 0600
    pub enforce_permissions: bool,
}

impl PlatformProfile {
    pub const UNIX: PlatformProfile = PlatformProfile {
        base_dir_var: ENV_HOME,
        subdirectory: None,
        enforce_permissions: true,
    };

    pub const WINDOWS: PlatformProfile = PlatformProfile {
        base_dir_var: ENV_APPDATA,
        subdirectory: Some(WINDOWS_ORAPASS_SUBDIR),
        enforce_permissions: false,
    };

    /// Profile of the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::WINDOWS
        } else {
            Self::UNIX
        }
    }

    /// Default orapass locations, dotfile first. Empty when the base
    /// directory is unknown.
    pub fn default_paths(&self, env: &Environment) -> Vec<PathBuf> {
        let Some(base) = env.var(self.base_dir_var) else {
            return Vec::new();
        };

        let mut dir = PathBuf::from(base);
        if let Some(subdirectory) = self.subdirectory {
            dir.push(subdirectory);
        }

        ORAPASS_FILE_NAMES.iter().map(|name| dir.join(name)).collect()
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::current()
    }
}
