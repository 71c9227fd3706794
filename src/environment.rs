//! Environment lookups used while resolving a query.
//!
//! The resolver never reads process state directly. It asks an `Environment`,
//! which is either a snapshot of the running process or a hand-built value.

use crate::config::{ENV_APPDATA, ENV_HOME, OS_USER_VARS};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
    os_user: Option<String>,
}

impl Environment {
    /// An environment with no variables and no known OS user
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment
    pub fn from_process() -> Self {
        // Variables that are not valid unicode are left out
        let mut vars: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(name, value)| {
                Some((name.into_string().ok()?, value.into_string().ok()?))
            })
            .collect();

        if !vars.get(ENV_HOME).is_some_and(|v| !v.is_empty())
            && let Some(home) = dirs::home_dir()
        {
            vars.insert(ENV_HOME.to_string(), home.to_string_lossy().into_owned());
        }
        if cfg!(windows)
            && !vars.get(ENV_APPDATA).is_some_and(|v| !v.is_empty())
            && let Some(appdata) = dirs::config_dir()
        {
            vars.insert(
                ENV_APPDATA.to_string(),
                appdata.to_string_lossy().into_owned(),
            );
        }

        let os_user = OS_USER_VARS
            .iter()
            .filter_map(|name| vars.get(*name))
            .find(|v| !v.is_empty())
            .cloned();

        Self { vars, os_user }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with_os_user(mut self, user: impl Into<String>) -> Self {
        self.os_user = Some(user.into());
        self
    }

    /// Value of `name`, treating an empty value as unset
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The logged in user, if known
    pub fn os_user(&self) -> Option<&str> {
        self.os_user.as_deref().filter(|u| !u.is_empty())
    }
}
