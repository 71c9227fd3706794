/// Validation module for command-line arguments

use crate::config::{MAX_PORT, MIN_PORT};
use anyhow::Result;

/// Validate command-line arguments
///
/// Validates:
/// - Port (if provided and not empty) is a number in the valid TCP range
/// - Orapass file (if provided) is not whitespace only
///
/// An empty value means the flag is unspecified and is not an error.
pub fn validate_arguments(port: Option<&str>, file: Option<&str>) -> Result<()> {
    if let Some(port) = port.filter(|p| !p.is_empty()) {
        let valid = port
            .parse::<u32>()
            .is_ok_and(|p| (MIN_PORT..=MAX_PORT).contains(&p));
        if !valid {
            return Err(anyhow::anyhow!(
                "Port ({}) must be a number between {} and {}",
                port,
                MIN_PORT,
                MAX_PORT
            ));
        }
    }

    if let Some(file) = file
        && !file.is_empty()
        && file.trim().is_empty()
    {
        return Err(anyhow::anyhow!(
            "Orapass file path cannot be blank. Omit -f to use the default locations."
        ));
    }

    Ok(())
}
