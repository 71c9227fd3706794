// Library crate for orapass
// This allows integration tests to access the modules

pub mod config;
pub mod credentials;
pub mod environment;
pub mod errors;
pub mod logging;
pub mod platform;
pub mod types;
pub mod validation;

pub use credentials::CredentialResolver;
pub use environment::Environment;
pub use errors::Error;
pub use platform::PlatformProfile;
pub use types::{CredentialQuery, CredentialRecord, WildcardPolicy};
