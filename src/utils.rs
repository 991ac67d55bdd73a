#[cfg(test)]
use mockall::automock;

// Trait for environment variable access (mockable in tests)
#[cfg_attr(test, automock)]
pub trait EnvProvider {
    fn var(&self, key: &str) -> Result<String, std::env::VarError>;
}

// Default implementation that reads the process environment
#[derive(Default, Clone, Copy)]
pub struct StdEnvProvider;

impl EnvProvider for StdEnvProvider {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(key)
    }
}

/// Parse a boolean the way platform tooling spells them in environment
/// variables. Returns `None` for anything unrecognised.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
