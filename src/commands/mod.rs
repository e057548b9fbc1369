//! CLI command implementations

pub mod ask;
pub mod ingest;
pub mod key;
pub mod library;
pub mod progress;
pub mod teach;
pub mod topics;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::openai::{ApiKeyManager, OpenAiClient};

/// Build an API client from the configured key
pub fn client() -> Result<OpenAiClient> {
    let api_key = ApiKeyManager::get_api_key()?;
    Ok(OpenAiClient::new(api_key))
}

/// Resolve which textbook a command should use: explicit flag first, then
/// the configured default
pub fn resolve_textbook(flag: Option<String>, config: &Config) -> Result<String> {
    if let Some(name) = flag {
        return Ok(name);
    }
    match &config.default_textbook {
        Some(name) => Ok(name.clone()),
        None => bail!("No textbook selected. Pass --textbook or ingest one first."),
    }
}

/// Read one trimmed line from stdin
pub fn read_line(prompt: &str) -> Result<String> {
    use std::io::Write;

    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Wrap model output for terminal display
pub fn wrap(text: &str) -> String {
    textwrap::fill(text, 80)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn textbook_flag_wins_over_default() {
        let mut config = Config::default();
        config.default_textbook = Some("configured".into());

        let resolved = resolve_textbook(Some("explicit".into()), &config).unwrap();
        assert_eq!(resolved, "explicit");
    }

    #[test]
    fn textbook_falls_back_to_config() {
        let mut config = Config::default();
        config.default_textbook = Some("configured".into());

        let resolved = resolve_textbook(None, &config).unwrap();
        assert_eq!(resolved, "configured");
    }

    #[test]
    fn missing_textbook_is_an_error() {
        let config = Config::default();
        assert!(resolve_textbook(None, &config).is_err());
    }
}
