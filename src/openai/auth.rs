//! API key management
//!
//! The key is resolved from the `OPENAI_API_KEY` environment variable first
//! (a `.env` file is loaded at startup), falling back to the system keyring.

use keyring::Entry;

use super::error::OpenAiError;

/// Service name for keyring storage
const SERVICE_NAME: &str = "mentor-cli";
/// Entry name for the API key
const API_KEY_ENTRY: &str = "openai-api-key";
/// Environment variable checked before the keyring
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Manages OpenAI API key storage
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Resolve the API key: environment variable first, then system keyring
    pub fn get_api_key() -> Result<String, OpenAiError> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| OpenAiError::KeyringError(e.to_string()))?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => OpenAiError::ApiKeyNotFound,
            _ => OpenAiError::KeyringError(e.to_string()),
        })
    }

    /// Store the API key in the system keyring
    pub fn set_api_key(key: &str) -> Result<(), OpenAiError> {
        // Validate key format
        if !Self::validate_key_format(key) {
            return Err(OpenAiError::InvalidApiKey);
        }

        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| OpenAiError::KeyringError(e.to_string()))?;

        entry.set_password(key).map_err(|e| OpenAiError::KeyringError(e.to_string()))
    }

    /// Check if an API key is available from any source
    pub fn has_api_key() -> bool {
        Self::get_api_key().is_ok()
    }

    /// Delete the stored keyring entry (the env var is untouched)
    pub fn delete_api_key() -> Result<(), OpenAiError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| OpenAiError::KeyringError(e.to_string()))?;

        entry.delete_credential().map_err(|e| OpenAiError::KeyringError(e.to_string()))
    }

    /// Validate API key format
    fn validate_key_format(key: &str) -> bool {
        // OpenAI API keys start with "sk-"
        key.starts_with("sk-") && key.len() > 20
    }

    /// Mask an API key for display (show first and last 4 chars)
    pub fn mask_key(key: &str) -> String {
        if key.len() <= 12 {
            return "*".repeat(key.len());
        }
        let prefix = &key[..8];
        let suffix = &key[key.len() - 4..];
        format!("{}...{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_key_format() {
        assert!(ApiKeyManager::validate_key_format("sk-proj-abcdefghijklmnopqrs"));
        assert!(!ApiKeyManager::validate_key_format("invalid-key"));
        assert!(!ApiKeyManager::validate_key_format("sk-short"));
    }

    #[test]
    fn mask_key() {
        let key = "sk-proj-abcdefghijklmnopqrstuvwxyz";
        let masked = ApiKeyManager::mask_key(key);
        assert!(masked.starts_with("sk-proj-"));
        assert!(masked.ends_with("wxyz"));
        assert!(masked.contains("..."));
    }

    #[test]
    fn mask_short_key() {
        assert_eq!(ApiKeyManager::mask_key("sk-tiny"), "*******");
    }
}
