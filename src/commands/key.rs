//! The `key` command: manage the OpenAI API key in the system keyring

use anyhow::Result;
use console::style;

use crate::openai::ApiKeyManager;

/// Store an API key in the keyring, prompting if not given
pub fn set(key: Option<String>) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => super::read_line("OpenAI API key: ")?,
    };

    ApiKeyManager::set_api_key(&key)?;
    println!("{} API key stored in the system keyring", style("✓").green());
    Ok(())
}

/// Show the currently resolved key, masked
pub fn show() -> Result<()> {
    match ApiKeyManager::get_api_key() {
        Ok(key) => println!("{}", ApiKeyManager::mask_key(&key)),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

/// Delete the keyring entry
pub fn clear() -> Result<()> {
    ApiKeyManager::delete_api_key()?;
    println!("{} API key removed from the keyring", style("✓").green());
    Ok(())
}
