//! Azure Key Vault REST client.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::debug;

use crate::credential::{AccessToken, DefaultCredential, TokenCredential};
use crate::error::{Result, SecretError};
use crate::store::{SecretStore, SecretValue};

/// Environment variable holding the vault URL.
pub const KEY_VAULT_URI_VAR: &str = "KEY_VAULT_URI";

/// Key Vault data-plane API version.
pub const KEY_VAULT_API_VERSION: &str = "7.4";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Refresh tokens this long before they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct SecretBundle {
    value: String,
}

/// Reads secrets from one vault.
pub struct KeyVaultClient {
    client: Client,
    vault_url: String,
    credential: Box<dyn TokenCredential + Send + Sync>,
    token: Mutex<Option<AccessToken>>,
}

impl KeyVaultClient {
    pub fn new(
        vault_url: impl Into<String>,
        credential: Box<dyn TokenCredential + Send + Sync>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            vault_url: vault_url.into().trim_end_matches('/').to_string(),
            credential,
            token: Mutex::new(None),
        })
    }

    /// Vault from `KEY_VAULT_URI`, authenticated with [`DefaultCredential`].
    pub fn from_env() -> Result<Self> {
        let vault_url = std::env::var(KEY_VAULT_URI_VAR)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(SecretError::MissingVaultUri {
                var: KEY_VAULT_URI_VAR,
            })?;
        Self::new(vault_url, Box::new(DefaultCredential::from_env()))
    }

    pub fn vault_url(&self) -> &str {
        &self.vault_url
    }

    fn secret_url(&self, name: &str) -> String {
        format!(
            "{}/secrets/{name}?api-version={KEY_VAULT_API_VERSION}",
            self.vault_url
        )
    }

    fn bearer_token(&self) -> Result<String> {
        let mut cached = self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(token) = cached.as_ref()
            && !token.expires_within(TOKEN_REFRESH_MARGIN)
        {
            return Ok(token.token.clone());
        }
        let token = self.credential.get_token()?;
        let bearer = token.token.clone();
        *cached = Some(token);
        Ok(bearer)
    }
}

impl std::fmt::Debug for KeyVaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyVaultClient")
            .field("vault_url", &self.vault_url)
            .field("credential", &self.credential.name())
            .finish_non_exhaustive()
    }
}

impl SecretStore for KeyVaultClient {
    fn get_secret(&self, name: &str) -> Result<SecretValue> {
        debug!(secret = name, vault = %self.vault_url, "fetching secret");
        let bearer = self.bearer_token()?;
        let response = self
            .client
            .get(self.secret_url(name))
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SecretError::SecretNotFound {
                name: name.to_string(),
            });
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SecretError::KeyVault { status, message });
        }

        let bundle: SecretBundle = response
            .json()
            .map_err(|e| SecretError::MalformedResponse {
                source_name: "key vault",
                message: e.to_string(),
            })?;
        Ok(SecretValue::new(bundle.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Static;

    impl TokenCredential for Static {
        fn name(&self) -> &'static str {
            "Static"
        }

        fn get_token(&self) -> Result<AccessToken> {
            Ok(AccessToken::new("t", Duration::from_secs(3600)))
        }
    }

    #[test]
    fn secret_url_uses_api_version() {
        let client = KeyVaultClient::new("https://kv-etl.vault.azure.net/", Box::new(Static)).unwrap();
        assert_eq!(
            client.secret_url("APP-azure-storage-connection-string-7851"),
            "https://kv-etl.vault.azure.net/secrets/APP-azure-storage-connection-string-7851?api-version=7.4"
        );
    }

    #[test]
    fn token_is_cached() {
        let client = KeyVaultClient::new("https://kv", Box::new(Static)).unwrap();
        assert_eq!(client.bearer_token().unwrap(), "t");
        assert!(client.token.lock().unwrap().is_some());
    }
}
