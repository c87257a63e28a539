//! Azure access tokens for Key Vault.

use std::process::Command;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SecretError};

/// Resource (audience) for Key Vault tokens.
pub const VAULT_RESOURCE: &str = "https://vault.azure.net";

const VAULT_SCOPE: &str = "https://vault.azure.net/.default";
const VAULT_RESOURCE_ENCODED: &str = "https%3A%2F%2Fvault.azure.net";

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
const IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
const IMDS_API_VERSION: &str = "2018-02-01";
const APP_SERVICE_API_VERSION: &str = "2019-08-01";

/// HTTP request timeout for token endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// IMDS is only reachable on Azure hosts; fail fast elsewhere.
const IMDS_TIMEOUT: Duration = Duration::from_secs(2);

/// Lifetime assumed when a token response carries no expiry.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(300);

/// Bearer token plus when it stops being usable.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Instant,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: Instant::now() + lifetime,
        }
    }

    /// True if the token expires within `margin`.
    pub fn expires_within(&self, margin: Duration) -> bool {
        Instant::now() + margin >= self.expires_at
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Something that can produce a Key Vault access token.
pub trait TokenCredential {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    fn get_token(&self) -> Result<AccessToken>;
}

/// OAuth2 token response. Managed identity endpoints send `expires_in` as a string.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

impl TokenResponse {
    fn into_token(self) -> AccessToken {
        let lifetime = match self.expires_in {
            Some(NumberOrString::Number(secs)) => Duration::from_secs(secs),
            Some(NumberOrString::Text(text)) => text
                .parse()
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TOKEN_LIFETIME),
            None => DEFAULT_TOKEN_LIFETIME,
        };
        AccessToken::new(self.access_token, lifetime)
    }
}

fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

fn read_token(source_name: &'static str, response: reqwest::blocking::Response) -> Result<AccessToken> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(SecretError::CredentialUnavailable {
            credential: source_name,
            reason: format!("token endpoint returned {status}: {message}"),
        });
    }
    let body: TokenResponse = response
        .json()
        .map_err(|e| SecretError::MalformedResponse {
            source_name,
            message: e.to_string(),
        })?;
    Ok(body.into_token())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Service principal from `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`.
#[derive(Debug, Clone)]
pub struct EnvironmentCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority: String,
}

impl EnvironmentCredential {
    pub const NAME: &'static str = "EnvironmentCredential";

    /// Read the service principal from the environment.
    pub fn from_env() -> Result<Self> {
        let missing = |var: &str| SecretError::CredentialUnavailable {
            credential: Self::NAME,
            reason: format!("{var} is not set"),
        };
        Ok(Self {
            tenant_id: env_var("AZURE_TENANT_ID").ok_or_else(|| missing("AZURE_TENANT_ID"))?,
            client_id: env_var("AZURE_CLIENT_ID").ok_or_else(|| missing("AZURE_CLIENT_ID"))?,
            client_secret: env_var("AZURE_CLIENT_SECRET")
                .ok_or_else(|| missing("AZURE_CLIENT_SECRET"))?,
            authority: env_var("AZURE_AUTHORITY_HOST")
                .unwrap_or_else(|| DEFAULT_AUTHORITY.to_string()),
        })
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

impl TokenCredential for EnvironmentCredential {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn get_token(&self) -> Result<AccessToken> {
        debug!(tenant = %self.tenant_id, "requesting token with client secret");
        let response = http_client(REQUEST_TIMEOUT)?
            .post(self.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", VAULT_SCOPE),
            ])
            .send()?;
        read_token(Self::NAME, response)
    }
}

/// Managed identity via the App Service endpoint or the instance metadata service.
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredential {
    endpoint: ManagedIdentityEndpoint,
    client_id: Option<String>,
}

#[derive(Debug, Clone)]
enum ManagedIdentityEndpoint {
    AppService { endpoint: String, header: String },
    Imds,
}

impl ManagedIdentityCredential {
    pub const NAME: &'static str = "ManagedIdentityCredential";

    /// Prefer `IDENTITY_ENDPOINT`/`IDENTITY_HEADER`; fall back to IMDS.
    pub fn from_env() -> Self {
        let endpoint = match (env_var("IDENTITY_ENDPOINT"), env_var("IDENTITY_HEADER")) {
            (Some(endpoint), Some(header)) => ManagedIdentityEndpoint::AppService { endpoint, header },
            _ => ManagedIdentityEndpoint::Imds,
        };
        Self {
            endpoint,
            client_id: env_var("AZURE_CLIENT_ID"),
        }
    }

    fn token_url(&self) -> String {
        let mut url = match &self.endpoint {
            ManagedIdentityEndpoint::AppService { endpoint, .. } => format!(
                "{endpoint}?api-version={APP_SERVICE_API_VERSION}&resource={VAULT_RESOURCE_ENCODED}"
            ),
            ManagedIdentityEndpoint::Imds => format!(
                "{IMDS_ENDPOINT}?api-version={IMDS_API_VERSION}&resource={VAULT_RESOURCE_ENCODED}"
            ),
        };
        if let Some(client_id) = &self.client_id {
            url.push_str("&client_id=");
            url.push_str(client_id);
        }
        url
    }
}

impl TokenCredential for ManagedIdentityCredential {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn get_token(&self) -> Result<AccessToken> {
        let url = self.token_url();
        let unavailable = |e: reqwest::Error| SecretError::CredentialUnavailable {
            credential: Self::NAME,
            reason: e.to_string(),
        };
        let response = match &self.endpoint {
            ManagedIdentityEndpoint::AppService { header, .. } => {
                debug!("requesting token from app service identity endpoint");
                http_client(REQUEST_TIMEOUT)?
                    .get(url)
                    .header("X-IDENTITY-HEADER", header.as_str())
                    .send()
                    .map_err(unavailable)?
            }
            ManagedIdentityEndpoint::Imds => {
                debug!("requesting token from instance metadata service");
                http_client(IMDS_TIMEOUT)?
                    .get(url)
                    .header("Metadata", "true")
                    .send()
                    .map_err(unavailable)?
            }
        };
        read_token(Self::NAME, response)
    }
}

/// Token from the signed-in Azure CLI.
#[derive(Debug, Clone, Default)]
pub struct AzureCliCredential;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenResponse {
    access_token: String,
}

impl AzureCliCredential {
    pub const NAME: &'static str = "AzureCliCredential";

    fn program() -> &'static str {
        if cfg!(windows) { "az.cmd" } else { "az" }
    }
}

impl TokenCredential for AzureCliCredential {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn get_token(&self) -> Result<AccessToken> {
        let output = Command::new(Self::program())
            .args([
                "account",
                "get-access-token",
                "--resource",
                VAULT_RESOURCE,
                "-o",
                "json",
            ])
            .output()
            .map_err(|e| SecretError::CredentialUnavailable {
                credential: Self::NAME,
                reason: format!("failed to run az: {e}"),
            })?;
        if !output.status.success() {
            return Err(SecretError::CredentialUnavailable {
                credential: Self::NAME,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let body: CliTokenResponse =
            serde_json::from_slice(&output.stdout).map_err(|e| SecretError::MalformedResponse {
                source_name: Self::NAME,
                message: e.to_string(),
            })?;
        Ok(AccessToken::new(body.access_token, DEFAULT_TOKEN_LIFETIME))
    }
}

/// Tries each credential in order; the first token wins.
pub struct DefaultCredential {
    chain: Vec<Box<dyn TokenCredential + Send + Sync>>,
}

impl DefaultCredential {
    pub const NAME: &'static str = "DefaultCredential";

    /// Environment service principal, managed identity, Azure CLI.
    pub fn from_env() -> Self {
        let mut chain: Vec<Box<dyn TokenCredential + Send + Sync>> = Vec::new();
        match EnvironmentCredential::from_env() {
            Ok(credential) => chain.push(Box::new(credential)),
            Err(error) => debug!(%error, "skipping environment credential"),
        }
        chain.push(Box::new(ManagedIdentityCredential::from_env()));
        chain.push(Box::new(AzureCliCredential));
        Self { chain }
    }

    pub fn with_chain(chain: Vec<Box<dyn TokenCredential + Send + Sync>>) -> Self {
        Self { chain }
    }
}

impl std::fmt::Debug for DefaultCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.chain.iter().map(|credential| credential.name()).collect();
        f.debug_struct("DefaultCredential").field("chain", &names).finish()
    }
}

impl TokenCredential for DefaultCredential {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn get_token(&self) -> Result<AccessToken> {
        let mut attempts = Vec::with_capacity(self.chain.len());
        for credential in &self.chain {
            match credential.get_token() {
                Ok(token) => {
                    debug!(credential = credential.name(), "acquired access token");
                    return Ok(token);
                }
                Err(error) => attempts.push(format!("{}: {error}", credential.name())),
            }
        }
        Err(SecretError::AuthenticationFailed { attempts })
    }
}
