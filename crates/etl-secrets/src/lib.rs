//! Secrets for the ETL runner.
//!
//! Connection strings are not kept in configuration files. At start-up the
//! runner asks [`required_secrets`] which ones the environment needs, reads
//! them from Azure Key Vault through a [`SecretStore`], and exports them as
//! environment variables.
//!
//! Authentication follows the usual Azure order: service principal from the
//! environment, then managed identity, then the Azure CLI login
//! ([`DefaultCredential`]).

mod credential;
mod error;
mod key_vault;
mod provision;
mod store;

pub use credential::{
    AccessToken, AzureCliCredential, DefaultCredential, EnvironmentCredential,
    ManagedIdentityCredential, TokenCredential, VAULT_RESOURCE,
};
pub use error::{Result, SecretError};
pub use key_vault::{KEY_VAULT_API_VERSION, KEY_VAULT_URI_VAR, KeyVaultClient};
pub use provision::{
    ENV_NAME_VAR, ProvisionedEnvironment, SecretBinding, provision_environment, required_secrets,
};
pub use store::{InMemorySecretStore, SecretStore, SecretValue};
