//! Secrets each environment needs and how they are exported.

use tracing::info;

use crate::error::Result;
use crate::store::{SecretStore, SecretValue};

/// Environment variable carrying the active environment name.
pub const ENV_NAME_VAR: &str = "ETL_ENV";

const STORAGE_CONNECTION: SecretBinding = SecretBinding {
    env_var: "AZURE_STORAGE_CONNECTION_STRING",
    secret_name: "APP-azure-storage-connection-string-7851",
};

const APP_INSIGHTS_CONNECTION: SecretBinding = SecretBinding {
    env_var: "APPLICATIONINSIGHTS_CONNECTION_STRING",
    secret_name: "APP-applicationinsights-connection-string-7637",
};

/// A vault secret exported under an environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretBinding {
    pub env_var: &'static str,
    pub secret_name: &'static str,
}

/// Secrets required to run in `env`.
///
/// `test` needs none. Every other environment needs the storage connection
/// string; environments other than `base` also need the telemetry connection
/// string.
pub fn required_secrets(env: &str) -> Vec<SecretBinding> {
    let mut bindings = Vec::new();
    if env != "test" {
        bindings.push(STORAGE_CONNECTION);
    }
    if env != "test" && env != "base" {
        bindings.push(APP_INSIGHTS_CONNECTION);
    }
    bindings
}

/// Variables to export before a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedEnvironment {
    env: String,
    secrets: Vec<(&'static str, SecretValue)>,
}

impl ProvisionedEnvironment {
    pub fn env(&self) -> &str {
        &self.env
    }

    /// Every `(name, value)` pair to export, [`ENV_NAME_VAR`] first.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        std::iter::once((ENV_NAME_VAR, self.env.as_str())).chain(
            self.secrets
                .iter()
                .map(|(var, value)| (*var, value.expose())),
        )
    }
}

/// Fetch the secrets `env` requires.
///
/// `connect` opens the store; it is only called when at least one secret is
/// needed, so environments without secrets never touch the vault.
pub fn provision_environment<S, F>(env: &str, connect: F) -> Result<ProvisionedEnvironment>
where
    S: SecretStore,
    F: FnOnce() -> Result<S>,
{
    let bindings = required_secrets(env);
    let mut secrets = Vec::with_capacity(bindings.len());
    if !bindings.is_empty() {
        let store = connect()?;
        for binding in &bindings {
            let value = store.get_secret(binding.secret_name)?;
            secrets.push((binding.env_var, value));
        }
    }
    info!(env, secrets = secrets.len(), "environment provisioned");
    Ok(ProvisionedEnvironment {
        env: env.to_string(),
        secrets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(env: &str) -> Vec<&'static str> {
        required_secrets(env).iter().map(|b| b.env_var).collect()
    }

    #[test]
    fn secrets_per_environment() {
        assert!(vars("test").is_empty());
        assert_eq!(vars("base"), ["AZURE_STORAGE_CONNECTION_STRING"]);
        assert_eq!(
            vars("prod"),
            [
                "AZURE_STORAGE_CONNECTION_STRING",
                "APPLICATIONINSIGHTS_CONNECTION_STRING"
            ]
        );
        assert_eq!(vars("local"), vars("prod"));
    }
}
