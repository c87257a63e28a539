//! Provisioning against an in-memory store.

use std::cell::Cell;

use etl_secrets::{
    InMemorySecretStore, SecretError, SecretStore, provision_environment,
};

fn store() -> InMemorySecretStore {
    InMemorySecretStore::new()
        .with_secret(
            "APP-azure-storage-connection-string-7851",
            "DefaultEndpointsProtocol=https;AccountName=etl",
        )
        .with_secret(
            "APP-applicationinsights-connection-string-7637",
            "InstrumentationKey=00000000",
        )
}

#[test]
fn prod_exports_both_connection_strings() {
    let provisioned = provision_environment("prod", || Ok(store())).unwrap();
    let vars: Vec<_> = provisioned.variables().collect();
    assert_eq!(
        vars,
        [
            ("ETL_ENV", "prod"),
            (
                "AZURE_STORAGE_CONNECTION_STRING",
                "DefaultEndpointsProtocol=https;AccountName=etl"
            ),
            (
                "APPLICATIONINSIGHTS_CONNECTION_STRING",
                "InstrumentationKey=00000000"
            ),
        ]
    );
}

#[test]
fn test_env_never_connects() {
    let connected = Cell::new(false);
    let provisioned = provision_environment("test", || {
        connected.set(true);
        Ok(store())
    })
    .unwrap();
    assert!(!connected.get());
    assert_eq!(provisioned.variables().count(), 1);
}

#[test]
fn missing_secret_fails() {
    let partial = InMemorySecretStore::new().with_secret("APP-azure-storage-connection-string-7851", "x");
    let err = provision_environment("local", || Ok(partial)).unwrap_err();
    match err {
        SecretError::SecretNotFound { name } => {
            assert_eq!(name, "APP-applicationinsights-connection-string-7637");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn connection_failure_propagates() {
    let err = provision_environment("base", || {
        Err::<InMemorySecretStore, _>(SecretError::MissingVaultUri {
            var: "KEY_VAULT_URI",
        })
    })
    .unwrap_err();
    assert!(err.to_string().contains("KEY_VAULT_URI"));
}

#[test]
fn debug_output_hides_secrets() {
    let provisioned = provision_environment("base", || Ok(store())).unwrap();
    let debug = format!("{provisioned:?}");
    assert!(!debug.contains("AccountName=etl"));
    let store = store();
    let value = store.get_secret("APP-azure-storage-connection-string-7851").unwrap();
    assert!(!value.to_string().contains("etl"));
}
