use crate::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Service name the OpenRouter API key is stored under.
pub const OPEN_ROUTER_SERVICE: &str = "AI_PDF_OPEN_ROUTER_API_KEY";

/// Source of API keys, injected into the backends that need one.
pub trait CredentialProvider: Send + Sync {
    /// Fails with [`Error::CredentialNotFound`] when the service has no key.
    fn get_credential(&self, service: &str) -> Result<String>;
}

fn not_found(service: &str) -> color_eyre::eyre::Report {
    Error::CredentialNotFound(service.to_string()).into()
}

fn is_not_found(err: &color_eyre::eyre::Report) -> bool {
    matches!(err.downcast_ref::<Error>(), Some(Error::CredentialNotFound(_)))
}

/// Keys read from the environment variable named after the service.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn get_credential(&self, service: &str) -> Result<String> {
        match std::env::var(service) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(not_found(service)),
        }
    }
}

/// Keys kept in a TOML file of `service = "key"` entries.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    path: PathBuf,
}

impl StoredCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/aipdf/credentials.toml`
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs_next::config_dir()
            .ok_or_else(|| eyre!("Unable to determine config directory"))?
            .join("aipdf");

        Ok(Self::new(config_dir.join("credentials.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let raw = fs::read_to_string(&self.path)
            .wrap_err_with(|| f!("Failed to read credentials from {}", self.path.display()))?;

        toml::from_str(&raw)
            .wrap_err_with(|| f!("Invalid credentials file {}", self.path.display()))
    }

    /// Store `key` for `service`. An existing key is only replaced with `force`.
    pub fn set(&self, service: &str, key: &str, force: bool) -> Result<()> {
        let mut entries = self.load()?;

        if entries.contains_key(service) && !force {
            return Err(Error::SecretExists(service.to_string()).into());
        }
        entries.insert(service.to_string(), key.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
        }

        let contents = toml::to_string(&entries)
            .map_err(|e| eyre!("Failed to serialize credentials: {}", e))?;
        fs::write(&self.path, contents)
            .wrap_err_with(|| f!("Failed to write credentials to {}", self.path.display()))?;

        log::debug!("stored credential for {} in {}", service, self.path.display());
        Ok(())
    }
}

impl CredentialProvider for StoredCredentials {
    fn get_credential(&self, service: &str) -> Result<String> {
        self.load()?
            .remove(service)
            .ok_or_else(|| not_found(service))
    }
}

/// Tries each provider in turn. Errors other than a missing key stop the search.
pub struct ChainedCredentials {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainedCredentials {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    /// Environment first, then the default credentials file.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(EnvCredentials),
            Box::new(StoredCredentials::default_location()?),
        ]))
    }
}

impl CredentialProvider for ChainedCredentials {
    fn get_credential(&self, service: &str) -> Result<String> {
        for provider in &self.providers {
            match provider.get_credential(service) {
                Ok(key) => return Ok(key),
                Err(err) if is_not_found(&err) => continue,
                Err(err) => return Err(err),
            }
        }

        Err(not_found(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl CredentialProvider for Fixed {
        fn get_credential(&self, _service: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn stored_in(dir: &tempfile::TempDir) -> StoredCredentials {
        StoredCredentials::new(dir.path().join("nested").join("credentials.toml"))
    }

    #[test]
    fn test_stored_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = stored_in(&dir).get_credential("SERVICE").unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_stored_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = stored_in(&dir);

        store.set("SERVICE", "sk-123", false).unwrap();

        assert_eq!(store.get_credential("SERVICE").unwrap(), "sk-123");
        assert!(store.path().exists());
    }

    #[test]
    fn test_stored_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let store = stored_in(&dir);
        store.set("SERVICE", "first", false).unwrap();

        let err = store.set("SERVICE", "second", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::SecretExists(s)) if s == "SERVICE"
        ));
        assert_eq!(store.get_credential("SERVICE").unwrap(), "first");

        store.set("SERVICE", "second", true).unwrap();
        assert_eq!(store.get_credential("SERVICE").unwrap(), "second");
    }

    #[test]
    fn test_stored_keeps_other_services() {
        let dir = tempfile::tempdir().unwrap();
        let store = stored_in(&dir);
        store.set("A", "1", false).unwrap();
        store.set("B", "2", false).unwrap();

        assert_eq!(store.get_credential("A").unwrap(), "1");
        assert_eq!(store.get_credential("B").unwrap(), "2");
    }

    #[test]
    fn test_stored_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let err = StoredCredentials::new(path).get_credential("A").unwrap_err();
        assert!(!is_not_found(&err));
    }

    #[test]
    fn test_env_credentials() {
        std::env::set_var("AIPDF_TEST_ENV_CREDENTIAL", "from-env");
        assert_eq!(
            EnvCredentials
                .get_credential("AIPDF_TEST_ENV_CREDENTIAL")
                .unwrap(),
            "from-env"
        );
        assert!(is_not_found(
            &EnvCredentials
                .get_credential("AIPDF_TEST_ENV_CREDENTIAL_UNSET")
                .unwrap_err()
        ));
    }

    #[test]
    fn test_chain_falls_through_to_next_provider() {
        let dir = tempfile::tempdir().unwrap();
        let chain = ChainedCredentials::new(vec![Box::new(stored_in(&dir)), Box::new(Fixed("k"))]);
        assert_eq!(chain.get_credential("SERVICE").unwrap(), "k");
    }

    #[test]
    fn test_chain_prefers_first_provider() {
        let dir = tempfile::tempdir().unwrap();
        let store = stored_in(&dir);
        store.set("SERVICE", "stored", false).unwrap();

        let chain = ChainedCredentials::new(vec![Box::new(store), Box::new(Fixed("fixed"))]);
        assert_eq!(chain.get_credential("SERVICE").unwrap(), "stored");
    }

    #[test]
    fn test_chain_exhausted_is_not_found() {
        let chain = ChainedCredentials::new(vec![]);
        let err = chain.get_credential("SERVICE").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::CredentialNotFound(s)) if s == "SERVICE"
        ));
    }
}
