#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Model backend call failed: {0}")]
    Backend(String),

    #[error("Model response contained no choices")]
    NoChoice,

    #[error("Credential not found for service '{0}'")]
    CredentialNotFound(String),

    #[error("Model '{model}' is not supported by the {backend} backend")]
    UnsupportedModel { model: String, backend: String },

    #[error("A secret for '{0}' already exists (use --force to overwrite)")]
    SecretExists(String),
}
