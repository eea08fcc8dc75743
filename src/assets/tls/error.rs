use thiserror::Error;

/// Certificate and key failures
#[derive(Debug, Error)]
pub enum PkiError {
    /// Subject missing a required field
    #[error("certificate subject is not set or invalid: {0}")]
    InvalidSubject(String),

    /// Key generation failed
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Building or signing a certificate failed
    #[error("certificate generation failed: {0}")]
    CertificateGeneration(String),

    /// A signer's key or certificate could not be used
    #[error("signer unusable: {0}")]
    Signer(String),

    /// PEM or DER material could not be parsed
    #[error("certificate parsing error: {0}")]
    Parse(String),
}
