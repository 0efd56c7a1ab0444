//! Public key material for verifying identity-provider tokens.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::TRACING_TARGET_SERVICE as TRACING_TARGET;
use crate::{Error, Result};

/// Signature algorithm used by the identity provider.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(Serialize, Deserialize, Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-256.
    #[default]
    Rs256,
    /// Ed25519.
    #[cfg_attr(feature = "config", value(name = "eddsa"))]
    EdDsa,
}

impl AuthAlgorithm {
    fn algorithm(self) -> Algorithm {
        match self {
            Self::Rs256 => Algorithm::RS256,
            Self::EdDsa => Algorithm::EdDSA,
        }
    }

    fn decoding_key(self, pem: &[u8]) -> jsonwebtoken::errors::Result<DecodingKey> {
        match self {
            Self::Rs256 => DecodingKey::from_rsa_pem(pem),
            Self::EdDsa => DecodingKey::from_ed_pem(pem),
        }
    }
}

/// Where to find the token verification key and how to check tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AuthKeysConfig {
    /// File path to the identity provider's public key (PEM)
    #[cfg_attr(
        feature = "config",
        arg(long, env = "AUTH_PUBLIC_PEM_FILEPATH", default_value = "./public.pem")
    )]
    #[serde(default = "AuthKeysConfig::default_public_pem_filepath")]
    pub auth_public_pem_filepath: PathBuf,

    /// Token signature algorithm
    #[cfg_attr(
        feature = "config",
        arg(long, env = "AUTH_ALGORITHM", value_enum, default_value = "rs256")
    )]
    #[serde(default)]
    pub auth_algorithm: AuthAlgorithm,

    /// Expected `iss` claim; the issuer is not checked when unset
    #[cfg_attr(feature = "config", arg(long, env = "AUTH_ISSUER"))]
    #[serde(default)]
    pub auth_issuer: Option<String>,
}

impl AuthKeysConfig {
    fn default_public_pem_filepath() -> PathBuf {
        "./public.pem".into()
    }

    /// Creates a configuration for the key at `path`.
    pub fn new(path: impl AsRef<Path>, algorithm: AuthAlgorithm) -> Self {
        Self {
            auth_public_pem_filepath: path.as_ref().to_path_buf(),
            auth_algorithm: algorithm,
            auth_issuer: None,
        }
    }

    /// Requires tokens to carry the given issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.auth_issuer = Some(issuer.into());
        self
    }
}

impl Default for AuthKeysConfig {
    fn default() -> Self {
        Self::new(Self::default_public_pem_filepath(), AuthAlgorithm::default())
    }
}

/// Verification key and validation rules for bearer tokens.
///
/// Cloning is cheap; clones share the parsed key.
#[derive(Clone)]
pub struct AuthKeys {
    inner: Arc<AuthKeysInner>,
}

struct AuthKeysInner {
    decoding_key: DecodingKey,
    validation: Validation,
    algorithm: AuthAlgorithm,
}

impl AuthKeys {
    /// Reads and parses the public key named by `config`.
    pub async fn from_config(config: &AuthKeysConfig) -> Result<Self> {
        let path = &config.auth_public_pem_filepath;
        if !path.is_file() {
            return Err(Error::config(format!(
                "public key file does not exist: {}",
                path.display()
            )));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            algorithm = %config.auth_algorithm,
            "Loading token verification key"
        );

        let pem_data = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "Failed to read public key file"
            );
            Error::file_system("failed to read public key file").with_source(e)
        })?;

        let keys = Self::from_pem(&pem_data, config.auth_algorithm, config.auth_issuer.as_deref())?;
        tracing::info!(
            target: TRACING_TARGET,
            algorithm = %config.auth_algorithm,
            issuer_checked = config.auth_issuer.is_some(),
            "Token verification key loaded"
        );

        Ok(keys)
    }

    /// Parses a PEM-encoded public key.
    pub fn from_pem(pem: &[u8], algorithm: AuthAlgorithm, issuer: Option<&str>) -> Result<Self> {
        let decoding_key = algorithm.decoding_key(pem).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Failed to parse public key PEM data");
            Error::auth("invalid public key PEM format").with_source(e)
        })?;

        let mut validation = Validation::new(algorithm.algorithm());
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            inner: Arc::new(AuthKeysInner {
                decoding_key,
                validation,
                algorithm,
            }),
        })
    }

    /// Returns the key used to verify token signatures.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the validation rules applied to every token.
    #[inline]
    pub fn validation(&self) -> &Validation {
        &self.inner.validation
    }

    #[inline]
    pub fn algorithm(&self) -> AuthAlgorithm {
        self.inner.algorithm
    }
}

impl fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthKeys")
            .field("algorithm", &self.inner.algorithm)
            .field("issuer", &self.inner.validation.iss)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use dashkit_test::fixtures::TEST_PUBLIC_KEY_PEM;
    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn load_valid_key() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("public.pem");
        fs::write(&path, TEST_PUBLIC_KEY_PEM)?;

        let config = AuthKeysConfig::new(&path, AuthAlgorithm::EdDsa).with_issuer("https://issuer");
        let keys = AuthKeys::from_config(&config).await?;

        assert_eq!(keys.algorithm(), AuthAlgorithm::EdDsa);
        assert!(keys.validation().iss.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn reject_invalid_key_format() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("public.pem");
        fs::write(&path, "invalid pem")?;

        let config = AuthKeysConfig::new(&path, AuthAlgorithm::EdDsa);
        let error = AuthKeys::from_config(&config).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Auth);
        Ok(())
    }

    #[tokio::test]
    async fn reject_missing_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let config = AuthKeysConfig::new(temp_dir.path().join("missing.pem"), AuthAlgorithm::Rs256);

        let error = AuthKeys::from_config(&config).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        Ok(())
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(AuthAlgorithm::default(), AuthAlgorithm::Rs256);
        assert_eq!(AuthAlgorithm::EdDsa.to_string(), "eddsa");
        assert_eq!("rs256".parse::<AuthAlgorithm>().ok(), Some(AuthAlgorithm::Rs256));
    }
}
