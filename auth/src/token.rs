use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use jsonwebtoken::Algorithm;

/// Signed-token encoder/decoder.
///
/// Both directions use the same shared secret and symmetric algorithm; that
/// pair is the single point of trust for every token the service issues.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

/// Error type for token operations.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}

impl TokenCodec {
    /// Create a codec with the default HS256 algorithm.
    ///
    /// The secret should be at least 32 bytes and come from configuration,
    /// never from source.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_algorithm(secret, Algorithm::HS256)
    }

    /// Create a codec with an explicit symmetric algorithm.
    pub fn with_algorithm(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
        }
    }

    /// Encode claims into a signed token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - serialization or signing failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token string.
    ///
    /// # Errors
    /// * `Expired` - the `exp` claim is in the past
    /// * `Invalid` - the signature does not verify, the token is malformed,
    ///   or a required claim is missing
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let validation = Validation::new(self.algorithm);

        let token_data = decode::<T>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}
