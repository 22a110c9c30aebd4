//! Authentication primitives for the contacts service
//!
//! Provides the two building blocks the service composes into its
//! authentication flows:
//! - Password hashing and verification (Argon2id)
//! - Signed, expiring token encoding/decoding (JWT, shared secret)
//!
//! The crate is deliberately free of framework and storage types; the service
//! defines its own ports and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.encode(&Claims::access("alice", 3600)).unwrap();
//! let decoded: Claims = codec.decode(&token).unwrap();
//! assert_eq!(decoded.sub, "alice");
//! ```

pub mod claims;
pub mod password;
pub mod token;

pub use claims::Claims;
pub use claims::EMAIL_TOKEN_TTL_SECONDS;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Algorithm;
pub use token::TokenCodec;
pub use token::TokenError;
