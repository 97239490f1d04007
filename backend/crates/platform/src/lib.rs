//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Random key material and Base64 secret decoding
//! - Credential hashing (Argon2id, per-call salt, constant-time verify)
//! - Signed, time-limited bearer tokens (HS256 JWT)

pub mod crypto;
pub mod password;
pub mod token;
