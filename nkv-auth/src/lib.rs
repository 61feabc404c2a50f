//! # Credential Store Demo
//!
//! Purpose: The authentication collaborator that consumes the namespaced
//! KV client. Registration writes a credential under a namespaced key;
//! login fetches and compares it. Business logic only; transport and
//! request routing live elsewhere.

mod config;
mod store;

pub use config::Settings;
pub use store::{AuthResponse, CredentialStore};
