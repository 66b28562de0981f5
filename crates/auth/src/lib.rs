//! `storeledger-auth` — caller identity and merchant access control.
//!
//! This crate is intentionally decoupled from transport and storage: caller
//! identities arrive already verified and are treated as opaque.

pub mod access;
pub mod caller;

pub use access::AccessControl;
pub use caller::CallerId;
