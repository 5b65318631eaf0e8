//! Credential handling shared by the account operations.

pub mod password;
