//! Domain types shared across all campus services.
//!
//! This crate contains only pure types and rules with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod email;
pub mod issue;
pub mod password;
pub mod user;
