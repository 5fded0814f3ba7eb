//! Test utilities for campus services.
//!
//! Provides an in-memory session store and session fixtures.
//! Import in `#[cfg(test)]` blocks and integration suites only.

pub mod session;
