//! Session handling shared across campus services.
//!
//! Provides the session cookie builders, the Redis-backed session store and the
//! `CurrentUser` / `MaybeUser` extractors.

pub mod cookie;
pub mod identity;
pub mod session;
