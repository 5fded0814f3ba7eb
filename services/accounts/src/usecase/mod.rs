pub mod account;
pub mod admin;
pub mod auth;
pub mod file;
pub mod password;
