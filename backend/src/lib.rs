//! Session Auth Backend Library
//!
//! Email/password accounts with short-lived access tokens and a single
//! rotating refresh session per user. Exposed as a library for tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
