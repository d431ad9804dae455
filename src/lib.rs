//! Jikjob web — job-matching signup service.
//!
//! An axum server that serves the static front end, exposes a few stateless
//! endpoints, and hosts the multi-step signup wizard and login flow, both
//! delegating to an external join/login backend over HTTP.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod server;
pub mod signup;
