//! Client for the external join/login backend API.

pub mod api;
pub mod http;

pub use api::{
    ApiEnvelope, AuthCodeData, ErrorBody, JoinBackend, JoinOutcome, LoginData, LoginRequest,
};
pub use http::HttpJoinBackend;
