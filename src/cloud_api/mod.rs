//! Bambu Cloud API integration module
//!
//! This module turns the cloud service's JSON into typed values and carries
//! the access token through every call.
//!
//! ## Flow
//!
//! 1. `CloudClient::login` posts credentials and validates the `LoginResponse`
//! 2. The access token's claims are decoded (no signature check) into a `Token`
//! 3. Profile, device and task calls attach `Authorization: Bearer {jwt}`
//! 4. Each response body is validated against its model schema and unwrapped
pub mod client;
pub mod config;
pub mod models;
pub mod region;
pub mod request;
pub mod token;
pub mod types;

pub use client::CloudClient;
pub use config::ClientConfig;
pub use models::*;
pub use region::Region;
pub use request::{ApiRequest, AuthenticatedApi};
pub use token::Token;
pub use types::{CloudError, LoginError, RequestError, TokenError};
