//! Bambu Cloud SDK
//!
//! A Rust client for the Bambu Lab cloud printing service.
//!
//! This crate provides:
//! - Email/password login and an access token wrapper (claims decoded, not verified)
//! - Typed, schema-validated models for profile, device and print task payloads
//! - Region-derived API origins and MQTT broker hosts
//! - Camera streaming URLs built from per-device credentials
//!
//! MQTT messaging, video streaming and printer control are out of scope; this
//! crate only produces the parameters those protocols need.
//!
//! # Example
//!
//! ```no_run
//! use bambu_cloud::{CloudClient, Region};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CloudClient::login("me@example.com", "hunter2", Region::NorthAmerica).await?;
//!
//! let profile = client.get_profile().await?;
//! println!("Logged in as {} (uid {})", profile.name, profile.uid);
//!
//! for device in client.get_devices().await? {
//!     let tasks = client.get_tasks(Some(&device.dev_id)).await?;
//!     println!("{}: {} past prints", device.name, tasks.len());
//!
//!     let camera = device.camera_url(&client).await?;
//!     println!("camera: {}", camera);
//! }
//!
//! println!("MQTT broker: {}", client.mqtt_host());
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod cloud_api;
pub mod validation;

// Re-export commonly used types and functions
pub use cloud_api::{
    client::{CloudClient, TASK_PAGE_LIMIT},
    config::ClientConfig,
    models::{
        Account, AmsDetail, CameraCredentials, Device, DevicesResponse, LoginResponse, Personal,
        Task, TasksResponse,
    },
    region::Region,
    request::{ApiRequest, AuthenticatedApi},
    token::{decode_claims_unverified, Token, UnverifiedClaims},
    types::{CloudError, LoginError, RequestError, TokenError},
};
pub use validation::ValidationError;
