//! Schema validation for Bambu Cloud API payloads.
//!
//! Each model decoded from a response body declares a static [`ModelSchema`]
//! that maps member names to wire names and declares field types. Decoding
//! validates the raw JSON against that table first, so a failure names every
//! offending field path instead of stopping at the first serde error.
//!
//! # Example
//!
//! ```
//! use bambu_cloud::validation::decode;
//! use bambu_cloud::AmsDetail;
//! use serde_json::json;
//!
//! let slot: AmsDetail = decode(&json!({
//!     "sourceColor": "FFFFFFFF",
//!     "targetColor": "000000FF",
//!     "filamentId": "GFA00",
//!     "filamentType": "PLA",
//!     "targetFilamentType": "PLA",
//!     "weight": 12.5
//! }))
//! .unwrap();
//!
//! assert_eq!(slot.position, 0);
//! ```

pub mod error;
pub mod schema;
pub mod validator;

pub use error::ValidationError;
pub use schema::{to_camel_case, FieldDefinition, FieldType, ModelSchema, WireModel};
pub use validator::{decode, encode};
