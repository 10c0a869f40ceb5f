//! Typed models for Bambu Cloud API payloads.
//!
//! Every model is decoded through its schema table (see
//! [`validation`](crate::validation)). Struct members use snake_case; the
//! tables hold the wire names, which are camelCase for account and task data
//! and snake_case for devices.

use crate::cloud_api::request::{ApiRequest, AuthenticatedApi};
use crate::cloud_api::types::CloudError;
use crate::validation::{self, FieldDefinition as F, FieldType as T, ModelSchema, WireModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

/// Scheme of the camera streaming URL
pub const CAMERA_URL_SCHEME: &str = "bambu";

const PERSONAL_SCHEMA: ModelSchema = ModelSchema {
    name: "Personal",
    fields: &[
        F::required("bio", "bio", T::String),
        F::required("links", "links", T::Array(&T::Url)),
        F::required("task_weight_sum", "taskWeightSum", T::Float),
        F::required("task_length_sum", "taskLengthSum", T::Integer),
        F::required("task_time_sum", "taskTimeSum", T::Integer),
        F::required("background_url", "backgroundUrl", T::Url),
    ],
};

const ACCOUNT_SCHEMA: ModelSchema = ModelSchema {
    name: "Account",
    fields: &[
        F::required("uid", "uid", T::Integer),
        F::required("uid_str", "uidStr", T::String),
        F::required("account", "account", T::String),
        F::required("name", "name", T::String),
        F::required("avatar", "avatar", T::Url),
        F::required("fan_count", "fanCount", T::Integer),
        F::required("follow_count", "followCount", T::Integer),
        F::required("identifier", "identifier", T::Integer),
        F::required("like_count", "likeCount", T::Integer),
        F::required("collection_count", "collectionCount", T::Integer),
        F::required("download_count", "downloadCount", T::Integer),
        F::required("product_models", "productModels", T::Array(&T::String)),
        F::required("personal", "personal", T::Model(&PERSONAL_SCHEMA)),
        // Not the mechanical camelCase of the member name
        F::required("is_nsfw_shown", "isNSFWShown", T::Integer),
        F::required("my_like_count", "myLikeCount", T::Integer),
        F::required("favorites_count", "favoritesCount", T::Integer),
        F::required("default_license", "defaultLicense", T::String),
        F::required("point", "point", T::Integer),
    ],
};

const DEVICE_SCHEMA: ModelSchema = ModelSchema {
    name: "Device",
    fields: &[
        F::required("name", "name", T::String),
        F::required("online", "online", T::Boolean),
        F::required("dev_id", "dev_id", T::String),
        F::required("print_status", "print_status", T::String),
        F::required("nozzle_diameter", "nozzle_diameter", T::Float),
        F::required("dev_model_name", "dev_model_name", T::String),
        F::required("dev_access_code", "dev_access_code", T::String),
        F::required("dev_product_name", "dev_product_name", T::String),
    ],
};

const AMS_DETAIL_SCHEMA: ModelSchema = ModelSchema {
    name: "AMSDetail",
    fields: &[
        F::optional("position", "position", T::Integer),
        F::required("source_color", "sourceColor", T::String),
        F::required("target_color", "targetColor", T::String),
        F::required("filament_id", "filamentId", T::String),
        F::required("filament_type", "filamentType", T::String),
        F::required("target_filament_type", "targetFilamentType", T::String),
        F::required("weight", "weight", T::Float),
    ],
};

const TASK_SCHEMA: ModelSchema = ModelSchema {
    name: "Task",
    fields: &[
        F::required("id", "id", T::Integer),
        F::required("design_id", "designId", T::Integer),
        F::required("design_title", "designTitle", T::String),
        F::required("instance_id", "instanceId", T::Integer),
        F::required("model_id", "modelId", T::String),
        F::required("title", "title", T::String),
        F::required("cover", "cover", T::Url),
        F::required("status", "status", T::Integer),
        F::required("feedback_status", "feedbackStatus", T::Integer),
        F::required("start_time", "startTime", T::DateTime),
        F::required("end_time", "endTime", T::DateTime),
        F::required("weight", "weight", T::Float),
        F::required("length", "length", T::Integer),
        F::required("cost_time", "costTime", T::Integer),
        F::required("profile_id", "profileId", T::Integer),
        F::required("plate_index", "plateIndex", T::Integer),
        F::required("plate_name", "plateName", T::String),
        F::required("device_id", "deviceId", T::String),
        F::required("ams_detail_mapping", "amsDetailMapping", T::Array(&T::Model(&AMS_DETAIL_SCHEMA))),
        F::required("mode", "mode", T::String),
        F::required("is_public_profile", "isPublicProfile", T::Boolean),
        F::required("is_printable", "isPrintable", T::Boolean),
        F::required("device_model", "deviceModel", T::String),
        F::required("device_name", "deviceName", T::String),
        F::required("bed_type", "bedType", T::String),
    ],
};

const LOGIN_RESPONSE_SCHEMA: ModelSchema = ModelSchema {
    name: "LoginResponse",
    fields: &[F::required("access_token", "accessToken", T::String)],
};

const DEVICES_RESPONSE_SCHEMA: ModelSchema = ModelSchema {
    name: "DevicesResponse",
    fields: &[F::required("devices", "devices", T::Array(&T::Model(&DEVICE_SCHEMA)))],
};

const TASKS_RESPONSE_SCHEMA: ModelSchema = ModelSchema {
    name: "TasksResponse",
    fields: &[
        F::required("total", "total", T::Integer),
        F::required("hits", "hits", T::Array(&T::Model(&TASK_SCHEMA))),
    ],
};

const CAMERA_CREDENTIALS_SCHEMA: ModelSchema = ModelSchema {
    name: "CameraCredentials",
    fields: &[
        F::required("ttcode", "ttcode", T::String),
        F::required("authkey", "authkey", T::String),
        F::required("passwd", "passwd", T::String),
        F::required("region", "region", T::String),
    ],
};

/// Profile details embedded in an [`Account`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personal {
    pub bio: String,
    pub links: Vec<Url>,
    pub task_weight_sum: f64,
    pub task_length_sum: i64,
    pub task_time_sum: i64,
    pub background_url: Url,
}

impl WireModel for Personal {
    const SCHEMA: &'static ModelSchema = &PERSONAL_SCHEMA;
}

/// User profile returned by `/user-service/my/profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub uid: i64,
    pub uid_str: String,
    pub account: String,
    pub name: String,
    pub avatar: Url,
    pub fan_count: i64,
    pub follow_count: i64,
    pub identifier: i64,
    pub like_count: i64,
    pub collection_count: i64,
    pub download_count: i64,
    pub product_models: Vec<String>,
    pub personal: Personal,
    /// Wire name `isNSFWShown`; non-zero when NSFW content is shown
    pub is_nsfw_shown: i64,
    pub my_like_count: i64,
    pub favorites_count: i64,
    pub default_license: String,
    pub point: i64,
}

impl Account {
    pub fn nsfw_shown(&self) -> bool {
        self.is_nsfw_shown != 0
    }
}

impl WireModel for Account {
    const SCHEMA: &'static ModelSchema = &ACCOUNT_SCHEMA;
}

/// A printer bound to the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub online: bool,
    pub dev_id: String,
    pub print_status: String,
    pub nozzle_diameter: f64,
    pub dev_model_name: String,
    /// Local LAN access code. Treat as a secret.
    pub dev_access_code: String,
    pub dev_product_name: String,
}

impl WireModel for Device {
    const SCHEMA: &'static ModelSchema = &DEVICE_SCHEMA;
}

impl Device {
    /// Fetch streaming credentials for this device and build its camera URL
    ///
    /// Posts the device id to `/iot-service/api/user/ttcode` through `api`
    /// (bearer token plus `user-id` header) and returns
    /// `bambu://{ttcode}?authkey=..&passwd=..&region=..`. The URL is an opaque
    /// credential bundle for the streaming protocol, not something to fetch.
    ///
    /// # Errors
    ///
    /// - [`CloudError::Request`] if the call fails or returns non-2xx
    /// - [`CloudError::Validation`] if any of the four fields is missing
    pub async fn camera_url(&self, api: &dyn AuthenticatedApi) -> Result<Url, CloudError> {
        let url = format!("{}/iot-service/api/user/ttcode", api.base_url());

        tracing::debug!("Requesting camera credentials for device {}", self.dev_id);

        let request = ApiRequest::post(url, json!({ "dev_id": self.dev_id })).with_user_id();
        let body = api.send_authenticated_request(request).await?;
        let credentials: CameraCredentials = validation::decode(&body).map_err(|e| {
            tracing::error!("Invalid camera credentials for device {}: {}", self.dev_id, e);
            e
        })?;

        Ok(credentials.to_url()?)
    }
}

/// Response of the ttcode endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraCredentials {
    pub ttcode: String,
    pub authkey: String,
    pub passwd: String,
    pub region: String,
}

impl CameraCredentials {
    /// Build `bambu://{ttcode}?authkey={authkey}&passwd={passwd}&region={region}`
    ///
    /// Values are placed in the query as given, not form-encoded.
    pub fn to_url(&self) -> Result<Url, validation::ValidationError> {
        let raw = format!(
            "{}://{}?authkey={}&passwd={}&region={}",
            CAMERA_URL_SCHEME, self.ttcode, self.authkey, self.passwd, self.region
        );

        Url::parse(&raw).map_err(|e| validation::ValidationError::InvalidFormat {
            field_path: "ttcode".to_string(),
            expected: "camera URL".to_string(),
            reason: e.to_string(),
        })
    }
}

impl WireModel for CameraCredentials {
    const SCHEMA: &'static ModelSchema = &CAMERA_CREDENTIALS_SCHEMA;
}

/// Filament slot usage for one print task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmsDetail {
    /// Slot position; 0 when the service omits it
    #[serde(default)]
    pub position: i64,
    pub source_color: String,
    pub target_color: String,
    pub filament_id: String,
    pub filament_type: String,
    pub target_filament_type: String,
    pub weight: f64,
}

impl WireModel for AmsDetail {
    const SCHEMA: &'static ModelSchema = &AMS_DETAIL_SCHEMA;
}

/// A historical print job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub design_id: i64,
    pub design_title: String,
    pub instance_id: i64,
    pub model_id: String,
    pub title: String,
    pub cover: Url,
    pub status: i64,
    pub feedback_status: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub weight: f64,
    pub length: i64,
    /// Seconds
    pub cost_time: i64,
    pub profile_id: i64,
    pub plate_index: i64,
    pub plate_name: String,
    pub device_id: String,
    pub ams_detail_mapping: Vec<AmsDetail>,
    pub mode: String,
    pub is_public_profile: bool,
    pub is_printable: bool,
    pub device_model: String,
    pub device_name: String,
    pub bed_type: String,
}

impl WireModel for Task {
    const SCHEMA: &'static ModelSchema = &TASK_SCHEMA;
}

/// Login response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

impl WireModel for LoginResponse {
    const SCHEMA: &'static ModelSchema = &LOGIN_RESPONSE_SCHEMA;
}

/// Bound devices envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

impl WireModel for DevicesResponse {
    const SCHEMA: &'static ModelSchema = &DEVICES_RESPONSE_SCHEMA;
}

/// Task history envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksResponse {
    /// Total number of tasks on the server, which may exceed `hits.len()`
    pub total: i64,
    pub hits: Vec<Task>,
}

impl WireModel for TasksResponse {
    const SCHEMA: &'static ModelSchema = &TASKS_RESPONSE_SCHEMA;
}
