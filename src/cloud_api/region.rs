use serde::{Deserialize, Serialize};
use std::fmt;

/// API origin for the China deployment
pub const CHINA_BASE_URL: &str = "https://api.bambulab.cn/v1";
/// API origin shared by every other deployment
pub const DEFAULT_BASE_URL: &str = "https://api.bambulab.com/v1";
/// MQTT broker for the China deployment
pub const CHINA_MQTT_HOST: &str = "cn.mqtt.bambulab.com";
/// MQTT broker shared by every other deployment
pub const DEFAULT_MQTT_HOST: &str = "us.mqtt.bambulab.com";

/// Service deployment region
///
/// Only China has its own origin and MQTT broker; Europe, North America,
/// Asia Pacific and Other all share the default ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    China,
    Europe,
    #[default]
    NorthAmerica,
    AsiaPacific,
    Other,
}

impl Region {
    /// Every region, in declaration order
    pub const ALL: [Region; 5] = [
        Region::China,
        Region::Europe,
        Region::NorthAmerica,
        Region::AsiaPacific,
        Region::Other,
    ];

    pub fn is_china(self) -> bool {
        self == Region::China
    }

    /// API origin for this region, including the `/v1` prefix
    pub fn base_url(self) -> &'static str {
        if self.is_china() {
            CHINA_BASE_URL
        } else {
            DEFAULT_BASE_URL
        }
    }

    /// MQTT broker host for this region
    pub fn mqtt_host(self) -> &'static str {
        if self.is_china() {
            CHINA_MQTT_HOST
        } else {
            DEFAULT_MQTT_HOST
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Region::China => "China",
            Region::Europe => "Europe",
            Region::NorthAmerica => "NorthAmerica",
            Region::AsiaPacific => "AsiaPacific",
            Region::Other => "Other",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
