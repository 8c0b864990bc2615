use serde::{Deserialize, Serialize};

/// Source document: one user with the home gateways (HGUs) attached to it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserHgus {
    #[serde(rename = "_id")]
    pub id: String,
    pub hgus: Vec<Hgu>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Hgu {
    pub id: String,
    #[serde(default)]
    pub identities: Vec<Identity>,
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Identity {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Device {
    pub mac: String,
    #[serde(rename = "hostName", default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub connected: bool,
}

/// One row of the stations catalogue, keyed by `<user>-<MAC>`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "USER_4P_ID")]
    pub user_id: String,
    #[serde(rename = "ASSOC_MAC_DES")]
    pub mac: String,
    #[serde(rename = "DEVICE_ID")]
    pub device_id: String,
    #[serde(rename = "PHONE_WITH_PREFIX_ID")]
    pub phone: Option<String>,
    #[serde(rename = "STATION_OS_DES")]
    pub os: Option<String>,
    #[serde(rename = "STATION_OS_KERNEL_DES")]
    pub os_kernel: Option<String>,
    #[serde(rename = "STATION_MODEL_DES")]
    pub model: Option<String>,
    #[serde(rename = "STATION_MODEL_VERSION_DES")]
    pub model_version: Option<String>,
    #[serde(rename = "STATION_BRAND_DES")]
    pub brand: Option<String>,
    #[serde(rename = "STATION_TYPE_CD")]
    pub station_type: Option<String>,
    #[serde(rename = "STATION_MAC_VENDOR_DES")]
    pub mac_vendor: Option<String>,
    #[serde(rename = "STATION_RANDOM_MAC_IND", default)]
    pub random_mac: Option<bool>,
}
