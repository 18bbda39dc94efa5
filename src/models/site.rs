// Website availability verdict

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SiteStatus {
    Up,
    Partial,
    Down,
}

/// Tri-state availability of the monitored site. Serializes as the `website` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteVerdict {
    pub status: SiteStatus,
    #[serde(rename = "statusCode")]
    pub http_status_code: Option<u16>,
    #[serde(rename = "https")]
    pub https_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SiteVerdict {
    pub fn down() -> Self {
        Self {
            status: SiteStatus::Down,
            http_status_code: None,
            https_active: false,
            note: None,
        }
    }
}
