use serde::Deserialize;

use crate::activity::repo_types::Category;

/// Request body for recording an activity. An unknown `type` fails to decode.
#[derive(Debug, Deserialize)]
pub struct NewActivityRequest {
    pub action: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(rename = "type", alias = "category")]
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    20
}
