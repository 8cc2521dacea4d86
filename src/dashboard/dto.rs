use serde::Serialize;

use crate::activity::repo_types::Activity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub subjects_analyzed: i64,
    pub plans_created: i64,
    /// Placeholder, not derived from stored data.
    pub days_until_exam: i64,
    /// Placeholder, not derived from stored data.
    pub completion_rate: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_activity: Vec<Activity>,
}
