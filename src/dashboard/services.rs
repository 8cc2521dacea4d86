use uuid::Uuid;

use crate::{
    activity::{repo::ActivityStore, repo_types::Category, services::recent_for},
    dashboard::dto::{DashboardResponse, DashboardStats},
    error::AppError,
};

pub const RECENT_ACTIVITY_LIMIT: i64 = 5;
const DAYS_UNTIL_EXAM_PLACEHOLDER: i64 = 12;
const COMPLETION_RATE_PLACEHOLDER: &str = "68%";

/// Read-only summary of a user's activity. Fails as a whole if any of the
/// underlying queries fails.
pub async fn summarize(store: &dyn ActivityStore, user_id: Uuid) -> Result<DashboardResponse, AppError> {
    let (subjects_analyzed, plans_created, recent_activity) = tokio::try_join!(
        async { Ok::<_, AppError>(store.count_by_category(user_id, Category::Syllabus).await?) },
        async { Ok::<_, AppError>(store.count_by_category(user_id, Category::Plan).await?) },
        recent_for(store, user_id, RECENT_ACTIVITY_LIMIT),
    )?;

    Ok(DashboardResponse {
        stats: DashboardStats {
            subjects_analyzed,
            plans_created,
            days_until_exam: DAYS_UNTIL_EXAM_PLACEHOLDER,
            completion_rate: COMPLETION_RATE_PLACEHOLDER.to_string(),
        },
        recent_activity,
    })
}
