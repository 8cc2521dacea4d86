use tracing::debug;
use uuid::Uuid;

use crate::{
    activity::{
        dto::NewActivityRequest,
        repo::ActivityStore,
        repo_types::{Activity, NewActivity},
    },
    error::{AppError, FieldError},
};

pub const MAX_RECENT: i64 = 50;

/// Appends one activity for `user_id`. Only the action text is checked here;
/// the category is already a member of the closed set by construction.
pub async fn record(
    store: &dyn ActivityStore,
    user_id: Uuid,
    req: NewActivityRequest,
) -> Result<Activity, AppError> {
    let action = req.action.trim().to_string();
    if action.is_empty() {
        return Err(AppError::Validation(vec![FieldError::body(
            "action",
            "Action is required",
        )]));
    }
    let details = req.details.filter(|d| !d.trim().is_empty());

    let activity = store
        .insert(NewActivity {
            user_id,
            action,
            details,
            category: req.category,
        })
        .await?;
    debug!(user_id = %user_id, category = ?activity.category, "activity recorded");
    Ok(activity)
}

/// Newest-first page of at most `limit` activities.
pub async fn recent_for(
    store: &dyn ActivityStore,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<Activity>, AppError> {
    let limit = limit.clamp(0, MAX_RECENT);
    if limit == 0 {
        return Ok(Vec::new());
    }
    Ok(store.recent(user_id, limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::repo_types::Category;
    use crate::state::fakes::MemoryActivities;

    fn req(action: &str, category: Category) -> NewActivityRequest {
        NewActivityRequest {
            action: action.into(),
            details: None,
            category,
        }
    }

    #[tokio::test]
    async fn record_rejects_blank_action() {
        let store = MemoryActivities::default();
        let err = record(&store, Uuid::new_v4(), req("   ", Category::Plan))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.recent(Uuid::nil(), 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn record_drops_blank_details() {
        let store = MemoryActivities::default();
        let user = Uuid::new_v4();
        let mut r = req("Analyzed Syllabus", Category::Syllabus);
        r.details = Some("  ".into());
        let a = record(&store, user, r).await.unwrap();
        assert_eq!(a.details, None);
        assert_eq!(a.user_id, user);
        assert_eq!(a.category, Category::Syllabus);
    }

    #[tokio::test]
    async fn recent_is_bounded_and_newest_first() {
        for n in [0usize, 1, 5, 100] {
            let store = MemoryActivities::default();
            let user = Uuid::new_v4();
            for i in 0..n {
                record(&store, user, req(&format!("step {i}"), Category::Pyq))
                    .await
                    .unwrap();
            }
            let got = recent_for(&store, user, 5).await.unwrap();
            assert_eq!(got.len(), n.min(5), "n = {n}");
            assert!(got.windows(2).all(|w| w[0].created_at >= w[1].created_at));
            if n > 0 {
                assert_eq!(got[0].action, format!("step {}", n - 1));
            }
        }
    }

    #[tokio::test]
    async fn recent_only_returns_own_rows() {
        let store = MemoryActivities::default();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        record(&store, alice, req("mine", Category::Crash)).await.unwrap();
        record(&store, bob, req("theirs", Category::Crash)).await.unwrap();
        let got = recent_for(&store, alice, 5).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].action, "mine");
    }

    #[tokio::test]
    async fn recent_clamps_limit() {
        let store = MemoryActivities::default();
        let user = Uuid::new_v4();
        for i in 0..60 {
            record(&store, user, req(&format!("a{i}"), Category::Plan))
                .await
                .unwrap();
        }
        assert_eq!(recent_for(&store, user, 1000).await.unwrap().len(), 50);
        assert!(recent_for(&store, user, -3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_fatal() {
        let store = MemoryActivities::failing();
        let err = record(&store, Uuid::new_v4(), req("x", Category::Plan))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
