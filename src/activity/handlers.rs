use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    activity::{
        dto::{NewActivityRequest, RecentQuery},
        repo_types::Activity,
        services,
    },
    auth::{extractors::AuthUser, handlers::body_or_400},
    error::{AppError, FieldError},
    state::AppState,
};

pub fn activity_routes() -> Router<AppState> {
    Router::new().route("/activity", get(list_activity).post(create_activity))
}

fn query_or_400<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query.map(|Query(q)| q).map_err(|rejection| {
        warn!(error = %rejection, "unreadable query string");
        AppError::Validation(vec![FieldError {
            msg: rejection.body_text(),
            path: None,
            location: "query",
        }])
    })
}

#[instrument(skip(state, payload))]
pub async fn create_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<NewActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let req = body_or_400(payload)?;
    let activity = services::record(state.activities.as_ref(), user_id, req).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

#[instrument(skip(state, query))]
pub async fn list_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let q = query_or_400(query)?;
    let items = services::recent_for(state.activities.as_ref(), user_id, q.limit).await?;
    Ok(Json(items))
}
