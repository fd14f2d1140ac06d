//! REST surface: each route is exactly one remote call, with path params
//! and JSON body fields passed through untransformed. Create routes
//! generate a fresh UUID and reuse the shared upsert RPC.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tonic::transport::Channel;
use uuid::Uuid;

use reunio_reunion_service::proto as reunionpb;
use reunio_reunion_service::proto::reunion_service_client::ReunionServiceClient;
use reunio_user_service::proto as userpb;
use reunio_user_service::proto::user_service_client::UserServiceClient;

use crate::error::{GatewayError, GatewayResult};

/// One client handle per backend service, injected at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: UserServiceClient<Channel>,
    pub reunions: ReunionServiceClient<Channel>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/reunions", get(list_reunions).post(create_reunion))
        .route(
            "/reunions/{id}",
            get(get_reunion).put(update_reunion).delete(delete_reunion),
        )
        .route(
            "/reunions/{reunion_id}/users/{user_id}",
            post(add_user_to_reunion).delete(remove_user_from_reunion),
        )
        .with_state(state)
}

#[derive(Deserialize)]
pub struct UserBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
pub struct ReunionBody {
    #[serde(default)]
    sujet: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    user_ids: Vec<String>,
}

fn empty_response() -> GatewayError {
    GatewayError::internal("backend returned an empty response")
}

// Users

async fn list_users(State(state): State<AppState>) -> GatewayResult<Json<Vec<userpb::User>>> {
    let response = state
        .users
        .clone()
        .get_users(userpb::GetUsersRequest {})
        .await?;
    Ok(Json(response.into_inner().users))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> GatewayResult<Json<userpb::User>> {
    let response = state
        .users
        .clone()
        .get_user(userpb::GetUserRequest { user_id: id })
        .await?;
    let user = response.into_inner().user.ok_or_else(empty_response)?;
    Ok(Json(user))
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<UserBody>,
) -> GatewayResult<Json<userpb::User>> {
    upsert_user(state, Uuid::new_v4().to_string(), body).await
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UserBody>,
) -> GatewayResult<Json<userpb::User>> {
    upsert_user(state, id, body).await
}

async fn upsert_user(
    state: AppState,
    id: String,
    body: UserBody,
) -> GatewayResult<Json<userpb::User>> {
    let response = state
        .users
        .clone()
        .create_or_update_user(userpb::CreateOrUpdateUserRequest {
            user_id: id,
            name: body.name,
            email: body.email,
        })
        .await?;
    let user = response.into_inner().user.ok_or_else(empty_response)?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> GatewayResult<Json<userpb::DeleteUserResponse>> {
    let response = state
        .users
        .clone()
        .delete_user(userpb::DeleteUserRequest { user_id: id })
        .await?;
    Ok(Json(response.into_inner()))
}

// Reunions

async fn list_reunions(
    State(state): State<AppState>,
) -> GatewayResult<Json<Vec<reunionpb::Reunion>>> {
    let response = state
        .reunions
        .clone()
        .get_reunions(reunionpb::GetReunionsRequest {})
        .await?;
    Ok(Json(response.into_inner().reunions))
}

async fn get_reunion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> GatewayResult<Json<reunionpb::Reunion>> {
    let response = state
        .reunions
        .clone()
        .get_reunion(reunionpb::GetReunionRequest { reunion_id: id })
        .await?;
    let reunion = response.into_inner().reunion.ok_or_else(empty_response)?;
    Ok(Json(reunion))
}

async fn create_reunion(
    State(state): State<AppState>,
    Json(body): Json<ReunionBody>,
) -> GatewayResult<Json<reunionpb::Reunion>> {
    upsert_reunion(state, Uuid::new_v4().to_string(), body).await
}

async fn update_reunion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReunionBody>,
) -> GatewayResult<Json<reunionpb::Reunion>> {
    upsert_reunion(state, id, body).await
}

async fn upsert_reunion(
    state: AppState,
    id: String,
    body: ReunionBody,
) -> GatewayResult<Json<reunionpb::Reunion>> {
    let response = state
        .reunions
        .clone()
        .create_or_update_reunion(reunionpb::CreateOrUpdateReunionRequest {
            reunion_id: id,
            sujet: body.sujet,
            date: body.date,
            location: body.location,
            user_ids: body.user_ids,
        })
        .await?;
    let reunion = response.into_inner().reunion.ok_or_else(empty_response)?;
    Ok(Json(reunion))
}

async fn delete_reunion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> GatewayResult<Json<reunionpb::DeleteReunionResponse>> {
    let response = state
        .reunions
        .clone()
        .delete_reunion(reunionpb::DeleteReunionRequest { reunion_id: id })
        .await?;
    Ok(Json(response.into_inner()))
}

async fn add_user_to_reunion(
    State(state): State<AppState>,
    Path((reunion_id, user_id)): Path<(String, String)>,
) -> GatewayResult<Json<reunionpb::AddUserToReunionResponse>> {
    let response = state
        .reunions
        .clone()
        .add_user_to_reunion(reunionpb::AddUserToReunionRequest {
            reunion_id,
            user_id,
        })
        .await?;
    Ok(Json(response.into_inner()))
}

async fn remove_user_from_reunion(
    State(state): State<AppState>,
    Path((reunion_id, user_id)): Path<(String, String)>,
) -> GatewayResult<Json<reunionpb::RemoveUserFromReunionResponse>> {
    let response = state
        .reunions
        .clone()
        .remove_user_from_reunion(reunionpb::RemoveUserFromReunionRequest {
            reunion_id,
            user_id,
        })
        .await?;
    Ok(Json(response.into_inner()))
}
