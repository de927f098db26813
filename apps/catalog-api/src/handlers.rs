//! # CRUD Handlers
//!
//! Generic endpoints: each handler opens one unit of work, makes one
//! repository call, and maps the outcome to a status code.
//!
//! ## Request Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    {path}        all()                     → 200 [..]             │
//! │  GET    {path}/{id}   find(id)                  → 200 {..} | 404       │
//! │  POST   {path}        add(e) + save()           → 201 {..} + Location  │
//! │  PUT    {path}/{id}   ids equal? update + save  → 204 | 400 | 404      │
//! │  DELETE {path}/{id}   find → remove + save      → 204 | 404            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{FromRequest, FromRequestParts, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use catalog_core::validation::validate_product;
use catalog_core::{CoreError, EntityId, Product, ValidationError};
use catalog_db::{Repository, Table};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

// =============================================================================
// Resources
// =============================================================================

/// An entity exposed over HTTP.
pub trait Resource: Table + Serialize + DeserializeOwned {
    /// Collection path, e.g. `/api/products`.
    const PATH: &'static str;

    /// Payload checks run before a change is staged.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl Resource for Product {
    const PATH: &'static str = "/api/products";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_product(self)
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// JSON body whose rejection renders as an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Path parameters whose rejection renders as an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

// =============================================================================
// Handlers
// =============================================================================

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = state.db.health_check().await;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let label = if healthy { "ok" } else { "unavailable" };
    (status, Json(json!({ "status": label })))
}

/// `GET {path}`
pub async fn list<T: Resource>(State(state): State<AppState>) -> ApiResult<Json<Vec<T>>> {
    let ctx = state.db.context();
    let items = ctx.set::<T>().all().await?;

    debug!(entity = T::NAME, count = items.len(), "list");
    Ok(Json(items))
}

/// `GET {path}/{id}`
pub async fn get_one<T: Resource>(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<Json<T>> {
    let ctx = state.db.context();
    let item = ctx
        .set::<T>()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(T::NAME, id))?;

    Ok(Json(item))
}

/// `POST {path}`
///
/// Any id in the body is ignored; the store assigns one.
pub async fn create<T: Resource>(
    State(state): State<AppState>,
    AppJson(entity): AppJson<T>,
) -> ApiResult<impl IntoResponse> {
    entity.validate()?;

    let ctx = state.db.context();
    let repo = ctx.set::<T>();
    let tracked = repo.add(entity);
    repo.save().await?;

    let created = tracked
        .get()
        .cloned()
        .ok_or_else(|| ApiError::internal("Insert committed without returning a row"))?;

    let location = format!("{}/{}", T::PATH, created.id());
    info!(entity = T::NAME, id = created.id(), "Created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// `PUT {path}/{id}`
pub async fn update<T: Resource>(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
    AppJson(entity): AppJson<T>,
) -> ApiResult<StatusCode> {
    if entity.id() != id {
        return Err(CoreError::IdMismatch {
            path_id: id,
            body_id: entity.id(),
        }
        .into());
    }

    entity.validate()?;

    let ctx = state.db.context();
    let repo = ctx.set::<T>();
    repo.update(entity);
    repo.save().await?;

    info!(entity = T::NAME, id = id, "Updated");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE {path}/{id}`
pub async fn delete<T: Resource>(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> ApiResult<StatusCode> {
    let ctx = state.db.context();
    let repo = ctx.set::<T>();

    let existing = repo
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(T::NAME, id))?;

    repo.remove(existing);
    repo.save().await?;

    info!(entity = T::NAME, id = id, "Deleted");
    Ok(StatusCode::NO_CONTENT)
}
