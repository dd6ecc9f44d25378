//! JSON endpoint handlers.
//!
//! Every handler takes the store lock for its whole read-modify-write, so
//! concurrent saves and deletes on the same image are serialized.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};

use crate::server::AppState;
use crate::server::api::{ApiError, BoxRequest, ImageResponse, IndexQuery, StatusResponse};

pub(crate) async fn first_image(
    State(state): State<AppState>,
) -> Result<Json<ImageResponse>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(ImageResponse::from_store(&store, 0)?))
}

pub(crate) async fn next_image(
    State(state): State<AppState>,
    query: Result<Query<IndexQuery>, QueryRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Query(IndexQuery { image_index }) = query?;
    let store = state.store.lock().await;
    store.catalog().check_index(image_index)?;

    let next = store.navigator().next(image_index);
    Ok(Json(ImageResponse::from_store(&store, next)?))
}

pub(crate) async fn prev_image(
    State(state): State<AppState>,
    query: Result<Query<IndexQuery>, QueryRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Query(IndexQuery { image_index }) = query?;
    let store = state.store.lock().await;
    store.catalog().check_index(image_index)?;

    let prev = store.navigator().prev(image_index);
    Ok(Json(ImageResponse::from_store(&store, prev)?))
}

pub(crate) async fn save_box(
    State(state): State<AppState>,
    payload: Result<Json<BoxRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(req) = payload?;
    let bbox = req.bbox.to_bounding_box()?;

    let mut store = state.store.lock().await;
    store.append(req.image_index, bbox)?;

    log::info!("Saved box {:?} on image {}", bbox, req.image_index);
    Ok(Json(StatusResponse::success()))
}

pub(crate) async fn delete_box(
    State(state): State<AppState>,
    payload: Result<Json<BoxRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(req) = payload?;
    let bbox = req.bbox.to_bounding_box()?;

    let mut store = state.store.lock().await;
    if !store.remove(req.image_index, &bbox)? {
        return Err(ApiError::NotFound(format!(
            "No box matching {:?} on image {}",
            bbox, req.image_index
        )));
    }

    log::info!("Deleted box {:?} from image {}", bbox, req.image_index);
    Ok(Json(StatusResponse::success()))
}
