//! Request/response schema and error mapping for the JSON endpoints.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::LabelError;
use crate::model::BoundingBox;
use crate::store::LabelStore;

/// Query string of `/next_image` and `/prev_image`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IndexQuery {
    pub image_index: usize,
}

/// Body of `/save_box` and `/delete_box`.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxRequest {
    pub image_index: usize,
    #[serde(rename = "box")]
    pub bbox: BoxPayload,
}

/// A box as sent by the labeling page.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoxPayload {
    pub object_id: u32,
    pub centerx: f64,
    pub centery: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxPayload {
    /// Validate and convert to a [`BoundingBox`].
    pub fn to_bounding_box(&self) -> Result<BoundingBox, ApiError> {
        let coords = [
            ("centerx", self.centerx),
            ("centery", self.centery),
            ("width", self.width),
            ("height", self.height),
        ];
        if let Some((name, value)) = coords.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ApiError::BadRequest(format!(
                "box.{} must be a finite number, got {}",
                name, value
            )));
        }
        Ok(BoundingBox::new(
            self.object_id,
            self.centerx,
            self.centery,
            self.width,
            self.height,
        ))
    }
}

/// An image together with its current boxes.
#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub image_index: usize,
    pub image_url: String,
    pub boxes: Vec<BoundingBox>,
}

impl ImageResponse {
    /// Snapshot of the image at `index`.
    pub fn from_store(store: &LabelStore, index: usize) -> Result<Self, LabelError> {
        let filename = store.catalog().filename_at(index)?;
        Ok(Self {
            image_index: index,
            image_url: image_url(filename),
            boxes: store.get(index)?.to_vec(),
        })
    }
}

/// URL the image is served under.
pub fn image_url(filename: &str) -> String {
    format!("/images/{}", urlencoding::encode(filename))
}

/// `{"status": "success"}` or `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success",
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
        }
    }
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid request
    #[error("{0}")]
    BadRequest(String),

    /// Requested box or file does not exist
    #[error("{0}")]
    NotFound(String),

    /// Store or filesystem failure
    #[error(transparent)]
    Label(#[from] LabelError),

    /// Unexpected server-side failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Label(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Label(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Rejected request ({}): {}", status, self);
        }
        (status, Json(StatusResponse::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_request_schema() {
        let req: BoxRequest = serde_json::from_str(
            r#"{"image_index": 1, "box": {"object_id": 2, "centerx": 0.1, "centery": 0.2, "width": 0.3, "height": 0.4}}"#,
        )
        .unwrap();
        assert_eq!(req.image_index, 1);
        assert_eq!(
            req.bbox.to_bounding_box().unwrap(),
            BoundingBox::new(2, 0.1, 0.2, 0.3, 0.4)
        );
    }

    #[test]
    fn test_box_request_rejects_bad_fields() {
        let missing = r#"{"image_index": 0, "box": {"object_id": 2, "centerx": 0.1}}"#;
        assert!(serde_json::from_str::<BoxRequest>(missing).is_err());

        let negative = r#"{"image_index": -1, "box": {"object_id": 2, "centerx": 0.1, "centery": 0.2, "width": 0.3, "height": 0.4}}"#;
        assert!(serde_json::from_str::<BoxRequest>(negative).is_err());

        let stringly = r#"{"image_index": 0, "box": {"object_id": "two", "centerx": 0.1, "centery": 0.2, "width": 0.3, "height": 0.4}}"#;
        assert!(serde_json::from_str::<BoxRequest>(stringly).is_err());
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let payload = BoxPayload {
            object_id: 0,
            centerx: 0.5,
            centery: f64::NAN,
            width: 0.1,
            height: 0.1,
        };
        assert!(matches!(
            payload.to_bounding_box(),
            Err(ApiError::BadRequest(msg)) if msg.contains("centery")
        ));
    }

    #[test]
    fn test_status_mapping() {
        let out_of_range = ApiError::from(LabelError::IndexOutOfRange { index: 5, len: 2 });
        assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

        let io = ApiError::from(LabelError::io(
            "labels/a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            ApiError::NotFound("no box".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_status_response_shape() {
        assert_eq!(
            serde_json::to_string(&StatusResponse::success()).unwrap(),
            r#"{"status":"success"}"#
        );
        assert_eq!(
            serde_json::to_string(&StatusResponse::error("nope")).unwrap(),
            r#"{"status":"error","message":"nope"}"#
        );
    }

    #[test]
    fn test_image_url_is_encoded() {
        assert_eq!(image_url("a.jpg"), "/images/a.jpg");
        assert_eq!(image_url("my photo#1.png"), "/images/my%20photo%231.png");
    }
}
