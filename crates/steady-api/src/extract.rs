//! Request-body extraction.
//!
//! A thin wrapper over [`axum::Json`] whose rejection is an
//! [`ApiError::BadRequest`], so missing or malformed body fields surface as
//! `400` with the `{"error": message}` body the rest of the API uses,
//! instead of axum's plain-text 422.

use axum::{
  extract::{FromRequest, Request},
  response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let axum::Json(value) = axum::Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Json(value))
  }
}

impl<T> IntoResponse for Json<T>
where
  T: serde::Serialize,
{
  fn into_response(self) -> Response {
    axum::Json(self.0).into_response()
  }
}
