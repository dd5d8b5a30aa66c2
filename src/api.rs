use axum::{
    Form,
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::borrow::Cow;

pub const MISSING_TITLE: &str = "missing required field title";
pub const MISSING_COMMENT: &str = "missing required field comment";
pub const NO_BOOK: &str = "no book exists";
pub const DELETE_SUCCESSFUL: &str = "delete successful";
pub const COMPLETE_DELETE_SUCCESSFUL: &str = "complete delete successful";
pub const INTERNAL_ERROR: &str = "internal server error";

#[derive(Debug, Deserialize, Default)]
pub struct CreateBook {
    pub title: Option<Value>,
}

impl CreateBook {
    /// The title as text, unless it is missing.
    pub fn title(&self) -> Option<Cow<'_, str>> {
        present(&self.title)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AddComment {
    pub comment: Option<Value>,
}

impl AddComment {
    pub fn comment(&self) -> Option<Cow<'_, str>> {
        present(&self.comment)
    }
}

/// Scalars are taken as text. `null`, `""`, `false`, `0`, arrays and
/// objects count as missing.
fn present(field: &Option<Value>) -> Option<Cow<'_, str>> {
    match field.as_ref()? {
        Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s)),
        Value::Bool(true) => Some(Cow::Borrowed("true")),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new_from_msg(msg: &str) -> Self {
        StatusResponse {
            status: msg.to_owned(),
        }
    }
}

enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    // Media types are case-insensitive; parameters such as charset are ignored.
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => BodyKind::Json,
        "application/x-www-form-urlencoded" => BodyKind::Form,
        _ => BodyKind::Other,
    }
}

/// A request body accepted as JSON or as a urlencoded form. A missing body
/// (or one of any other content type) yields `T::default()`.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Payload(T::default()));
                }
                serde_json::from_slice(&bytes).map(Payload).map_err(|e| {
                    tracing::info!(error = %e, "rejected malformed json body");
                    (StatusCode::BAD_REQUEST, format!("invalid json body: {}", e)).into_response()
                })
            }
            BodyKind::Form => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                Ok(Payload(value))
            }
            BodyKind::Other => Ok(Payload(T::default())),
        }
    }
}
