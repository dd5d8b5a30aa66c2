use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::INTERNAL_ERROR;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("StoreError: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::Store(e) => {
                let err: &(dyn std::error::Error + 'static) = e.as_ref();
                tracing::error!(error = %crate::unpack_error(err), "book store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_is_500_plain_text() {
        let err: HandlerError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.to_string(), "StoreError: disk on fire");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
