//! HTTP handlers for `/api/books` and `/api/books/:id`

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::api::{
    AddComment, COMPLETE_DELETE_SUCCESSFUL, CreateBook, DELETE_SUCCESSFUL, MISSING_COMMENT,
    MISSING_TITLE, NO_BOOK, Payload,
};
use crate::error::HandlerError;
use crate::handler::AppState;
use crate::model::CreatedBook;

type HandlerResult = Result<Response, HandlerError>;

// ============================================================================
// Collection
// ============================================================================

pub async fn list_books(State(state): State<AppState>) -> HandlerResult {
    let books = state.store.list_with_comment_count().await?;
    tracing::info!(count = books.len(), "listed books");
    Ok(Json(books).into_response())
}

pub async fn create_book(
    State(state): State<AppState>,
    Payload(payload): Payload<CreateBook>,
) -> HandlerResult {
    let Some(title) = payload.title() else {
        tracing::info!("create book rejected: no title");
        return Ok(MISSING_TITLE.into_response());
    };

    let book = state.store.create(&title).await?;
    tracing::info!(id = %book.id, "created book");
    Ok(Json(CreatedBook::from(book)).into_response())
}

pub async fn delete_all_books(State(state): State<AppState>) -> HandlerResult {
    let removed = state.store.delete_all().await?;
    tracing::info!(removed, "deleted all books");
    Ok(COMPLETE_DELETE_SUCCESSFUL.into_response())
}

// ============================================================================
// Item
// ============================================================================

pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    match state.store.find_by_id(&id).await? {
        Some(book) => Ok(Json(book).into_response()),
        None => {
            tracing::info!(%id, "book not found");
            Ok(NO_BOOK.into_response())
        }
    }
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(payload): Payload<AddComment>,
) -> HandlerResult {
    let Some(comment) = payload.comment() else {
        tracing::info!(%id, "add comment rejected: no comment");
        return Ok(MISSING_COMMENT.into_response());
    };

    match state.store.add_comment(&id, &comment).await? {
        Some(book) => {
            tracing::info!(%id, comments = book.comments.len(), "added comment");
            Ok(Json(book).into_response())
        }
        None => {
            tracing::info!(%id, "book not found");
            Ok(NO_BOOK.into_response())
        }
    }
}

pub async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    if state.store.delete_by_id(&id).await? {
        tracing::info!(%id, "deleted book");
        Ok(DELETE_SUCCESSFUL.into_response())
    } else {
        tracing::info!(%id, "book not found");
        Ok(NO_BOOK.into_response())
    }
}
