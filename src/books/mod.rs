//! Books Module
//!
//! The books collection: a title per book plus an append-only list of
//! comments. Handlers only talk to a [`BookStore`], so the storage backend is
//! picked once at startup and injected through [`crate::handler::AppState`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookshelf::books;
//!
//! let app = Router::new()
//!     .nest("/api/books", books::routes())
//!     .with_state(AppState::new(store));
//! ```

mod handler;
mod routes;
mod store;

pub use routes::routes;
pub use store::BookStore;

/// Schema for the books tables, applied by [`crate::db::Database`] at startup.
pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[("books_001_schema.sql", include_str!("migrations/001_schema.sql"))]
}
