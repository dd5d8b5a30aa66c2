use anyhow::Result;
use async_trait::async_trait;
use libsql::Connection;

use crate::db::Database;
use crate::model::{Book, BookSummary};

/// The persistence operations the books API needs. Each call is one
/// logical store operation.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create(&self, title: &str) -> Result<Book>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>>;

    async fn list_with_comment_count(&self) -> Result<Vec<BookSummary>>;

    /// Appends `comment` and returns the updated book, or `None` if no book
    /// has this id.
    async fn add_comment(&self, id: &str, comment: &str) -> Result<Option<Book>>;

    /// Returns whether a book was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    /// Returns the number of books removed.
    async fn delete_all(&self) -> Result<u64>;
}

async fn load_comments(conn: &Connection, book_id: &str) -> Result<Vec<String>> {
    let mut rows = conn
        .query(
            "SELECT body FROM book_comments WHERE book_id = ? ORDER BY id",
            libsql::params![book_id],
        )
        .await?;

    let mut comments = Vec::new();
    while let Some(row) = rows.next().await? {
        comments.push(row.get::<String>(0)?);
    }
    Ok(comments)
}

async fn load_book(conn: &Connection, id: &str) -> Result<Option<Book>> {
    let mut rows = conn
        .query("SELECT id, title FROM books WHERE id = ?", libsql::params![id])
        .await?;

    let Some(row) = rows.next().await? else {
        return Ok(None);
    };
    let book_id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let comments = load_comments(conn, &book_id).await?;

    Ok(Some(Book {
        id: book_id,
        title,
        comments,
    }))
}

// Every method runs under `Database::transaction`, which also holds the
// connection lock, so no two requests interleave statements.
#[async_trait]
impl BookStore for Database {
    async fn create(&self, title: &str) -> Result<Book> {
        let query = r#"
            INSERT INTO books (title)
            VALUES (?)
            RETURNING id, title
        "#;

        let conn = self.connection();
        self.transaction(async {
            let mut rows = conn.query(query, libsql::params![title]).await?;

            if let Some(row) = rows.next().await? {
                Ok::<_, anyhow::Error>(Book {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    comments: vec![],
                })
            } else {
                anyhow::bail!("Failed to create book")
            }
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>> {
        self.transaction(load_book(self.connection(), id)).await
    }

    async fn list_with_comment_count(&self) -> Result<Vec<BookSummary>> {
        let query = r#"
SELECT
    books.id,
    books.title,
    COUNT(book_comments.id) as commentcount
FROM books
LEFT JOIN book_comments ON book_comments.book_id = books.id
GROUP BY books.id, books.title
ORDER BY books.rowid
"#;

        let conn = self.connection();
        self.transaction(async {
            let mut rows = conn.query(query, ()).await?;
            let mut books = Vec::new();

            while let Some(row) = rows.next().await? {
                books.push(BookSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    comment_count: row.get(2)?,
                });
            }

            Ok::<_, anyhow::Error>(books)
        })
        .await
    }

    async fn add_comment(&self, id: &str, comment: &str) -> Result<Option<Book>> {
        // Inserts nothing when the book does not exist.
        let query = r#"
            INSERT INTO book_comments (book_id, body)
            SELECT id, ? FROM books WHERE id = ?
        "#;

        let conn = self.connection();
        self.transaction(async {
            let inserted = conn.execute(query, libsql::params![comment, id]).await?;
            if inserted == 0 {
                return Ok(None);
            }

            // Same transaction as the insert: the book read back is the one
            // the comment landed on.
            let book = load_book(conn, id).await?;
            Ok::<_, anyhow::Error>(book)
        })
        .await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let conn = self.connection();
        self.transaction(async {
            conn.execute("DELETE FROM book_comments WHERE book_id = ?", libsql::params![id])
                .await?;
            let removed = conn
                .execute("DELETE FROM books WHERE id = ?", libsql::params![id])
                .await?;
            Ok::<_, anyhow::Error>(removed > 0)
        })
        .await
    }

    async fn delete_all(&self) -> Result<u64> {
        let conn = self.connection();
        self.transaction(async {
            conn.execute("DELETE FROM book_comments", ()).await?;
            let removed = conn.execute("DELETE FROM books", ()).await?;
            Ok::<_, anyhow::Error>(removed)
        })
        .await
    }
}
