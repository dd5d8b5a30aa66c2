use serde::{Deserialize, Serialize};

/// A book and every comment left on it, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub comments: Vec<String>,
}

/// The list projection: comments are replaced by their count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "commentcount")]
    pub comment_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBook {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
}

impl From<Book> for CreatedBook {
    fn from(book: Book) -> Self {
        CreatedBook {
            id: book.id,
            title: book.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let summary = BookSummary {
            id: "abc".to_string(),
            title: "Dune".to_string(),
            comment_count: 2,
        };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({"_id": "abc", "title": "Dune", "commentcount": 2})
        );

        let created: CreatedBook = Book {
            id: "abc".to_string(),
            title: "Dune".to_string(),
            comments: vec!["spice".to_string()],
        }
        .into();
        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            serde_json::json!({"_id": "abc", "title": "Dune"})
        );
    }
}
