//! Concurrent writes against one on-disk database. Requests share a single
//! connection, so these cover interleaving between them.

use std::sync::Arc;

use bookshelf::books::BookStore;
use bookshelf::db::Database;

async fn open(dir: &tempfile::TempDir) -> Arc<Database> {
    Arc::new(Database::open_local(dir.path().join("books.db")).await.unwrap())
}

async fn orphan_comments(db: &Database) -> i64 {
    let mut rows = db
        .connection()
        .query(
            "SELECT COUNT(*) FROM book_comments WHERE book_id NOT IN (SELECT id FROM books)",
            (),
        )
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get(0).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_add_comment_racing_delete() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;

    for round in 0..100 {
        let book = db.create(&format!("race {round}")).await.unwrap();

        let mut adds = Vec::new();
        for n in 0..4 {
            let db = db.clone();
            let id = book.id.clone();
            adds.push(tokio::spawn(async move {
                let comment = format!("comment {n}");
                let result = db.add_comment(&id, &comment).await;
                (comment, result)
            }));
        }
        let deleter = {
            let db = db.clone();
            let id = book.id.clone();
            tokio::spawn(async move { db.delete_by_id(&id).await })
        };

        for add in adds {
            let (comment, result) = add.await.unwrap();
            let updated = result.expect("add_comment never fails on valid input");
            if let Some(updated) = updated {
                assert_eq!(updated.id, book.id);
                assert_eq!(updated.comments.last(), Some(&comment), "round {round}");
            }
        }
        let removed = deleter.await.unwrap().expect("delete never fails on valid input");
        assert!(removed, "round {round}: the book existed");

        assert!(db.find_by_id(&book.id).await.unwrap().is_none(), "round {round}");
        assert_eq!(orphan_comments(&db).await, 0, "round {round}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_comments_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    let book = db.create("crowded").await.unwrap();

    let mut adds = Vec::new();
    for n in 0..32 {
        let db = db.clone();
        let id = book.id.clone();
        adds.push(tokio::spawn(async move { db.add_comment(&id, &format!("c{n}")).await }));
    }
    for add in adds {
        assert!(add.await.unwrap().unwrap().is_some());
    }

    let book = db.find_by_id(&book.id).await.unwrap().unwrap();
    assert_eq!(book.comments.len(), 32);

    let list = db.list_with_comment_count().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].comment_count, 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_creates_racing_delete_all() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;

    let mut tasks = Vec::new();
    for n in 0..16 {
        let db = db.clone();
        tasks.push(tokio::spawn(async move {
            let book = db.create(&format!("b{n}")).await.unwrap();
            db.add_comment(&book.id, "x").await.unwrap();
        }));
    }
    let wiper = {
        let db = db.clone();
        tokio::spawn(async move { db.delete_all().await })
    };

    for task in tasks {
        task.await.unwrap();
    }
    wiper.await.unwrap().expect("delete_all never fails");

    assert_eq!(orphan_comments(&db).await, 0);
    for summary in db.list_with_comment_count().await.unwrap() {
        assert!(summary.comment_count <= 1);
    }
}
