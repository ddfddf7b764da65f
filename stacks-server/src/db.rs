//! SQLite persistence for the stacks record service
//!
//! Uses rusqlite with schema bootstrap on open. One connection behind a
//! mutex; every operation is at most one read-then-write sequence under
//! the lock.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::ServerResult;
use crate::models::{
    Book, BookPatch, CreateBookRequest, CreateUserRequest, User, UserPatch,
};

/// Thread-safe database wrapper
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: impl Into<PathBuf>) -> ServerResult<Self> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        db.bootstrap()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> ServerResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };
        db.bootstrap()?;
        Ok(db)
    }

    /// Get the database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Get database file size in bytes
    pub fn size_bytes(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    /// Create tables if missing
    fn bootstrap(&self) -> ServerResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ========================================================================
    // Books
    // ========================================================================

    pub fn add_book(&self, req: &CreateBookRequest) -> ServerResult<Book> {
        let conn = self.conn.lock().unwrap();

        // A duplicate title or a missing required field trips the store's
        // constraints here and propagates untranslated.
        conn.execute(
            "INSERT INTO books (title, author, review) VALUES (?1, ?2, ?3)",
            params![req.title, req.author, req.review],
        )?;

        let id = conn.last_insert_rowid();
        let book = conn.query_row(
            "SELECT id, title, author, review FROM books WHERE id = ?1",
            [id],
            map_book,
        )?;

        Ok(book)
    }

    pub fn list_books(&self) -> ServerResult<Vec<Book>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, title, author, review FROM books ORDER BY id")?;

        let books = stmt
            .query_map([], map_book)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }

    pub fn get_book(&self, id: i64) -> ServerResult<Option<Book>> {
        let conn = self.conn.lock().unwrap();
        let book = conn
            .query_row(
                "SELECT id, title, author, review FROM books WHERE id = ?1",
                [id],
                map_book,
            )
            .optional()?;

        Ok(book)
    }

    pub fn get_book_by_title(&self, title: &str) -> ServerResult<Option<Book>> {
        let conn = self.conn.lock().unwrap();
        let book = conn
            .query_row(
                "SELECT id, title, author, review FROM books WHERE title = ?1",
                [title],
                map_book,
            )
            .optional()?;

        Ok(book)
    }

    /// Apply a patch to the book with the given id. Returns `None` without
    /// touching the store when no row matches.
    pub fn update_book(&self, id: i64, patch: &BookPatch) -> ServerResult<Option<Book>> {
        let conn = self.conn.lock().unwrap();

        let row = conn
            .query_row(
                "SELECT id, title, author, review FROM books WHERE id = ?1",
                [id],
                map_book,
            )
            .optional()?;

        let mut book = match row {
            Some(b) => b,
            None => return Ok(None),
        };

        patch.apply(&mut book);

        conn.execute(
            "UPDATE books SET title = ?1, author = ?2, review = ?3 WHERE id = ?4",
            params![book.title, book.author, book.review, book.id],
        )?;

        Ok(Some(book))
    }

    /// Same contract as [`update_book`](Self::update_book), keyed on the
    /// book's current title.
    pub fn update_book_by_title(
        &self,
        title: &str,
        patch: &BookPatch,
    ) -> ServerResult<Option<Book>> {
        let conn = self.conn.lock().unwrap();

        let row = conn
            .query_row(
                "SELECT id, title, author, review FROM books WHERE title = ?1",
                [title],
                map_book,
            )
            .optional()?;

        let mut book = match row {
            Some(b) => b,
            None => return Ok(None),
        };

        patch.apply(&mut book);

        conn.execute(
            "UPDATE books SET title = ?1, author = ?2, review = ?3 WHERE id = ?4",
            params![book.title, book.author, book.review, book.id],
        )?;

        Ok(Some(book))
    }

    /// Delete the book with the given id. Deleting a missing id is a no-op
    /// signalled as `false`.
    pub fn delete_book(&self, id: i64) -> ServerResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM books WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub fn add_user(&self, req: &CreateUserRequest) -> ServerResult<User> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![req.username, req.password],
        )?;

        let id = conn.last_insert_rowid();
        let user = conn.query_row(
            "SELECT id, username, password FROM users WHERE id = ?1",
            [id],
            map_user,
        )?;

        Ok(user)
    }

    pub fn list_users(&self) -> ServerResult<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, username, password FROM users ORDER BY id")?;

        let users = stmt
            .query_map([], map_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub fn get_user(&self, id: i64) -> ServerResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                "SELECT id, username, password FROM users WHERE id = ?1",
                [id],
                map_user,
            )
            .optional()?;

        Ok(user)
    }

    pub fn update_user(&self, id: i64, patch: &UserPatch) -> ServerResult<Option<User>> {
        let conn = self.conn.lock().unwrap();

        let row = conn
            .query_row(
                "SELECT id, username, password FROM users WHERE id = ?1",
                [id],
                map_user,
            )
            .optional()?;

        let mut user = match row {
            Some(u) => u,
            None => return Ok(None),
        };

        patch.apply(&mut user);

        conn.execute(
            "UPDATE users SET username = ?1, password = ?2 WHERE id = ?3",
            params![user.username, user.password, user.id],
        )?;

        Ok(Some(user))
    }

    pub fn delete_user(&self, id: i64) -> ServerResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }
}

// ============================================================================
// Schema
// ============================================================================

const SCHEMA: &str = r#"
-- Books table
CREATE TABLE IF NOT EXISTS books (
    id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    author TEXT NOT NULL,
    review TEXT
);

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);
"#;

// ============================================================================
// Row mapping
// ============================================================================

fn map_book(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        review: row.get(3)?,
    })
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;

    fn dune() -> CreateBookRequest {
        CreateBookRequest {
            title: Some("Dune".to_string()),
            author: Some("Herbert".to_string()),
            review: Some("great".to_string()),
        }
    }

    #[test]
    fn test_add_then_get_roundtrip() {
        let db = Database::open_in_memory().unwrap();

        let created = db.add_book(&dune()).unwrap();
        assert_eq!(created.id, 1);

        let fetched = db.get_book(created.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Dune");
        assert_eq!(fetched.author, "Herbert");
        assert_eq!(fetched.review.as_deref(), Some("great"));
    }

    #[test]
    fn test_duplicate_title_fails_and_list_is_unchanged() {
        let db = Database::open_in_memory().unwrap();
        db.add_book(&dune()).unwrap();

        let second = CreateBookRequest {
            author: Some("Someone Else".to_string()),
            ..dune()
        };
        let err = db.add_book(&second).unwrap_err();
        assert!(matches!(err, ServerError::Database(_)));

        let books = db.list_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author, "Herbert");
    }

    #[test]
    fn test_missing_required_field_is_a_store_fault() {
        let db = Database::open_in_memory().unwrap();

        let req = CreateBookRequest {
            title: Some("Untitled".to_string()),
            author: None,
            review: None,
        };
        assert!(db.add_book(&req).is_err());
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let db = Database::open_in_memory().unwrap();
        let book = db.add_book(&dune()).unwrap();

        let patch = BookPatch {
            author: Some("Frank Herbert".to_string()),
            ..Default::default()
        };
        let updated = db.update_book(book.id, &patch).unwrap().unwrap();

        assert_eq!(updated.author, "Frank Herbert");
        assert_eq!(updated.title, "Dune");
        assert_eq!(updated.review.as_deref(), Some("great"));
    }

    #[test]
    fn test_update_with_empty_string_leaves_field_alone() {
        let db = Database::open_in_memory().unwrap();
        let book = db.add_book(&dune()).unwrap();

        let patch = BookPatch {
            review: Some(String::new()),
            ..Default::default()
        };
        db.update_book(book.id, &patch).unwrap().unwrap();

        let fetched = db.get_book(book.id).unwrap().unwrap();
        assert_eq!(fetched.review.as_deref(), Some("great"));
    }

    #[test]
    fn test_update_missing_id_is_none_and_store_unchanged() {
        let db = Database::open_in_memory().unwrap();
        db.add_book(&dune()).unwrap();

        let patch = BookPatch {
            title: Some("Messiah".to_string()),
            ..Default::default()
        };
        assert!(db.update_book(999, &patch).unwrap().is_none());

        let books = db.list_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[test]
    fn test_update_by_title() {
        let db = Database::open_in_memory().unwrap();
        db.add_book(&dune()).unwrap();

        let patch = BookPatch {
            review: Some("a classic".to_string()),
            ..Default::default()
        };
        let updated = db.update_book_by_title("Dune", &patch).unwrap().unwrap();
        assert_eq!(updated.review.as_deref(), Some("a classic"));

        assert!(db.update_book_by_title("Missing", &patch).unwrap().is_none());
    }

    #[test]
    fn test_delete_twice_is_safe() {
        let db = Database::open_in_memory().unwrap();
        let book = db.add_book(&dune()).unwrap();

        assert!(db.delete_book(book.id).unwrap());
        assert!(!db.delete_book(book.id).unwrap());
        assert!(db.get_book(book.id).unwrap().is_none());
    }

    #[test]
    fn test_user_crud() {
        let db = Database::open_in_memory().unwrap();

        let user = db
            .add_user(&CreateUserRequest {
                username: Some("paul".to_string()),
                password: Some("atreides".to_string()),
            })
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.password, "atreides");

        let patch = UserPatch {
            password: Some("muaddib".to_string()),
            ..Default::default()
        };
        let updated = db.update_user(user.id, &patch).unwrap().unwrap();
        assert_eq!(updated.username, "paul");
        assert_eq!(updated.password, "muaddib");

        assert!(db.update_user(42, &patch).unwrap().is_none());
        assert!(db.delete_user(user.id).unwrap());
        assert!(!db.delete_user(user.id).unwrap());
    }

    #[test]
    fn test_duplicate_username_fails() {
        let db = Database::open_in_memory().unwrap();
        let req = CreateUserRequest {
            username: Some("paul".to_string()),
            password: Some("one".to_string()),
        };
        db.add_user(&req).unwrap();
        assert!(db.add_user(&req).is_err());
    }

    #[test]
    fn test_ids_keep_increasing_after_delete() {
        let db = Database::open_in_memory().unwrap();

        let first = db.add_book(&dune()).unwrap();
        db.delete_book(first.id).unwrap();

        let second = db
            .add_book(&CreateBookRequest {
                title: Some("Messiah".to_string()),
                author: Some("Herbert".to_string()),
                review: None,
            })
            .unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_file_backed_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");

        {
            let db = Database::open(&path).unwrap();
            db.add_book(&dune()).unwrap();
            assert!(db.size_bytes().unwrap_or(0) > 0);
        }

        let reopened = Database::open(&path).unwrap();
        let books = reopened.list_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }
}
