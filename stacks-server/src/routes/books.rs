//! Book routes
//!
//! Logical misses answer HTTP 200 with the historical message strings;
//! only store faults surface as error statuses.

use axum::extract::{Path, State};
use axum::Json;

use crate::db::Database;
use crate::error::ServerResult;
use crate::extract::LegacyJson;
use crate::models::{Book, BookPatch, CreateBookRequest};

/// POST /book/add - Catalog a new book
pub async fn add_book(
    State(db): State<Database>,
    LegacyJson(req): LegacyJson<CreateBookRequest>,
) -> ServerResult<Json<&'static str>> {
    db.add_book(&req)?;
    Ok(Json("Book added successfully"))
}

/// GET /book/get - List all books
pub async fn get_all_books(State(db): State<Database>) -> ServerResult<Json<Vec<Book>>> {
    let books = db.list_books()?;
    Ok(Json(books))
}

/// GET /book/get/{id} - Get one book, or JSON null when absent
pub async fn get_one_book(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Option<Book>>> {
    let book = db.get_book(id)?;
    Ok(Json(book))
}

/// PUT /book/update/{id} - Partially update a book by id
pub async fn update_book(
    State(db): State<Database>,
    Path(id): Path<i64>,
    LegacyJson(patch): LegacyJson<BookPatch>,
) -> ServerResult<Json<String>> {
    let message = match db.update_book(id, &patch)? {
        Some(_) => "Book updated successfully".to_string(),
        None => format!("Error: book with id of {} doesn't exist.", id),
    };

    Ok(Json(message))
}

/// PUT /book/update/title/{book_title} - Partially update a book by its
/// current title
pub async fn update_book_by_title(
    State(db): State<Database>,
    Path(book_title): Path<String>,
    LegacyJson(patch): LegacyJson<BookPatch>,
) -> ServerResult<Json<String>> {
    let message = match db.update_book_by_title(&book_title, &patch)? {
        Some(_) => "Book updated successfully".to_string(),
        None => format!("Error: book with title of {} doesn't exist.", book_title),
    };

    Ok(Json(message))
}

/// DELETE /book/delete/{id} - Remove a book; deleting a missing id is a
/// no-op answered with the not-found message
pub async fn delete_book(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ServerResult<Json<String>> {
    let message = if db.delete_book(id)? {
        "Book deleted successfully".to_string()
    } else {
        format!("Error: book with id of {} doesn't exist.", id)
    };

    Ok(Json(message))
}
