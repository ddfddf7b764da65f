//! Route handlers for the stacks record service
//!
//! Organized by resource type:
//! - books: the book catalog
//! - users: registered users
//! - health: liveness endpoint

pub mod books;
pub mod health;
pub mod users;

pub use books::*;
pub use health::*;
pub use users::*;
