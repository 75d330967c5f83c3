// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Library App
//!
//! This library provides a small library-management backend: users borrow and
//! return books, and the system keeps each user's loan history along with
//! catalogue statistics.
//!
//! ## Core Components
//!
//! - [`Library`]: Facade wiring the services onto one shared store
//! - [`BookService`]: Book registration, the loan/return lifecycle and statistics
//! - [`UserService`]: User registration and per-user loan history views
//! - [`MemoryStore`]: Thread-safe in-memory implementation of the store traits
//! - [`LibraryError`]: Error types for failed operations
//!
//! ## Example
//!
//! ```
//! use library_app_rs::{BookLoanRequest, BookReturnRequest, Library, UserCreateRequest};
//!
//! let library = Library::new();
//! library.users().save_user(UserCreateRequest::new("A", None)).unwrap();
//!
//! // Loan a title, then return it
//! library.books().loan_book(BookLoanRequest::new("A", "title")).unwrap();
//! assert_eq!(library.books().count_loaned_book().unwrap(), 1);
//!
//! library.books().return_book(BookReturnRequest::new("A", "title")).unwrap();
//! assert_eq!(library.books().count_loaned_book().unwrap(), 0);
//! ```
//!
//! ## Thread Safety
//!
//! Services share the store through an `Arc` and each operation runs in one
//! unit-of-work scope, so a library can be cloned across threads.

mod base;
pub mod book;
mod book_service;
pub mod dto;
pub mod error;
mod library;
pub mod loan_history;
mod memory_store;
pub mod store;
pub mod user;
mod user_service;

pub use base::{BookId, LoanHistoryId, UserId};
pub use book::{Book, BookType};
pub use book_service::BookService;
pub use dto::{
    BookHistoryResponse, BookLoanRequest, BookRequest, BookReturnRequest, BookStatResponse,
    UserCreateRequest, UserLoanHistoryResponse, UserResponse, UserUpdateRequest,
};
pub use error::{ErrorKind, LibraryError, StoreError};
pub use library::Library;
pub use loan_history::{UserLoanHistory, UserLoanStatus};
pub use memory_store::{BookTable, LoanHistoryTable, MemoryStore, UserTable};
pub use store::{BookRepository, LibraryStore, LoanHistoryRepository, UnitOfWork, UserRepository};
pub use user::{User, UserWithHistories};
pub use user_service::UserService;
