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

//! Book loans and catalogue statistics.
//!
//! # Loan Lifecycle
//!
//! - **Loan**: Opens a `Loaned` history record for the user. Rejected while any
//!   user holds an unreturned record for the same title.
//! - **Return**: Moves the user's record for the title to `Returned`.
//! - **Re-loan**: A returned title can be loaned again; this opens a new record.
//!
//! Loans are matched to books by title only. Neither operation consults the
//! book catalogue.

use crate::base::UserId;
use crate::book::{Book, BookType};
use crate::dto::{BookLoanRequest, BookRequest, BookReturnRequest, BookStatResponse};
use crate::error::{LibraryError, StoreError};
use crate::loan_history::{UserLoanHistory, UserLoanStatus};
use crate::store::{BookRepository, LibraryStore, LoanHistoryRepository, UnitOfWork, UserRepository};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

const UNSAVED_USER: StoreError = StoreError::NotPersisted { entity: "user" };

/// Book operations over a shared store.
///
/// Every operation runs inside one unit-of-work scope of the store.
///
/// # Invariants
///
/// - At most one `Loaned` record exists per title across all users.
/// - A record only moves `Loaned` -> `Returned`, never back.
#[derive(Debug)]
pub struct BookService<S> {
    store: Arc<S>,
}

impl<S> Clone for BookService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LibraryStore> BookService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Adds a book to the catalogue. Titles need not be unique.
    pub fn save_book(&self, request: BookRequest) -> Result<Book, LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let book = self
                .store
                .books()
                .save(Book::new(request.name, request.book_type))?;
            info!(name = book.name(), book_type = ?book.book_type(), "book saved");
            Ok(book)
        })
    }

    /// Loans a title to a user.
    ///
    /// The open-loan check covers every user, not only the borrower, and
    /// happens before the user lookup.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::BookAlreadyLoaned`] - Any user holds an unreturned loan of the title.
    /// - [`LibraryError::UserNotFound`] - No user is registered under `user_name`.
    pub fn loan_book(&self, request: BookLoanRequest) -> Result<(), LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let histories = self.store.loan_histories();
            let on_loan = histories
                .exists_by_book_name_and_status(&request.book_name, UserLoanStatus::Loaned)?;
            if on_loan {
                debug!(book = %request.book_name, "loan rejected, title already on loan");
                return Err(LibraryError::BookAlreadyLoaned);
            }

            let user_id = self.find_user_id(&request.user_name)?;
            histories.save(UserLoanHistory::loan(user_id, &request.book_name))?;

            info!(user = %request.user_name, book = %request.book_name, "book loaned");
            Ok(())
        })
    }

    /// Returns a title the user has borrowed.
    ///
    /// If the user has several records for the title, the unreturned one is
    /// closed. With none open, the oldest record is marked returned again,
    /// which changes nothing.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::UserNotFound`] - No user is registered under `user_name`.
    /// - [`LibraryError::LoanHistoryNotFound`] - The user never borrowed the title.
    pub fn return_book(&self, request: BookReturnRequest) -> Result<(), LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let user_id = self.find_user_id(&request.user_name)?;

            let histories = self
                .store
                .loan_histories()
                .find_all_by_user_and_book_name(user_id, &request.book_name)?;
            let open = histories
                .iter()
                .position(UserLoanHistory::is_loaned)
                .unwrap_or(0);
            let mut history = histories.into_iter().nth(open).ok_or_else(|| {
                LibraryError::LoanHistoryNotFound {
                    user_name: request.user_name.clone(),
                    book_name: request.book_name.clone(),
                }
            })?;

            history.do_return();
            self.store.loan_histories().save(history)?;

            info!(user = %request.user_name, book = %request.book_name, "book returned");
            Ok(())
        })
    }

    /// Number of loans currently open across all users.
    pub fn count_loaned_book(&self) -> Result<usize, LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            Ok(self
                .store
                .loan_histories()
                .count_by_status(UserLoanStatus::Loaned)?)
        })
    }

    /// Number of catalogue books per category.
    ///
    /// Only categories with at least one book appear, each exactly once,
    /// ordered by category.
    pub fn get_book_statistics(&self) -> Result<Vec<BookStatResponse>, LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let books = self.store.books().find_all()?;
            let mut counts: BTreeMap<BookType, usize> = BTreeMap::new();
            for book in &books {
                *counts.entry(book.book_type()).or_insert(0) += 1;
            }
            debug!(
                books = books.len(),
                categories = counts.len(),
                "computed book statistics"
            );

            Ok(counts
                .into_iter()
                .map(|(book_type, count)| BookStatResponse { book_type, count })
                .collect())
        })
    }

    fn find_user_id(&self, name: &str) -> Result<UserId, LibraryError> {
        let user = self
            .store
            .users()
            .find_by_name(name)?
            .ok_or_else(|| LibraryError::UserNotFound(name.to_string()))?;
        Ok(user.id().ok_or(UNSAVED_USER)?)
    }
}
