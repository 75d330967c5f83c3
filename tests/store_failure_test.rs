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

//! Services over a store whose backend is down.

use library_app_rs::{
    Book, BookLoanRequest, BookRepository, BookRequest, BookType, ErrorKind, Library, LibraryError,
    LibraryStore, LoanHistoryRepository, StoreError, UnitOfWork, User, UserCreateRequest, UserId,
    UserLoanHistory, UserLoanStatus, UserRepository, UserWithHistories,
};
use std::sync::Arc;

/// Every repository call fails as if the backend were unreachable.
struct OfflineStore;

fn offline<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable {
        message: "backend offline".to_string(),
    })
}

impl UserRepository for OfflineStore {
    fn find_by_id(&self, _id: UserId) -> Result<Option<User>, StoreError> {
        offline()
    }

    fn find_by_name(&self, _name: &str) -> Result<Option<User>, StoreError> {
        offline()
    }

    fn find_all(&self) -> Result<Vec<User>, StoreError> {
        offline()
    }

    fn find_all_with_histories(&self) -> Result<Vec<UserWithHistories>, StoreError> {
        offline()
    }

    fn save(&self, _user: User) -> Result<User, StoreError> {
        offline()
    }

    fn delete(&self, _user: &User) -> Result<(), StoreError> {
        offline()
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        offline()
    }
}

impl BookRepository for OfflineStore {
    fn find_by_name(&self, _name: &str) -> Result<Option<Book>, StoreError> {
        offline()
    }

    fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        offline()
    }

    fn save(&self, _book: Book) -> Result<Book, StoreError> {
        offline()
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        offline()
    }
}

impl LoanHistoryRepository for OfflineStore {
    fn find_all(&self) -> Result<Vec<UserLoanHistory>, StoreError> {
        offline()
    }

    fn find_all_by_user_and_book_name(
        &self,
        _user_id: UserId,
        _book_name: &str,
    ) -> Result<Vec<UserLoanHistory>, StoreError> {
        offline()
    }

    fn exists_by_book_name_and_status(
        &self,
        _book_name: &str,
        _status: UserLoanStatus,
    ) -> Result<bool, StoreError> {
        offline()
    }

    fn count_by_status(&self, _status: UserLoanStatus) -> Result<usize, StoreError> {
        offline()
    }

    fn save(&self, _history: UserLoanHistory) -> Result<UserLoanHistory, StoreError> {
        offline()
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        offline()
    }
}

impl UnitOfWork for OfflineStore {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        work()
    }
}

impl LibraryStore for OfflineStore {
    type Users = Self;
    type Books = Self;
    type LoanHistories = Self;

    fn users(&self) -> &Self {
        self
    }

    fn books(&self) -> &Self {
        self
    }

    fn loan_histories(&self) -> &Self {
        self
    }
}

fn unavailable() -> LibraryError {
    LibraryError::Store(StoreError::Unavailable {
        message: "backend offline".to_string(),
    })
}

#[test]
fn unavailable_store_surfaces_as_store_error() {
    let library = Library::with_store(Arc::new(OfflineStore));

    let error = library
        .books()
        .loan_book(BookLoanRequest::new("A", "title"))
        .unwrap_err();

    assert_eq!(error, unavailable());
    assert_eq!(error.kind(), ErrorKind::Store);
    assert_eq!(error.to_string(), "store unavailable: backend offline");
}

#[test]
fn every_operation_propagates_the_failure() {
    let library = Library::with_store(Arc::new(OfflineStore));

    assert_eq!(
        library
            .books()
            .save_book(BookRequest::new("title", BookType::Science)),
        Err(unavailable())
    );
    assert_eq!(library.books().count_loaned_book(), Err(unavailable()));
    assert_eq!(library.books().get_book_statistics(), Err(unavailable()));
    assert_eq!(
        library
            .users()
            .save_user(UserCreateRequest::new("A", None)),
        Err(unavailable())
    );
    assert_eq!(library.users().get_users(), Err(unavailable()));
    assert_eq!(library.users().delete_user("A"), Err(unavailable()));
    assert_eq!(
        library.users().get_user_loan_histories(),
        Err(unavailable())
    );
}
