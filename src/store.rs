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

//! Store contracts used by the library services.
//!
//! Each entity has its own repository trait. A [`LibraryStore`] bundles one
//! repository per entity with a [`UnitOfWork`] so that services can run a
//! whole operation inside one scope. [`MemoryStore`](crate::MemoryStore) is
//! the in-process implementation.

use crate::base::UserId;
use crate::book::Book;
use crate::error::StoreError;
use crate::loan_history::{UserLoanHistory, UserLoanStatus};
use crate::user::{User, UserWithHistories};

/// Persistence of [`User`] records.
pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Returns the earliest registered user with the given name.
    fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// Returns all users in ascending id order.
    fn find_all(&self) -> Result<Vec<User>, StoreError>;

    /// Returns all users with their loan histories in one round trip.
    ///
    /// Users without history are included with an empty list.
    fn find_all_with_histories(&self) -> Result<Vec<UserWithHistories>, StoreError>;

    /// Inserts the user, assigning an id if it has none, or overwrites the
    /// stored record with the same id.
    fn save(&self, user: User) -> Result<User, StoreError>;

    fn save_all(&self, users: Vec<User>) -> Result<Vec<User>, StoreError> {
        users.into_iter().map(|user| self.save(user)).collect()
    }

    /// Deletes the user and every loan history record it owns.
    fn delete(&self, user: &User) -> Result<(), StoreError>;

    fn delete_all(&self) -> Result<(), StoreError>;
}

/// Persistence of [`Book`] records.
pub trait BookRepository: Send + Sync {
    fn find_by_name(&self, name: &str) -> Result<Option<Book>, StoreError>;

    fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    fn save(&self, book: Book) -> Result<Book, StoreError>;

    fn save_all(&self, books: Vec<Book>) -> Result<Vec<Book>, StoreError> {
        books.into_iter().map(|book| self.save(book)).collect()
    }

    fn delete_all(&self) -> Result<(), StoreError>;
}

/// Persistence of [`UserLoanHistory`] records.
pub trait LoanHistoryRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<UserLoanHistory>, StoreError>;

    /// Returns every record of `user_id` for the title, oldest first.
    fn find_all_by_user_and_book_name(
        &self,
        user_id: UserId,
        book_name: &str,
    ) -> Result<Vec<UserLoanHistory>, StoreError>;

    /// Whether any user holds a record for the title in `status`.
    fn exists_by_book_name_and_status(
        &self,
        book_name: &str,
        status: UserLoanStatus,
    ) -> Result<bool, StoreError>;

    fn count_by_status(&self, status: UserLoanStatus) -> Result<usize, StoreError>;

    fn save(&self, history: UserLoanHistory) -> Result<UserLoanHistory, StoreError>;

    fn save_all(
        &self,
        histories: Vec<UserLoanHistory>,
    ) -> Result<Vec<UserLoanHistory>, StoreError> {
        histories
            .into_iter()
            .map(|history| self.save(history))
            .collect()
    }

    fn delete_all(&self) -> Result<(), StoreError>;
}

/// Scope in which a service operation reads and writes the store as a unit.
///
/// Implementations must serialize overlapping scopes (or provide equivalent
/// isolation) and must allow a scope to be opened again from inside itself.
pub trait UnitOfWork {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>;
}

/// A complete store: one repository per entity plus a unit-of-work scope.
pub trait LibraryStore: UnitOfWork + Send + Sync {
    type Users: UserRepository;
    type Books: BookRepository;
    type LoanHistories: LoanHistoryRepository;

    fn users(&self) -> &Self::Users;

    fn books(&self) -> &Self::Books;

    fn loan_histories(&self) -> &Self::LoanHistories;
}
