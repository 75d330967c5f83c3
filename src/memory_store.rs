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

//! Thread-safe in-memory store.
//!
//! Every table is a [`DashMap`] keyed by a store-assigned identifier drawn
//! from a per-table atomic sequence. Listing operations sort by identifier so
//! results come back in insertion order.

use crate::base::{BookId, LoanHistoryId, UserId};
use crate::book::Book;
use crate::error::StoreError;
use crate::loan_history::{UserLoanHistory, UserLoanStatus};
use crate::store::{BookRepository, LibraryStore, LoanHistoryRepository, UnitOfWork, UserRepository};
use crate::user::{User, UserWithHistories};
use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Monotonic identifier source for one table. The first id handed out is 1.
#[derive(Debug)]
struct Sequence(AtomicU64);

impl Sequence {
    fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Loan history table.
#[derive(Debug)]
pub struct LoanHistoryTable {
    rows: DashMap<LoanHistoryId, UserLoanHistory>,
    sequence: Sequence,
}

impl LoanHistoryTable {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
            sequence: Sequence::new(),
        }
    }

    fn sorted(mut histories: Vec<UserLoanHistory>) -> Vec<UserLoanHistory> {
        histories.sort_by_key(UserLoanHistory::id);
        histories
    }

    /// Removes every record owned by `user_id`.
    fn delete_by_user(&self, user_id: UserId) {
        self.rows.retain(|_, history| history.user_id() != user_id);
    }

    /// Groups all records by owner in a single pass, oldest first per owner.
    fn group_by_user(&self) -> HashMap<UserId, Vec<UserLoanHistory>> {
        let mut grouped: HashMap<UserId, Vec<UserLoanHistory>> = HashMap::new();
        for entry in self.rows.iter() {
            grouped
                .entry(entry.user_id())
                .or_default()
                .push(entry.value().clone());
        }
        grouped
            .into_iter()
            .map(|(user_id, histories)| (user_id, Self::sorted(histories)))
            .collect()
    }
}

impl LoanHistoryRepository for LoanHistoryTable {
    fn find_all(&self) -> Result<Vec<UserLoanHistory>, StoreError> {
        let histories = self
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Self::sorted(histories))
    }

    fn find_all_by_user_and_book_name(
        &self,
        user_id: UserId,
        book_name: &str,
    ) -> Result<Vec<UserLoanHistory>, StoreError> {
        let histories = self
            .rows
            .iter()
            .filter(|entry| entry.user_id() == user_id && entry.book_name() == book_name)
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Self::sorted(histories))
    }

    fn exists_by_book_name_and_status(
        &self,
        book_name: &str,
        status: UserLoanStatus,
    ) -> Result<bool, StoreError> {
        Ok(self
            .rows
            .iter()
            .any(|entry| entry.book_name() == book_name && entry.status() == status))
    }

    fn count_by_status(&self, status: UserLoanStatus) -> Result<usize, StoreError> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.status() == status)
            .count())
    }

    fn save(&self, history: UserLoanHistory) -> Result<UserLoanHistory, StoreError> {
        let id = history
            .id()
            .unwrap_or_else(|| LoanHistoryId(self.sequence.next()));
        let history = history.with_id(id);
        debug!(%id, book = history.book_name(), status = ?history.status(), "saving loan history");
        self.rows.insert(id, history.clone());
        Ok(history)
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.rows.clear();
        Ok(())
    }
}

/// User table. Owns a handle on the loan history table for cascading deletes
/// and joined fetches.
#[derive(Debug)]
pub struct UserTable {
    rows: DashMap<UserId, User>,
    sequence: Sequence,
    loan_histories: Arc<LoanHistoryTable>,
}

impl UserTable {
    fn new(loan_histories: Arc<LoanHistoryTable>) -> Self {
        Self {
            rows: DashMap::new(),
            sequence: Sequence::new(),
            loan_histories,
        }
    }
}

impl UserRepository for UserTable {
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.rows.get(&id).map(|entry| entry.value().clone()))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.name() == name)
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone()))
    }

    fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(User::id);
        Ok(users)
    }

    fn find_all_with_histories(&self) -> Result<Vec<UserWithHistories>, StoreError> {
        let mut grouped = self.loan_histories.group_by_user();
        let users = UserRepository::find_all(self)?;
        debug!(
            users = users.len(),
            owners = grouped.len(),
            "joined users with loan histories"
        );

        Ok(users
            .into_iter()
            .map(|user| {
                let histories = user
                    .id()
                    .and_then(|id| grouped.remove(&id))
                    .unwrap_or_default();
                UserWithHistories { user, histories }
            })
            .collect())
    }

    fn save(&self, user: User) -> Result<User, StoreError> {
        let id = user.id().unwrap_or_else(|| UserId(self.sequence.next()));
        let user = user.with_id(id);
        debug!(%id, name = user.name(), "saving user");
        self.rows.insert(id, user.clone());
        Ok(user)
    }

    fn delete(&self, user: &User) -> Result<(), StoreError> {
        let id = user
            .id()
            .ok_or(StoreError::NotPersisted { entity: "user" })?;
        self.loan_histories.delete_by_user(id);
        self.rows.remove(&id);
        debug!(%id, "deleted user and owned loan histories");
        Ok(())
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.loan_histories.rows.clear();
        self.rows.clear();
        Ok(())
    }
}

/// Book table.
#[derive(Debug)]
pub struct BookTable {
    rows: DashMap<BookId, Book>,
    sequence: Sequence,
}

impl BookTable {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
            sequence: Sequence::new(),
        }
    }
}

impl BookRepository for BookTable {
    fn find_by_name(&self, name: &str) -> Result<Option<Book>, StoreError> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.name() == name)
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone()))
    }

    fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let mut books: Vec<Book> = self
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        books.sort_by_key(Book::id);
        Ok(books)
    }

    fn save(&self, book: Book) -> Result<Book, StoreError> {
        let id = book.id().unwrap_or_else(|| BookId(self.sequence.next()));
        let book = book.with_id(id);
        debug!(%id, name = book.name(), book_type = ?book.book_type(), "saving book");
        self.rows.insert(id, book.clone());
        Ok(book)
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.rows.clear();
        Ok(())
    }
}

/// In-memory [`LibraryStore`].
///
/// Unit-of-work scopes are serialized by a re-entrant lock, so a service
/// operation's reads and writes are not interleaved with another scope.
/// Reads outside a scope go straight to the tables.
#[derive(Debug)]
pub struct MemoryStore {
    users: UserTable,
    books: BookTable,
    loan_histories: Arc<LoanHistoryTable>,
    scope: ReentrantMutex<()>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let loan_histories = Arc::new(LoanHistoryTable::new());
        Self {
            users: UserTable::new(Arc::clone(&loan_histories)),
            books: BookTable::new(),
            loan_histories,
            scope: ReentrantMutex::new(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitOfWork for MemoryStore {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let _scope = self.scope.lock();
        work()
    }
}

impl LibraryStore for MemoryStore {
    type Users = UserTable;
    type Books = BookTable;
    type LoanHistories = LoanHistoryTable;

    fn users(&self) -> &UserTable {
        &self.users
    }

    fn books(&self) -> &BookTable {
        &self.books
    }

    fn loan_histories(&self) -> &LoanHistoryTable {
        &self.loan_histories
    }
}
