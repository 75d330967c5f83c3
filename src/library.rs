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

//! Library facade.
//!
//! The [`Library`] wires the book and user services onto one shared store,
//! so loans made through [`Library::books`] are visible to the history views
//! of [`Library::users`].
//!
//! # Thread Safety
//!
//! Services share the store through an [`Arc`]. With [`MemoryStore`], every
//! service operation runs in a serialized unit-of-work scope, so concurrent
//! loans of the same title cannot both succeed.

use crate::book_service::BookService;
use crate::memory_store::MemoryStore;
use crate::store::LibraryStore;
use crate::user_service::UserService;
use std::sync::Arc;

/// Entry point owning the store and the services built on it.
#[derive(Debug)]
pub struct Library<S = MemoryStore> {
    store: Arc<S>,
    books: BookService<S>,
    users: UserService<S>,
}

impl Library<MemoryStore> {
    /// Creates a library backed by an empty in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }
}

impl Default for Library<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LibraryStore> Library<S> {
    /// Creates a library over an existing store.
    pub fn with_store(store: Arc<S>) -> Self {
        Self {
            books: BookService::new(Arc::clone(&store)),
            users: UserService::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn books(&self) -> &BookService<S> {
        &self.books
    }

    pub fn users(&self) -> &UserService<S> {
        &self.users
    }

    /// Direct access to the underlying store, e.g. for seeding or inspection.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> Clone for Library<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            books: self.books.clone(),
            users: self.users.clone(),
        }
    }
}
