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

//! Catalogue books.

use crate::base::BookId;
use serde::{Deserialize, Serialize};

/// Book category used for catalogue statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookType {
    Computer,
    Economy,
    Society,
    Language,
    Science,
}

/// A book in the catalogue.
///
/// Books are immutable once saved. Loans do not reference a book by id; they
/// match on the title string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: Option<BookId>,
    name: String,
    #[serde(rename = "type")]
    book_type: BookType,
}

impl Book {
    /// Creates an unsaved book.
    pub fn new(name: impl Into<String>, book_type: BookType) -> Self {
        Self {
            id: None,
            name: name.into(),
            book_type,
        }
    }

    pub fn id(&self) -> Option<BookId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn book_type(&self) -> BookType {
        self.book_type
    }

    /// Returns the book with the store-assigned identifier.
    pub(crate) fn with_id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }
}
