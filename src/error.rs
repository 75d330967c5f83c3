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

//! Error types for library operations.

use crate::base::UserId;
use thiserror::Error;

/// Errors raised by store implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not serve the request.
    ///
    /// Only fallible adapters raise this; [`MemoryStore`](crate::MemoryStore)
    /// never does.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    /// An entity loaded from the store carries no identifier
    #[error("{entity} has not been persisted")]
    NotPersisted { entity: &'static str },
}

/// Library service errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// No user is registered under the given name
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// No user is registered under the given identifier
    #[error("user not found: id {0}")]
    UserIdNotFound(UserId),

    /// The user has never borrowed a book with the given title
    #[error("no loan history for user {user_name} and book {book_name}")]
    LoanHistoryNotFound {
        user_name: String,
        book_name: String,
    },

    /// The title already has an unreturned loan, held by any user
    #[error("진작 대출되어 있는 책입니다")]
    BookAlreadyLoaned,

    /// The store failed underneath the service
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification of [`LibraryError`] for callers that translate
/// errors into responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required reference does not exist.
    NotFound,
    /// The request conflicts with the current loan state.
    Conflict,
    /// The store failed.
    Store,
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_) | Self::UserIdNotFound(_) | Self::LoanHistoryNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::BookAlreadyLoaned => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            LibraryError::UserNotFound("A".to_string()).to_string(),
            "user not found: A"
        );
        assert_eq!(
            LibraryError::UserIdNotFound(UserId(7)).to_string(),
            "user not found: id 7"
        );
        assert_eq!(
            LibraryError::LoanHistoryNotFound {
                user_name: "A".to_string(),
                book_name: "title".to_string(),
            }
            .to_string(),
            "no loan history for user A and book title"
        );
        assert_eq!(
            LibraryError::BookAlreadyLoaned.to_string(),
            "진작 대출되어 있는 책입니다"
        );
        assert_eq!(
            StoreError::Unavailable {
                message: "connection reset".to_string()
            }
            .to_string(),
            "store unavailable: connection reset"
        );
        assert_eq!(
            StoreError::NotPersisted { entity: "user" }.to_string(),
            "user has not been persisted"
        );
    }

    #[test]
    fn store_errors_pass_through_transparently() {
        let error = LibraryError::from(StoreError::NotPersisted { entity: "book" });
        assert_eq!(error.to_string(), "book has not been persisted");
        assert_eq!(error.kind(), ErrorKind::Store);
    }

    #[test]
    fn errors_are_classified() {
        assert_eq!(
            LibraryError::UserNotFound("A".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LibraryError::UserIdNotFound(UserId(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LibraryError::LoanHistoryNotFound {
                user_name: "A".to_string(),
                book_name: "B".to_string(),
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(LibraryError::BookAlreadyLoaned.kind(), ErrorKind::Conflict);
    }
}
