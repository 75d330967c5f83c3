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

//! Loan history ledger.
//!
//! Each loan is a record that follows a one-way state machine:
//! - [`Loaned`] → [`Returned`] (via return)
//!
//! A returned record never goes back to [`Loaned`]; borrowing the same title
//! again creates a new record.
//!
//! [`Loaned`]: UserLoanStatus::Loaned
//! [`Returned`]: UserLoanStatus::Returned

use crate::base::{LoanHistoryId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserLoanStatus {
    Loaned,
    Returned,
}

/// A single borrow of a title by a user.
///
/// ```text
/// Loaned ──return──► Returned
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoanHistory {
    id: Option<LoanHistoryId>,
    user_id: UserId,
    book_name: String,
    status: UserLoanStatus,
}

impl UserLoanHistory {
    /// Opens a new loan of `book_name` for the user.
    pub fn loan(user_id: UserId, book_name: impl Into<String>) -> Self {
        Self::with_status(user_id, book_name, UserLoanStatus::Loaned)
    }

    /// Creates a record in an arbitrary status, e.g. when importing past loans.
    pub fn with_status(
        user_id: UserId,
        book_name: impl Into<String>,
        status: UserLoanStatus,
    ) -> Self {
        Self {
            id: None,
            user_id,
            book_name: book_name.into(),
            status,
        }
    }

    pub fn id(&self) -> Option<LoanHistoryId> {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn book_name(&self) -> &str {
        &self.book_name
    }

    pub fn status(&self) -> UserLoanStatus {
        self.status
    }

    pub fn is_loaned(&self) -> bool {
        self.status == UserLoanStatus::Loaned
    }

    pub fn is_return(&self) -> bool {
        self.status == UserLoanStatus::Returned
    }

    /// Marks the loan as returned. Returning twice leaves the record returned.
    pub fn do_return(&mut self) {
        self.status = UserLoanStatus::Returned;
    }

    pub(crate) fn with_id(mut self, id: LoanHistoryId) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loan_opens_in_loaned_status() {
        let history = UserLoanHistory::loan(UserId(1), "title");
        assert_eq!(history.status(), UserLoanStatus::Loaned);
        assert!(history.is_loaned());
        assert!(!history.is_return());
        assert_eq!(history.book_name(), "title");
        assert_eq!(history.user_id(), UserId(1));
        assert_eq!(history.id(), None);
    }

    #[test]
    fn do_return_transitions_to_returned() {
        let mut history = UserLoanHistory::loan(UserId(1), "title");
        history.do_return();
        assert_eq!(history.status(), UserLoanStatus::Returned);
        assert!(history.is_return());
    }

    #[test]
    fn do_return_is_idempotent() {
        let mut history =
            UserLoanHistory::with_status(UserId(1), "title", UserLoanStatus::Returned);
        history.do_return();
        assert_eq!(history.status(), UserLoanStatus::Returned);
    }

    #[test]
    fn status_serializes_in_upper_case() {
        assert_eq!(
            serde_json::to_string(&UserLoanStatus::Loaned).unwrap(),
            "\"LOANED\""
        );
        assert_eq!(
            serde_json::to_string(&UserLoanStatus::Returned).unwrap(),
            "\"RETURNED\""
        );
    }
}
