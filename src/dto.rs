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

//! Service requests and responses.
//!
//! Field names serialize in camelCase, e.g. `{"name": "A", "books":
//! [{"name": "title", "isReturn": false}]}`.

use crate::base::UserId;
use crate::book::BookType;
use crate::user::{User, UserWithHistories};
use serde::{Deserialize, Serialize};

// === Requests ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub book_type: BookType,
}

impl BookRequest {
    pub fn new(name: impl Into<String>, book_type: BookType) -> Self {
        Self {
            name: name.into(),
            book_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookLoanRequest {
    pub user_name: String,
    pub book_name: String,
}

impl BookLoanRequest {
    pub fn new(user_name: impl Into<String>, book_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            book_name: book_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReturnRequest {
    pub user_name: String,
    pub book_name: String,
}

impl BookReturnRequest {
    pub fn new(user_name: impl Into<String>, book_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            book_name: book_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    pub name: String,
    pub age: Option<u32>,
}

impl UserCreateRequest {
    pub fn new(name: impl Into<String>, age: Option<u32>) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub id: UserId,
    pub name: String,
}

impl UserUpdateRequest {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// === Responses ===

/// Number of catalogue books of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStatResponse {
    #[serde(rename = "type")]
    pub book_type: BookType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Option<UserId>,
    pub name: String,
    pub age: Option<u32>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
            age: user.age(),
        }
    }
}

/// One loan in a user's history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookHistoryResponse {
    pub name: String,
    pub is_return: bool,
}

/// A user's loan history, one entry per loan record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoanHistoryResponse {
    pub name: String,
    pub books: Vec<BookHistoryResponse>,
}

impl From<UserWithHistories> for UserLoanHistoryResponse {
    fn from(joined: UserWithHistories) -> Self {
        Self {
            name: joined.user.name().to_string(),
            books: joined
                .histories
                .iter()
                .map(|history| BookHistoryResponse {
                    name: history.book_name().to_string(),
                    is_return: history.is_return(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan_history::{UserLoanHistory, UserLoanStatus};

    #[test]
    fn loan_history_response_uses_camel_case() {
        let response = UserLoanHistoryResponse {
            name: "A".to_string(),
            books: vec![BookHistoryResponse {
                name: "title".to_string(),
                is_return: true,
            }],
        };

        let parsed = serde_json::to_value(&response).unwrap();
        assert_eq!(parsed["name"], "A");
        assert_eq!(parsed["books"][0]["name"], "title");
        assert_eq!(parsed["books"][0]["isReturn"], true);
    }

    #[test]
    fn requests_deserialize_from_camel_case() {
        let request: BookLoanRequest =
            serde_json::from_str(r#"{"userName": "A", "bookName": "title"}"#).unwrap();
        assert_eq!(request, BookLoanRequest::new("A", "title"));

        let request: BookRequest =
            serde_json::from_str(r#"{"name": "title", "type": "SOCIETY"}"#).unwrap();
        assert_eq!(request, BookRequest::new("title", BookType::Society));
    }

    #[test]
    fn history_view_derives_is_return_from_status() {
        let joined = UserWithHistories {
            user: User::new("A", None),
            histories: vec![
                UserLoanHistory::loan(UserId(1), "book1"),
                UserLoanHistory::with_status(UserId(1), "book2", UserLoanStatus::Returned),
            ],
        };

        let response = UserLoanHistoryResponse::from(joined);
        assert_eq!(response.name, "A");
        assert_eq!(
            response.books,
            vec![
                BookHistoryResponse {
                    name: "book1".to_string(),
                    is_return: false,
                },
                BookHistoryResponse {
                    name: "book2".to_string(),
                    is_return: true,
                },
            ]
        );
    }
}
