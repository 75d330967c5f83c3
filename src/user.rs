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

//! Library users.

use crate::base::UserId;
use crate::loan_history::UserLoanHistory;
use serde::{Deserialize, Serialize};

/// A registered library user.
///
/// Names are used as lookup keys but are not required to be unique; lookups
/// by name resolve to the earliest registered match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: Option<UserId>,
    name: String,
    age: Option<u32>,
}

impl User {
    /// Creates an unsaved user.
    pub fn new(name: impl Into<String>, age: Option<u32>) -> Self {
        Self {
            id: None,
            name: name.into(),
            age,
        }
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn update_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }
}

/// A user together with every loan history record it owns.
///
/// Produced by a single fetch so that building per-user views does not cost
/// one history query per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithHistories {
    pub user: User,
    pub histories: Vec<UserLoanHistory>,
}
