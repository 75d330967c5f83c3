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

//! User registration and per-user loan history views.

use crate::dto::{UserCreateRequest, UserLoanHistoryResponse, UserResponse, UserUpdateRequest};
use crate::error::LibraryError;
use crate::store::{LibraryStore, UnitOfWork, UserRepository};
use crate::user::User;
use std::sync::Arc;
use tracing::{debug, info};

/// User operations over a shared store.
#[derive(Debug)]
pub struct UserService<S> {
    store: Arc<S>,
}

impl<S> Clone for UserService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LibraryStore> UserService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Registers a user. The age is stored as given.
    pub fn save_user(&self, request: UserCreateRequest) -> Result<User, LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let user = self
                .store
                .users()
                .save(User::new(request.name, request.age))?;
            info!(name = user.name(), "user saved");
            Ok(user)
        })
    }

    /// All users in registration order.
    pub fn get_users(&self) -> Result<Vec<UserResponse>, LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let users = self.store.users().find_all()?;
            Ok(users.iter().map(UserResponse::from).collect())
        })
    }

    /// # Errors
    ///
    /// - [`LibraryError::UserIdNotFound`] - No user has the requested id.
    pub fn update_user_name(&self, request: UserUpdateRequest) -> Result<(), LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let mut user = self
                .store
                .users()
                .find_by_id(request.id)?
                .ok_or(LibraryError::UserIdNotFound(request.id))?;
            user.update_name(request.name.as_str());
            self.store.users().save(user)?;
            info!(id = %request.id, name = %request.name, "user renamed");
            Ok(())
        })
    }

    /// Deletes the earliest registered user with the given name, together
    /// with all of that user's loan history.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::UserNotFound`] - No user is registered under `name`.
    pub fn delete_user(&self, name: &str) -> Result<(), LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let user = self
                .store
                .users()
                .find_by_name(name)?
                .ok_or_else(|| LibraryError::UserNotFound(name.to_string()))?;
            self.store.users().delete(&user)?;
            info!(name, "user deleted");
            Ok(())
        })
    }

    /// Every user with the books they have borrowed.
    ///
    /// Users who never borrowed anything are included with an empty list.
    /// The view is built from a single joined fetch.
    pub fn get_user_loan_histories(&self) -> Result<Vec<UserLoanHistoryResponse>, LibraryError> {
        self.store.transaction::<_, LibraryError, _>(|| {
            let joined = self.store.users().find_all_with_histories()?;
            debug!(users = joined.len(), "building loan history view");
            Ok(joined
                .into_iter()
                .map(UserLoanHistoryResponse::from)
                .collect())
        })
    }
}
