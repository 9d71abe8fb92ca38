use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserAccount, UserId};

/// Account store keyed by username.
#[derive(Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<String, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let username = account.user().username().as_ref().to_owned();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&username) {
            return Err(UserRepositoryError::duplicate_username(username));
        }
        accounts.insert(username, account.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.user().id() == id)
            .map(|account| account.user().clone()))
    }
}
