//! In-memory account directory.

use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use linkup_core::error::AppError;
use linkup_core::result::AppResult;
use linkup_core::types::Identity;
use linkup_entity::account::Account;

use super::directory::AccountDirectory;

/// Account directory backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryAccountDirectory {
    accounts: DashMap<Identity, Account>,
}

impl MemoryAccountDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding `accounts`.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let directory = Self::new();
        for account in accounts {
            directory.accounts.insert(account.id.clone(), account);
        }
        directory
    }

    /// Parses a JSON array of account documents.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let accounts: Vec<Account> = serde_json::from_str(raw)?;
        Ok(Self::with_accounts(accounts))
    }

    /// Loads a JSON seed file.
    pub async fn load_seed(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                linkup_core::error::ErrorKind::Configuration,
                format!("Cannot read account seed '{}'", path.display()),
                e,
            )
        })?;
        let directory = Self::from_json(&raw)?;
        info!(path = %path.display(), count = directory.len(), "Account seed loaded");
        Ok(directory)
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountDirectory for MemoryAccountDirectory {
    async fn find(&self, id: &Identity) -> AppResult<Option<Account>> {
        Ok(self.accounts.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, account: Account) -> AppResult<()> {
        self.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let mut all: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}
