//! The account directory seam.

use async_trait::async_trait;

use linkup_core::result::AppResult;
use linkup_core::types::Identity;
use linkup_entity::account::Account;

/// Lookup and storage of accounts.
///
/// The relay only calls [`find`](AccountDirectory::find); the social-graph
/// service also writes through [`save`](AccountDirectory::save).
#[async_trait]
pub trait AccountDirectory: Send + Sync + 'static {
    /// Find an account by identity.
    async fn find(&self, id: &Identity) -> AppResult<Option<Account>>;

    /// Insert or replace an account.
    async fn save(&self, account: Account) -> AppResult<()>;

    /// List every account, ordered by identity.
    async fn list(&self) -> AppResult<Vec<Account>>;
}
