//! Social-graph mutations: follow, unfollow, block, unblock.
//!
//! Every successful mutation returns the [`DomainEvent`] describing it; the
//! caller hands it to the real-time event bridge. Mutations are idempotent:
//! repeating one leaves the graph unchanged but still yields the event.
//! Writes are serialized so a load-modify-save of one pair never overwrites
//! a concurrent one.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use linkup_core::error::AppError;
use linkup_core::events::{DomainEvent, SocialEvent};
use linkup_core::types::Identity;
use linkup_entity::account::Account;

use crate::account::AccountDirectory;
use crate::context::RequestContext;

/// Applies relationship changes between two accounts.
#[derive(Clone)]
pub struct SocialGraphService {
    /// Account storage.
    directory: Arc<dyn AccountDirectory>,
    /// Held across every load-modify-save.
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for SocialGraphService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialGraphService").finish_non_exhaustive()
    }
}

impl SocialGraphService {
    /// Creates a new social-graph service.
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        Self {
            directory,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns an account by raw id.
    pub async fn get_account(&self, raw_id: &str) -> Result<Account, AppError> {
        let id = Identity::parse(raw_id)?;
        self.directory
            .find(&id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// The caller starts following `target`.
    pub async fn follow(
        &self,
        ctx: &RequestContext,
        target: &str,
    ) -> Result<DomainEvent, AppError> {
        let target = checked_target(ctx, target, "Cannot follow yourself")?;
        let _guard = self.write_lock.lock().await;
        let (mut current, mut other) = self.load_pair(&ctx.identity, &target).await?;

        if other.has_blocked(&current.id) {
            return Err(AppError::forbidden(
                "Cannot follow a user who has blocked you",
            ));
        }

        current.following.insert(target.clone());
        other.followers.insert(current.id.clone());
        let follower_name = current.name.clone();
        self.save_pair(current, other).await?;

        info!(
            follower = %ctx.identity,
            username = ctx.username.as_deref().unwrap_or_default(),
            followee = %target,
            "User followed"
        );

        Ok(DomainEvent::new(SocialEvent::UserFollowed {
            follower: ctx.identity.clone(),
            followee: target,
            follower_name,
        }))
    }

    /// The caller stops following `target`.
    pub async fn unfollow(
        &self,
        ctx: &RequestContext,
        target: &str,
    ) -> Result<DomainEvent, AppError> {
        let target = checked_target(ctx, target, "Cannot unfollow yourself")?;
        let _guard = self.write_lock.lock().await;
        let (mut current, mut other) = self.load_pair(&ctx.identity, &target).await?;

        current.following.remove(&target);
        other.followers.remove(&current.id);
        self.save_pair(current, other).await?;

        info!(follower = %ctx.identity, followee = %target, "User unfollowed");

        Ok(DomainEvent::new(SocialEvent::UserUnfollowed {
            follower: ctx.identity.clone(),
            followee: target,
        }))
    }

    /// The caller blocks `target`, dropping the caller's follow of them.
    pub async fn block(
        &self,
        ctx: &RequestContext,
        target: &str,
    ) -> Result<DomainEvent, AppError> {
        let target = checked_target(ctx, target, "Cannot block yourself")?;
        let _guard = self.write_lock.lock().await;
        let (mut current, mut other) = self.load_pair(&ctx.identity, &target).await?;

        if !current.has_blocked(&target) {
            current.blocked_users.insert(target.clone());
            current.following.remove(&target);
            other.followers.remove(&current.id);
            self.save_pair(current, other).await?;
        }

        info!(blocker = %ctx.identity, blocked = %target, "User blocked");

        Ok(DomainEvent::new(SocialEvent::UserBlocked {
            blocker: ctx.identity.clone(),
            blocked: target,
        }))
    }

    /// The caller unblocks `target`. The target account need not exist.
    pub async fn unblock(
        &self,
        ctx: &RequestContext,
        target: &str,
    ) -> Result<DomainEvent, AppError> {
        let target = checked_target(ctx, target, "Cannot unblock yourself")?;
        let _guard = self.write_lock.lock().await;
        let mut current = self
            .directory
            .find(&ctx.identity)
            .await?
            .ok_or_else(|| AppError::not_found("Current user not found"))?;

        if current.blocked_users.remove(&target) {
            self.directory.save(current).await?;
        }

        info!(blocker = %ctx.identity, blocked = %target, "User unblocked");

        Ok(DomainEvent::new(SocialEvent::UserUnblocked {
            blocker: ctx.identity.clone(),
            blocked: target,
        }))
    }

    async fn load_pair(
        &self,
        current: &Identity,
        target: &Identity,
    ) -> Result<(Account, Account), AppError> {
        let (current, target) =
            tokio::try_join!(self.directory.find(current), self.directory.find(target))?;
        match (current, target) {
            (Some(current), Some(target)) => Ok((current, target)),
            _ => Err(AppError::not_found("User not found")),
        }
    }

    async fn save_pair(&self, a: Account, b: Account) -> Result<(), AppError> {
        tokio::try_join!(self.directory.save(a), self.directory.save(b))?;
        Ok(())
    }
}

fn checked_target(
    ctx: &RequestContext,
    raw: &str,
    self_message: &str,
) -> Result<Identity, AppError> {
    let target = Identity::parse(raw)?;
    if target == ctx.identity {
        return Err(AppError::validation(self_message));
    }
    Ok(target)
}
