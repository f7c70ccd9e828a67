use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Account;

/// 账户存储
///
/// `deduct_and_append` 必须是原子的比较并交换：版本号不一致时返回 Conflict，
/// 由调用方重新读取后重试，避免两个并发请求都通过余额检查。
pub trait AccountStore: Send + Sync {
    fn create_account(
        &self,
        name: &str,
        initial_balance: i64,
    ) -> impl Future<Output = AppResult<Account>> + Send;

    fn get_account(&self, account_id: &str) -> impl Future<Output = AppResult<Account>> + Send;

    fn list_accounts(&self) -> impl Future<Output = AppResult<Vec<Account>>> + Send;

    fn grant_currency(
        &self,
        account_id: &str,
        amount: i64,
    ) -> impl Future<Output = AppResult<Account>> + Send;

    fn deduct_and_append(
        &self,
        account_id: &str,
        expected_version: u64,
        cost: i64,
        reward_id: &str,
    ) -> impl Future<Output = AppResult<Account>> + Send;
}

/// 内存账户存储
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    let len = name.trim().chars().count();
    if !(2..=20).contains(&len) {
        return Err(AppError::ValidationError(
            "Account name length must be between 2 and 20 characters".to_string(),
        ));
    }
    Ok(())
}

impl AccountStore for InMemoryAccountStore {
    async fn create_account(&self, name: &str, initial_balance: i64) -> AppResult<Account> {
        validate_name(name)?;
        if initial_balance < 0 {
            return Err(AppError::ValidationError(
                "Initial balance cannot be negative".to_string(),
            ));
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            balance: initial_balance,
            owned: Vec::new(),
            version: 0,
            created_at: Utc::now(),
        };
        self.accounts
            .write()
            .await
            .insert(account.id.clone(), account.clone());
        log::info!("Account created: {} ({})", account.name, account.id);
        Ok(account)
    }

    async fn get_account(&self, account_id: &str) -> AppResult<Account> {
        self.accounts
            .read()
            .await
            .get(account_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Account {account_id}")))
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        Ok(self.accounts.read().await.values().cloned().collect())
    }

    async fn grant_currency(&self, account_id: &str, amount: i64) -> AppResult<Account> {
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Amount to grant must be positive".into(),
            ));
        }
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| AppError::NotFound(format!("Account {account_id}")))?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| AppError::ValidationError("Balance overflow".into()))?;
        account.version += 1;
        Ok(account.clone())
    }

    async fn deduct_and_append(
        &self,
        account_id: &str,
        expected_version: u64,
        cost: i64,
        reward_id: &str,
    ) -> AppResult<Account> {
        if cost < 0 {
            return Err(AppError::ValidationError("Cost cannot be negative".into()));
        }
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| AppError::NotFound(format!("Account {account_id}")))?;

        if account.version != expected_version {
            return Err(AppError::Conflict(format!(
                "Account {account_id} changed (expected version {expected_version}, found {})",
                account.version
            )));
        }
        if account.balance < cost {
            return Err(AppError::InsufficientBalance {
                required: cost,
                available: account.balance,
            });
        }
        if account.owns(reward_id) {
            return Err(AppError::ValidationError(format!(
                "Reward {reward_id} already owned"
            )));
        }

        account.balance -= cost;
        account.owned.push(reward_id.to_string());
        account.version += 1;
        Ok(account.clone())
    }
}
