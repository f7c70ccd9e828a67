use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 游戏账户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// 游戏币余额
    pub balance: i64,
    /// 已拥有奖励ID（按获得顺序，不重复）
    pub owned: Vec<String>,
    /// 每次成功修改后递增，用于比较并交换
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn owned_set(&self) -> HashSet<String> {
        self.owned.iter().cloned().collect()
    }

    pub fn owns(&self, reward_id: &str) -> bool {
        self.owned.iter().any(|id| id == reward_id)
    }
}

/// 账户摘要（对外展示，不含版本号）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub balance: i64,
    pub owned_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(a: &Account) -> Self {
        AccountResponse {
            id: a.id.clone(),
            name: a.name.clone(),
            balance: a.balance,
            owned_count: a.owned.len(),
            created_at: a.created_at,
        }
    }
}
