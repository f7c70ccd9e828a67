use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Reward, RewardFilter};
use crate::utils::validate_reward_id;

/// 奖励目录
pub trait RewardCatalog: Send + Sync {
    /// 按目录顺序返回符合条件的奖励
    fn list_eligible(&self, filter: &RewardFilter) -> Vec<Reward>;

    fn get(&self, reward_id: &str) -> Option<Reward>;
}

/// 内存目录（启动时从配置加载，之后只读）
#[derive(Clone, Debug)]
pub struct InMemoryCatalog {
    rewards: Arc<Vec<Reward>>,
}

impl InMemoryCatalog {
    /// 校验: ID 格式、ID 唯一、商店价格为正
    pub fn new(rewards: Vec<Reward>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for r in &rewards {
            validate_reward_id(&r.id)?;
            if !seen.insert(r.id.as_str()) {
                return Err(AppError::ConfigError(format!(
                    "Duplicate reward id in catalog: {}",
                    r.id
                )));
            }
            if let Some(price) = r.shop_price
                && price <= 0
            {
                return Err(AppError::ConfigError(format!(
                    "Shop price for reward '{}' must be positive, got {price}",
                    r.id
                )));
            }
        }
        Ok(Self {
            rewards: Arc::new(rewards),
        })
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

impl RewardCatalog for InMemoryCatalog {
    fn list_eligible(&self, filter: &RewardFilter) -> Vec<Reward> {
        self.rewards
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    fn get(&self, reward_id: &str) -> Option<Reward> {
        self.rewards.iter().find(|r| r.id == reward_id).cloned()
    }
}
