use serde::Serialize;

use super::Reward;

/// 单次抽取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawResult {
    Selected(Reward),
    /// 可抽奖励已全部拥有
    PoolExhausted,
}

/// 抽奖服务对外返回
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrawOutcome {
    Won {
        reward: Reward,
        /// 扣费后余额
        balance: i64,
        owned_count: usize,
    },
    /// 未扣费
    PoolExhausted { balance: i64 },
}

impl DrawOutcome {
    pub fn reward(&self) -> Option<&Reward> {
        match self {
            DrawOutcome::Won { reward, .. } => Some(reward),
            DrawOutcome::PoolExhausted { .. } => None,
        }
    }
}

/// 下一次抽取各奖励的概率
#[derive(Debug, Clone, Serialize)]
pub struct RewardOdds {
    pub reward_id: String,
    pub name: String,
    pub rarity: super::Rarity,
    pub probability: f64,
}
