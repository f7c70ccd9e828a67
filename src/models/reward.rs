use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// 奖励稀有度（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Rare, Rarity::Epic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "rare" => Ok(Rarity::Rare),
            "epic" => Ok(Rarity::Epic),
            other => Err(AppError::ConfigError(format!("Unknown rarity: {other}"))),
        }
    }
}

/// 奖励（徽章）定义
/// - shop_price: Some(价格) 表示仅可在商店购买，不进入抽奖池
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub shop_price: Option<i64>,
}

impl Reward {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity,
            description: String::new(),
            image: String::new(),
            shop_price: None,
        }
    }

    pub fn with_shop_price(mut self, price: i64) -> Self {
        self.shop_price = Some(price);
        self
    }

    /// 是否为仅商店购买的奖励
    pub fn is_purchasable(&self) -> bool {
        self.shop_price.is_some()
    }
}

/// 奖励列表过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardFilter {
    /// 排除仅商店购买的奖励
    pub gacha_only: bool,
    /// 只要某个稀有度
    pub rarity: Option<Rarity>,
}

impl RewardFilter {
    /// 抽奖池：全部非商店奖励
    pub fn gacha_pool() -> Self {
        Self {
            gacha_only: true,
            rarity: None,
        }
    }

    pub fn matches(&self, reward: &Reward) -> bool {
        if self.gacha_only && reward.is_purchasable() {
            return false;
        }
        match self.rarity {
            Some(r) => reward.rarity == r,
            None => true,
        }
    }
}
