use serde::Serialize;
use std::collections::BTreeMap;

use super::{AccountResponse, Rarity, Reward};

/// 账户资料：已拥有奖励与各稀有度统计
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub account: AccountResponse,
    /// 按获得顺序
    pub rewards: Vec<Reward>,
    pub rarity_counts: BTreeMap<Rarity, usize>,
    /// 抽奖池中尚未拥有的数量
    pub gacha_remaining: usize,
}
