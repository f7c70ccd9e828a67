use serde::Serialize;

use crate::utils::PaginatedResponse;

/// 排行榜条目
#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    /// 全局名次（从1开始）
    pub rank: u32,
    pub account_id: String,
    pub name: String,
    pub owned_count: usize,
    pub balance: i64,
}

pub type RankingPageResponse = PaginatedResponse<RankingEntry>;
