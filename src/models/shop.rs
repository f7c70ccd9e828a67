use serde::Serialize;

use super::Reward;

/// 商店商品
#[derive(Debug, Clone, Serialize)]
pub struct ShopItemResponse {
    pub reward: Reward,
    pub price: i64,
}

/// 购买凭据
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReceipt {
    pub reward: Reward,
    pub price: i64,
    /// 购买后余额
    pub balance: i64,
}
