use crate::error::{AppError, AppResult};
use crate::models::{PurchaseReceipt, Rarity, RewardFilter, ShopItemResponse};
use crate::services::gacha_service::DEFAULT_MAX_ATTEMPTS;
use crate::services::{AccountStore, RewardCatalog};
use crate::utils::normalize_reward_id;

#[derive(Clone)]
pub struct ShopService<C, S> {
    catalog: C,
    store: S,
    max_attempts: u32,
}

impl<C: RewardCatalog, S: AccountStore> ShopService<C, S> {
    pub fn new(catalog: C, store: S) -> Self {
        Self {
            catalog,
            store,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// 商店商品列表（目录顺序），可按稀有度筛选
    pub fn list_items(&self, rarity: Option<Rarity>) -> Vec<ShopItemResponse> {
        let filter = RewardFilter {
            gacha_only: false,
            rarity,
        };
        self.catalog
            .list_eligible(&filter)
            .into_iter()
            .filter_map(|reward| {
                reward
                    .shop_price
                    .map(|price| ShopItemResponse { reward, price })
            })
            .collect()
    }

    /// 购买商店奖励
    ///
    /// 依次检查: 奖励存在 -> 可购买 -> 未拥有 -> 余额足够，然后原子扣费并追加
    pub async fn purchase(&self, account_id: &str, reward_id: &str) -> AppResult<PurchaseReceipt> {
        let reward_id = normalize_reward_id(reward_id);
        let reward = self
            .catalog
            .get(&reward_id)
            .ok_or_else(|| AppError::NotFound(format!("Reward {reward_id}")))?;
        let price = reward.shop_price.ok_or_else(|| {
            AppError::ValidationError(format!("Reward {reward_id} is not sold in the shop"))
        })?;

        let mut attempts = 0;
        while attempts < self.max_attempts {
            attempts += 1;

            let account = self.store.get_account(account_id).await?;
            if account.owns(&reward_id) {
                return Err(AppError::ValidationError(format!(
                    "Reward {reward_id} already owned"
                )));
            }
            if account.balance < price {
                return Err(AppError::InsufficientBalance {
                    required: price,
                    available: account.balance,
                });
            }

            match self
                .store
                .deduct_and_append(account_id, account.version, price, &reward_id)
                .await
            {
                Ok(updated) => {
                    log::info!(
                        "Account {account_id} purchased {reward_id} for {price}, balance {}",
                        updated.balance
                    );
                    return Ok(PurchaseReceipt {
                        reward,
                        price,
                        balance: updated.balance,
                    });
                }
                Err(AppError::Conflict(msg)) => {
                    log::warn!("Purchase attempt {attempts} conflicted: {msg}");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "Failed to purchase {reward_id} after {} attempts",
            self.max_attempts
        )))
    }
}
