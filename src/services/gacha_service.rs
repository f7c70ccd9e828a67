use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::GachaConfig;
use crate::error::{AppError, AppResult};
use crate::models::{DrawOutcome, DrawResult, RarityWeightTable, RewardFilter, RewardOdds};
use crate::services::{AccountStore, RewardCatalog, draw_odds, select_reward};
use crate::utils::{RandomSource, random_source_from_seed};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Clone)]
pub struct GachaService<C, S> {
    catalog: C,
    store: S,
    weights: Arc<RarityWeightTable>,
    draw_cost: i64,
    max_attempts: u32,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
}

impl<C: RewardCatalog, S: AccountStore> GachaService<C, S> {
    pub fn new(
        catalog: C,
        store: S,
        weights: RarityWeightTable,
        draw_cost: i64,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            catalog,
            store,
            weights: Arc::new(weights),
            draw_cost,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn from_config(catalog: C, store: S, config: &GachaConfig) -> AppResult<Self> {
        let weights = config.weight_table()?;
        let rng = random_source_from_seed(config.seed);
        Ok(Self::new(catalog, store, weights, config.draw_cost, rng)
            .with_max_attempts(config.max_attempts))
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn draw_cost(&self) -> i64 {
        self.draw_cost
    }

    /// 抽奖一次
    ///
    /// 逻辑:
    /// 1. 读取账户快照，余额不足直接返回错误
    /// 2. 取抽奖池（排除商店奖励），排除已拥有后加权抽取
    /// 3. 奖池已抽完 -> 不扣费直接返回
    /// 4. 按快照版本号原子扣费并追加奖励；版本冲突时重新读取重试
    pub async fn draw(&self, account_id: &str) -> AppResult<DrawOutcome> {
        let mut attempts = 0;

        while attempts < self.max_attempts {
            attempts += 1;

            let account = self.store.get_account(account_id).await?;
            if account.balance < self.draw_cost {
                return Err(AppError::InsufficientBalance {
                    required: self.draw_cost,
                    available: account.balance,
                });
            }

            let pool = self.catalog.list_eligible(&RewardFilter::gacha_pool());
            let owned = account.owned_set();
            let result = {
                let mut rng = self.rng.lock().await;
                select_reward(&pool, &owned, &self.weights, &mut **rng)?
            };

            let reward = match result {
                DrawResult::PoolExhausted => {
                    log::info!("Gacha pool exhausted for account {account_id}, no charge");
                    return Ok(DrawOutcome::PoolExhausted {
                        balance: account.balance,
                    });
                }
                DrawResult::Selected(reward) => reward,
            };

            match self
                .store
                .deduct_and_append(account_id, account.version, self.draw_cost, &reward.id)
                .await
            {
                Ok(updated) => {
                    log::info!(
                        "Account {account_id} drew {} ({}), balance {}",
                        reward.id,
                        reward.rarity,
                        updated.balance
                    );
                    return Ok(DrawOutcome::Won {
                        reward,
                        balance: updated.balance,
                        owned_count: updated.owned.len(),
                    });
                }
                Err(AppError::Conflict(msg)) => {
                    log::warn!("Draw attempt {attempts} conflicted: {msg}");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "Failed to draw for account {account_id} after {} attempts",
            self.max_attempts
        )))
    }

    /// 账户下一次抽奖各奖励的概率；已抽完返回空
    pub async fn odds(&self, account_id: &str) -> AppResult<Vec<RewardOdds>> {
        let account = self.store.get_account(account_id).await?;
        let pool = self.catalog.list_eligible(&RewardFilter::gacha_pool());
        let odds = draw_odds(&pool, &account.owned_set(), &self.weights)?;
        Ok(odds
            .into_iter()
            .map(|(r, p)| RewardOdds {
                reward_id: r.id,
                name: r.name,
                rarity: r.rarity,
                probability: p,
            })
            .collect())
    }
}
