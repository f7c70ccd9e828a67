use std::collections::BTreeMap;

use crate::error::AppResult;
use crate::models::{AccountResponse, ProfileResponse, Rarity, RewardFilter};
use crate::services::{AccountStore, RewardCatalog};

#[derive(Clone)]
pub struct ProfileService<C, S> {
    catalog: C,
    store: S,
}

impl<C: RewardCatalog, S: AccountStore> ProfileService<C, S> {
    pub fn new(catalog: C, store: S) -> Self {
        Self { catalog, store }
    }

    /// 获取账户资料和收藏统计
    pub async fn profile(&self, account_id: &str) -> AppResult<ProfileResponse> {
        let account = self.store.get_account(account_id).await?;

        let mut rewards = Vec::with_capacity(account.owned.len());
        for id in &account.owned {
            match self.catalog.get(id) {
                Some(r) => rewards.push(r),
                // 目录中已下架的奖励
                None => log::warn!("Account {account_id} owns unknown reward {id}, skipped"),
            }
        }

        let mut rarity_counts: BTreeMap<Rarity, usize> =
            Rarity::ALL.iter().map(|r| (*r, 0)).collect();
        for r in &rewards {
            *rarity_counts.entry(r.rarity).or_default() += 1;
        }

        let owned = account.owned_set();
        let gacha_remaining = self
            .catalog
            .list_eligible(&RewardFilter::gacha_pool())
            .iter()
            .filter(|r| !owned.contains(&r.id))
            .count();

        Ok(ProfileResponse {
            account: AccountResponse::from(&account),
            rewards,
            rarity_counts,
            gacha_remaining,
        })
    }
}
