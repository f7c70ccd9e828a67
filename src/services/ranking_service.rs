use crate::error::AppResult;
use crate::models::{RankingEntry, RankingPageResponse};
use crate::services::AccountStore;
use crate::utils::PaginationParams;

#[derive(Clone)]
pub struct RankingService<S> {
    store: S,
}

impl<S: AccountStore> RankingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 收藏排行榜（分页）
    /// 排序: 拥有数量降序 -> 余额降序 -> 名称升序 -> ID 升序；名次为全局名次
    pub async fn leaderboard(&self, params: &PaginationParams) -> AppResult<RankingPageResponse> {
        let mut accounts = self.store.list_accounts().await?;
        accounts.sort_by(|a, b| {
            b.owned
                .len()
                .cmp(&a.owned.len())
                .then_with(|| b.balance.cmp(&a.balance))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let entries: Vec<RankingEntry> = accounts
            .into_iter()
            .enumerate()
            .map(|(i, a)| RankingEntry {
                rank: i as u32 + 1,
                owned_count: a.owned.len(),
                account_id: a.id,
                name: a.name,
                balance: a.balance,
            })
            .collect();

        Ok(params.paginate(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryAccountStore;

    #[tokio::test]
    async fn test_leaderboard_order_and_pages() {
        let store = InMemoryAccountStore::new();
        let a = store.create_account("Alice", 100).await.unwrap();
        let b = store.create_account("Bob", 900).await.unwrap();
        let c = store.create_account("Carol", 100).await.unwrap();
        store.create_account("Dave", 50).await.unwrap();

        store.deduct_and_append(&a.id, 0, 0, "leaf").await.unwrap();
        store.deduct_and_append(&a.id, 1, 0, "comet").await.unwrap();
        store.deduct_and_append(&b.id, 0, 0, "leaf").await.unwrap();
        store.deduct_and_append(&c.id, 0, 0, "nova").await.unwrap();

        let svc = RankingService::new(store);
        let first = svc
            .leaderboard(&PaginationParams::new(Some(1), Some(3)))
            .await
            .unwrap();
        let names: Vec<&str> = first.items.iter().map(|e| e.name.as_str()).collect();
        // Bob 与 Carol 同为1个，Bob 余额更高
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
        assert_eq!(first.items[0].owned_count, 2);
        assert_eq!(first.pagination.total, 4);
        assert_eq!(first.pagination.total_pages, 2);

        let second = svc
            .leaderboard(&PaginationParams::new(Some(2), Some(3)))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].name, "Dave");
        assert_eq!(second.items[0].rank, 4);
    }

    #[tokio::test]
    async fn test_empty_leaderboard() {
        let svc = RankingService::new(InMemoryAccountStore::new());
        let page = svc.leaderboard(&PaginationParams::default()).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn test_leaderboard_far_page_is_empty() {
        let store = InMemoryAccountStore::new();
        store.create_account("Alice", 100).await.unwrap();
        let svc = RankingService::new(store);

        let page = svc
            .leaderboard(&PaginationParams::new(Some(u32::MAX), Some(100)))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 1);
    }
}
