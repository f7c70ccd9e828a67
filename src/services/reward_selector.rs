use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::models::{DrawResult, RarityWeightTable, Reward};
use crate::utils::RandomSource;

/// 加权抽取一个奖励
///
/// 逻辑:
/// 1. 奖池为空 -> 配置错误（目录不可用）
/// 2. 排除已拥有的奖励；全部拥有 -> PoolExhausted（正常终态，不是错误）
/// 3. 按稀有度取权重（缺失回退 common，都缺失 -> 配置错误）
/// 4. 总权重 <= 0 -> 均匀抽取（降级）
/// 5. 否则在 [0, total) 取 x，按奖池顺序累加，第一个累计权重 > x 的奖励胜出
///
/// 不修改任何输入；随机源固定时结果可复现。
pub fn select_reward(
    pool: &[Reward],
    owned: &HashSet<String>,
    weights: &RarityWeightTable,
    rng: &mut dyn RandomSource,
) -> AppResult<DrawResult> {
    let weighted = weigh_available(pool, owned, weights)?;
    if weighted.is_empty() {
        return Ok(DrawResult::PoolExhausted);
    }

    let total: f64 = weighted.iter().map(|(_, w)| w).sum();
    let u = rng.next_f64();

    if !(total > 0.0 && total.is_finite()) {
        log::warn!(
            "Total gacha weight is {total} for {} available rewards, falling back to uniform pick",
            weighted.len()
        );
        let idx = ((u * weighted.len() as f64) as usize).min(weighted.len() - 1);
        return Ok(DrawResult::Selected(weighted[idx].0.clone()));
    }

    let x = u * total;
    let ws: Vec<f64> = weighted.iter().map(|(_, w)| *w).collect();
    let idx = locate(&ws, x);
    Ok(DrawResult::Selected(weighted[idx].0.clone()))
}

/// 下一次抽取时每个可抽奖励的概率（按奖池顺序）
pub fn draw_odds(
    pool: &[Reward],
    owned: &HashSet<String>,
    weights: &RarityWeightTable,
) -> AppResult<Vec<(Reward, f64)>> {
    let weighted = weigh_available(pool, owned, weights)?;
    let total: f64 = weighted.iter().map(|(_, w)| w).sum();
    let n = weighted.len() as f64;

    Ok(weighted
        .into_iter()
        .map(|(r, w)| {
            let p = if total > 0.0 && total.is_finite() {
                w / total
            } else {
                1.0 / n
            };
            (r.clone(), p)
        })
        .collect())
}

/// 奖池减去已拥有，附带生效权重；保持奖池原顺序
fn weigh_available<'a>(
    pool: &'a [Reward],
    owned: &HashSet<String>,
    weights: &RarityWeightTable,
) -> AppResult<Vec<(&'a Reward, f64)>> {
    if pool.is_empty() {
        return Err(AppError::ConfigError(
            "Gacha pool is empty, reward catalog is unusable".into(),
        ));
    }

    let mut weighted = Vec::with_capacity(pool.len());
    for reward in pool.iter().filter(|r| !owned.contains(&r.id)) {
        weighted.push((reward, weights.weight_for(reward.rarity)?));
    }
    log::debug!(
        "Gacha pool: {} rewards, {} available",
        pool.len(),
        weighted.len()
    );
    Ok(weighted)
}

/// 线性累加定位；浮点误差导致未命中时取最后一个
fn locate(weights: &[f64], x: f64) -> usize {
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if acc > x {
            return i;
        }
    }
    log::warn!("Weighted pick fell through (x={x}, total={acc}), selecting last reward");
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rarity;
    use crate::utils::{FixedRandom, SeededRandom};
    use std::collections::HashMap;

    fn one_per_rarity() -> Vec<Reward> {
        vec![
            Reward::new("c1", "Common Badge", Rarity::Common),
            Reward::new("r1", "Rare Badge", Rarity::Rare),
            Reward::new("e1", "Epic Badge", Rarity::Epic),
        ]
    }

    fn owned(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn selected_id(result: DrawResult) -> String {
        match result {
            DrawResult::Selected(r) => r.id,
            DrawResult::PoolExhausted => panic!("expected a selection"),
        }
    }

    #[test]
    fn test_empty_pool_is_config_error() {
        let mut rng = FixedRandom::new(0.5);
        let result = select_reward(&[], &owned(&[]), &RarityWeightTable::standard(), &mut rng);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_exhausted_regardless_of_weights() {
        let pool = one_per_rarity();
        let all = owned(&["c1", "r1", "e1"]);
        let empty_table = RarityWeightTable::new(Vec::<(Rarity, f64)>::new()).unwrap();
        let mut rng = FixedRandom::new(0.5);

        for table in [RarityWeightTable::standard(), empty_table] {
            let result = select_reward(&pool, &all, &table, &mut rng).unwrap();
            assert_eq!(result, DrawResult::PoolExhausted);
        }
    }

    #[test]
    fn test_never_returns_owned() {
        let pool = one_per_rarity();
        let have = owned(&["c1", "e1"]);
        let mut rng = SeededRandom::new(7);
        for _ in 0..500 {
            let id = selected_id(
                select_reward(&pool, &have, &RarityWeightTable::standard(), &mut rng).unwrap(),
            );
            assert_eq!(id, "r1");
        }
    }

    #[test]
    fn test_fixed_random_is_deterministic() {
        let pool = one_per_rarity();
        let table = RarityWeightTable::standard();
        let none = owned(&[]);

        // total = 14: [0,10) common, [10,13) rare, [13,14) epic
        let cases = [
            (0.0, "c1"),
            (0.7, "c1"),
            (0.72, "r1"),
            (0.92, "r1"),
            (0.93, "e1"),
            (0.999, "e1"),
        ];
        for (u, expected) in cases {
            for _ in 0..3 {
                let mut rng = FixedRandom::new(u);
                let id = selected_id(select_reward(&pool, &none, &table, &mut rng).unwrap());
                assert_eq!(id, expected, "u = {u}");
            }
        }
    }

    #[test]
    fn test_weighted_frequencies_converge() {
        let pool = one_per_rarity();
        let table = RarityWeightTable::new([
            (Rarity::Common, 10.0),
            (Rarity::Rare, 3.0),
            (Rarity::Epic, 1.0),
        ])
        .unwrap();
        let none = owned(&[]);
        let mut rng = SeededRandom::new(20240501);
        let n: u32 = 100_000;

        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..n {
            let id = selected_id(select_reward(&pool, &none, &table, &mut rng).unwrap());
            *counts.entry(id).or_default() += 1;
        }

        for (id, expected) in [("c1", 10.0 / 14.0), ("r1", 3.0 / 14.0), ("e1", 1.0 / 14.0)] {
            let freq = f64::from(counts.get(id).copied().unwrap_or(0)) / f64::from(n);
            assert!(
                (freq - expected).abs() < 0.01,
                "{id}: frequency {freq} vs expected {expected}"
            );
        }
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let pool = one_per_rarity();
        let zeros = RarityWeightTable::new([
            (Rarity::Common, 0.0),
            (Rarity::Rare, 0.0),
            (Rarity::Epic, 0.0),
        ])
        .unwrap();
        let none = owned(&[]);

        for (u, expected) in [(0.0, "c1"), (0.5, "r1"), (0.99, "e1")] {
            let mut rng = FixedRandom::new(u);
            let id = selected_id(select_reward(&pool, &none, &zeros, &mut rng).unwrap());
            assert_eq!(id, expected);
        }

        let mut rng = FixedRandom::new(1.0);
        let id = selected_id(select_reward(&pool, &none, &zeros, &mut rng).unwrap());
        assert_eq!(id, "e1");
    }

    #[test]
    fn test_zero_weight_reward_skipped_when_others_positive() {
        let pool = one_per_rarity();
        let table = RarityWeightTable::new([(Rarity::Common, 0.0), (Rarity::Rare, 1.0)]).unwrap();
        // epic falls back to common (0), rare is the only positive weight
        let mut rng = SeededRandom::new(3);
        for _ in 0..200 {
            let id = selected_id(select_reward(&pool, &owned(&[]), &table, &mut rng).unwrap());
            assert_eq!(id, "r1");
        }
    }

    #[test]
    fn test_missing_rarity_uses_common_weight() {
        let pool = vec![
            Reward::new("c1", "Common", Rarity::Common),
            Reward::new("e1", "Epic", Rarity::Epic),
        ];
        let table = RarityWeightTable::new([(Rarity::Common, 1.0)]).unwrap();
        let odds = draw_odds(&pool, &owned(&[]), &table).unwrap();
        assert_eq!(odds.len(), 2);
        assert!((odds[0].1 - 0.5).abs() < 1e-12);
        assert!((odds[1].1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_config_error_only_for_unresolvable_weight() {
        let pool = one_per_rarity();
        let epic_only = RarityWeightTable::new([(Rarity::Epic, 1.0)]).unwrap();
        let mut rng = FixedRandom::new(0.1);

        let result = select_reward(&pool, &owned(&[]), &epic_only, &mut rng);
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        // 无法解析权重的奖励已拥有时不再参与计算
        let id = selected_id(
            select_reward(&pool, &owned(&["c1", "r1"]), &epic_only, &mut rng).unwrap(),
        );
        assert_eq!(id, "e1");
    }

    #[test]
    fn test_inputs_not_mutated() {
        let pool = one_per_rarity();
        let have = owned(&["r1"]);
        let table = RarityWeightTable::standard();
        let (pool_before, have_before, table_before) = (pool.clone(), have.clone(), table.clone());

        let mut rng = SeededRandom::new(11);
        for _ in 0..50 {
            select_reward(&pool, &have, &table, &mut rng).unwrap();
        }
        draw_odds(&pool, &have, &table).unwrap();

        assert_eq!(pool, pool_before);
        assert_eq!(have, have_before);
        assert_eq!(table, table_before);
    }

    #[test]
    fn test_locate_falls_back_to_last() {
        assert_eq!(locate(&[1.0, 2.0, 3.0], 0.0), 0);
        assert_eq!(locate(&[1.0, 2.0, 3.0], 2.5), 1);
        assert_eq!(locate(&[1.0, 2.0, 3.0], 6.0), 2);
        assert_eq!(locate(&[1.0, 2.0, 3.0], 42.0), 2);
    }

    #[test]
    fn test_odds_sum_to_one() {
        let pool = one_per_rarity();
        let odds = draw_odds(&pool, &owned(&[]), &RarityWeightTable::standard()).unwrap();
        let sum: f64 = odds.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(draw_odds(&pool, &owned(&["c1", "r1", "e1"]), &RarityWeightTable::standard())
            .unwrap()
            .is_empty());
    }
}
