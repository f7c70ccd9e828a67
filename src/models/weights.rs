use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::Rarity;
use crate::error::{AppError, AppResult};

/// 稀有度权重表
/// - 权重必须是非负有限数（0 允许，全部为 0 时抽奖退化为均匀抽取）
/// - 未配置的稀有度按 common 的权重计算
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RarityWeightTable {
    weights: BTreeMap<Rarity, f64>,
}

impl RarityWeightTable {
    pub fn new(weights: impl IntoIterator<Item = (Rarity, f64)>) -> AppResult<Self> {
        let mut map = BTreeMap::new();
        for (rarity, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AppError::ConfigError(format!(
                    "Weight for rarity '{rarity}' must be a non-negative number, got {weight}"
                )));
            }
            map.insert(rarity, weight);
        }
        Ok(Self { weights: map })
    }

    /// 从配置文件中的字符串键构建
    pub fn from_config(raw: &HashMap<String, f64>) -> AppResult<Self> {
        let parsed = raw
            .iter()
            .map(|(k, v)| k.parse::<Rarity>().map(|r| (r, *v)))
            .collect::<AppResult<Vec<_>>>()?;
        Self::new(parsed)
    }

    /// 默认权重 common:10 rare:3 epic:1
    pub fn standard() -> Self {
        Self {
            weights: BTreeMap::from([
                (Rarity::Common, 10.0),
                (Rarity::Rare, 3.0),
                (Rarity::Epic, 1.0),
            ]),
        }
    }

    /// 显式配置的权重
    pub fn get(&self, rarity: Rarity) -> Option<f64> {
        self.weights.get(&rarity).copied()
    }

    /// 实际生效的权重：缺失时回退到 common；两者都缺失则为配置错误
    pub fn weight_for(&self, rarity: Rarity) -> AppResult<f64> {
        self.get(rarity)
            .or_else(|| self.get(Rarity::Common))
            .ok_or_else(|| {
                AppError::ConfigError(format!(
                    "No weight configured for rarity '{rarity}' and no 'common' fallback"
                ))
            })
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for RarityWeightTable {
    fn default() -> Self {
        Self::standard()
    }
}
