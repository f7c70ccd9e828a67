use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

use crate::error::{AppError, AppResult};
use crate::models::{Rarity, RarityWeightTable, Reward};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gacha: GachaConfig,
    #[serde(default = "default_rewards")]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GachaConfig {
    /// 单次抽奖消耗的游戏币
    #[serde(default = "default_draw_cost")]
    pub draw_cost: i64,
    /// 并发冲突时的最大尝试次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// 固定随机种子（不设置则使用线程随机数）
    #[serde(default)]
    pub seed: Option<u64>,
    /// 稀有度 -> 权重
    #[serde(default = "default_weights")]
    pub weights: HashMap<String, f64>,
}

/// 演示会话（二进制程序使用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_accounts")]
    pub accounts: u32,
    #[serde(default = "default_initial_balance")]
    pub initial_balance: i64,
    #[serde(default = "default_draws_per_account")]
    pub draws_per_account: u32,
}

fn default_draw_cost() -> i64 {
    100
}

fn default_max_attempts() -> u32 {
    5
}

fn default_weights() -> HashMap<String, f64> {
    HashMap::from([
        ("common".to_string(), 10.0),
        ("rare".to_string(), 3.0),
        ("epic".to_string(), 1.0),
    ])
}

fn default_accounts() -> u32 {
    3
}

fn default_initial_balance() -> i64 {
    1000
}

fn default_draws_per_account() -> u32 {
    5
}

fn default_rewards() -> Vec<Reward> {
    let badge = |id: &str, name: &str, rarity: Rarity, description: &str| Reward {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        description: description.to_string(),
        image: format!("/static/badges/{id}.png"),
        shop_price: None,
    };
    vec![
        badge("first-step", "First Step", Rarity::Common, "Played a first match"),
        badge("sprout", "Sprout", Rarity::Common, "A small beginning"),
        badge("pebble", "Pebble", Rarity::Common, "Solid and dependable"),
        badge("comet", "Comet", Rarity::Rare, "Bright and fast"),
        badge("aurora", "Aurora", Rarity::Rare, "Seen on long nights"),
        badge("phoenix", "Phoenix", Rarity::Epic, "Rises again"),
        Reward {
            shop_price: Some(500),
            ..badge("golden-crown", "Golden Crown", Rarity::Epic, "Sold in the shop only")
        },
        Reward {
            shop_price: Some(150),
            ..badge("blue-cape", "Blue Cape", Rarity::Rare, "Sold in the shop only")
        },
    ]
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            draw_cost: default_draw_cost(),
            max_attempts: default_max_attempts(),
            seed: None,
            weights: default_weights(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            initial_balance: default_initial_balance(),
            draws_per_account: default_draws_per_account(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gacha: GachaConfig::default(),
            rewards: default_rewards(),
            session: SessionConfig::default(),
        }
    }
}

impl GachaConfig {
    pub fn weight_table(&self) -> AppResult<RarityWeightTable> {
        RarityWeightTable::from_config(&self.weights)
    }
}

impl Config {
    /// 读取配置：CONFIG_PATH（默认 config.toml）存在则解析，否则使用默认值；之后环境变量覆盖
    pub fn from_toml() -> AppResult<Self> {
        Self::from_toml_with(|name| env::var(name).ok())
    }

    /// 同 from_toml，环境变量通过 get_env 读取
    pub fn from_toml_with(get_env: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let config_path = get_env("CONFIG_PATH").unwrap_or_else(|| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Config file {config_path} not found, using defaults");
                Config::default()
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Failed to read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides(&get_env);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> AppResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// 环境变量覆盖（即便文件存在时也覆盖），无法解析的值忽略
    pub fn apply_env_overrides(&mut self, get_env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get_env("GACHA_DRAW_COST")
            && let Ok(n) = v.parse()
        {
            self.gacha.draw_cost = n;
        }
        if let Some(v) = get_env("GACHA_MAX_ATTEMPTS")
            && let Ok(n) = v.parse()
        {
            self.gacha.max_attempts = n;
        }
        if let Some(v) = get_env("GACHA_SEED")
            && let Ok(n) = v.parse()
        {
            self.gacha.seed = Some(n);
        }
        if let Some(v) = get_env("SESSION_INITIAL_BALANCE")
            && let Ok(n) = v.parse()
        {
            self.session.initial_balance = n;
        }
        if let Some(v) = get_env("SESSION_DRAWS")
            && let Ok(n) = v.parse()
        {
            self.session.draws_per_account = n;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.gacha.draw_cost < 0 {
            return Err(AppError::ConfigError(
                "gacha.draw_cost cannot be negative".into(),
            ));
        }
        if self.gacha.max_attempts == 0 {
            return Err(AppError::ConfigError(
                "gacha.max_attempts must be at least 1".into(),
            ));
        }
        if self.session.initial_balance < 0 {
            return Err(AppError::ConfigError(
                "session.initial_balance cannot be negative".into(),
            ));
        }
        if self.gacha.weight_table()?.is_empty() {
            return Err(AppError::ConfigError(
                "gacha.weights must configure at least one rarity".into(),
            ));
        }
        Ok(())
    }
}
