use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn reward_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_-]{0,63}$").expect("valid reward id regex"))
}

/// 校验奖励ID格式：小写字母数字开头，仅含 a-z 0-9 _ -，最长 64
pub fn validate_reward_id(id: &str) -> AppResult<()> {
    if !reward_id_regex().is_match(id) {
        return Err(AppError::ConfigError(format!(
            "Invalid reward id '{id}': expected lowercase letters, digits, '_' or '-'"
        )));
    }
    Ok(())
}

/// 规范化奖励ID（去空白、转小写、空格换成下划线）
pub fn normalize_reward_id(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
