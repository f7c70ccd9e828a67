use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl AppError {
    /// 稳定的错误码，供调用方区分错误类型
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ConfigError(_) | AppError::TomlError(_) => "CONFIG_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            AppError::Conflict(_) => "CONFLICT",
        }
    }

    /// 调用方错误 (余额不足、参数错误等)，不是配置或系统故障
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_)
                | AppError::NotFound(_)
                | AppError::InsufficientBalance { .. }
                | AppError::Conflict(_)
        )
    }

    /// 记录日志：调用方错误 warn，配置错误 error
    pub fn log(&self) {
        if self.is_client_error() {
            log::warn!("{}: {self}", self.code());
        } else {
            log::error!("{}: {self}", self.code());
        }
    }

    /// 统一的错误输出结构
    pub fn to_json(&self) -> serde_json::Value {
        // 配置错误不向外暴露细节
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            "Configuration error".to_string()
        };
        json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::ConfigError("x".into()).code(), "CONFIG_ERROR");
        assert_eq!(
            AppError::InsufficientBalance {
                required: 100,
                available: 5
            }
            .code(),
            "INSUFFICIENT_BALANCE"
        );
        assert_eq!(AppError::Conflict("x".into()).code(), "CONFLICT");
    }

    #[test]
    fn test_to_json_hides_internal_details() {
        let body = AppError::ConfigError("weights missing common".into()).to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "CONFIG_ERROR");
        assert_eq!(body["error"]["message"], "Configuration error");

        let toml_err = toml::from_str::<toml::Value>("[gacha").unwrap_err();
        let body = AppError::from(toml_err).to_json();
        assert_eq!(body["error"]["code"], "CONFIG_ERROR");
        assert_eq!(body["error"]["message"], "Configuration error");

        let body = AppError::NotFound("Account abc".into()).to_json();
        assert_eq!(body["error"]["message"], "Not found: Account abc");
    }
}
