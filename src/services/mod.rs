pub mod account_service;
pub mod catalog_service;
pub mod gacha_service;
pub mod profile_service;
pub mod ranking_service;
pub mod reward_selector;
pub mod shop_service;

pub use account_service::*;
pub use catalog_service::*;
pub use gacha_service::*;
pub use profile_service::*;
pub use ranking_service::*;
pub use reward_selector::*;
pub use shop_service::*;
