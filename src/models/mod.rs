pub mod account;
pub mod common;
pub mod gacha;
pub mod profile;
pub mod ranking;
pub mod reward;
pub mod shop;
pub mod weights;

pub use account::*;
pub use common::*;
pub use gacha::*;
pub use profile::*;
pub use ranking::*;
pub use reward::*;
pub use shop::*;
pub use weights::*;
