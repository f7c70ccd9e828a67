pub mod pagination;
pub mod random;
pub mod reward_id;

pub use pagination::*;
pub use random::*;
pub use reward_id::*;
