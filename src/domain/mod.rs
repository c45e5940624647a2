pub mod chain;
pub mod claim;
pub mod transaction;
pub mod wallet;

pub use chain::*;
pub use claim::*;
pub use transaction::*;
pub use wallet::*;
