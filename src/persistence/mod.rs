//! Wallet store persistence
//!
//! - Line-oriented key and proxy input files
//! - JSON store file rewritten after every removal

pub mod input;
pub mod store;

pub use input::{pair_keys_with_proxies, read_lines};
pub use store::WalletStore;
