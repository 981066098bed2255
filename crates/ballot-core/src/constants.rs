pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
/// Sentinel used for both `previous_hash` and `hash` of the genesis block.
pub const GENESIS_HASH: &str = "0";
/// Placeholder identifier carried by the genesis vote. Never counted.
pub const GENESIS_PLACEHOLDER_ID: &str = "0";
pub const DEFAULT_DIFFICULTY: usize = 2;
pub const DEFAULT_MAX_NONCE: u64 = 50_000_000;
