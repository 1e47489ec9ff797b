//! Accounts baked into the node's development and test genesis.

/// Account funded in the standalone development genesis
pub const DEV_ACCOUNT_ADDRESS: &str = "0xc916cfe5c83dd4fc3c3b0bf2ec2d4e401782875e";
/// Password of [`DEV_ACCOUNT_ADDRESS`]
pub const DEV_ACCOUNT_PASSWORD: &str = "WelcomeToSirius";

/// Internal account the node uses for its own tests; never managed here
pub const RESERVED_TEST_ACCOUNT_ADDRESS: &str = "0xd119b8b038d3a67d34ca1d46e1898881626a082b";

/// Case-insensitive address comparison
pub fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

pub fn is_reserved_test_account(address: &str) -> bool {
    same_address(address, RESERVED_TEST_ACCOUNT_ADDRESS)
}

pub fn is_dev_account(address: &str) -> bool {
    same_address(address, DEV_ACCOUNT_ADDRESS)
}
