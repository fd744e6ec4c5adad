pub mod key_file;
pub mod wg_tool_provider;
pub mod x25519_provider;
