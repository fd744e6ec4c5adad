pub mod audit_entry;
pub mod key_pair;
pub mod peer;
pub mod profile;
