pub mod add;
pub mod audit_helpers;
pub mod list;
pub mod remove;
pub mod save;
