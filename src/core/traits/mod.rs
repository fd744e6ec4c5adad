pub mod audit;
pub mod delivery;
pub mod interface_control;
pub mod key_provider;
pub mod snapshot_store;
