pub mod json_snapshot_store;
