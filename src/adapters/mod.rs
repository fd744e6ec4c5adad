pub mod audit;
pub mod control;
pub mod delivery;
pub mod keys;
pub mod process;
pub mod registry;
