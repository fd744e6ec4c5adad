pub mod peer_service;
pub mod profile_builder;
pub mod registry_service;
