use crate::core::errors::Result;
use crate::core::services::profile_builder::BuiltProfile;

/// Port for sending a connection profile to its recipient.
pub trait CredentialDelivery {
    /// Transmit `profile` to `recipient`. Must not touch interface state.
    fn deliver(&self, profile: &BuiltProfile, recipient: &str) -> Result<()>;
}
