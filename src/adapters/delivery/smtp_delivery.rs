use std::path::{Path, PathBuf};
use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::app_config::MailSection;
use crate::core::errors::{Result, WgKnifeError};
use crate::core::services::profile_builder::{BuiltProfile, image_file_name, save_png};
use crate::core::traits::delivery::CredentialDelivery;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Emails a profile as plain text with the QR code attached as PNG,
/// over an authenticated STARTTLS session.
pub struct SmtpDelivery {
    settings: MailSection,
    output_dir: Option<PathBuf>,
}

impl SmtpDelivery {
    /// `output_dir` keeps the rendered PNG; without it a temp dir is used
    /// and removed after sending.
    pub fn new(settings: MailSection, output_dir: Option<PathBuf>) -> Self {
        Self {
            settings,
            output_dir,
        }
    }

    /// Split a credentials file into `(username, password)`.
    ///
    /// One line is a password for the sender address; two lines are
    /// username then password.
    pub fn parse_credentials(content: &str, sender: &str) -> Result<(String, String)> {
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        match lines.as_slice() {
            [password] => Ok((sender.to_string(), password.to_string())),
            [user, password] => Ok((user.to_string(), password.to_string())),
            _ => Err(WgKnifeError::DeliveryFailed {
                reason: "credentials file must hold a password, or a username and a password"
                    .into(),
            }),
        }
    }

    fn credentials(&self) -> Result<Credentials> {
        let path = &self.settings.credentials_file;
        let content =
            std::fs::read_to_string(path).map_err(|e| WgKnifeError::DeliveryFailed {
                reason: format!("cannot read credentials file {}: {e}", path.display()),
            })?;
        let (user, password) = Self::parse_credentials(&content, &self.settings.sender)?;
        Ok(Credentials::new(user, password))
    }

    /// Build the message: profile text as body, QR PNG as attachment.
    pub fn compose(&self, profile: &BuiltProfile, recipient: &str, png: Vec<u8>) -> Result<Message> {
        let from: Mailbox = self.settings.sender.parse().map_err(|e| {
            WgKnifeError::DeliveryFailed {
                reason: format!("invalid sender address '{}': {e}", self.settings.sender),
            }
        })?;
        let to: Mailbox = recipient.parse().map_err(|e| WgKnifeError::DeliveryFailed {
            reason: format!("invalid recipient address '{recipient}': {e}"),
        })?;
        let png_type = ContentType::parse("image/png").map_err(|e| WgKnifeError::DeliveryFailed {
            reason: format!("attachment content type: {e}"),
        })?;

        let file_name = image_file_name(&profile.profile.peer_public_key);
        Message::builder()
            .from(from)
            .to(to)
            .subject(self.settings.subject.clone())
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(profile.text.clone()))
                    .singlepart(Attachment::new(file_name).body(png, png_type)),
            )
            .map_err(|e| WgKnifeError::DeliveryFailed {
                reason: format!("could not build message: {e}"),
            })
    }

    fn render_attachment(&self, profile: &BuiltProfile, dir: &Path) -> Result<Vec<u8>> {
        let path = dir.join(image_file_name(&profile.profile.peer_public_key));
        save_png(&profile.code, &path).map_err(|e| WgKnifeError::DeliveryFailed {
            reason: e.to_string(),
        })?;
        std::fs::read(&path).map_err(|e| WgKnifeError::DeliveryFailed {
            reason: format!("cannot read back {}: {e}", path.display()),
        })
    }
}

impl CredentialDelivery for SmtpDelivery {
    fn deliver(&self, profile: &BuiltProfile, recipient: &str) -> Result<()> {
        let credentials = self.credentials()?;

        let png = match &self.output_dir {
            Some(dir) => self.render_attachment(profile, dir)?,
            None => {
                let scratch = tempfile::tempdir().map_err(|e| WgKnifeError::DeliveryFailed {
                    reason: format!("cannot create temporary directory: {e}"),
                })?;
                self.render_attachment(profile, scratch.path())?
            }
        };
        let message = self.compose(profile, recipient, png)?;

        let mailer = SmtpTransport::starttls_relay(&self.settings.smtp_host)
            .map_err(|e| WgKnifeError::DeliveryFailed {
                reason: format!("SMTP relay {}: {e}", self.settings.smtp_host),
            })?
            .port(self.settings.smtp_port)
            .credentials(credentials)
            .timeout(Some(SEND_TIMEOUT))
            .build();

        mailer
            .send(&message)
            .map_err(|e| WgKnifeError::DeliveryFailed {
                reason: format!(
                    "sending via {}:{} failed: {e}",
                    self.settings.smtp_host, self.settings.smtp_port
                ),
            })?;

        tracing::info!(recipient, "profile delivered");
        Ok(())
    }
}
