use std::net::IpAddr;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::render::unicode::Dense1x2;
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};

use crate::core::errors::{Result, WgKnifeError};
use crate::core::models::peer::host_only;
use crate::core::models::profile::{ConnectionProfile, validate_endpoint};

/// Pixels per QR module in the PNG rendering.
const MODULE_PX: u32 = 10;
/// Light modules around the symbol, per the QR quiet-zone rule.
const QUIET_ZONE: u32 = 4;

/// A profile together with its text and QR encodings.
pub struct BuiltProfile {
    pub profile: ConnectionProfile,
    pub text: String,
    pub code: QrCode,
}

/// Assemble a connection profile and encode it. Pure; no I/O.
///
/// The allowed address is always rendered as a single host (`/32`, `/128`).
pub fn build(
    interface: &str,
    private_key: &str,
    peer_public_key: &str,
    host: IpAddr,
    endpoint: &str,
) -> Result<BuiltProfile> {
    validate_endpoint(endpoint)?;
    let profile = ConnectionProfile {
        interface: interface.to_string(),
        private_key: private_key.to_string(),
        peer_public_key: peer_public_key.to_string(),
        allowed_address: host_only(host),
        endpoint: endpoint.to_string(),
    };
    let text = profile.to_text();
    let code = encode(&text)?;

    Ok(BuiltProfile {
        profile,
        text,
        code,
    })
}

/// Encode `text` as a QR symbol, dropping to the lowest error-correction
/// level if the payload does not fit at the default one.
pub fn encode(text: &str) -> Result<QrCode> {
    match QrCode::with_error_correction_level(text, EcLevel::M) {
        Ok(code) => Ok(code),
        Err(QrError::DataTooLong) => {
            tracing::warn!(bytes = text.len(), "profile too long for EC level M, using L");
            QrCode::with_error_correction_level(text, EcLevel::L).map_err(|e| {
                WgKnifeError::ProfileEncodingFailed {
                    reason: e.to_string(),
                }
            })
        }
        Err(e) => Err(WgKnifeError::ProfileEncodingFailed {
            reason: e.to_string(),
        }),
    }
}

/// Render the symbol with Unicode half blocks for display in a terminal.
pub fn render_terminal(code: &QrCode) -> String {
    code.render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build()
}

/// Render the symbol as a black-on-white greyscale bitmap.
pub fn render_image(code: &QrCode) -> GrayImage {
    let width = code.width() as u32;
    let colors = code.to_colors();
    let side = (width + 2 * QUIET_ZONE) * MODULE_PX;

    GrayImage::from_fn(side, side, |x, y| {
        let (mx, my) = (x / MODULE_PX, y / MODULE_PX);
        let inside = (QUIET_ZONE..QUIET_ZONE + width).contains(&mx)
            && (QUIET_ZONE..QUIET_ZONE + width).contains(&my);
        if inside {
            let idx = ((my - QUIET_ZONE) * width + (mx - QUIET_ZONE)) as usize;
            if colors[idx] == Color::Dark {
                return Luma([0u8]);
            }
        }
        Luma([255u8])
    })
}

/// Write the PNG rendering of `code` to `path`.
pub fn save_png(code: &QrCode, path: &Path) -> Result<()> {
    render_image(code)
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| WgKnifeError::StorageUnavailable {
            path: path.to_path_buf(),
            reason: format!("could not write QR image: {e}"),
        })
}

/// File name for a peer's QR image: `wg_client_<first 8 key chars>.png`,
/// with `/` and `+` mapped so the name never escapes its directory.
pub fn image_file_name(public_key: &str) -> String {
    let prefix: String = public_key
        .chars()
        .take(8)
        .map(|c| match c {
            '/' => '_',
            '+' => '-',
            other => other,
        })
        .collect();
    format!("wg_client_{prefix}.png")
}
