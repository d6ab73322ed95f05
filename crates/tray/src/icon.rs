//! Tray icon decoding.

use crate::TrayError;

/// Decoded icon pixels.
#[derive(Debug, Clone)]
pub(crate) struct RgbaIcon {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decodes PNG (or any format `image` recognises) into RGBA8 pixels.
pub(crate) fn decode_icon(bytes: &[u8]) -> Result<RgbaIcon, TrayError> {
    let image = image::load_from_memory(bytes)?.into_rgba8();
    let (width, height) = image.dimensions();
    Ok(RgbaIcon {
        rgba: image.into_raw(),
        width,
        height,
    })
}
