//! Tray icon image loading
//!
//! The icon ships embedded in the binary and is resampled to whatever
//! pixel size the native tray prefers before registration.

use crate::error::Result;
use image::imageops::FilterType;

/// Embedded tray icon asset.
pub const TRAY_ICON_PNG: &[u8] = include_bytes!("../../assets/icons/tray.png");

/// Decoded RGBA icon at the tray's preferred size.
#[derive(Debug, Clone)]
pub struct TrayImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode `data` as an image and scale it to `width` x `height`.
///
/// Resampling uses a bicubic filter so small tray sizes stay legible.
pub fn decode_scaled(data: &[u8], width: u32, height: u32) -> Result<TrayImage> {
    let decoded = image::load_from_memory(data)?;
    let scaled = decoded.resize_exact(width, height, FilterType::CatmullRom);
    let rgba = scaled.into_rgba8();
    Ok(TrayImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
