//! Image decoding.

use bytes::Bytes;
use image::GenericImageView;

use super::error::FailureReason;
use super::types::Dimensions;

/// Decode `bytes` as an image and return its dimensions.
///
/// The format is guessed from the content, not the locator.
pub fn decode_dimensions(bytes: &[u8]) -> Result<Dimensions, FailureReason> {
    let image =
        image::load_from_memory(bytes).map_err(|e| FailureReason::Decode(e.to_string()))?;
    let (width, height) = image.dimensions();
    Ok(Dimensions::new(width, height))
}

/// Decode on the blocking pool so large images don't stall other loads.
pub async fn decode_in_background(bytes: Bytes) -> Result<Dimensions, FailureReason> {
    tokio::task::spawn_blocking(move || decode_dimensions(&bytes))
        .await
        .map_err(|e| FailureReason::Aborted(e.to_string()))?
}
