//! # LSB Steganography Implementation
//!
//! Implements text embedding and extraction using Least Significant Bit (LSB) steganography.
//!
//! ## Algorithm
//!
//! The image is first normalised to 8-bit RGB (alpha and extra channels are
//! dropped and not restored). Its pixels are then treated as a flat buffer of
//! channel values, visited in the order given by the configured
//! [`Traversal`].
//!
//! ### Encoding Process
//! 1. Append the delimiter to the message bytes (see [`payload`](super::payload))
//! 2. Check the framed length against the byte capacity before touching any pixel
//! 3. For each payload bit (MSB first), overwrite the LSB of the next channel:
//!    `channel' = (channel & 0xFE) | bit`
//! 4. Leave every remaining channel untouched
//! 5. Save the modified image as PNG
//!
//! ### Decoding Process
//! 1. Read the LSB of each channel in the same visit order
//! 2. Group bits into bytes and stop as soon as the buffer ends with the delimiter
//! 3. Return the bytes before the delimiter as text
//!
//! ### Capacity
//! An image can store `floor(width * height * 3 / 8)` bytes, delimiter included.
//! The check is a byte count comparison: a framed message exactly as long as
//! the capacity fits.
//!
//! Example: a 10x10 image holds 37 bytes, i.e. a 17-byte message.
//!
//! ## Lossless output
//! LSB data does not survive lossy recompression. Byte-level APIs always
//! return PNG and file-level APIs only write PNG or BMP.

use image::{ImageFormat, RgbImage};
use log::debug;
use std::io::Cursor;
use std::path::Path;

use crate::common::error::{Result, StegoCryptError};
use crate::processing::payload::{bits_msb_first, frame_message, DelimiterScanner};
use crate::processing::traversal::Traversal;

/// Maximum framed payload, in bytes, for an image of the given size.
pub fn capacity(width: u32, height: u32) -> usize {
    let channels = u64::from(width) * u64::from(height) * 3;
    (channels / 8) as usize
}

/// Decode image bytes in any supported format and return their capacity.
pub fn capacity_of(image_bytes: &[u8]) -> Result<usize> {
    let img = image::load_from_memory(image_bytes)?;
    Ok(capacity(img.width(), img.height()))
}

/// LSB codec bound to a channel traversal order.
///
/// Stateless apart from the traversal choice; one codec may be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbCodec {
    traversal: Traversal,
}

impl LsbCodec {
    pub fn new(traversal: Traversal) -> Self {
        Self { traversal }
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Hide `message` in an RGB pixel buffer.
    ///
    /// Takes ownership of the buffer and returns the modified one. On error
    /// the buffer is dropped without ever having been written.
    ///
    /// # Errors
    /// - `CapacityExceeded`: framed message longer than [`capacity`]
    pub fn embed(&self, image: RgbImage, message: &str, secret_key: &str) -> Result<RgbImage> {
        let (width, height) = image.dimensions();
        let framed = frame_message(message);
        let available = capacity(width, height);

        if framed.len() > available {
            return Err(StegoCryptError::CapacityExceeded {
                required: framed.len(),
                capacity: available,
            });
        }

        debug!(
            "Embedding {} framed bytes into {}x{} image ({} traversal, capacity {} bytes)",
            framed.len(),
            width,
            height,
            self.traversal,
            available
        );

        let mut channels = image.into_raw();
        let slots = self.traversal.slots(secret_key, channels.len());

        for (slot, bit) in slots.zip(bits_msb_first(&framed)) {
            channels[slot] = (channels[slot] & 0xFE) | bit;
        }

        RgbImage::from_raw(width, height, channels).ok_or_else(|| {
            StegoCryptError::UnsupportedImage("pixel buffer does not match dimensions".to_string())
        })
    }

    /// Recover a message hidden with [`embed`](Self::embed).
    ///
    /// Stops reading as soon as the delimiter is decoded. Message bytes that
    /// are not valid UTF-8 are replaced with U+FFFD.
    ///
    /// # Errors
    /// - `NoHiddenMessage`: the whole image was read without finding the
    ///   delimiter (no message, or a different key/traversal was used)
    pub fn extract(&self, image: &RgbImage, secret_key: &str) -> Result<String> {
        let channels = image.as_raw();
        let mut scanner = DelimiterScanner::new();

        for slot in self.traversal.slots(secret_key, channels.len()) {
            if scanner.push_bit(channels[slot] & 1) {
                debug!("Delimiter found after {} bytes", scanner.decoded_len());
                break;
            }
        }

        let message = scanner
            .into_message()
            .ok_or(StegoCryptError::NoHiddenMessage)?;
        Ok(String::from_utf8_lossy(&message).into_owned())
    }

    /// Embed text into encoded image bytes.
    ///
    /// # Arguments
    /// - `image_bytes`: Raw bytes of the input image (any format supported by `image` crate)
    /// - `message`: UTF-8 text to embed into the image
    /// - `secret_key`: Key shared with the extracting party
    ///
    /// # Returns
    /// - `Ok(Vec<u8>)`: PNG image bytes with embedded text
    /// - `Err(UnsupportedImage)`: Input cannot be decoded or PNG encoding fails
    /// - `Err(CapacityExceeded)`: Image is too small for the message
    ///
    /// # Example
    /// ```ignore
    /// let image_data = std::fs::read("input.jpg")?;
    /// let stego = LsbCodec::default().embed_text_bytes(&image_data, "Secret message", "key")?;
    /// std::fs::write("output.png", stego)?;
    /// ```
    pub fn embed_text_bytes(&self, image_bytes: &[u8], message: &str, secret_key: &str) -> Result<Vec<u8>> {
        let img = image::load_from_memory(image_bytes)?.to_rgb8();
        let stego = self.embed(img, message, secret_key)?;

        let mut output_bytes = Vec::new();
        stego.write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)?;
        Ok(output_bytes)
    }

    /// Extract text from encoded image bytes.
    pub fn extract_text_bytes(&self, image_bytes: &[u8], secret_key: &str) -> Result<String> {
        let img = image::load_from_memory(image_bytes)?.to_rgb8();
        self.extract(&img, secret_key)
    }

    /// Embed text into the image at `input` and write the result to `output`.
    ///
    /// `output` must have a lossless extension (`.png` or `.bmp`); this is
    /// checked before any decoding work.
    pub fn embed_file(&self, input: &Path, message: &str, secret_key: &str, output: &Path) -> Result<()> {
        let format = lossless_format(output)?;
        let img = image::open(input)?.to_rgb8();
        let stego = self.embed(img, message, secret_key)?;
        stego.save_with_format(output, format)?;
        Ok(())
    }

    /// Extract text from the image file at `input`.
    pub fn extract_file(&self, input: &Path, secret_key: &str) -> Result<String> {
        let img = image::open(input)?.to_rgb8();
        self.extract(&img, secret_key)
    }
}

fn lossless_format(path: &Path) -> Result<ImageFormat> {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Bmp)) => Ok(format),
        _ => Err(StegoCryptError::UnsupportedImage(format!(
            "output must be a lossless format (png or bmp): {}",
            path.display()
        ))),
    }
}

/// Hide `message` in `image` using raster traversal.
pub fn embed(image: RgbImage, message: &str, secret_key: &str) -> Result<RgbImage> {
    LsbCodec::default().embed(image, message, secret_key)
}

/// Extract a message from `image` using raster traversal.
pub fn extract(image: &RgbImage, secret_key: &str) -> Result<String> {
    LsbCodec::default().extract(image, secret_key)
}

/// Byte-level [`LsbCodec::embed_text_bytes`] with raster traversal.
pub fn embed_text_bytes(image_bytes: &[u8], message: &str, secret_key: &str) -> Result<Vec<u8>> {
    LsbCodec::default().embed_text_bytes(image_bytes, message, secret_key)
}

/// Byte-level [`LsbCodec::extract_text_bytes`] with raster traversal.
pub fn extract_text_bytes(image_bytes: &[u8], secret_key: &str) -> Result<String> {
    LsbCodec::default().extract_text_bytes(image_bytes, secret_key)
}
