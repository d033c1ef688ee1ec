//! PNG encoding for opaque RGB image data (color type 2).

use std::io::Write;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Create a PNG image from RGB pixel data.
///
/// # Arguments
/// - `pixels`: RGB pixel data (3 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png_rgb(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    if width == 0 || height == 0 {
        return Err(format!("PNG dimensions must be non-zero, got {}x{}", width, height));
    }
    if pixels.len() != width * height * 3 {
        return Err(format!(
            "Expected {} bytes of RGB data for {}x{}, got {}",
            width * height * 3,
            width,
            height,
            pixels.len()
        ));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(2); // color type (RGB)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // IDAT chunk (image data)
    let idat_data = deflate_idat_rgb(pixels, width, height)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGB image data for IDAT chunk.
fn deflate_idat_rgb(
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, std::io::Error> {
    // Add filter byte (0 = no filter) to each scanline
    let stride = width * 3;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}
