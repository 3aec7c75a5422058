//! Preprocessing Stage
//!
//! Turns uploaded image bytes into the `(1, H, W, 3)` float tensor the
//! classifiers were trained on. Each step must match training exactly:
//!
//! 1. decode to 3-channel RGB (alpha dropped, grayscale expanded, EXIF
//!    orientation applied)
//! 2. nearest-neighbour resize to the target `(width, height)`
//! 3. rescale to `[0, 1]` by dividing by 255
//! 4. subtract the channel mean, divide by the channel std
//! 5. add a leading batch axis

use std::io::Cursor;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage};
use ndarray::Array4;

use crate::config::{ImageSize, NormalizationProfile};
use crate::utils::error::PredictError;

/// Decode any supported container into upright RGB.
///
/// Camera JPEGs are often stored sideways with an EXIF orientation tag; the
/// tag is applied so the model sees the photo the way it was taken.
/// Decoders hand back pixels in RGB order, which is the order the models
/// were trained on, so no channel swap is needed after `to_rgb8`.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, PredictError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PredictError::ImageDecode(e.to_string()))?
        .into_decoder()
        .map_err(|e| PredictError::ImageDecode(e.to_string()))?;

    // Unreadable metadata is not a decode failure.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut image = DynamicImage::from_decoder(decoder)
        .map_err(|e| PredictError::ImageDecode(e.to_string()))?;
    image.apply_orientation(orientation);

    Ok(image.to_rgb8())
}

/// Nearest-neighbour resize with the source index `floor(dst * src / dst_len)`.
///
/// This is the mapping used when the models were trained. The `image`
/// crate's `FilterType::Nearest` samples pixel centres instead and picks
/// different source pixels on most downscales.
pub fn resize_nearest(src: &RgbImage, size: ImageSize) -> RgbImage {
    let (src_w, src_h) = src.dimensions();
    if (src_w, src_h) == (size.width, size.height) {
        return src.clone();
    }

    let x_scale = src_w as f64 / size.width as f64;
    let y_scale = src_h as f64 / size.height as f64;

    let x_map: Vec<u32> = (0..size.width)
        .map(|dx| ((dx as f64 * x_scale).floor() as u32).min(src_w - 1))
        .collect();

    RgbImage::from_fn(size.width, size.height, |dx, dy| {
        let sy = ((dy as f64 * y_scale).floor() as u32).min(src_h - 1);
        *src.get_pixel(x_map[dx as usize], sy)
    })
}

/// Rescale and normalize into an NHWC tensor with batch size 1
pub fn normalize(image: &RgbImage, profile: &NormalizationProfile) -> Array4<f32> {
    let (width, height) = image.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));

    for (x, y, Rgb(channels)) in image.enumerate_pixels() {
        for (c, &value) in channels.iter().enumerate() {
            let rescaled = value as f32 / 255.0;
            tensor[[0, y as usize, x as usize, c]] = (rescaled - profile.mean[c]) / profile.std[c];
        }
    }

    tensor
}

/// Full preprocessing pipeline. Pure function of its inputs.
pub fn preprocess(bytes: &[u8], profile: &NormalizationProfile) -> Result<Array4<f32>, PredictError> {
    let rgb = decode_rgb(bytes)?;
    let resized = resize_nearest(&rgb, profile.size);
    Ok(normalize(&resized, profile))
}
