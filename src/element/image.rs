use egui::Vec2;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EditorError;

/// Image-specific attributes. An image carries at most one filter at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProps {
    /// Where the bitmap was loaded from; pixels live in the loader/texture caches.
    pub src: String,
    /// Pixel dimensions of the decoded bitmap
    pub natural_size: Vec2,
    pub filter: Option<ImageFilter>,
}

/// Single-slot image effect. Applying a new one replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    Greyscale,
    Sepia,
    Invert,
    Blur,
    Sharpen,
    Emboss,
    Brightness,
    Contrast,
    Pixelate,
    BlackWhite,
    HueRotate,
    Vintage,
}

impl ImageFilter {
    pub const ALL: [ImageFilter; 12] = [
        ImageFilter::Greyscale,
        ImageFilter::Sepia,
        ImageFilter::Invert,
        ImageFilter::Blur,
        ImageFilter::Sharpen,
        ImageFilter::Emboss,
        ImageFilter::Brightness,
        ImageFilter::Contrast,
        ImageFilter::Pixelate,
        ImageFilter::BlackWhite,
        ImageFilter::HueRotate,
        ImageFilter::Vintage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ImageFilter::Greyscale => "greyscale",
            ImageFilter::Sepia => "sepia",
            ImageFilter::Invert => "invert",
            ImageFilter::Blur => "blur",
            ImageFilter::Sharpen => "sharpen",
            ImageFilter::Emboss => "emboss",
            ImageFilter::Brightness => "brightness",
            ImageFilter::Contrast => "contrast",
            ImageFilter::Pixelate => "pixelate",
            ImageFilter::BlackWhite => "blackwhite",
            ImageFilter::HueRotate => "huerotate",
            ImageFilter::Vintage => "vintage",
        }
    }

    /// Parse a filter name as shown in the filter picker.
    ///
    /// `"none"` maps to `Ok(None)`, clearing the filter slot.
    pub fn parse_optional(value: &str) -> Result<Option<Self>, EditorError> {
        if value.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        value.parse().map(Some)
    }

    /// Produce the filtered bitmap. The source is left untouched.
    pub fn apply(&self, source: &RgbaImage) -> RgbaImage {
        debug!("Applying {} filter to {}x{} bitmap", self.name(), source.width(), source.height());
        match self {
            ImageFilter::Greyscale => DynamicImage::ImageRgba8(source.clone()).grayscale().to_rgba8(),
            ImageFilter::Sepia => sepia(source),
            ImageFilter::Invert => {
                let mut out = source.clone();
                imageops::invert(&mut out);
                out
            }
            ImageFilter::Blur => imageops::blur(source, 2.0),
            ImageFilter::Sharpen => {
                imageops::filter3x3(source, &[0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0])
            }
            ImageFilter::Emboss => {
                imageops::filter3x3(source, &[1.0, 1.0, 1.0, 1.0, 0.7, -1.0, -1.0, -1.0, -1.0])
            }
            ImageFilter::Brightness => imageops::brighten(source, 20),
            ImageFilter::Contrast => imageops::contrast(source, 25.0),
            ImageFilter::Pixelate => pixelate(source, 4),
            ImageFilter::BlackWhite => black_white(source),
            ImageFilter::HueRotate => imageops::huerotate(source, 90),
            ImageFilter::Vintage => imageops::contrast(&sepia(source), -10.0),
        }
    }
}

impl FromStr for ImageFilter {
    type Err = EditorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.to_ascii_lowercase();
        ImageFilter::ALL
            .iter()
            .copied()
            .find(|filter| filter.name() == lower)
            .or(match lower.as_str() {
                "grayscale" => Some(ImageFilter::Greyscale),
                "blacknwhite" => Some(ImageFilter::BlackWhite),
                _ => None,
            })
            .ok_or_else(|| EditorError::UnknownFilter(value.to_string()))
    }
}

fn sepia(source: &RgbaImage) -> RgbaImage {
    let mut out = source.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let nr = 0.393 * r + 0.769 * g + 0.189 * b;
        let ng = 0.349 * r + 0.686 * g + 0.168 * b;
        let nb = 0.272 * r + 0.534 * g + 0.131 * b;
        pixel.0 = [nr.min(255.0) as u8, ng.min(255.0) as u8, nb.min(255.0) as u8, a];
    }
    out
}

fn black_white(source: &RgbaImage) -> RgbaImage {
    let mut out = source.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        let value = if luma >= 128.0 { 255 } else { 0 };
        pixel.0 = [value, value, value, a];
    }
    out
}

fn pixelate(source: &RgbaImage, block: u32) -> RgbaImage {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return source.clone();
    }
    let small_w = (width / block).max(1);
    let small_h = (height / block).max(1);
    let small = imageops::resize(source, small_w, small_h, FilterType::Nearest);
    imageops::resize(&small, width, height, FilterType::Nearest)
}
