//! Vision primitives implemented over the `image` and `imageproc` crates.
//!
//! This crate is the external vision library of the bridge: color
//! conversion, Canny edge detection, and Gaussian blur are consumed from
//! `image`/`imageproc` as opaque primitives, never reimplemented.

use image::{DynamicImage, GrayImage, RgbaImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use pixlock_core::VisionOps;

/// [`VisionOps`] backed by `image` conversions and `imageproc` filters.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageprocVision;

impl ImageprocVision {
    pub fn new() -> Self {
        Self
    }
}

fn rgba_image(rgba: &[u8], width: u32, height: u32) -> RgbaImage {
    assert_eq!(
        rgba.len(),
        width as usize * height as usize * 4,
        "packed RGBA length"
    );
    RgbaImage::from_raw(width, height, rgba.to_vec()).expect("length checked above")
}

fn gray_image(gray: &[u8], width: u32, height: u32) -> GrayImage {
    assert_eq!(
        gray.len(),
        width as usize * height as usize,
        "packed gray length"
    );
    GrayImage::from_raw(width, height, gray.to_vec()).expect("length checked above")
}

impl VisionOps for ImageprocVision {
    fn color_to_gray(&self, rgba: &[u8], width: u32, height: u32) -> Vec<u8> {
        DynamicImage::ImageRgba8(rgba_image(rgba, width, height))
            .into_luma8()
            .into_raw()
    }

    fn gray_to_color(&self, gray: &[u8], width: u32, height: u32) -> Vec<u8> {
        DynamicImage::ImageLuma8(gray_image(gray, width, height))
            .into_rgba8()
            .into_raw()
    }

    fn detect_edges(&self, gray: &[u8], width: u32, height: u32, low: f32, high: f32) -> Vec<u8> {
        canny(&gray_image(gray, width, height), low, high).into_raw()
    }

    fn blur(&self, rgba: &[u8], width: u32, height: u32, sigma: f32) -> Vec<u8> {
        gaussian_blur_f32(&rgba_image(rgba, width, height), sigma).into_raw()
    }
}
