// Opens a camera and hands out frames as 0x00RRGGBB buffers at canvas size.
// Frames come back unmirrored; the renderer decides how to show them.

use crate::error::{Error, Result};
use crate::types::FrameBuffer;

use image::RgbImage;
use image::imageops::{self, FilterType};
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};
use tracing::{info, warn};

pub struct CameraCapture {
    cam: Camera,
    /// Size every frame is delivered at.
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` asking for the closest format to `width` x `height` at 30 fps.
    /// Whatever the device settles on, `next_frame` returns `width` x `height`.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self> {
        let idx = CameraIndex::Index(index);
        let fmt = CameraFormat::new(Resolution::new(width, height), FrameFormat::YUYV, 30);
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        if (actual.width(), actual.height()) != (width, height) {
            warn!(
                requested = %format!("{width}x{height}"),
                actual = %format!("{}x{}", actual.width(), actual.height()),
                "camera resolution differs, frames will be resampled"
            );
        } else {
            info!(width, height, "camera streaming");
        }

        Ok(Self { cam, width, height })
    }

    /// Grab one frame (blocks until the camera has one).
    pub fn next_frame(&mut self) -> Result<FrameBuffer> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;
        // Rebuild on our own `image` version from the raw bytes.
        let (w, h) = rgb_img.dimensions();
        let img = RgbImage::from_raw(w, h, rgb_img.into_raw())
            .ok_or_else(|| Error::CameraFrame(format!("short RGB buffer for {w}x{h}")))?;
        Ok(to_frame_buffer(&img, self.width, self.height))
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Pack an RGB image as 0x00RRGGBB, resampling (nearest neighbour) if it is not
/// already `width` x `height`.
pub fn to_frame_buffer(img: &RgbImage, width: u32, height: u32) -> FrameBuffer {
    let resized;
    let img = if img.dimensions() == (width, height) {
        img
    } else {
        resized = imageops::resize(img, width, height, FilterType::Nearest);
        &resized
    };

    let pixels = img
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    FrameBuffer { width: width as usize, height: height as usize, pixels }
}
