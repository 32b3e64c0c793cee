//! Image arrays and stacking.

use tessera_core::{Array, ArrayData};

use crate::{Error, Result};

/// Canvas value for pixels not covered by either stacked image.
const BACKGROUND: u8 = 255;

/// A row-major `height x width x channels` image of `u8` samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    height: usize,
    width: usize,
    channels: usize,
    pixels: Vec<u8>,
}

impl Image {
    /// Create an image, checking that `pixels` covers every sample.
    pub fn new(height: usize, width: usize, channels: usize, pixels: Vec<u8>) -> Result<Self> {
        let expected = height * width * channels;
        if pixels.len() != expected {
            return Err(Error::Image(format!(
                "pixel buffer has {} samples, expected {height}x{width}x{channels} = {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            height,
            width,
            channels,
            pixels,
        })
    }

    /// Create an image with every sample set to `value`.
    pub fn filled(height: usize, width: usize, channels: usize, value: u8) -> Self {
        Self {
            height,
            width,
            channels,
            pixels: vec![value; height * width * channels],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `[height, width, channels]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, self.channels]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Sample at row `y`, column `x`, channel `c`.
    pub fn get(&self, y: usize, x: usize, c: usize) -> Option<u8> {
        if y >= self.height || x >= self.width || c >= self.channels {
            return None;
        }
        Some(self.pixels[(y * self.width + x) * self.channels + c])
    }

    fn row(&self, y: usize) -> &[u8] {
        let len = self.width * self.channels;
        &self.pixels[y * len..(y + 1) * len]
    }

    /// Copy `src` into this image with its top-left corner at (`top`, `left`).
    fn paste(&mut self, src: &Image, top: usize, left: usize) {
        let row_len = src.width * src.channels;
        for y in 0..src.height {
            let start = ((top + y) * self.width + left) * self.channels;
            self.pixels[start..start + row_len].copy_from_slice(src.row(y));
        }
    }

    /// Convert into a `[height, width, channels]` U8 array.
    pub fn into_array(self) -> Result<Array> {
        let shape = vec![self.height, self.width, self.channels];
        Ok(Array::new(ArrayData::U8(self.pixels), shape)?)
    }
}

impl TryFrom<Array> for Image {
    type Error = Error;

    fn try_from(array: Array) -> Result<Self> {
        let &[height, width, channels] = array.shape() else {
            return Err(Error::Image(format!(
                "expected a 3-dimensional array, got shape {:?}",
                array.shape()
            )));
        };
        match array.into_data() {
            ArrayData::U8(pixels) => Image::new(height, width, channels, pixels),
            other => Err(Error::Image(format!(
                "expected U8 samples, got {:?}",
                other.dtype()
            ))),
        }
    }
}

fn check_channels(a: &Image, b: &Image) -> Result<()> {
    if a.channels != b.channels {
        return Err(Error::Image(format!(
            "cannot stack images with {} and {} channels",
            a.channels, b.channels
        )));
    }
    Ok(())
}

/// Place `b` to the right of `a`.
///
/// The output is `max(h1, h2)` rows tall and `w1 + w2` columns wide; area not
/// covered by either image is white.
pub fn hstack_image_arrays(a: &Image, b: &Image) -> Result<Image> {
    check_channels(a, b)?;
    let mut out = Image::filled(
        a.height.max(b.height),
        a.width + b.width,
        a.channels,
        BACKGROUND,
    );
    out.paste(a, 0, 0);
    out.paste(b, 0, a.width);
    Ok(out)
}

/// Place `b` below `a`.
///
/// The output is `h1 + h2` rows tall and `max(w1, w2)` columns wide; area not
/// covered by either image is white.
pub fn vstack_image_arrays(a: &Image, b: &Image) -> Result<Image> {
    check_channels(a, b)?;
    let mut out = Image::filled(
        a.height + b.height,
        a.width.max(b.width),
        a.channels,
        BACKGROUND,
    );
    out.paste(a, 0, 0);
    out.paste(b, a.height, 0);
    Ok(out)
}
