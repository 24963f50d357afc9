//! Loading and saving [`Image`]s through the `image` crate.
//!
//! Loaded images are always u8 with 1 to 4 interleaved channels (grey, grey+alpha,
//! RGB, RGBA), row-major and tightly packed. Saving accepts the same layouts.

use std::borrow::Cow;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use dip_core::{ElementType, Image};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageFormat, ImageReader};
use log::debug;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] dip_core::Error),
    #[error("desired channel count {0} is not in 0..=4")]
    InvalidChannels(usize),
    #[error("cannot encode a {channels}-channel {ty} image as {format}")]
    UnsupportedLayout {
        channels: usize,
        ty: ElementType,
        format: &'static str,
    },
    #[error("unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("image dimensions {width}x{height} exceed the encoder limit")]
    TooLarge { width: usize, height: usize },
}

/// Header facts of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

/// Decodes a file into a u8 image.
///
/// `desired_channels` of 0 keeps the file's own channel count; 1 to 4 converts to
/// grey, grey+alpha, RGB or RGBA.
pub fn load(path: impl AsRef<Path>, desired_channels: usize) -> Result<Image, IoError> {
    let path = path.as_ref();
    check_channels(desired_channels)?;
    let decoded = image::open(path)?;
    debug!("loaded {} as {:?}", path.display(), decoded.color());
    from_dynamic(decoded, desired_channels)
}

/// Like [`load`], guessing the format from the bytes.
pub fn load_from_memory(bytes: &[u8], desired_channels: usize) -> Result<Image, IoError> {
    check_channels(desired_channels)?;
    let decoded = image::load_from_memory(bytes)?;
    from_dynamic(decoded, desired_channels)
}

fn check_channels(desired: usize) -> Result<(), IoError> {
    if desired > 4 {
        return Err(IoError::InvalidChannels(desired));
    }
    Ok(())
}

fn from_dynamic(decoded: DynamicImage, desired: usize) -> Result<Image, IoError> {
    let channels = match desired {
        0 => usize::from(decoded.color().channel_count()).min(4),
        n => n,
    };
    let (w, h) = (decoded.width() as usize, decoded.height() as usize);
    let data = match channels {
        1 => decoded.into_luma8().into_raw(),
        2 => decoded.into_luma_alpha8().into_raw(),
        3 => decoded.into_rgb8().into_raw(),
        _ => decoded.into_rgba8().into_raw(),
    };
    Ok(Image::from_vec(w, h, channels, data)?)
}

/// Writes `img` in the format implied by the file extension.
pub fn save(img: &Image, path: impl AsRef<Path>) -> Result<(), IoError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)
        .map_err(|_| IoError::UnsupportedFormat(path.to_path_buf()))?;
    let color = color_type(img, format.extensions_str().first().copied().unwrap_or("image"))?;
    let (w, h) = encoder_dims(img)?;
    let data = packed_bytes(img)?;

    debug!("saving {} to {} as {:?}", img, path.display(), format);
    image::save_buffer_with_format(path, &data, w, h, color, format)?;
    Ok(())
}

/// Writes a PGM (1 channel) or PPM (3 channels), ASCII or binary.
pub fn save_pnm(img: &Image, path: impl AsRef<Path>, ascii: bool) -> Result<(), IoError> {
    let path = path.as_ref();
    let encoding = if ascii {
        SampleEncoding::Ascii
    } else {
        SampleEncoding::Binary
    };
    let (subtype, color) = match (img.element_type(), img.channels()) {
        (ElementType::U8, 1) => (PnmSubtype::Graymap(encoding), ExtendedColorType::L8),
        (ElementType::U8, 3) => (PnmSubtype::Pixmap(encoding), ExtendedColorType::Rgb8),
        (ty, channels) => {
            return Err(IoError::UnsupportedLayout {
                channels,
                ty,
                format: "pnm",
            });
        }
    };
    let (w, h) = encoder_dims(img)?;
    let data = packed_bytes(img)?;

    debug!("saving {} to {} as {:?}", img, path.display(), subtype);
    let writer = BufWriter::new(File::create(path)?);
    PnmEncoder::new(writer)
        .with_subtype(subtype)
        .write_image(&data, w, h, color)?;
    Ok(())
}

fn color_type(img: &Image, format: &'static str) -> Result<ExtendedColorType, IoError> {
    match (img.element_type(), img.channels()) {
        (ElementType::U8, 1) => Ok(ExtendedColorType::L8),
        (ElementType::U8, 2) => Ok(ExtendedColorType::La8),
        (ElementType::U8, 3) => Ok(ExtendedColorType::Rgb8),
        (ElementType::U8, 4) => Ok(ExtendedColorType::Rgba8),
        (ty, channels) => Err(IoError::UnsupportedLayout {
            channels,
            ty,
            format,
        }),
    }
}

fn encoder_dims(img: &Image) -> Result<(u32, u32), IoError> {
    let too_large = || IoError::TooLarge {
        width: img.width(),
        height: img.height(),
    };
    Ok((
        u32::try_from(img.width()).map_err(|_| too_large())?,
        u32::try_from(img.height()).map_err(|_| too_large())?,
    ))
}

fn packed_bytes(img: &Image) -> Result<Cow<'_, [u8]>, IoError> {
    let view = img.view::<u8>()?;
    Ok(match view.as_contiguous_slice() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(view.to_vec()),
    })
}

/// True when the extension names a format this build can decode.
pub fn is_supported_format(path: impl AsRef<Path>) -> bool {
    ImageFormat::from_path(path).is_ok_and(|f| f.reading_enabled())
}

/// Reads dimensions and channel count from the header without decoding pixels.
pub fn probe(path: impl AsRef<Path>) -> Result<ImageInfo, IoError> {
    let decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let (w, h) = decoder.dimensions();
    Ok(ImageInfo {
        width: w as usize,
        height: h as usize,
        channels: usize::from(decoder.color_type().channel_count()),
    })
}
