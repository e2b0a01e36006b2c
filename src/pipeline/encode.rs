//! TIFF encoding: accumulated page rasters → one multi-frame TIFF.
//!
//! ## Why the `tiff` crate directly?
//!
//! The `image` crate's TIFF support writes a single frame per file. The
//! underlying `tiff` encoder writes one image directory per
//! `new_image_*` call, which is exactly the multi-page layout needed
//! here, and it exposes the per-frame resolution tags.
//!
//! ## Resolution tags
//!
//! Every frame's X/Y resolution is set to the requested conversion DPI
//! in inches — deliberately not any resolution metadata carried by the
//! source PDF. Downstream consumers (fax gateways, document archives)
//! read physical page size back out of these tags, so they must match
//! the raster's actual pixel density, which the render stage guarantees.

use crate::config::TiffCompression;
use image::DynamicImage;
use std::io::{Seek, Write};
use tiff::encoder::colortype::RGB8;
use tiff::encoder::compression::{Compression, Deflate, Lzw, Packbits, Uncompressed};
use tiff::encoder::{Rational, TiffEncoder};
use tiff::tags::ResolutionUnit;
use tiff::TiffResult;
use tracing::debug;

/// Write `frames` to `writer` as a multi-frame TIFF.
///
/// One image directory per frame, uniform `compression`, and every frame
/// tagged `dpi` dots per inch. Frames are written in slice order.
pub fn write_frames<W: Write + Seek>(
    writer: W,
    frames: &[DynamicImage],
    dpi: u32,
    compression: TiffCompression,
) -> TiffResult<()> {
    let mut encoder = TiffEncoder::new(writer)?;

    for (idx, frame) in frames.iter().enumerate() {
        let rgb = frame.to_rgb8();
        debug!(
            "Encoding frame {}/{} ({}x{}, {})",
            idx + 1,
            frames.len(),
            rgb.width(),
            rgb.height(),
            compression
        );

        match compression {
            TiffCompression::None => write_frame(&mut encoder, &rgb, dpi, Uncompressed)?,
            TiffCompression::Lzw => write_frame(&mut encoder, &rgb, dpi, Lzw)?,
            TiffCompression::Deflate => write_frame(&mut encoder, &rgb, dpi, Deflate::default())?,
            TiffCompression::Packbits => write_frame(&mut encoder, &rgb, dpi, Packbits)?,
        }
    }

    Ok(())
}

/// Write one frame as an RGB8 image directory with resolution tags.
fn write_frame<W: Write + Seek, C: Compression>(
    encoder: &mut TiffEncoder<W>,
    rgb: &image::RgbImage,
    dpi: u32,
    compression: C,
) -> TiffResult<()> {
    let (width, height) = rgb.dimensions();
    let mut frame = encoder.new_image_with_compression::<RGB8, C>(width, height, compression)?;
    frame.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
    frame.write_data(rgb.as_raw())
}
