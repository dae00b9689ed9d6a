//! Native TIFF reading/writing
//!
//! Uses the `tiff` crate. Pixel spacing and origin are kept in the
//! ModelPixelScale / ModelTiepoint tags so they survive a round trip.

use crate::error::{Error, Result};
use crate::grid::{GridElement, Volume};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;

/// Read a TIFF file into a Volume
///
/// A single-page file yields a 2-D volume `[rows, cols]`; a multi-page file
/// yields a 3-D volume `[pages, rows, cols]`.
pub fn read_volume<T, P>(path: P) -> Result<Volume<T>>
where
    T: GridElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_volume(file)
}

/// Read a TIFF from an in-memory buffer into a Volume
pub fn read_volume_from_buffer<T>(data: &[u8]) -> Result<Volume<T>>
where
    T: GridElement,
{
    decode_volume(Cursor::new(data))
}

/// Internal: decode a page stack from any `Read + Seek` source
fn decode_volume<T, R>(reader: R) -> Result<Volume<T>>
where
    T: GridElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;
    let rows = height as usize;
    let cols = width as usize;
    let (spacing, origin) = read_spacing(&mut decoder);

    let mut data: Vec<T> = Vec::with_capacity(rows * cols);
    let mut pages = 0usize;
    loop {
        let (w, h) = decoder
            .dimensions()
            .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;
        if (w as usize, h as usize) != (cols, rows) {
            return Err(Error::InvalidDimensions {
                shape: vec![h as usize, w as usize],
                reason: format!("page {} differs from first page {}x{}", pages, rows, cols),
            });
        }

        let page = decoder
            .read_image()
            .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;
        append_page(&mut data, page)?;
        pages += 1;

        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|e| Error::Other(format!("Cannot advance to next page: {}", e)))?;
    }

    let shape = if pages == 1 {
        vec![rows, cols]
    } else {
        vec![pages, rows, cols]
    };
    let mut volume = Volume::from_vec(&shape, data)?;

    // Tags hold x, y, z order; volume axes run z, y, x
    if let (Some(spacing), Some(origin)) = (spacing, origin) {
        let ndim = shape.len();
        let spacing: Vec<f64> = spacing.iter().take(ndim).rev().copied().collect();
        let origin: Vec<f64> = origin.iter().take(ndim).rev().copied().collect();
        if spacing.len() == ndim && spacing.iter().all(|s| *s > 0.0) {
            volume.set_spacing(spacing)?;
            volume.set_origin(origin)?;
        }
    }

    Ok(volume)
}

fn append_page<T: GridElement>(data: &mut Vec<T>, page: DecodingResult) -> Result<()> {
    fn cast<T: GridElement, V: num_traits::ToPrimitive + Copy>(data: &mut Vec<T>, buf: &[V]) {
        data.extend(
            buf.iter()
                .map(|&v| T::saturating_from_f64(v.to_f64().unwrap_or(f64::NAN))),
        );
    }

    match page {
        DecodingResult::U8(buf) => cast(data, &buf),
        DecodingResult::U16(buf) => cast(data, &buf),
        DecodingResult::U32(buf) => cast(data, &buf),
        DecodingResult::I8(buf) => cast(data, &buf),
        DecodingResult::I16(buf) => cast(data, &buf),
        DecodingResult::I32(buf) => cast(data, &buf),
        DecodingResult::F32(buf) => cast(data, &buf),
        DecodingResult::F64(buf) => cast(data, &buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ));
        }
    }
    Ok(())
}

/// Attempt to read spacing and origin from the model tags
fn read_spacing<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> (Option<Vec<f64>>, Option<Vec<f64>>) {
    let scale = decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE).ok();
    let tiepoint = decoder.get_tag_f64_vec(MODEL_TIEPOINT).ok();

    match (scale, tiepoint) {
        (Some(scale), Some(tiepoint)) if scale.len() >= 3 && tiepoint.len() >= 6 => {
            (Some(scale[..3].to_vec()), Some(tiepoint[3..6].to_vec()))
        }
        _ => (None, None),
    }
}

/// Write a 2-D or 3-D Volume to a TIFF file as 32-bit float pages.
///
/// A 3-D volume needs at least two pages: a single page reads back as 2-D,
/// so `[1, rows, cols]` is rejected.
pub fn write_volume<T, P>(volume: &Volume<T>, path: P) -> Result<()>
where
    T: GridElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_volume(volume, file)
}

/// Write a Volume to an in-memory TIFF buffer
pub fn write_volume_to_buffer<T>(volume: &Volume<T>) -> Result<Vec<u8>>
where
    T: GridElement,
{
    let mut buf = Vec::new();
    encode_volume(volume, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Internal: encode a Volume as a TIFF page stack into any `Write + Seek` sink
fn encode_volume<T, W>(volume: &Volume<T>, writer: W) -> Result<()>
where
    T: GridElement,
    W: std::io::Write + std::io::Seek,
{
    let (pages, rows, cols) = match volume.shape() {
        &[rows, cols] => (1, rows, cols),
        &[pages, rows, cols] if pages > 1 => (pages, rows, cols),
        &[1, _, _] => {
            return Err(Error::InvalidDimensions {
                shape: volume.shape().to_vec(),
                reason: "a single-page stack would read back as 2-D".to_string(),
            });
        }
        other => {
            return Err(Error::InvalidDimensions {
                shape: other.to_vec(),
                reason: "TIFF output supports 2-D and 3-D volumes".to_string(),
            });
        }
    };

    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let data: Vec<f32> = volume.as_slice()?.iter().map(|&v| v.as_f64() as f32).collect();

    // x, y, z order for the model tags
    let mut scale: Vec<f64> = volume.spacing().iter().rev().copied().collect();
    let mut tie_xyz: Vec<f64> = volume.origin().iter().rev().copied().collect();
    scale.resize(3, 0.0);
    tie_xyz.resize(3, 0.0);
    let tiepoint = [0.0, 0.0, 0.0, tie_xyz[0], tie_xyz[1], tie_xyz[2]];

    let page_len = rows * cols;
    for page in 0..pages {
        let mut image = encoder
            .new_image::<Gray32Float>(cols as u32, rows as u32)
            .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

        image
            .encoder()
            .write_tag(MODEL_PIXEL_SCALE, scale.as_slice())
            .map_err(|e| Error::Other(format!("Cannot write scale tag: {}", e)))?;
        image
            .encoder()
            .write_tag(MODEL_TIEPOINT, &tiepoint[..])
            .map_err(|e| Error::Other(format!("Cannot write tiepoint tag: {}", e)))?;

        image
            .write_data(&data[page * page_len..(page + 1) * page_len])
            .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;
    }

    Ok(())
}
