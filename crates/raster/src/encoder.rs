//! Byte-level GeoTIFF encoding.
//!
//! Emits a minimal little-endian TIFF: one IFD, four 8-bit samples per
//! pixel (RGBA with unassociated alpha), the whole image as a single
//! Deflate-compressed strip, and the GeoTIFF georeferencing tags
//! (ModelPixelScale, ModelTiepoint, GeoKeyDirectory pinned to WGS84).

use std::io::Write;

use risk_common::{RiskError, RiskResult};

use crate::bands::RasterBands;

// TIFF field types
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_DOUBLE: u16 = 12;

// TIFF tags
const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_IMAGE_LENGTH: u16 = 257;
const TAG_BITS_PER_SAMPLE: u16 = 258;
const TAG_COMPRESSION: u16 = 259;
const TAG_PHOTOMETRIC: u16 = 262;
const TAG_STRIP_OFFSETS: u16 = 273;
const TAG_SAMPLES_PER_PIXEL: u16 = 277;
const TAG_ROWS_PER_STRIP: u16 = 278;
const TAG_STRIP_BYTE_COUNTS: u16 = 279;
const TAG_PLANAR_CONFIG: u16 = 284;
const TAG_EXTRA_SAMPLES: u16 = 338;
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;

const COMPRESSION_DEFLATE: u16 = 8;
const PHOTOMETRIC_RGB: u16 = 2;
const EXTRA_SAMPLE_UNASSOCIATED_ALPHA: u16 = 2;

const ENTRY_COUNT: u16 = 14;

/// GeoKeyDirectory: geographic model, pixel-is-area, EPSG:4326.
const GEO_KEYS: [u16; 16] = [
    1, 1, 0, 3, // version, revision, minor, key count
    1024, 0, 1, 2, // GTModelType = geographic
    1025, 0, 1, 1, // GTRasterType = pixel-is-area
    2048, 0, 1, 4326, // GeographicType = WGS84
];

/// Encode the bands as a georeferenced TIFF byte stream.
///
/// `pixel_scale` is the (x, y) cell size in degrees (both positive; the
/// tiepoint anchors the upper-left corner, rows run southward).
/// `origin` is the upper-left corner as (longitude, latitude).
pub fn encode_geotiff(
    bands: &RasterBands,
    pixel_scale: (f64, f64),
    origin: (f64, f64),
) -> RiskResult<Vec<u8>> {
    if bands.rows == 0 || bands.columns == 0 {
        return Err(RiskError::Encode("raster has no pixels".to_string()));
    }

    let strip = compress_strip(&bands.interleaved())?;
    let strip_padding = strip.len() % 2;

    // layout: header, strip, out-of-line tag values, IFD
    let strip_offset = 8u32;
    let bits_offset = strip_offset + (strip.len() + strip_padding) as u32;
    let scale_offset = bits_offset + 8;
    let tiepoint_offset = scale_offset + 24;
    let geokey_offset = tiepoint_offset + 48;
    let ifd_offset = geokey_offset + 32;

    let mut out = Vec::with_capacity(ifd_offset as usize + 2 + ENTRY_COUNT as usize * 12 + 4);

    // header
    out.extend_from_slice(b"II");
    push_u16(&mut out, 42);
    push_u32(&mut out, ifd_offset);

    // strip data
    out.extend_from_slice(&strip);
    out.extend(std::iter::repeat(0u8).take(strip_padding));

    // BitsPerSample = [8, 8, 8, 8]
    for _ in 0..4 {
        push_u16(&mut out, 8);
    }

    // ModelPixelScale = (sx, sy, 0)
    push_f64(&mut out, pixel_scale.0);
    push_f64(&mut out, pixel_scale.1);
    push_f64(&mut out, 0.0);

    // ModelTiepoint: raster (0,0,0) pins to (lon, lat, 0)
    for value in [0.0, 0.0, 0.0, origin.0, origin.1, 0.0] {
        push_f64(&mut out, value);
    }

    for key in GEO_KEYS {
        push_u16(&mut out, key);
    }

    // IFD
    debug_assert_eq!(out.len(), ifd_offset as usize);
    push_u16(&mut out, ENTRY_COUNT);
    push_entry(&mut out, TAG_IMAGE_WIDTH, TYPE_LONG, 1, bands.columns as u32);
    push_entry(&mut out, TAG_IMAGE_LENGTH, TYPE_LONG, 1, bands.rows as u32);
    push_entry(&mut out, TAG_BITS_PER_SAMPLE, TYPE_SHORT, 4, bits_offset);
    push_short_entry(&mut out, TAG_COMPRESSION, COMPRESSION_DEFLATE);
    push_short_entry(&mut out, TAG_PHOTOMETRIC, PHOTOMETRIC_RGB);
    push_entry(&mut out, TAG_STRIP_OFFSETS, TYPE_LONG, 1, strip_offset);
    push_short_entry(&mut out, TAG_SAMPLES_PER_PIXEL, 4);
    push_entry(&mut out, TAG_ROWS_PER_STRIP, TYPE_LONG, 1, bands.rows as u32);
    push_entry(
        &mut out,
        TAG_STRIP_BYTE_COUNTS,
        TYPE_LONG,
        1,
        strip.len() as u32,
    );
    push_short_entry(&mut out, TAG_PLANAR_CONFIG, 1);
    push_short_entry(&mut out, TAG_EXTRA_SAMPLES, EXTRA_SAMPLE_UNASSOCIATED_ALPHA);
    push_entry(&mut out, TAG_MODEL_PIXEL_SCALE, TYPE_DOUBLE, 3, scale_offset);
    push_entry(
        &mut out,
        TAG_MODEL_TIEPOINT,
        TYPE_DOUBLE,
        6,
        tiepoint_offset,
    );
    push_entry(
        &mut out,
        TAG_GEO_KEY_DIRECTORY,
        TYPE_SHORT,
        GEO_KEYS.len() as u32,
        geokey_offset,
    );
    push_u32(&mut out, 0); // no next IFD

    Ok(out)
}

fn compress_strip(interleaved: &[u8]) -> RiskResult<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(interleaved)
        .map_err(|e| RiskError::Encode(format!("strip compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| RiskError::Encode(format!("strip compression failed: {}", e)))
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_f64(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Write one 12-byte IFD entry with a LONG/offset value field.
fn push_entry(out: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
    push_u16(out, tag);
    push_u16(out, field_type);
    push_u32(out, count);
    push_u32(out, value);
}

/// Write one entry carrying a single SHORT inline in the value field.
fn push_short_entry(out: &mut Vec<u8>, tag: u16, value: u16) {
    push_u16(out, tag);
    push_u16(out, TYPE_SHORT);
    push_u32(out, 1);
    push_u16(out, value);
    push_u16(out, 0);
}
