//! GeoTIFF writer tests: metadata, scaling regimes, colormap round trips.

use std::collections::HashMap;
use std::io::Read;

use colorscale::{builtin, Colormap, MapKind, Rgb, Scaling, ScalingMode};
use raster::GeoTiffFile;
use risk_common::Region;

// small test region: upper-left corner (0.0, 0.5), 11x6 cells at 0.1 degrees
fn small_grid() -> risk_common::Grid {
    Region::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.5), (0.0, 0.5)])
        .unwrap()
        .grid(0.1)
        .unwrap()
}

fn grey_ramp() -> Colormap {
    Colormap {
        id: None,
        name: "grey".to_string(),
        kind: MapKind::Continuous,
        model: "RGB".to_string(),
        z_values: vec![0.0, 10.0],
        colors: vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)],
        background: Rgb::new(255, 0, 255),
        foreground: Rgb::new(0, 255, 255),
        nan: Rgb::new(9, 9, 9),
    }
}

fn tmp_path(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
    dir.path().join(name)
}

// ============================================================================
// Minimal TIFF read-back used to verify emitted files
// ============================================================================

struct DecodedTiff {
    width: u32,
    height: u32,
    samples_per_pixel: u32,
    pixel_scale: Vec<f64>,
    tiepoint: Vec<f64>,
    rgba: Vec<u8>,
}

impl DecodedTiff {
    fn pixel(&self, row: usize, col: usize) -> (u8, u8, u8, u8) {
        let idx = (row * self.width as usize + col) * 4;
        (
            self.rgba[idx],
            self.rgba[idx + 1],
            self.rgba[idx + 2],
            self.rgba[idx + 3],
        )
    }
}

fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn read_f64s(buf: &[u8], at: usize, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let start = at + i * 8;
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&buf[start..start + 8]);
            f64::from_le_bytes(bytes)
        })
        .collect()
}

fn decode_tiff(buf: &[u8]) -> DecodedTiff {
    assert_eq!(&buf[0..2], b"II", "little-endian header");
    assert_eq!(read_u16(buf, 2), 42);

    let ifd = read_u32(buf, 4) as usize;
    let entries = read_u16(buf, ifd) as usize;

    // tag -> (type, count, value/offset)
    let mut tags: HashMap<u16, (u16, u32, u32)> = HashMap::new();
    for i in 0..entries {
        let at = ifd + 2 + i * 12;
        let tag = read_u16(buf, at);
        let field_type = read_u16(buf, at + 2);
        let count = read_u32(buf, at + 4);
        let value = if field_type == 3 && count == 1 {
            read_u16(buf, at + 8) as u32
        } else {
            read_u32(buf, at + 8)
        };
        tags.insert(tag, (field_type, count, value));
    }

    assert_eq!(tags[&259].2, 8, "deflate compression");
    assert_eq!(tags[&262].2, 2, "RGB photometric");
    assert_eq!(tags[&338].2, 2, "unassociated alpha");

    let width = tags[&256].2;
    let height = tags[&257].2;
    let strip_offset = tags[&273].2 as usize;
    let strip_len = tags[&279].2 as usize;

    let mut rgba = Vec::new();
    let mut decoder = flate2::read::ZlibDecoder::new(&buf[strip_offset..strip_offset + strip_len]);
    decoder.read_to_end(&mut rgba).unwrap();
    assert_eq!(rgba.len(), (width * height * 4) as usize);

    DecodedTiff {
        width,
        height,
        samples_per_pixel: tags[&277].2,
        pixel_scale: read_f64s(buf, tags[&33550].2 as usize, 3),
        tiepoint: read_f64s(buf, tags[&33922].2 as usize, 6),
        rgba,
    }
}

// ============================================================================
// Geotransform and file metadata
// ============================================================================

#[test]
fn test_geo_transform_reporting() {
    let dir = tempfile::tempdir().unwrap();
    let writer = GeoTiffFile::plain(tmp_path(&dir, "plain.tiff"), small_grid(), None).unwrap();

    let (origin_lon, pixel_width, _, origin_lat, _, pixel_height) = writer.geo_transform();
    assert!((origin_lon - 0.0).abs() < 1e-12);
    assert!((origin_lat - 0.5).abs() < 1e-12);
    assert!((pixel_width - 0.1).abs() < 1e-12);
    assert!((pixel_height - (-0.1)).abs() < 1e-12);
}

#[test]
fn test_written_file_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = tmp_path(&dir, "meta.tiff");
    let mut writer = GeoTiffFile::plain(&path, small_grid(), Some(1.0)).unwrap();
    writer.close().unwrap();

    let decoded = decode_tiff(&std::fs::read(&path).unwrap());
    assert_eq!(decoded.width, 11);
    assert_eq!(decoded.height, 6);
    assert_eq!(decoded.samples_per_pixel, 4);
    assert!((decoded.pixel_scale[0] - 0.1).abs() < 1e-12);
    assert!((decoded.pixel_scale[1] - 0.1).abs() < 1e-12);
    assert!((decoded.tiepoint[3] - 0.0).abs() < 1e-12); // origin lon
    assert!((decoded.tiepoint[4] - 0.5).abs() < 1e-12); // origin lat
}

// ============================================================================
// Fixed scaling round trip
// ============================================================================

#[test]
fn test_fixed_writer_round_trip_grey() {
    let dir = tempfile::tempdir().unwrap();
    let path = tmp_path(&dir, "grey.tiff");
    let scaling = Scaling::fixed(0.0, 10.0).unwrap();
    let mut writer =
        GeoTiffFile::colored(&path, small_grid(), grey_ramp(), scaling, false, None).unwrap();

    writer.write((0, 0), 0.0).unwrap();
    writer.write((0, 1), 5.0).unwrap();
    writer.write((0, 2), 10.0).unwrap();
    writer.close().unwrap();

    let decoded = decode_tiff(&std::fs::read(&path).unwrap());
    assert_eq!(decoded.pixel(0, 0), (0, 0, 0, 255));
    let (r, g, b, a) = decoded.pixel(0, 1);
    assert!(r == 127 || r == 128);
    assert_eq!((r, g), (g, b));
    assert_eq!(a, 255);
    assert_eq!(decoded.pixel(0, 2), (255, 255, 255, 255));

    // untouched cells stay transparent
    assert_eq!(decoded.pixel(5, 10).3, 0);
}

// ============================================================================
// Relative scaling and normalization
// ============================================================================

#[test]
fn test_relative_writer_matches_fixed_bounds() {
    let dir = tempfile::tempdir().unwrap();

    let mut relative = GeoTiffFile::colored(
        tmp_path(&dir, "relative.tiff"),
        small_grid(),
        grey_ramp(),
        Scaling::relative(),
        false,
        None,
    )
    .unwrap();
    let mut fixed = GeoTiffFile::colored(
        tmp_path(&dir, "fixed.tiff"),
        small_grid(),
        grey_ramp(),
        Scaling::fixed(2.0, 8.0).unwrap(),
        false,
        None,
    )
    .unwrap();

    for (col, value) in [2.0, 4.0, 8.0, 2.0].iter().enumerate() {
        relative.write((0, col), *value).unwrap();
        fixed.write((0, col), *value).unwrap();
    }

    let relative_bands = relative.finalize_bands();
    let fixed_bands = fixed.finalize_bands();
    for col in 0..4 {
        assert_eq!(relative_bands.pixel(0, col), fixed_bands.pixel(0, col));
    }
}

#[test]
fn test_loss_map_normalizes_against_observed_max() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer =
        GeoTiffFile::loss_map(tmp_path(&dir, "loss.tiff"), small_grid(), None).unwrap();
    assert_eq!(writer.scaling_mode(), ScalingMode::Relative);

    writer.write((0, 0), 0.5).unwrap();
    writer.write((0, 1), 1.0).unwrap();
    writer.write((0, 2), 2.0).unwrap();

    let bands = writer.finalize_bands();
    // the observed maximum normalizes to 1.0, the top of the ramp
    assert_eq!(bands.pixel(0, 2), (255, 0, 0, 255));
    // in-range ratios never fall out of the domain
    let (r, g, _, a) = bands.pixel(0, 0);
    assert_eq!(a, 255);
    assert!(r > 0 || g > 0);
}

#[test]
fn test_relative_writer_with_no_writes_closes_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = tmp_path(&dir, "empty.tiff");
    let mut writer = GeoTiffFile::plain(&path, small_grid(), None).unwrap();
    writer.close().unwrap();

    let decoded = decode_tiff(&std::fs::read(&path).unwrap());
    assert_eq!(decoded.pixel(0, 0).3, 0);
}

// ============================================================================
// init_value
// ============================================================================

#[test]
fn test_init_value_prefills_every_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = tmp_path(&dir, "init.tiff");
    let mut writer = GeoTiffFile::plain(&path, small_grid(), Some(1.0)).unwrap();
    writer.close().unwrap();

    let decoded = decode_tiff(&std::fs::read(&path).unwrap());
    let first = decoded.pixel(0, 0);
    assert_eq!(first.3, 255);
    for row in 0..6 {
        for col in 0..11 {
            assert_eq!(decoded.pixel(row, col), first);
        }
    }
}

// ============================================================================
// Hazard-map constructor validation
// ============================================================================

#[test]
fn test_hazard_map_rejects_bad_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let bad_pairs = [
        ("foo", "bar"),
        ("foo", "17"),
        ("17", "foo"),
        ("-1.0", "5.5"),
        ("-2", "-0.5"),
        ("2.13", "0.005"),
    ];

    for (min, max) in bad_pairs {
        let result = GeoTiffFile::hazard_map(
            tmp_path(&dir, "hazard.tiff"),
            small_grid(),
            builtin::seminf_haxby(),
            Some((min, max)),
        );
        assert!(result.is_err(), "bounds ({}, {}) should fail", min, max);
    }
}

#[test]
fn test_hazard_map_scaling_fixed() {
    let dir = tempfile::tempdir().unwrap();
    let writer = GeoTiffFile::hazard_map(
        tmp_path(&dir, "hazard.tiff"),
        small_grid(),
        builtin::seminf_haxby(),
        Some(("0.0", "4.8")),
    )
    .unwrap();
    assert_eq!(writer.scaling_mode(), ScalingMode::Fixed);
}

#[test]
fn test_hazard_map_scaling_relative() {
    let dir = tempfile::tempdir().unwrap();
    let writer = GeoTiffFile::hazard_map(
        tmp_path(&dir, "hazard.tiff"),
        small_grid(),
        builtin::seminf_haxby(),
        None,
    )
    .unwrap();
    assert_eq!(writer.scaling_mode(), ScalingMode::Relative);
}

// ============================================================================
// Ground-motion-field writers
// ============================================================================

#[test]
fn test_gmf_custom_iml_bins_discrete() {
    let dir = tempfile::tempdir().unwrap();
    let iml_list = [
        0.005, 0.007, 0.0098, 0.0137, 0.0192, 0.0269, 0.0376, 0.0527, 0.0738, 0.103, 0.145,
        0.203, 0.284, 0.397, 0.556, 0.778, 1.09, 1.52, 2.13,
    ];

    let mut writer = GeoTiffFile::ground_motion(
        tmp_path(&dir, "gmf.tiff"),
        small_grid(),
        builtin::seminf_haxby(),
        Some(&iml_list),
        true,
    )
    .unwrap();
    assert_eq!(writer.scaling_mode(), ScalingMode::Fixed);

    // below the lowest IML: background; inside: a bin color
    writer.write((0, 0), 0.001).unwrap();
    writer.write((0, 1), 0.1).unwrap();
    writer.close().unwrap();
}

#[test]
fn test_gmf_default_breakpoints_continuous() {
    let dir = tempfile::tempdir().unwrap();
    let writer = GeoTiffFile::ground_motion(
        tmp_path(&dir, "gmf.tiff"),
        small_grid(),
        builtin::seminf_haxby(),
        None,
        false,
    )
    .unwrap();
    assert_eq!(writer.scaling_mode(), ScalingMode::Fixed);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_write_out_of_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = GeoTiffFile::plain(tmp_path(&dir, "oob.tiff"), small_grid(), None).unwrap();
    assert!(writer.write((6, 0), 1.0).is_err());
    assert!(writer.write((0, 11), 1.0).is_err());
    assert!(writer.write((0, 10), 1.0).is_ok());
}

#[test]
fn test_write_after_close_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = GeoTiffFile::plain(tmp_path(&dir, "closed.tiff"), small_grid(), None).unwrap();
    writer.write((0, 0), 1.0).unwrap();
    writer.close().unwrap();
    assert!(writer.write((0, 1), 1.0).is_err());
}

#[test]
fn test_double_close_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = tmp_path(&dir, "double.tiff");
    let mut writer = GeoTiffFile::plain(&path, small_grid(), Some(2.0)).unwrap();
    writer.close().unwrap();
    let first = std::fs::read(&path).unwrap();

    writer.close().unwrap();
    let second = std::fs::read(&path).unwrap();
    assert_eq!(first, second);
}
