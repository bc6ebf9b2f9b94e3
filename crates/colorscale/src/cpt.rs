//! Parser for GMT-style CPT color-table files.
//!
//! Two data layouts are accepted: single `z r g b` node rows, and
//! `z1 r1 g1 b1 z2 r2 g2 b2` segment rows. Segment rows whose two colors are
//! identical describe a discrete map (one flat color per bucket); anything
//! else describes a continuous map of interpolation nodes.

use std::path::Path;

use risk_common::{RiskError, RiskResult};

use crate::colormap::{Colormap, MapKind, Rgb};

const DEFAULT_BACKGROUND: Rgb = Rgb::new(255, 255, 255);
const DEFAULT_FOREGROUND: Rgb = Rgb::new(0, 0, 0);
const DEFAULT_NAN: Rgb = Rgb::new(128, 128, 128);

/// Reader that loads a CPT file from disk.
pub struct CptReader {
    path: std::path::PathBuf,
}

impl CptReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse the file into a colormap. The map name is the file stem.
    pub fn get_colormap(&self) -> RiskResult<Colormap> {
        let content = std::fs::read_to_string(&self.path)?;
        let name = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "colormap".to_string());
        parse_cpt(&content, &name)
    }
}

/// One parsed segment row.
struct Segment {
    z1: f64,
    c1: Rgb,
    z2: f64,
    c2: Rgb,
}

/// Parse a CPT description into a colormap.
pub fn parse_cpt(content: &str, name: &str) -> RiskResult<Colormap> {
    let mut id = None;
    let mut model = "RGB".to_string();
    let mut background = DEFAULT_BACKGROUND;
    let mut foreground = DEFAULT_FOREGROUND;
    let mut nan = DEFAULT_NAN;
    let mut nodes: Vec<(f64, Rgb)> = Vec::new();
    let mut segments: Vec<Segment> = Vec::new();

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if let Some(value) = metadata_value(comment, "COLOR_MODEL") {
                model = value;
            } else if let Some(value) = id_value(comment) {
                id = Some(value);
            }
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields[0] {
            "B" => background = parse_special(&fields, line_no)?,
            "F" => foreground = parse_special(&fields, line_no)?,
            "N" => nan = parse_special(&fields, line_no)?,
            _ => match fields.len() {
                4 => {
                    let z = parse_number(fields[0], line_no)?;
                    let color = parse_rgb(&fields[1..4], line_no)?;
                    nodes.push((z, color));
                }
                8 => {
                    segments.push(Segment {
                        z1: parse_number(fields[0], line_no)?,
                        c1: parse_rgb(&fields[1..4], line_no)?,
                        z2: parse_number(fields[4], line_no)?,
                        c2: parse_rgb(&fields[5..8], line_no)?,
                    });
                }
                n => {
                    return Err(RiskError::Parse(format!(
                        "line {}: expected 4 or 8 columns, got {}",
                        line_no + 1,
                        n
                    )));
                }
            },
        }
    }

    if !nodes.is_empty() && !segments.is_empty() {
        return Err(RiskError::Parse(
            "color table mixes node and segment rows".to_string(),
        ));
    }

    let map = if !segments.is_empty() {
        from_segments(segments, name, id, model, background, foreground, nan)?
    } else if !nodes.is_empty() {
        from_nodes(nodes, name, id, model, background, foreground, nan)?
    } else {
        return Err(RiskError::Parse("color table has no data rows".to_string()));
    };

    map.validate()?;
    Ok(map)
}

fn from_nodes(
    nodes: Vec<(f64, Rgb)>,
    name: &str,
    id: Option<String>,
    model: String,
    background: Rgb,
    foreground: Rgb,
    nan: Rgb,
) -> RiskResult<Colormap> {
    check_monotonic(nodes.iter().map(|&(z, _)| z))?;

    let (z_values, colors) = nodes.into_iter().unzip();
    Ok(Colormap {
        id,
        name: name.to_string(),
        kind: MapKind::Continuous,
        model,
        z_values,
        colors,
        background,
        foreground,
        nan,
    })
}

fn from_segments(
    segments: Vec<Segment>,
    name: &str,
    id: Option<String>,
    model: String,
    background: Rgb,
    foreground: Rgb,
    nan: Rgb,
) -> RiskResult<Colormap> {
    for pair in segments.windows(2) {
        if (pair[1].z1 - pair[0].z2).abs() > 1e-9 {
            return Err(RiskError::Parse(format!(
                "segments are not contiguous at z={}",
                pair[0].z2
            )));
        }
    }
    check_monotonic(
        segments
            .iter()
            .flat_map(|segment| [segment.z1, segment.z2]),
    )?;

    let discrete = segments.iter().all(|segment| segment.c1 == segment.c2);

    let mut z_values = Vec::with_capacity(segments.len() + 1);
    z_values.push(segments[0].z1);
    z_values.extend(segments.iter().map(|segment| segment.z2));

    let (kind, colors) = if discrete {
        (
            MapKind::Discrete,
            segments.iter().map(|segment| segment.c1).collect(),
        )
    } else {
        // interpolation nodes: first segment start, then each segment end
        let mut colors = Vec::with_capacity(segments.len() + 1);
        colors.push(segments[0].c1);
        colors.extend(segments.iter().map(|segment| segment.c2));
        (MapKind::Continuous, colors)
    };

    Ok(Colormap {
        id,
        name: name.to_string(),
        kind,
        model,
        z_values,
        colors,
        background,
        foreground,
        nan,
    })
}

fn check_monotonic(z_values: impl Iterator<Item = f64>) -> RiskResult<()> {
    let mut previous = f64::NEG_INFINITY;
    for z in z_values {
        if z < previous {
            return Err(RiskError::Parse(format!(
                "z values decrease at {} (after {})",
                z, previous
            )));
        }
        previous = z;
    }
    Ok(())
}

/// Extract `VALUE` from a comment like `COLOR_MODEL = VALUE`.
fn metadata_value(comment: &str, key: &str) -> Option<String> {
    let rest = comment.trim().strip_prefix(key)?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=')?;
    Some(rest.trim().to_string())
}

/// Extract the id from a `$Id: ... $` comment.
fn id_value(comment: &str) -> Option<String> {
    let start = comment.find("$Id:")? + "$Id:".len();
    let rest = &comment[start..];
    let end = rest.find('$').unwrap_or(rest.len());
    let id = rest[..end].trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn parse_special(fields: &[&str], line_no: usize) -> RiskResult<Rgb> {
    if fields.len() != 4 {
        return Err(RiskError::Parse(format!(
            "line {}: {} row needs 3 color components",
            line_no + 1,
            fields[0]
        )));
    }
    parse_rgb(&fields[1..4], line_no)
}

fn parse_rgb(fields: &[&str], line_no: usize) -> RiskResult<Rgb> {
    let mut channels = [0u8; 3];
    for (slot, field) in channels.iter_mut().zip(fields) {
        let value = parse_number(field, line_no)?;
        if !(0.0..=255.0).contains(&value) {
            return Err(RiskError::Parse(format!(
                "line {}: color component {} out of range",
                line_no + 1,
                field
            )));
        }
        *slot = value.round() as u8;
    }
    Ok(Rgb::new(channels[0], channels[1], channels[2]))
}

fn parse_number(field: &str, line_no: usize) -> RiskResult<f64> {
    field.parse::<f64>().map_err(|_| {
        RiskError::Parse(format!(
            "line {}: '{}' is not a number",
            line_no + 1,
            field
        ))
    })
}
