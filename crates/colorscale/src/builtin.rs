//! Built-in colormaps.
//!
//! `seminf_haxby` is the default map for ground-motion rasters; the others
//! cover loss-ratio and monochrome output.

use crate::colormap::{Colormap, MapKind, Rgb};

const SEMINF_HAXBY_RED: [u8; 24] = [
    255, 208, 186, 143, 97, 0, 25, 12, 24, 49, 67, 96, 105, 123, 138, 172, 205, 223, 240, 247,
    255, 255, 244, 238,
];

const SEMINF_HAXBY_GREEN: [u8; 24] = [
    255, 216, 197, 161, 122, 39, 101, 129, 175, 190, 202, 225, 235, 235, 236, 245, 255, 245, 236,
    215, 189, 160, 116, 79,
];

const SEMINF_HAXBY_BLUE: [u8; 24] = [
    255, 251, 247, 241, 236, 224, 240, 248, 255, 255, 255, 240, 225, 200, 174, 168, 162, 141, 120,
    103, 86, 68, 74, 77,
];

/// Discrete 24-bucket haxby variant, breakpoints 0.0 to 30.0.
pub fn seminf_haxby() -> Colormap {
    let colors = (0..24)
        .map(|i| {
            Rgb::new(
                SEMINF_HAXBY_RED[i],
                SEMINF_HAXBY_GREEN[i],
                SEMINF_HAXBY_BLUE[i],
            )
        })
        .collect();

    Colormap {
        id: Some("seminf-haxby.cpt,v 1.1 2004/02/25 18:15:50 jjg Exp".to_string()),
        name: "seminf-haxby".to_string(),
        kind: MapKind::Discrete,
        model: "RGB".to_string(),
        z_values: (0..25).map(|i| 1.25 * i as f64).collect(),
        colors,
        background: Rgb::new(255, 255, 255),
        foreground: Rgb::new(238, 79, 77),
        nan: Rgb::new(0, 0, 0),
    }
}

/// Continuous green-to-red ramp over [0, 1].
pub fn green_red() -> Colormap {
    Colormap {
        id: None,
        name: "green-red".to_string(),
        kind: MapKind::Continuous,
        model: "RGB".to_string(),
        z_values: vec![0.0, 0.5, 1.0],
        colors: vec![
            Rgb::new(0, 255, 0),
            Rgb::new(255, 255, 0),
            Rgb::new(255, 0, 0),
        ],
        background: Rgb::new(255, 255, 255),
        foreground: Rgb::new(128, 0, 0),
        nan: Rgb::new(0, 0, 0),
    }
}

/// Continuous black-to-white ramp over [0, 1], used by plain rasters.
pub fn monochrome() -> Colormap {
    Colormap {
        id: None,
        name: "monochrome".to_string(),
        kind: MapKind::Continuous,
        model: "RGB".to_string(),
        z_values: vec![0.0, 1.0],
        colors: vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)],
        background: Rgb::new(0, 0, 0),
        foreground: Rgb::new(255, 255, 255),
        nan: Rgb::new(0, 0, 0),
    }
}

/// Look up a built-in colormap by name.
pub fn by_name(name: &str) -> Option<Colormap> {
    match name {
        "seminf-haxby" => Some(seminf_haxby()),
        "green-red" => Some(green_red()),
        "monochrome" => Some(monochrome()),
        _ => None,
    }
}
