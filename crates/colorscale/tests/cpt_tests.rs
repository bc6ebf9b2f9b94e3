//! Tests for the CPT color-table parser.

use colorscale::builtin;
use colorscale::{parse_cpt, Colormap, MapKind, Rgb};

/// Full seminf-haxby table: 24 flat-color segments plus B/F/N rows.
const SEMINF_HAXBY_CPT: &str = "\
# $Id: seminf-haxby.cpt,v 1.1 2004/02/25 18:15:50 jjg Exp $
#
# Mimics the seminf-haxby.gpf archive in GMT
#
# COLOR_MODEL = RGB
0.00\t255\t255\t255\t1.25\t255\t255\t255
1.25\t208\t216\t251\t2.50\t208\t216\t251
2.50\t186\t197\t247\t3.75\t186\t197\t247
3.75\t143\t161\t241\t5.00\t143\t161\t241
5.00\t97\t122\t236\t6.25\t97\t122\t236
6.25\t0\t39\t224\t7.50\t0\t39\t224
7.50\t25\t101\t240\t8.75\t25\t101\t240
8.75\t12\t129\t248\t10.00\t12\t129\t248
10.00\t24\t175\t255\t11.25\t24\t175\t255
11.25\t49\t190\t255\t12.50\t49\t190\t255
12.50\t67\t202\t255\t13.75\t67\t202\t255
13.75\t96\t225\t240\t15.00\t96\t225\t240
15.00\t105\t235\t225\t16.25\t105\t235\t225
16.25\t123\t235\t200\t17.50\t123\t235\t200
17.50\t138\t236\t174\t18.75\t138\t236\t174
18.75\t172\t245\t168\t20.00\t172\t245\t168
20.00\t205\t255\t162\t21.25\t205\t255\t162
21.25\t223\t245\t141\t22.50\t223\t245\t141
22.50\t240\t236\t120\t23.75\t240\t236\t120
23.75\t247\t215\t103\t25.00\t247\t215\t103
25.00\t255\t189\t86\t26.25\t255\t189\t86
26.25\t255\t160\t68\t27.50\t255\t160\t68
27.50\t244\t116\t74\t28.75\t244\t116\t74
28.75\t238\t79\t77\t30.00\t238\t79\t77
B\t255\t255\t255
F\t238\t79\t77
N\t0\t0\t0
";

// ============================================================================
// Well-formed input
// ============================================================================

#[test]
fn test_parse_discrete_seminf_haxby() {
    let map = parse_cpt(SEMINF_HAXBY_CPT, "seminf-haxby").unwrap();
    assert_eq!(map, builtin::seminf_haxby());
}

#[test]
fn test_parse_metadata() {
    let map = parse_cpt(SEMINF_HAXBY_CPT, "seminf-haxby").unwrap();
    assert_eq!(
        map.id.as_deref(),
        Some("seminf-haxby.cpt,v 1.1 2004/02/25 18:15:50 jjg Exp")
    );
    assert_eq!(map.model, "RGB");
    assert_eq!(map.background, Rgb::new(255, 255, 255));
    assert_eq!(map.foreground, Rgb::new(238, 79, 77));
    assert_eq!(map.nan, Rgb::new(0, 0, 0));
}

#[test]
fn test_parse_continuous_segments() {
    // segment endpoints differ, so these are interpolation nodes
    let cpt = "\
# COLOR_MODEL = RGB
0.0 0 255 0 0.5 255 255 0
0.5 255 255 0 1.0 255 0 0
";
    let map = parse_cpt(cpt, "ramp").unwrap();
    assert_eq!(map.kind, MapKind::Continuous);
    assert_eq!(map.z_values, vec![0.0, 0.5, 1.0]);
    assert_eq!(
        map.colors,
        vec![
            Rgb::new(0, 255, 0),
            Rgb::new(255, 255, 0),
            Rgb::new(255, 0, 0)
        ]
    );
}

#[test]
fn test_parse_node_rows() {
    let cpt = "\
0 0 0 0
10 255 255 255
";
    let map = parse_cpt(cpt, "grey").unwrap();
    assert_eq!(map.kind, MapKind::Continuous);
    assert_eq!(map.z_values, vec![0.0, 10.0]);
    assert_eq!(map.colors.len(), 2);
}

#[test]
fn test_parse_ignores_blank_and_comment_lines() {
    let cpt = "\

# leading comment

0 0 0 0

10 255 255 255
# trailing comment
";
    let map = parse_cpt(cpt, "grey").unwrap();
    assert_eq!(map.z_values.len(), 2);
}

#[test]
fn test_parse_non_rgb_model_is_metadata_only() {
    let cpt = "\
# COLOR_MODEL = HSV
0 0 1 1
10 120 1 1
";
    let map: Colormap = parse_cpt(cpt, "hsv-map").unwrap();
    assert_eq!(map.model, "HSV");
    assert!(!map.is_rgb());
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_parse_rejects_decreasing_z() {
    let cpt = "\
10 0 0 0
0 255 255 255
";
    assert!(parse_cpt(cpt, "bad").is_err());
}

#[test]
fn test_parse_rejects_wrong_column_count() {
    assert!(parse_cpt("0 0 0\n", "bad").is_err());
    assert!(parse_cpt("0 0 0 0 0\n", "bad").is_err());
}

#[test]
fn test_parse_rejects_malformed_special_rows() {
    assert!(parse_cpt("0 0 0 0\n10 1 1 1\nB 255 255\n", "bad").is_err());
    assert!(parse_cpt("0 0 0 0\n10 1 1 1\nN a b c\n", "bad").is_err());
}

#[test]
fn test_parse_rejects_empty_table() {
    assert!(parse_cpt("# only comments\n", "bad").is_err());
}

#[test]
fn test_parse_rejects_mixed_row_layouts() {
    let cpt = "\
0 0 0 0
1 10 10 10 2 20 20 20
";
    assert!(parse_cpt(cpt, "bad").is_err());
}

#[test]
fn test_parse_rejects_discontiguous_segments() {
    let cpt = "\
0 1 1 1 1 1 1 1
5 2 2 2 6 2 2 2
";
    assert!(parse_cpt(cpt, "bad").is_err());
}

#[test]
fn test_parse_rejects_out_of_range_channel() {
    assert!(parse_cpt("0 0 0 300\n1 1 1 1\n", "bad").is_err());
}
