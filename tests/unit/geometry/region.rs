use super::*;
use crate::foundation::core::Vec2;

fn hd() -> Canvas {
    Canvas::new(1920, 1080).unwrap()
}

fn scenario_region() -> Region {
    Region {
        enabled: true,
        source_center: Point::new(0.5, 0.5),
        source_size: Vec2::new(0.25, 0.25),
        dest_center: Point::new(0.8, 0.2),
        dest_zoom: 0.3,
    }
}

#[test]
fn fully_faded_in_scenario() {
    let info = compute_region_info(&scenario_region(), 1.0, hd());
    assert_eq!(info.source, IRect::new(825, 405, 270, 270));
    assert_eq!(info.zoom, 0.3 * 10.0);
    assert_eq!(info.dest.width, 810);
    assert_eq!(info.dest.height, 810);
    assert_eq!(info.dest.x0, 1707);
    let expected_y0 = pixel_round((0.2 * 2.0 - 0.5) * 1080.0 - 405.0);
    assert_eq!(info.dest.y0, expected_y0);
}

#[test]
fn destination_centers_on_remapped_dest_center_when_faded_in() {
    let info = compute_region_info(&scenario_region(), 1.0, hd());
    let c = info.dest.center_point();
    assert!((c.x - (0.8 * 2.0 - 0.5) * 1920.0).abs() <= 1.0);
    assert!((c.y - (0.2 * 2.0 - 0.5) * 1080.0).abs() <= 1.0);
}

#[test]
fn destination_equals_source_when_faded_out() {
    for region in [
        scenario_region(),
        Region::default(),
        Region {
            source_center: Point::new(0.05, 0.93),
            source_size: Vec2::new(0.33, 0.071),
            dest_center: Point::new(0.9, 0.1),
            dest_zoom: 0.45,
            ..Region::default()
        },
    ] {
        for canvas in [hd(), Canvas::new(641, 359).unwrap()] {
            let info = compute_region_info(&region, 0.0, canvas);
            assert_eq!(info.zoom, 1.0);
            assert_eq!(info.dest, info.source);
        }
    }
}

#[test]
fn centers_are_remapped_around_the_middle() {
    let canvas = Canvas::new(1000, 1000).unwrap();
    let at = |c: f64| {
        let r = Region {
            source_center: Point::new(c, c),
            source_size: Vec2::new(0.0, 0.0),
            ..Region::default()
        };
        compute_region_info(&r, 0.0, canvas).source.center()
    };
    assert_eq!(at(0.5), (500, 500));
    assert_eq!(at(0.25), (0, 0));
    assert_eq!(at(0.75), (1000, 1000));
    // -500 + 0.5 truncates toward zero.
    assert_eq!(at(0.0), (-499, -499));
}

#[test]
fn size_scales_with_height_on_both_axes() {
    let info = compute_region_info(&Region::default(), 0.0, Canvas::new(4000, 100).unwrap());
    assert_eq!(info.source.width, 50);
    assert_eq!(info.source.height, 50);
}

#[test]
fn fade_clamps_outside_unit_range() {
    let r = scenario_region();
    assert_eq!(compute_region_info(&r, 7.0, hd()), compute_region_info(&r, 1.0, hd()));
    assert_eq!(compute_region_info(&r, -2.0, hd()), compute_region_info(&r, 0.0, hd()));
}

#[test]
fn degenerate_values_produce_empty_rectangles() {
    let r = Region {
        source_size: Vec2::new(-0.2, 0.0),
        dest_zoom: -1.0,
        ..scenario_region()
    };
    let info = compute_region_info(&r, 1.0, hd());
    assert!(info.source.is_empty());
    assert!(info.dest.is_empty());

    let r = Region {
        dest_zoom: f64::NAN,
        source_center: Point::new(f64::INFINITY, -50.0),
        ..scenario_region()
    };
    let info = compute_region_info(&r, 0.5, hd());
    assert_eq!(info.dest.width, 0);
    assert!(info.dest.is_empty());
}

#[test]
fn frame_geometry_covers_disabled_regions_too() {
    let mut params = EffectParameters::default();
    params.regions[1] = scenario_region();
    let all = compute_frame_geometry(&params, 1.0, hd());
    assert_eq!(all[1], compute_region_info(&scenario_region(), 1.0, hd()));
    assert_eq!(all[0], compute_region_info(&Region::default(), 1.0, hd()));
    assert_eq!(all[2], all[0]);
}

#[test]
fn irect_center_and_bounds() {
    let r = IRect::new(-10, 4, 7, 3);
    assert_eq!(r.center(), (-7, 5));
    assert_eq!(r.to_rect(), Rect::new(-10.0, 4.0, -3.0, 7.0));
    assert!(!r.is_empty());
    assert!(IRect::new(0, 0, 0, 5).is_empty());
    assert!(IRect::new(0, 0, 5, -1).is_empty());
}

#[test]
fn stroke_widths_fade_in_from_zero() {
    let params = EffectParameters::default();
    let zero = StrokeWidths::at(&params, 0.0, hd());
    assert_eq!(zero.pointer, 0.0);
    assert_eq!(zero.bubble_outline, 0.0);
    assert_eq!(zero.outline, 0.0);

    let full = StrokeWidths::at(&params, 1.0, hd());
    assert!((full.pointer - 6.0).abs() < 1e-9);
    assert!((full.bubble_outline - 3.0).abs() < 1e-9);
    assert!((full.outline - 3.0).abs() < 1e-9);
    assert!((full.bubble_radius() - 7.5).abs() < 1e-9);
}

#[test]
fn outline_saturates_at_a_third_of_the_fade() {
    let params = EffectParameters::default();
    let third = StrokeWidths::at(&params, 0.34, hd());
    assert!((third.outline - 3.0).abs() < 1e-9);
    assert!(third.pointer < 3.0);
    let sixth = StrokeWidths::at(&params, 1.0 / 6.0, hd());
    assert!((sixth.outline - 1.5).abs() < 1e-9);
}

#[test]
fn stroke_widths_follow_frame_height() {
    let params = EffectParameters::default();
    let w = StrokeWidths::at(&params, 1.0, Canvas::new(1280, 720).unwrap());
    assert!((w.pointer - 4.0).abs() < 1e-9);
}
