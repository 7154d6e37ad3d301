use super::*;
use crate::foundation::core::Vec2;
use crate::params::model::Region;
use crate::pixels::frame::FrameBuffer;

fn canvas() -> Canvas {
    Canvas::new(64, 48).unwrap()
}

fn gradient(c: Canvas) -> FrameBuffer {
    FrameBuffer::from_fn(c, |x, y| 0xff00_0000 | ((x * 4) << 16) | ((y * 5) << 8) | 0x40)
}

fn region() -> Region {
    Region {
        enabled: true,
        source_center: Point::new(0.4, 0.45),
        source_size: Vec2::new(0.25, 0.25),
        dest_center: Point::new(0.6, 0.55),
        dest_zoom: 0.2,
    }
}

fn info_at(fade: f64, r: &Region) -> (RegionInfo, StrokeWidths) {
    let params = EffectParameters::default();
    (
        crate::geometry::region::compute_region_info(r, fade, canvas()),
        StrokeWidths::at(&params, fade, canvas()),
    )
}

#[test]
fn faded_out_lens_is_only_the_image() {
    let (info, widths) = info_at(0.0, &region());
    let mut ops = Vec::new();
    lens_ops(&info, &widths, canvas().bounds(), &mut ops);
    assert_eq!(ops.len(), 1);
    let LayerOp::Image { transform, rect } = &ops[0] else {
        panic!("expected image op, got {:?}", ops[0]);
    };
    assert_eq!(*transform * Point::new(3.0, 4.0), Point::new(3.0, 4.0));
    assert_eq!(*rect, info.source.to_rect().intersect(canvas().bounds()));
}

#[test]
fn faded_in_lens_paints_all_elements_in_order() {
    let (info, widths) = info_at(1.0, &region());
    let mut ops = Vec::new();
    lens_ops(&info, &widths, canvas().bounds(), &mut ops);
    assert_eq!(ops.len(), 5);
    assert!(matches!(ops[0], LayerOp::Stroke { color: BLACK, .. }));
    assert!(matches!(ops[1], LayerOp::Fill { color: BLACK, .. }));
    assert!(matches!(ops[2], LayerOp::Stroke { color: WHITE, .. }));
    assert!(matches!(ops[3], LayerOp::Image { .. }));
    assert!(matches!(ops[4], LayerOp::Stroke { color: WHITE, .. }));
}

#[test]
fn image_transform_maps_source_onto_destination() {
    let (info, widths) = info_at(1.0, &region());
    let mut ops = Vec::new();
    lens_ops(&info, &widths, canvas().bounds(), &mut ops);
    let LayerOp::Image { transform, .. } = &ops[3] else {
        panic!("expected image op");
    };
    let src = info.source;
    let dst = info.dest;
    let mapped = *transform * Point::new(f64::from(src.x0), f64::from(src.y0));
    assert!((mapped.x - f64::from(dst.x0)).abs() < 1e-9);
    assert!((mapped.y - f64::from(dst.y0)).abs() < 1e-9);
    assert_eq!(info.zoom, 2.0);
}

#[test]
fn image_samples_only_existing_source_pixels() {
    let r = Region {
        source_center: Point::new(0.25, 0.25),
        ..region()
    };
    let (info, widths) = info_at(1.0, &r);
    assert!(info.source.x0 < 0 && info.source.y0 < 0);
    let mut ops = Vec::new();
    lens_ops(&info, &widths, canvas().bounds(), &mut ops);
    let rect = ops
        .iter()
        .find_map(|op| match op {
            LayerOp::Image { rect, .. } => Some(*rect),
            _ => None,
        })
        .unwrap();
    assert_eq!(rect.x0, 0.0);
    assert_eq!(rect.y0, 0.0);
}

#[test]
fn degenerate_destination_keeps_only_the_pointer() {
    let r = Region {
        dest_zoom: -0.5,
        ..region()
    };
    let (info, widths) = info_at(1.0, &r);
    assert!(info.dest.is_empty());
    let mut ops = Vec::new();
    lens_ops(&info, &widths, canvas().bounds(), &mut ops);
    assert_eq!(ops.len(), 3);
    assert!(!ops.iter().any(|op| matches!(op, LayerOp::Image { .. })));
}

#[test]
fn non_finite_widths_draw_nothing() {
    let (info, _) = info_at(1.0, &region());
    let widths = StrokeWidths {
        pointer: f64::NAN,
        bubble_outline: f64::INFINITY,
        outline: -2.0,
    };
    let mut ops = Vec::new();
    lens_ops(&info, &widths, canvas().bounds(), &mut ops);
    assert_eq!(ops.len(), 1);
    assert!(matches!(ops[0], LayerOp::Image { .. }));
}

#[test]
fn wireframe_is_outline_plus_cross() {
    let rect = IRect::new(10, 20, 30, 40);
    let [frame, cross] = wireframe_ops(&rect, WIREFRAME_SOURCE);
    let LayerOp::Stroke { path, width, color } = frame else {
        panic!("expected stroke");
    };
    assert_eq!(width, 3.0);
    assert_eq!(color, WIREFRAME_SOURCE);
    assert_eq!(
        kurbo::Shape::bounding_box(&path),
        Rect::new(8.5, 18.5, 41.5, 61.5)
    );
    let LayerOp::Stroke { path, .. } = cross else {
        panic!("expected stroke");
    };
    assert_eq!(
        kurbo::Shape::bounding_box(&path),
        Rect::new(15.0, 30.0, 35.0, 50.0)
    );
}

#[test]
fn plan_reports_fade_and_geometry() {
    let mut params = EffectParameters::default();
    params.regions[0] = region();
    let plan = FramePlan::new(&params, 0.5, canvas());
    assert!((plan.fade - 0.5).abs() < 1e-12);
    assert_eq!(
        plan.regions[0],
        crate::geometry::region::compute_region_info(&region(), plan.fade, canvas())
    );
    let late = FramePlan::new(&params, 50.0, canvas());
    assert_eq!(late.fade, 0.0);
}

#[test]
fn mismatched_buffers_are_rejected_before_writing() {
    let c = canvas();
    let primary = gradient(c);
    let secondary = FrameBuffer::new(Canvas::new(10, 10).unwrap());
    let mut out = FrameBuffer::from_fn(c, |_, _| 7);
    let compositor = FrameCompositor::new(c);
    let err = compositor
        .render(
            0.5,
            &EffectParameters::default(),
            &mut out.view_mut(),
            &secondary.view(),
            &primary.view(),
        )
        .unwrap_err();
    assert!(matches!(err, LoupeError::Validation(_)));
    assert!(out.data().iter().all(|&p| p == 7));
}

#[test]
fn secondary_input_is_never_read() {
    let c = canvas();
    let primary = gradient(c);
    let mut params = EffectParameters::default();
    params.regions[0] = region();
    let compositor = FrameCompositor::new(c);

    let mut a = FrameBuffer::new(c);
    let mut b = FrameBuffer::new(c);
    let zeros = FrameBuffer::new(c);
    let noise = FrameBuffer::from_fn(c, |x, y| x.wrapping_mul(2_654_435_761) ^ y);
    compositor
        .render(0.7, &params, &mut a.view_mut(), &zeros.view(), &primary.view())
        .unwrap();
    compositor
        .render(0.7, &params, &mut b.view_mut(), &noise.view(), &primary.view())
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn nothing_enabled_is_a_plain_copy() {
    let c = canvas();
    let primary = gradient(c);
    let mut out = FrameBuffer::from_fn(c, |_, _| 0x1234_5678);
    let plan = FrameCompositor::new(c)
        .render(
            0.6,
            &EffectParameters::default(),
            &mut out.view_mut(),
            &primary.view(),
            &primary.view(),
        )
        .unwrap();
    assert!(plan.fade > 0.0);
    assert_eq!(out, primary);
}

#[test]
fn empty_canvas_is_rejected_instead_of_rasterised() {
    let empty = Canvas {
        width: 0,
        height: 0,
    };
    let mut params = EffectParameters::default();
    params.regions[0] = region();
    let frame = FrameBuffer::new(empty);
    let mut out = FrameBuffer::new(empty);
    let err = FrameCompositor::new(empty)
        .render(5.0, &params, &mut out.view_mut(), &frame.view(), &frame.view())
        .unwrap_err();
    assert!(matches!(err, LoupeError::Validation(_)));
}

fn frame() -> Rect {
    canvas().bounds()
}

#[test]
fn bubble_larger_than_the_frame_becomes_a_frame_fill() {
    let center = Point::new(10.0, 10.0);
    let op = bubble_fill_op(center, 1.0e20, frame()).unwrap();
    let LayerOp::Fill { color, .. } = &op else {
        panic!("expected fill, got {op:?}");
    };
    assert_eq!(*color, BLACK);
    let b = op.bounds();
    assert!(b.contains(Point::new(0.0, 0.0)) && b.contains(Point::new(64.0, 48.0)));
    assert!(b.width() < 80.0 && b.height() < 60.0);
}

#[test]
fn bubble_outside_the_frame_is_dropped() {
    assert!(bubble_fill_op(Point::new(-100.0, -100.0), 50.0, frame()).is_none());
    assert!(bubble_ring_op(Point::new(-100.0, -100.0), 50.0, 10.0, frame()).is_none());
}

#[test]
fn ring_covering_every_frame_pixel_becomes_a_frame_fill() {
    let center = Point::new(10.0, 10.0);
    let op = bubble_ring_op(center, 5.0e19, 1.0e20, frame()).unwrap();
    assert!(matches!(op, LayerOp::Fill { color: WHITE, .. }));
}

#[test]
fn ring_with_the_frame_inside_its_hole_is_dropped() {
    assert!(bubble_ring_op(Point::new(10.0, 10.0), 500.0, 10.0, frame()).is_none());
}

#[test]
fn wide_ring_is_trimmed_to_just_past_the_far_corner() {
    // Inner edge at 10, outer edge at 10000; the far corner (64, 48) is ~66 away.
    let center = Point::new(10.0, 10.0);
    let op = bubble_ring_op(center, 5005.0, 9990.0, frame()).unwrap();
    let LayerOp::Stroke { width, .. } = &op else {
        panic!("expected stroke, got {op:?}");
    };
    let far = Point::new(64.0, 48.0).distance(center);
    assert!((*width - (far + 1.0 - 10.0)).abs() < 1e-9);
    assert!(op.bounds().width() < 300.0);
}

#[test]
fn pointer_width_is_capped_by_the_frame() {
    let (from, to) = (Point::new(10.0, 10.0), Point::new(50.0, 10.0));
    let op = pointer_op(from, to, 1.0e20, frame()).unwrap();
    let LayerOp::Stroke { width, .. } = op else {
        panic!("expected stroke");
    };
    // Farthest corner is 38 rows below the line.
    assert_eq!(width, 78.0);

    let thin = pointer_op(from, to, 2.0, frame()).unwrap();
    let LayerOp::Stroke { width, .. } = thin else {
        panic!("expected stroke");
    };
    assert_eq!(width, 2.0);
}

#[test]
fn pointer_away_from_the_frame_is_dropped() {
    let from = Point::new(-1000.0, -1000.0);
    assert!(pointer_op(from, Point::new(-900.0, -1000.0), 4.0, frame()).is_none());
}

#[test]
fn huge_pointer_widths_build_frame_sized_ops() {
    let (info, _) = info_at(1.0, &region());
    let widths = StrokeWidths {
        pointer: 1.0e20,
        bubble_outline: 1.0e20,
        outline: 1.0,
    };
    let mut ops = Vec::new();
    lens_ops(&info, &widths, frame(), &mut ops);
    for op in &ops {
        let b = op.bounds();
        assert!(b.width() < 1_000.0 && b.height() < 1_000.0, "{op:?}");
    }
}
