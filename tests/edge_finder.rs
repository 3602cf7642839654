mod common;

use common::synthetic_image::{crop_u8, resize_nearest_u8, PlateScene};
use plate_edges::geometry::{Canonical, Crop, Full, LineSegment, Point, Quad, Rect};
use plate_edges::image::ImageU8;
use plate_edges::text_lines::TextLine;
use plate_edges::transform::Transformation;
use plate_edges::{
    CornerRefinement, CornerRefiner, EdgeFinder, EdgeFinderError, EdgeScanParams, EstimateBranch,
    GeometryError, PipelineContext, PlateConfig,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

fn assert_quad_near<S: plate_edges::geometry::Space>(q: &Quad<S>, expected: [(f32, f32); 4], tol: f32) {
    for (p, (x, y)) in q.corners.iter().zip(expected) {
        assert!(
            approx_eq(p.x, x, tol) && approx_eq(p.y, y, tol),
            "corner {p:?} expected ({x}, {y}) within {tol}; quad {q:?}"
        );
    }
}

fn band(x0: f32, y0: f32, x1: f32, y1: f32) -> TextLine<Crop> {
    let poly = [
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ];
    TextLine::new(poly, poly)
}

fn view(data: &[u8], w: usize, h: usize) -> ImageU8<'_> {
    ImageU8 {
        w,
        h,
        stride: w,
        data,
    }
}

/// Returns the whole canonical crop with a fixed confidence.
struct WholeCrop {
    confidence: f32,
}

impl CornerRefiner for WholeCrop {
    fn refine(
        &self,
        crop: ImageU8<'_>,
        _lines: &[TextLine<Canonical>],
        _config: &PlateConfig,
    ) -> CornerRefinement {
        CornerRefinement {
            corners: Quad::from_bounds(0.0, 0.0, crop.w as f32, crop.h as f32),
            confidence: self.confidence,
        }
    }
}

fn calibration() -> PlateConfig {
    PlateConfig {
        plate_width_mm: 300.0,
        plate_height_mm: 150.0,
        char_height_mm: 25.0,
        template_width_px: 400,
        template_height_px: 200,
    }
}

#[test]
fn text_geometry_offsets_follow_calibration() {
    init_logger();
    let buf = vec![128u8; 300 * 200];
    let image = view(&buf, 300, 200);
    // Char height 20, segment length 200, centered at (150, 100).
    let lines = [band(50.0, 90.0, 250.0, 110.0)];
    let config = calibration();
    let ctx = PipelineContext {
        image,
        crop: image,
        region: Rect::new(0, 0, 300, 200),
        text_lines: &lines,
        config: &config,
    };
    let report = EdgeFinder::with_refiner(WholeCrop { confidence: 1.0 })
        .find_edge_corners_detailed(&ctx)
        .unwrap();

    assert_eq!(report.branch, EstimateBranch::TextGeometry);
    let sizing = report.sizing.unwrap();
    assert!(approx_eq(sizing.ideal_pixel_width, 247.2, 1e-3));
    assert!(approx_eq(sizing.ideal_pixel_height, 120.0, 1e-3));
    assert!(approx_eq(sizing.vertical_offset, 90.0, 1e-3));
    assert!(approx_eq(sizing.horizontal_offset, 154.5, 1e-3));

    assert!(report.initial_estimate.is_convex());
    assert_quad_near(
        &report.initial_estimate,
        [(-4.5, 10.0), (304.5, 10.0), (304.5, 190.0), (-4.5, 190.0)],
        1e-2,
    );
    let c = report.initial_estimate.center();
    assert!(approx_eq(c.x, 150.0, 1e-3) && approx_eq(c.y, 100.0, 1e-3));
}

#[test]
fn stacked_lines_use_outermost_char_edges() {
    init_logger();
    let buf = vec![128u8; 300 * 200];
    let image = view(&buf, 300, 200);
    // Four 200x20 lines; outermost edges at y = 0 and y = 180.
    let lines = [
        band(50.0, 0.0, 250.0, 20.0),
        band(50.0, 40.0, 250.0, 60.0),
        band(50.0, 100.0, 250.0, 120.0),
        band(50.0, 160.0, 250.0, 180.0),
    ];
    let config = calibration();
    let ctx = PipelineContext {
        image,
        crop: image,
        region: Rect::new(0, 0, 300, 200),
        text_lines: &lines,
        config: &config,
    };
    let report = EdgeFinder::with_refiner(WholeCrop { confidence: 1.0 })
        .find_edge_corners_detailed(&ctx)
        .unwrap();

    assert_eq!(report.branch, EstimateBranch::TextGeometry);
    let sizing = report.sizing.unwrap();
    assert!(approx_eq(sizing.ideal_pixel_width, 247.2, 1e-3));
    assert!(approx_eq(sizing.ideal_pixel_height, 120.0, 1e-3));
    assert!(approx_eq(sizing.vertical_offset, 90.0, 1e-3));
    assert!(approx_eq(sizing.horizontal_offset, 154.5, 1e-3));
    assert_quad_near(
        &report.initial_estimate,
        [(-4.5, 0.0), (304.5, 0.0), (304.5, 180.0), (-4.5, 180.0)],
        1e-2,
    );
}

#[test]
fn lines_on_one_baseline_do_not_join() {
    init_logger();
    let buf = vec![128u8; 300 * 200];
    let image = view(&buf, 300, 200);
    // Four 50x20 lines end to end: the aggregate only sees one 50 px edge.
    let lines = [
        band(20.0, 90.0, 70.0, 110.0),
        band(90.0, 90.0, 140.0, 110.0),
        band(160.0, 90.0, 210.0, 110.0),
        band(230.0, 90.0, 280.0, 110.0),
    ];
    let config = calibration();
    let ctx = PipelineContext {
        image,
        crop: image,
        region: Rect::new(0, 0, 300, 200),
        text_lines: &lines,
        config: &config,
    };
    let report = EdgeFinder::with_refiner(WholeCrop { confidence: 1.0 })
        .find_edge_corners_detailed(&ctx)
        .unwrap();

    assert_eq!(report.branch, EstimateBranch::CropExpansion);
    assert!(report.sizing.is_none());
    assert_quad_near(
        &report.initial_estimate,
        [(-45.0, -30.0), (345.0, -30.0), (345.0, 230.0), (-45.0, 230.0)],
        1e-3,
    );
}

#[test]
fn report_serializes_camel_case() {
    init_logger();
    let buf = vec![128u8; 300 * 200];
    let image = view(&buf, 300, 200);
    let lines = [band(50.0, 90.0, 250.0, 110.0)];
    let config = calibration();
    let ctx = PipelineContext {
        image,
        crop: image,
        region: Rect::new(0, 0, 300, 200),
        text_lines: &lines,
        config: &config,
    };
    let report = EdgeFinder::with_refiner(WholeCrop { confidence: 1.0 })
        .find_edge_corners_detailed(&ctx)
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["branch"], "textGeometry");
    assert_eq!(json["textAngleDeg"], 0.0);
    assert_eq!(
        json["canonicalSize"]["width"],
        report.canonical_size.width as u64
    );
    assert!(json["sizing"]["idealPixelWidth"].is_number());
    assert!(json["sizing"]["verticalOffset"].is_number());
    assert!(json["initialEstimate"].is_object());
    assert!(json["timings"]["totalMs"].is_number());
    assert!(json.get("canonicalImage").is_none());
    assert!(json.get("text_angle_deg").is_none());
}

#[test]
fn short_text_expands_crop() {
    init_logger();
    let buf = vec![0u8; 100 * 50];
    let image = view(&buf, 100, 50);
    let lines = [band(10.0, 10.0, 60.0, 30.0)];
    let config = PlateConfig::default();
    let ctx = PipelineContext {
        image,
        crop: image,
        region: Rect::new(0, 0, 100, 50),
        text_lines: &lines,
        config: &config,
    };
    let report = EdgeFinder::with_refiner(WholeCrop { confidence: 0.0 })
        .find_edge_corners_detailed(&ctx)
        .unwrap();
    assert_eq!(report.branch, EstimateBranch::CropExpansion);
    assert!(report.sizing.is_none());
    assert_quad_near(
        &report.initial_estimate,
        [(-15.0, -7.5), (115.0, -7.5), (115.0, 57.5), (-15.0, 57.5)],
        1e-4,
    );
}

#[test]
fn crop_full_round_trip_with_resized_crop() {
    let full_buf = vec![0u8; 640 * 480];
    let crop_buf = vec![0u8; 100 * 50];
    let full = view(&full_buf, 640, 480);
    let crop = view(&crop_buf, 100, 50);
    let t = Transformation::new(full, &crop, Rect::new(40, 30, 200, 100)).unwrap();
    let samples: [Point<Crop>; 4] = [
        Point::new(0.0, 0.0),
        Point::new(-15.0, 57.5),
        Point::new(33.3, 12.7),
        Point::new(100.0, 50.0),
    ];
    for p in samples {
        let f = t.crop_to_full(p);
        let back = t.full_to_crop(f);
        assert!(approx_eq(back.x, p.x, 1e-3) && approx_eq(back.y, p.y, 1e-3));
    }
    let corner: Point<Full> = t.crop_to_full(Point::new(100.0, 50.0));
    assert!(approx_eq(corner.x, 240.0, 1e-4) && approx_eq(corner.y, 130.0, 1e-4));
}

#[test]
fn canonical_rectangle_maps_back_onto_estimate() {
    init_logger();
    let full_buf = vec![90u8; 400 * 300];
    let crop_buf = vec![90u8; 120 * 60];
    let lines = [TextLine::new(
        [
            Point::new(20.0, 22.0),
            Point::new(100.0, 26.0),
            Point::new(99.0, 40.0),
            Point::new(19.0, 36.0),
        ],
        [
            Point::new(18.0, 21.0),
            Point::new(102.0, 25.0),
            Point::new(101.0, 41.0),
            Point::new(17.0, 37.0),
        ],
    )];
    let config = PlateConfig::default();
    let ctx = PipelineContext {
        image: view(&full_buf, 400, 300),
        crop: view(&crop_buf, 120, 60),
        region: Rect::new(130, 110, 180, 90),
        text_lines: &lines,
        config: &config,
    };
    let report = EdgeFinder::with_refiner(WholeCrop { confidence: 0.3 })
        .find_edge_corners_detailed(&ctx)
        .unwrap();

    let expected = report.mapped_estimate.corners.map(|p| (p.x, p.y));
    assert_quad_near(&report.corners, expected, 1e-2);
    let again = report
        .inverse_matrix
        .apply_quad(&report.canonical_size.corners())
        .unwrap();
    assert_quad_near(&again, expected, 1e-2);
    assert!(report.canonical_size.width <= 120 && report.canonical_size.height <= 60);
}

#[test]
fn refiner_confidence_is_passed_through() {
    init_logger();
    let buf = vec![50u8; 200 * 100];
    let image = view(&buf, 200, 100);
    let lines = [band(30.0, 40.0, 170.0, 60.0)];
    let config = PlateConfig::default();
    let ctx = PipelineContext {
        image,
        crop: image,
        region: Rect::new(0, 0, 200, 100),
        text_lines: &lines,
        config: &config,
    };
    let found = EdgeFinder::with_refiner(WholeCrop { confidence: 0.4242 })
        .find_edge_corners(&ctx)
        .unwrap();
    assert_eq!(found.confidence, 0.4242);
}

#[test]
fn zero_text_lines_is_insufficient_input() {
    let buf = vec![0u8; 64 * 32];
    let image = view(&buf, 64, 32);
    let config = PlateConfig::default();
    let ctx = PipelineContext {
        image,
        crop: image,
        region: Rect::new(0, 0, 64, 32),
        text_lines: &[],
        config: &config,
    };
    let err = EdgeFinder::new(EdgeScanParams::default())
        .find_edge_corners(&ctx)
        .unwrap_err();
    assert!(matches!(err, EdgeFinderError::InsufficientInput(_)), "{err}");
}

#[test]
fn zero_sized_crop_is_invalid_region() {
    let buf = vec![0u8; 64 * 32];
    let lines = [band(5.0, 5.0, 60.0, 20.0)];
    let config = PlateConfig::default();
    let ctx = PipelineContext {
        image: view(&buf, 64, 32),
        crop: view(&[], 0, 0),
        region: Rect::new(0, 0, 64, 32),
        text_lines: &lines,
        config: &config,
    };
    let err = EdgeFinder::new(EdgeScanParams::default())
        .find_edge_corners(&ctx)
        .unwrap_err();
    assert_eq!(err, EdgeFinderError::InvalidRegion { width: 0, height: 0 });
}

#[test]
fn parallel_lines_surface_geometry_error() {
    let a: LineSegment<Crop> = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
    let b: LineSegment<Crop> = LineSegment::from_coords(0.0, 5.0, 10.0, 5.0);
    assert_eq!(a.intersection(&b), Err(GeometryError::ParallelLines));
    let err: EdgeFinderError = a.intersection(&b).unwrap_err().into();
    assert_eq!(err, EdgeFinderError::Geometry(GeometryError::ParallelLines));
}

fn synthetic_scene() -> (PlateScene, Vec<u8>) {
    let scene = PlateScene {
        width: 320,
        height: 200,
        plate: [100, 60, 220, 120],
        text: [120, 80, 200, 100],
    };
    let buf = scene.render_u8();
    (scene, buf)
}

fn synthetic_config() -> PlateConfig {
    // Plate is 3 character heights tall and 6 wide.
    PlateConfig {
        plate_width_mm: 300.0,
        plate_height_mm: 150.0,
        char_height_mm: 50.0,
        template_width_px: 240,
        template_height_px: 120,
    }
}

const PLATE_CORNERS: [(f32, f32); 4] = [(100.0, 60.0), (220.0, 60.0), (220.0, 120.0), (100.0, 120.0)];

#[test]
fn default_refiner_recovers_synthetic_plate() {
    init_logger();
    let (scene, full) = synthetic_scene();
    let region = Rect::new(80, 40, 160, 100);
    let crop = crop_u8(&full, scene.width, 80, 40, 160, 100);
    let lines = [band(40.0, 40.0, 120.0, 60.0)];
    let config = synthetic_config();
    let ctx = PipelineContext {
        image: view(&full, scene.width, scene.height),
        crop: view(&crop, 160, 100),
        region,
        text_lines: &lines,
        config: &config,
    };

    let report = EdgeFinder::new(EdgeScanParams::default())
        .find_edge_corners_detailed(&ctx)
        .unwrap();
    assert_eq!(report.branch, EstimateBranch::TextGeometry);
    assert_eq!(report.canonical_size.width, 206);
    assert_eq!(report.canonical_size.height, 120);
    assert_quad_near(&report.corners, PLATE_CORNERS, 2.0);
    assert!(report.confidence > 0.5, "confidence {}", report.confidence);
}

#[test]
fn resized_crop_gives_same_corners() {
    init_logger();
    let (scene, full) = synthetic_scene();
    let region = Rect::new(80, 40, 160, 100);
    let cut = crop_u8(&full, scene.width, 80, 40, 160, 100);
    let small = resize_nearest_u8(&cut, 160, 100, 80, 50);
    // Same text band, in the coordinates of the half-size crop.
    let lines = [band(20.0, 20.0, 60.0, 30.0)];
    let config = synthetic_config();
    let ctx = PipelineContext {
        image: view(&full, scene.width, scene.height),
        crop: view(&small, 80, 50),
        region,
        text_lines: &lines,
        config: &config,
    };

    let found = EdgeFinder::new(EdgeScanParams::default())
        .find_edge_corners(&ctx)
        .unwrap();
    assert_quad_near(&found.corners, PLATE_CORNERS, 2.0);
}

#[test]
fn batch_matches_individual_calls() {
    init_logger();
    let (scene, full) = synthetic_scene();
    let crop = crop_u8(&full, scene.width, 80, 40, 160, 100);
    let good = [band(40.0, 40.0, 120.0, 60.0)];
    let config = synthetic_config();
    let image = view(&full, scene.width, scene.height);
    let contexts = [
        PipelineContext {
            image,
            crop: view(&crop, 160, 100),
            region: Rect::new(80, 40, 160, 100),
            text_lines: &good,
            config: &config,
        },
        PipelineContext {
            image,
            crop: view(&crop, 160, 100),
            region: Rect::new(80, 40, 160, 100),
            text_lines: &[],
            config: &config,
        },
    ];

    let finder = EdgeFinder::new(EdgeScanParams::default());
    let results = finder.find_edge_corners_batch(&contexts);
    assert_eq!(results.len(), 2);
    let single = finder.find_edge_corners(&contexts[0]).unwrap();
    assert_eq!(results[0].as_ref().unwrap(), &single);
    assert!(matches!(
        results[1],
        Err(EdgeFinderError::InsufficientInput(_))
    ));
}
