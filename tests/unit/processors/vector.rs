use super::*;
use crate::{
    foundation::core::{CaptchaParams, Rect, Size},
    foundation::error::CaptchaError,
    geometry::{cache::GlyphCache, object::VectorObject, path::VectorPath},
    processors::shapes,
    raster::backend::SkiaBackend,
};

/// Every character is a 0.5 x 1.0 em box sitting on the baseline; space is empty.
struct BoxFont;

impl GlyphSource for BoxFont {
    fn id(&self) -> u64 {
        1
    }

    fn outline(&self, ch: char) -> CaptchaResult<VectorObject> {
        if ch == ' ' {
            return Ok(VectorObject::default());
        }
        Ok(VectorObject::from_path(
            VectorPath::new().rect(Point::new(0.0, -1.0), Point::new(0.5, 0.0)),
        ))
    }

    fn advance(&self, _ch: char) -> CaptchaResult<f64> {
        Ok(0.5)
    }
}

fn ctx(answer: &str) -> CaptchaContext {
    CaptchaContext::new(
        CaptchaParams::new(answer, Size::new(100, 40).unwrap()),
        Arc::new(SkiaBackend),
        Arc::new(GlyphCache::default()),
    )
}

fn unit_square(x: f64, y: f64) -> VectorObject {
    VectorObject::from_path(VectorPath::new().rect(Point::new(x, y), Point::new(x + 1.0, y + 1.0)))
}

#[test]
fn text_centers_line_on_canvas() {
    let ctx = ctx("ab");
    let mut layer = VectorLayer::new();
    Text::new(Arc::new(BoxFont), 20.0)
        .process(&mut layer, &ctx)
        .unwrap();

    assert_eq!(layer.len(), 2);
    // Two 10px advances, centered on (50, 20).
    assert_eq!(layer.bounds(), Some(Rect::new(40.0, 10.0, 60.0, 30.0)));
    assert_eq!(layer.objects[0].bounds(), Some(Rect::new(40.0, 10.0, 50.0, 30.0)));
}

#[test]
fn text_spacing_and_anchor() {
    let ctx = ctx("a b");
    let mut layer = VectorLayer::new();
    Text::new(Arc::new(BoxFont), 10.0)
        .spacing(2.0)
        .anchor(Anchor::Start, Anchor::Start)
        .at(Point::new(5.0, 5.0))
        .process(&mut layer, &ctx)
        .unwrap();

    // The space keeps its advance but produces no object.
    assert_eq!(layer.len(), 2);
    assert_eq!(layer.objects[0].bounds(), Some(Rect::new(5.0, 5.0, 10.0, 15.0)));
    assert_eq!(layer.objects[1].bounds(), Some(Rect::new(19.0, 5.0, 24.0, 15.0)));
}

#[test]
fn text_skeletons_come_from_the_cache() {
    let ctx = ctx("aa");
    let mut layer = VectorLayer::new();
    Text::new(Arc::new(BoxFont), 30.0)
        .skeleton(1.0)
        .process(&mut layer, &ctx)
        .unwrap();
    assert_eq!(layer.len(), 2);
    // outline + skeleton for one character
    assert_eq!(ctx.glyphs().len(), 2);
    let b = layer.objects[0].bounds().unwrap();
    assert!(b.width() < 15.0);
}

#[test]
fn text_with_blank_answer_adds_nothing() {
    let ctx = ctx("  ");
    let mut layer = VectorLayer::new();
    Text::new(Arc::new(BoxFont), 10.0)
        .process(&mut layer, &ctx)
        .unwrap();
    assert!(layer.is_empty());
}

#[test]
fn create_pulls_count_then_params() {
    let params = ShapeParams {
        x: Value::carousel(vec![0.0, 10.0, 20.0]).unwrap(),
        y: Value::constant(0.0),
        width: Value::constant(5.0),
        height: Value::constant(5.0),
        detail: Value::constant(1),
    };
    let mut layer = VectorLayer::new();
    Create::new(3u32, params, shapes::rect)
        .process(&mut layer, &ctx(""))
        .unwrap();
    assert_eq!(layer.len(), 3);
    assert_eq!(layer.objects[2].bounds(), Some(Rect::new(20.0, 0.0, 25.0, 5.0)));
}

#[test]
fn create_within_canvas_stays_anchored_inside() {
    let random = crate::value::random::RandomSource::seeded(9);
    let params = ShapeParams::canvas(Size::new(100, 40).unwrap(), &random).unwrap();
    let mut layer = VectorLayer::new();
    Create::new(20u32, params, shapes::line)
        .process(&mut layer, &ctx(""))
        .unwrap();
    for object in &layer.objects {
        let start = object.points().next().unwrap();
        assert!((0.0..=100.0).contains(&start.x));
        assert!((0.0..=40.0).contains(&start.y));
    }
}

#[test]
fn move_pulls_per_object() {
    let mut layer = VectorLayer::new();
    layer.push(unit_square(0.0, 0.0));
    layer.push(unit_square(0.0, 0.0));
    MoveObjects::new(Value::carousel(vec![1.0, 2.0]).unwrap(), 0.5)
        .process(&mut layer, &ctx(""))
        .unwrap();
    assert_eq!(layer.objects[0].bounds(), Some(Rect::new(1.0, 0.5, 2.0, 1.5)));
    assert_eq!(layer.objects[1].bounds(), Some(Rect::new(2.0, 0.5, 3.0, 1.5)));
}

#[test]
fn scale_and_rotate_about_each_center() {
    let mut layer = VectorLayer::new();
    layer.push(unit_square(4.0, 4.0));
    ScaleObjects::new(2.0, 4.0)
        .process(&mut layer, &ctx(""))
        .unwrap();
    assert_eq!(layer.objects[0].bounds(), Some(Rect::new(3.5, 2.5, 5.5, 6.5)));

    RotateObjects::new(90.0)
        .process(&mut layer, &ctx(""))
        .unwrap();
    let b = layer.objects[0].bounds().unwrap();
    assert!((b.x0 - 2.5).abs() < 1e-9 && (b.x1 - 6.5).abs() < 1e-9);
    assert!((b.y0 - 3.5).abs() < 1e-9 && (b.y1 - 5.5).abs() < 1e-9);
}

#[test]
fn copy_reads_other_layer_and_clones_deeply() {
    let mut ctx = ctx("");
    let mut source = VectorLayer::new();
    source.push(unit_square(0.0, 0.0));
    ctx.insert_vector("source", source);

    let mut layer = VectorLayer::new();
    CopyObjects::from_layer("source")
        .process(&mut layer, &ctx)
        .unwrap();
    layer.objects[0].translate(5.0, 5.0);
    assert_eq!(
        ctx.vector("source").unwrap().objects[0].bounds(),
        Some(Rect::new(0.0, 0.0, 1.0, 1.0))
    );

    let err = CopyObjects::from_layer("missing")
        .process(&mut layer, &ctx)
        .unwrap_err();
    assert!(matches!(err, CaptchaError::Lookup(_)));
}

#[test]
fn clear_empties_layer() {
    let mut layer = VectorLayer::new();
    layer.push(unit_square(0.0, 0.0));
    ClearObjects.process(&mut layer, &ctx("")).unwrap();
    assert!(layer.is_empty());
}
