use std::sync::Mutex;

use super::*;
use crate::{
    foundation::error::CaptchaError,
    pipeline::{
        builder::MixerBuilder,
        processor::{RasterProcessor, VectorProcessor},
    },
    raster::color::Rgba8,
    value::{provider::Value, signal::Signal, switch::Switcher},
};

/// Appends `tag` to a shared log when it runs.
struct Record {
    tag: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl VectorProcessor for Record {
    fn name(&self) -> &'static str {
        "record"
    }

    fn process(&self, _layer: &mut VectorLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        self.log.lock().unwrap().push(self.tag.to_owned());
        Ok(())
    }
}

impl RasterProcessor for Record {
    fn name(&self) -> &'static str {
        "record"
    }

    fn process(&self, _layer: &mut RasterLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        self.log.lock().unwrap().push(self.tag.to_owned());
        Ok(())
    }
}

struct ReadRaster(&'static str);

impl RasterProcessor for ReadRaster {
    fn name(&self) -> &'static str {
        "read_raster"
    }

    fn process(&self, _layer: &mut RasterLayer, ctx: &CaptchaContext) -> CaptchaResult<()> {
        ctx.raster(self.0).map(|_| ())
    }
}

struct Paint(Value<u8>);

impl RasterProcessor for Paint {
    fn name(&self) -> &'static str {
        "paint"
    }

    fn process(&self, layer: &mut RasterLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        let v = self.0.next();
        crate::raster::blend::set_pixels(layer.data_mut(), Rgba8::new(v, v, v, 255));
        Ok(())
    }
}

fn record(tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Record {
    Record {
        tag,
        log: Arc::clone(log),
    }
}

#[test]
fn vector_layers_run_before_raster_layers_in_configured_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut b = MixerBuilder::new(2, 2).unwrap();
    b.raster(MASTER_LAYER, [RasterStep::process(record("r-master", &log))])
        .unwrap();
    b.vector("v1", [VectorStep::process(record("v1-a", &log))])
        .unwrap();
    b.raster("bg", [RasterStep::process(record("r-bg", &log))])
        .unwrap();
    b.vector("v2", [VectorStep::process(record("v2", &log))])
        .unwrap();
    b.vector("v1", [VectorStep::process(record("v1-b", &log))])
        .unwrap();

    b.build().unwrap().generate("x").unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        ["v1-a", "v1-b", "v2", "r-master", "r-bg"]
    );
}

#[test]
fn raw_output_is_master_pixels() {
    let mut b = MixerBuilder::new(3, 2).unwrap();
    b.raster(MASTER_LAYER, [RasterStep::process(Paint(Value::constant(7)))])
        .unwrap();
    let image = b.build().unwrap().generate("abc").unwrap();
    assert!(image.is_raw());
    assert_eq!(image.data.len(), 24);
    assert!(image.data.chunks_exact(4).all(|px| px == [7, 7, 7, 255]));
}

#[test]
fn each_generation_starts_from_fresh_layers() {
    let values = Value::carousel(vec![10u8, 20]).unwrap();
    let mut b = MixerBuilder::new(1, 1).unwrap();
    b.raster(MASTER_LAYER, [RasterStep::process(Paint(values))])
        .unwrap();
    let mixer = b.build().unwrap();
    assert_eq!(mixer.generate("a").unwrap().data, [10, 10, 10, 255]);
    assert_eq!(mixer.generate("a").unwrap().data, [20, 20, 20, 255]);
}

#[test]
fn unknown_layer_is_a_lookup_failure() {
    let mut b = MixerBuilder::new(2, 2).unwrap();
    b.raster(MASTER_LAYER, [RasterStep::process(ReadRaster("nope"))])
        .unwrap();
    let err = b.build().unwrap().generate("a").unwrap_err();
    assert!(matches!(err, CaptchaError::Lookup(_)));
}

#[test]
fn other_raster_layers_are_readable() {
    let mut b = MixerBuilder::new(2, 2).unwrap();
    b.raster("bg", []).unwrap();
    b.raster(MASTER_LAYER, [RasterStep::process(ReadRaster("bg"))])
        .unwrap();
    assert!(b.build().unwrap().generate("a").is_ok());
}

#[test]
fn tick_steps_advance_switchers_at_their_position() {
    let signal = Signal::new("next-char");
    let shade = Switcher::on(&signal, Value::carousel(vec![1u8, 2, 3]).unwrap());

    let mut b = MixerBuilder::new(1, 1).unwrap();
    b.raster(
        MASTER_LAYER,
        [
            RasterStep::process(Paint(shade.value())),
            RasterStep::process(Paint(shade.value())),
            RasterStep::tick(&signal),
        ],
    )
    .unwrap();
    let mixer = b.build().unwrap();

    assert_eq!(mixer.generate("a").unwrap().data[0], 1);
    assert_eq!(mixer.generate("a").unwrap().data[0], 2);
}

#[test]
fn encoded_output_carries_format() {
    let mut b = MixerBuilder::new(5, 4).unwrap();
    b.raster(MASTER_LAYER, []).unwrap();
    b.format(Some(ImageFormat::Png)).unwrap();
    let image = b.build().unwrap().generate("a").unwrap();
    assert!(!image.is_raw());
    assert_eq!(image.format, Some(ImageFormat::Png));
    assert_eq!(&image.data[1..4], b"PNG");
}
