use image::RgbImage;

use super::*;
use crate::effects::chain::AugmentToggles;
use crate::foundation::core::{BoundingBox, Placement, SampleId};
use crate::label::encode::{Label, LabelOutcome};
use crate::pipeline::sample::SampleOutcome;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "detsynth_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn sample(id: u64, outcome: SampleOutcome) -> Sample {
    Sample {
        id: SampleId(id),
        canvas: RgbImage::from_pixel(16, 16, image::Rgb([120, 30, 200])),
        bbox: BoundingBox::new(0.0, 0.0, 16.0, 16.0),
        placement: Placement {
            scale: 1.0,
            x: 0,
            y: 0,
            width: 16,
            height: 16,
        },
        toggles: AugmentToggles::NONE,
        outcome,
        attempts: 1,
        decode_failures: 0,
    }
}

#[test]
fn writes_jpeg_and_label_pair() {
    let tmp = temp_dir("writer_pair");
    let mut w = DatasetWriter::create(&tmp).unwrap();
    let label = Label {
        class_id: 0,
        cx: 0.5,
        cy: 0.5,
        w: 1.0,
        h: 1.0,
    };
    w.write_sample(&sample(1, SampleOutcome::Accepted(label))).unwrap();

    let img = image::open(tmp.join("images/000001.jpg")).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (16, 16));
    let text = std::fs::read_to_string(tmp.join("labels/000001.txt")).unwrap();
    assert_eq!(text, "0 0.500000 0.500000 1.000000 1.000000\n");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn rejected_label_leaves_empty_file() {
    let tmp = temp_dir("writer_rejected");
    let mut w = DatasetWriter::create(&tmp).unwrap();
    w.write_sample(&sample(12, SampleOutcome::ExhaustedRetries(LabelOutcome::Rejected)))
        .unwrap();
    assert!(tmp.join("images/000012.jpg").is_file());
    assert_eq!(std::fs::read_to_string(tmp.join("labels/000012.txt")).unwrap(), "");
    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn json_side_file_is_written() {
    let tmp = temp_dir("writer_json");
    let w = DatasetWriter::create(&tmp).unwrap();
    w.write_json("x.json", &serde_json::json!({ "ok": true })).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.join("x.json")).unwrap()).unwrap();
    assert_eq!(v["ok"], true);
    std::fs::remove_dir_all(&tmp).ok();
}
