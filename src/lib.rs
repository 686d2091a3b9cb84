//! detsynth generates synthetic object-detection training data.
//!
//! Each sample composites a transparent foreground icon onto a background map image at a
//! random scale and position, then degrades it the way a phone photo of a screen would
//! look: a projective warp, a moiré-like interference pattern, a blurred glare spot and
//! brightness/contrast jitter. The placed object's box is tracked through every geometric
//! step and written as a normalized label line.
//!
//! - Configure a run with [`SynthConfig`]
//! - Provide assets through an [`AssetSource`] ([`DirAssets`] scans directories)
//! - Stream samples into a [`SampleSink`] with [`generate_batch`], or let [`run_dataset`]
//!   write `images/`, `labels/` and `summary.json` to disk
#![forbid(unsafe_code)]

pub mod assets;
pub mod composite;
pub mod effects;
pub mod foundation;
pub mod label;
pub mod pipeline;
pub mod transform;

pub use crate::foundation::core::{BoundingBox, Placement, Point, SampleId};
pub use crate::foundation::error::{SynthError, SynthResult};
pub use crate::foundation::random::{SynthRng, seeded};

pub use crate::assets::pool::AssetPool;
pub use crate::assets::source::{AssetSource, DirAssets, InMemoryAssets};
pub use crate::composite::alpha::alpha_composite;
pub use crate::composite::placement::{Composited, composite_one, resize_keep_aspect};
pub use crate::effects::chain::{AugmentToggles, augment};
pub use crate::effects::photometric::{add_glare, add_interference_pattern};
pub use crate::effects::warp::{PerspectiveWarp, apply_perspective};
pub use crate::label::encode::{Label, LabelOutcome, encode};
pub use crate::pipeline::config::{RngMode, SynthConfig};
pub use crate::pipeline::run::{RunStats, generate_batch, run_dataset};
pub use crate::pipeline::sample::{MAX_ATTEMPTS, Sample, SampleOutcome, generate_sample};
pub use crate::pipeline::sink::{InMemorySampleSink, SampleSink};
pub use crate::pipeline::writer::DatasetWriter;
pub use crate::transform::homography::{
    Homography, Quad, apply_homography, random_perspective_quad, solve_homography,
};
