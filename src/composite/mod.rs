pub mod alpha;
pub mod placement;
