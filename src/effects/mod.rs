pub mod blur;
pub mod chain;
pub mod photometric;
pub mod warp;
