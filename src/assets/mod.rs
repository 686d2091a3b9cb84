pub mod decode;
pub mod pool;
pub mod source;
