pub mod sample;
pub mod view;

pub use sample::Sample;
