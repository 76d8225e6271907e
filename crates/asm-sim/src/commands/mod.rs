pub mod sample;
pub mod version;
