pub mod fields;
pub mod render;
