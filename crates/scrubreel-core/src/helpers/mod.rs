// crates/scrubreel-core/src/helpers/mod.rs

pub mod geometry;
pub mod time;
