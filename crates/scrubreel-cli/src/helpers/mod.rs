// crates/scrubreel-cli/src/helpers/mod.rs
//
// Binary-only helpers: logger setup, PNG output, hover replay.

pub mod hover_sim;
pub mod log;
pub mod png_out;
