// crates/scrubreel-media/src/helpers/mod.rs
//
// Internal helper modules for scrubreel-media.
// Not re-exported from lib.rs; decode implementation details only.

pub mod clock;
pub mod seek;
