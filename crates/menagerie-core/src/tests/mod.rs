//! Whole-collection integration tests. Unit tests live next to the modules
//! they cover; everything here drives the public surface through full ticks.

mod behavior;
mod helpers;
mod properties;
