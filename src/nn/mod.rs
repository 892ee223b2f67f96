mod two_layer;

pub use two_layer::{propagate, Forward, TwoLayer};
