// Domain layer: scan models and ports. Only serde/async-trait beyond std.

pub mod model;
pub mod ports;
