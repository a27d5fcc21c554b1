// Domain layer: partition model and ports. Rendering backends live in `render`.

pub mod model;
pub mod ports;
