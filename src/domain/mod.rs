// Domain layer: models, the static catalog, selection rules and ports.

pub mod catalog;
pub mod model;
pub mod ports;
pub mod selection;
