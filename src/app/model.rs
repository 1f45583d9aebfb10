// Defines the core data structures for the application.

mod charm;
mod error;
mod list;
mod service;
mod unit;

pub use charm::{Charm, CharmAttrs, CharmList};
pub use error::ModelError;
pub use list::{Model, ModelList};
pub use service::{Service, ServiceAttrs, ServiceList};
pub use unit::{ServiceUnit, ServiceUnitAttrs, ServiceUnitList};

/// The domain models the dashboard renders.
#[derive(Debug, Clone, Default)]
pub struct Models {
    pub charms: CharmList,
    pub services: ServiceList,
    pub units: ServiceUnitList,
}

impl Models {
    pub fn new() -> Self {
        Self::default()
    }
}
