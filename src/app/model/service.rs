// Services: running instances of a deployed charm.

use serde::{Deserialize, Serialize};

use super::error::{ModelError, Result};
use super::list::{Model, ModelList};

pub type ServiceList = ModelList<Service>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceAttrs {
    #[serde(default)]
    pub id: Option<String>,
}

/// A running service, unique by id within a [`ServiceList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    id: String,
}

impl Service {
    pub fn new(attrs: ServiceAttrs) -> Result<Self> {
        let id = attrs.id.ok_or(ModelError::MissingField {
            entity: "Service",
            field: "id",
        })?;
        Ok(Self { id })
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Model for Service {
    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl TryFrom<ServiceAttrs> for Service {
    type Error = ModelError;

    fn try_from(attrs: ServiceAttrs) -> Result<Self> {
        Self::new(attrs)
    }
}
