// Loads model attribute payloads from a JSON snapshot file.

use super::model::{
    Charm, CharmAttrs, ModelError, Models, Service, ServiceAttrs, ServiceUnit, ServiceUnitAttrs,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Raw payloads as found in a snapshot file. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub charms: Vec<CharmAttrs>,
    #[serde(default)]
    pub services: Vec<ServiceAttrs>,
    #[serde(default)]
    pub units: Vec<ServiceUnitAttrs>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse snapshot")
    }

    /// Builds the domain models, stopping at the first invalid record.
    ///
    /// Services that only appear through their units are added after the
    /// listed ones, in the order their first unit appears.
    pub fn into_models(self) -> Result<Models, ModelError> {
        let mut models = Models::new();

        models
            .charms
            .add(self.charms.into_iter().map(Charm::new));

        for attrs in self.services {
            models.services.push(Service::new(attrs)?);
        }

        for attrs in self.units {
            let unit = ServiceUnit::new(attrs)?;
            if models.services.get_by_id(unit.service()).is_none() {
                debug!(service = unit.service(), unit = unit.id(), "Inferring service from unit");
                models.services.push(Service::with_id(unit.service()));
            }
            models.units.push(unit);
        }

        Ok(models)
    }
}

/// Reads and parses the snapshot at `path`.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = Snapshot::from_json(&json)
        .with_context(|| format!("Invalid snapshot {}", path.display()))?;

    debug!(
        path = %path.display(),
        charms = snapshot.charms.len(),
        services = snapshot.services.len(),
        units = snapshot.units.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}

/// Reads the snapshot at `path` and builds its models.
pub fn load_models(path: &Path) -> Result<Models> {
    let models = load_snapshot(path)?
        .into_models()
        .with_context(|| format!("Invalid record in snapshot {}", path.display()))?;
    Ok(models)
}
