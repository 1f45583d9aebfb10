// Service units and the per-service queries the views rely on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{ModelError, Result};
use super::list::{Model, ModelList};
use super::service::Service;

pub type ServiceUnitList = ModelList<ServiceUnit>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceUnitAttrs {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default, alias = "agent-state")]
    pub agent_state: Option<String>,
}

/// A single unit of a service, e.g. `mysql/0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceUnit {
    id: String,
    service: String,
    agent_state: Option<String>, // e.g., "pending", "running", "error"
}

impl ServiceUnit {
    /// Builds a unit, taking the service from the id (`mysql/0` belongs to
    /// `mysql`) unless one is given.
    pub fn new(attrs: ServiceUnitAttrs) -> Result<Self> {
        let ServiceUnitAttrs {
            id,
            service,
            agent_state,
        } = attrs;
        let id = id.ok_or(ModelError::MissingField {
            entity: "ServiceUnit",
            field: "id",
        })?;
        let service = service.unwrap_or_else(|| service_from_unit_id(&id).to_owned());

        Ok(Self {
            id,
            service,
            agent_state,
        })
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let service = service_from_unit_id(&id).to_owned();
        Self {
            id,
            service,
            agent_state: None,
        }
    }

    pub fn with_agent_state(mut self, state: impl Into<String>) -> Self {
        self.agent_state = Some(state.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn agent_state(&self) -> Option<&str> {
        self.agent_state.as_deref()
    }

    pub fn set_agent_state(&mut self, state: Option<String>) {
        self.agent_state = state;
    }

    /// The unit number, `0` in `mysql/0`.
    pub fn index(&self) -> Option<u32> {
        self.id.split_once('/')?.1.parse().ok()
    }
}

impl Model for ServiceUnit {
    fn key(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl TryFrom<ServiceUnitAttrs> for ServiceUnit {
    type Error = ModelError;

    fn try_from(attrs: ServiceUnitAttrs) -> Result<Self> {
        Self::new(attrs)
    }
}

/// Everything before the first `/`, or the whole id when there is none.
fn service_from_unit_id(id: &str) -> &str {
    id.split('/').next().unwrap_or(id)
}

impl ModelList<ServiceUnit> {
    /// Units belonging to `service`, in list order.
    pub fn get_units_for_service(&self, service: &Service) -> Vec<&ServiceUnit> {
        self.iter()
            .filter(|unit| unit.service() == service.id())
            .collect()
    }

    /// Like [`Self::get_units_for_service`], materialized as its own list.
    pub fn get_units_for_service_list(&self, service: &Service) -> ServiceUnitList {
        self.get_units_for_service(service)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Counts the units of `service` by agent state. Units without a state
    /// are left out, and states no unit holds never appear.
    pub fn get_informative_states_for_service(
        &self,
        service: &Service,
    ) -> BTreeMap<String, usize> {
        let mut states = BTreeMap::new();
        for state in self
            .get_units_for_service(service)
            .into_iter()
            .filter_map(ServiceUnit::agent_state)
            .filter(|state| !state.is_empty())
        {
            *states.entry(state.to_owned()).or_insert(0) += 1;
        }
        states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> ServiceUnitList {
        let mut units = ServiceUnitList::new();
        units
            .add([
                ServiceUnit::with_id("mysql/0").with_agent_state("pending"),
                ServiceUnit::with_id("mysql/1").with_agent_state("pending"),
            ])
            .add([
                ServiceUnit::with_id("wordpress/0").with_agent_state("pending"),
                ServiceUnit::with_id("wordpress/1").with_agent_state("error"),
            ]);
        units
    }

    #[test]
    fn test_service_derived_from_id() {
        let unit = ServiceUnit::new(ServiceUnitAttrs {
            id: Some("mysql/0".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(unit.service(), "mysql");
        assert_eq!(unit.index(), Some(0));
        assert_eq!(unit.agent_state(), None);
    }

    #[test]
    fn test_explicit_service_overrides_derivation() {
        let unit = ServiceUnit::new(ServiceUnitAttrs {
            id: Some("mysql/0".into()),
            service: Some("db".into()),
            agent_state: Some("running".into()),
        })
        .unwrap();
        assert_eq!(unit.service(), "db");
        assert_eq!(unit.agent_state(), Some("running"));
    }

    #[test]
    fn test_unit_requires_id() {
        assert_eq!(
            ServiceUnit::new(ServiceUnitAttrs::default()),
            Err(ModelError::MissingField {
                entity: "ServiceUnit",
                field: "id"
            })
        );
    }

    #[test]
    fn test_id_without_separator() {
        let unit = ServiceUnit::with_id("mysql");
        assert_eq!(unit.service(), "mysql");
        assert_eq!(unit.index(), None);
    }

    #[test]
    fn test_agent_state_accepts_hyphenated_key() {
        let attrs: ServiceUnitAttrs =
            serde_json::from_str(r#"{"id": "mysql/0", "agent-state": "running"}"#).unwrap();
        assert_eq!(
            ServiceUnit::new(attrs).unwrap().agent_state(),
            Some("running")
        );
    }

    #[test]
    fn test_unit_serializes_for_views() {
        let unit = ServiceUnit::with_id("mysql/0").with_agent_state("running");
        let json = serde_json::to_value(&unit).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": "mysql/0", "service": "mysql", "agent_state": "running"})
        );

        // The serialized form is accepted back as a payload.
        let attrs: ServiceUnitAttrs = serde_json::from_value(json).unwrap();
        assert_eq!(ServiceUnit::new(attrs).unwrap(), unit);
    }

    #[test]
    fn test_units_for_service() {
        let units = units();
        let mysql = Service::with_id("mysql");
        let wordpress = Service::with_id("wordpress");

        let ids: Vec<&str> = units
            .get_units_for_service(&mysql)
            .into_iter()
            .map(ServiceUnit::id)
            .collect();
        assert_eq!(ids, vec!["mysql/0", "mysql/1"]);
        assert_eq!(
            units.get_units_for_service_list(&wordpress).ids(),
            vec!["wordpress/0", "wordpress/1"]
        );
        assert!(
            units
                .get_units_for_service(&Service::with_id("haproxy"))
                .is_empty()
        );
    }

    #[test]
    fn test_informative_states() {
        let units = units();

        let mysql = units.get_informative_states_for_service(&Service::with_id("mysql"));
        assert_eq!(mysql, BTreeMap::from([("pending".to_owned(), 2)]));

        let wordpress = units.get_informative_states_for_service(&Service::with_id("wordpress"));
        assert_eq!(
            wordpress,
            BTreeMap::from([("pending".to_owned(), 1), ("error".to_owned(), 1)])
        );
    }

    #[test]
    fn test_informative_states_skip_units_without_state() {
        let mut units = units();
        units.add([ServiceUnit::with_id("mysql/2"), ServiceUnit::with_id("mysql/3").with_agent_state("")]);

        let states = units.get_informative_states_for_service(&Service::with_id("mysql"));
        assert_eq!(states, BTreeMap::from([("pending".to_owned(), 2)]));
        assert!(
            units
                .get_informative_states_for_service(&Service::with_id("haproxy"))
                .is_empty()
        );
    }

    #[test]
    fn test_set_agent_state_changes_counts() {
        let mut units = units();
        if let Some(unit) = units.get_by_id_mut("mysql/1") {
            unit.set_agent_state(Some("running".into()));
        }

        let states = units.get_informative_states_for_service(&Service::with_id("mysql"));
        assert_eq!(
            states,
            BTreeMap::from([("pending".to_owned(), 1), ("running".to_owned(), 1)])
        );
    }
}
