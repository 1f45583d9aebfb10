// Charms: the deployable packages services are created from.

use serde::{Deserialize, Serialize};

use super::list::{Model, ModelList};

pub type CharmList = ModelList<Charm>;

/// Raw charm attributes as supplied by a snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharmAttrs {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A charm, e.g. `cs:precise/mysql-6`.
///
/// The name is derived from the id when one is given, by dropping the
/// scheme and a trailing numeric revision: `cs:precise/mysql-6` becomes
/// `precise/mysql`. Ids that do not follow that shape are used as they are
/// for whichever part is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Charm {
    id: Option<String>,
    name: String,
    description: Option<String>,
    revision: Option<u64>,
}

impl Charm {
    pub fn new(attrs: CharmAttrs) -> Self {
        let CharmAttrs {
            id,
            name,
            description,
        } = attrs;

        match id {
            Some(id) => {
                let path = strip_scheme(&id);
                let (name, revision) = match split_revision(path) {
                    Some((name, revision)) => (name.to_owned(), revision),
                    None => (path.to_owned(), None),
                };
                Self {
                    id: Some(id),
                    name,
                    description,
                    revision,
                }
            }
            None => Self {
                id: None,
                name: name.unwrap_or_default(),
                description,
                revision: None,
            },
        }
    }

    pub fn from_id(id: impl Into<String>) -> Self {
        Self::new(CharmAttrs {
            id: Some(id.into()),
            ..Default::default()
        })
    }

    pub fn named(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(CharmAttrs {
            id: None,
            name: Some(name.into()),
            description: Some(description.into()),
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Empty when neither an id nor a name was supplied.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// `None` when the id has no revision or it does not fit a `u64`.
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    /// The series segment of the name, `precise` in `precise/mysql`.
    pub fn series(&self) -> Option<&str> {
        let (prefix, _) = self.name.rsplit_once('/')?;
        prefix.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

impl Model for Charm {
    // Charm lists may hold the same charm more than once.
    fn key(&self) -> Option<&str> {
        None
    }
}

impl From<CharmAttrs> for Charm {
    fn from(attrs: CharmAttrs) -> Self {
        Self::new(attrs)
    }
}

fn strip_scheme(id: &str) -> &str {
    match id.split_once(':') {
        Some((scheme, rest)) if !scheme.contains('/') => rest,
        _ => id,
    }
}

fn split_revision(path: &str) -> Option<(&str, Option<u64>)> {
    let (name, revision) = path.rsplit_once('-')?;
    if revision.is_empty() || !revision.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((name, revision.parse().ok()))
}
