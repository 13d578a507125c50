use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identity of a contact. Selection and card lookup key on this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directory entry as returned by `/api/buscar`.
///
/// Field names follow the backend's JSON so the same value can be echoed
/// back unchanged in the send request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(
        rename = "telefono",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,

    #[serde(
        rename = "circuito",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub circuit: Option<String>,

    #[serde(
        rename = "congregacion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub congregation: Option<String>,

    #[serde(
        rename = "privilegios",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub privileges: Option<Vec<String>>,
}

impl Contact {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: ContactId(id),
            name: name.into(),
            phone: None,
            circuit: None,
            congregation: None,
            privileges: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_circuit(mut self, circuit: impl Into<String>) -> Self {
        self.circuit = Some(circuit.into());
        self
    }

    pub fn with_congregation(mut self, congregation: impl Into<String>) -> Self {
        self.congregation = Some(congregation.into());
        self
    }

    pub fn with_privileges<I, S>(mut self, privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.privileges = Some(privileges.into_iter().map(Into::into).collect());
        self
    }

    /// Phone number if present and not blank
    pub fn phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    /// "circuit · congregation", or whichever half is present
    pub fn grouping(&self) -> Option<String> {
        match (
            non_blank(self.circuit.as_deref()),
            non_blank(self.congregation.as_deref()),
        ) {
            (Some(circuit), Some(congregation)) => Some(format!("{circuit} · {congregation}")),
            (Some(circuit), None) => Some(circuit.to_string()),
            (None, Some(congregation)) => Some(congregation.to_string()),
            (None, None) => None,
        }
    }

    /// Non-blank privilege labels, trimmed
    pub fn privilege_labels(&self) -> Vec<&str> {
        self.privileges
            .iter()
            .flatten()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
