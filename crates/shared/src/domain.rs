use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(AnimalId);

/// Health states offered by the form's select widget.
///
/// Records coming back from the entity store keep `health` as free text, so
/// anything outside this set still round-trips untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Sick,
    Injured,
    Unknown,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Healthy,
        HealthStatus::Sick,
        HealthStatus::Injured,
        HealthStatus::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Sick => "Sick",
            HealthStatus::Injured => "Injured",
            HealthStatus::Unknown => "Unknown",
        }
    }

    /// Case-insensitive lookup; `None` for values outside the known set.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted animal record as returned by `list()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    #[serde(rename = "_id")]
    pub id: AnimalId,
    pub name: String,
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Animal {
    pub fn new(id: AnimalId, name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            species: species.into(),
            breed: None,
            age: None,
            weight: None,
            health: None,
            location: None,
            last_seen: None,
            notes: None,
        }
    }

    pub fn from_fields(id: AnimalId, fields: AnimalFields) -> Self {
        Self {
            id,
            name: fields.name,
            species: fields.species,
            breed: fields.breed.flatten(),
            age: fields.age.flatten(),
            weight: fields.weight.flatten(),
            health: fields.health.flatten(),
            location: fields.location.flatten(),
            last_seen: fields.last_seen.flatten(),
            notes: fields.notes.flatten(),
        }
    }

    /// Overwrites name/species, then sets or clears every optional field the
    /// payload mentions.
    pub fn apply_fields(&mut self, fields: &AnimalFields) {
        self.name = fields.name.clone();
        self.species = fields.species.clone();
        if let Some(breed) = &fields.breed {
            self.breed = breed.clone();
        }
        if let Some(age) = fields.age {
            self.age = age;
        }
        if let Some(weight) = fields.weight {
            self.weight = weight;
        }
        if let Some(health) = &fields.health {
            self.health = health.clone();
        }
        if let Some(location) = &fields.location {
            self.location = location.clone();
        }
        if let Some(last_seen) = &fields.last_seen {
            self.last_seen = last_seen.clone();
        }
        if let Some(notes) = &fields.notes {
            self.notes = notes.clone();
        }
    }
}

/// Create/update payload: an animal without its store-assigned id.
///
/// Optional fields are tri-state: `None` leaves the stored value alone and is
/// omitted on the wire, `Some(None)` clears it and is sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalFields {
    pub name: String,
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub breed: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub age: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub weight: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub health: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub location: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub last_seen: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// A key that is present (even as `null`) deserializes to `Some(..)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl AnimalFields {
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            ..Self::default()
        }
    }
}
