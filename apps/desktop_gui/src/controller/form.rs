//! Create/edit form model: field buffers, pre-fill, and client-side validation.

use chrono::{DateTime, NaiveDate};
use shared::domain::{Animal, AnimalFields};

pub const AGE_MIN: f64 = 0.0;
pub const AGE_MAX: f64 = 100.0;
pub const WEIGHT_MIN: f64 = 0.0;

pub const NAME_REQUIRED: &str = "Please enter the animal name";
pub const SPECIES_REQUIRED: &str = "Please enter the species";
pub const LAST_SEEN_INVALID: &str = "Please enter a valid date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Species,
    Breed,
    Age,
    Weight,
    Health,
    Location,
    LastSeen,
    Notes,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Species => "Species",
            FormField::Breed => "Breed",
            FormField::Age => "Age (years)",
            FormField::Weight => "Weight (lbs)",
            FormField::Health => "Health Status",
            FormField::Location => "Location",
            FormField::LastSeen => "Last Seen",
            FormField::Notes => "Notes",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Enter animal name",
            FormField::Species => "e.g., Dog, Cat, Bird",
            FormField::Breed => "Enter breed (optional)",
            FormField::Age => "Age in years",
            FormField::Weight => "Weight in pounds",
            FormField::Health => "Select health status",
            FormField::Location => "Current location or habitat",
            FormField::LastSeen => "YYYY-MM-DD",
            FormField::Notes => "Additional notes about the animal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

/// Editable buffers behind the modal form.
///
/// Text inputs are kept as plain strings. An empty optional buffer is left
/// out of a create payload and sent as an explicit clear when editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalForm {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub health: Option<String>,
    pub location: String,
    pub last_seen: String,
    pub notes: String,
    editing: bool,
    errors: Vec<FieldError>,
}

impl AnimalForm {
    pub fn from_animal(animal: &Animal) -> Self {
        Self {
            name: animal.name.clone(),
            species: animal.species.clone(),
            breed: animal.breed.clone().unwrap_or_default(),
            age: animal.age.map(clamp_age),
            weight: animal.weight.map(clamp_weight),
            health: animal.health.clone(),
            location: animal.location.clone().unwrap_or_default(),
            last_seen: animal.last_seen.clone().unwrap_or_default(),
            notes: animal.notes.clone().unwrap_or_default(),
            editing: true,
            errors: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_age(&mut self, age: Option<f64>) {
        self.age = age.filter(|value| value.is_finite()).map(clamp_age);
    }

    pub fn set_weight(&mut self, weight: Option<f64>) {
        self.weight = weight.filter(|value| value.is_finite()).map(clamp_weight);
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: FormField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    pub fn clear_error(&mut self, field: FormField) {
        self.errors.retain(|error| error.field != field);
    }

    /// Runs the field rules; on success returns the payload to send.
    ///
    /// Errors are kept on the form so the view can show them inline.
    pub fn validate(&mut self) -> Result<AnimalFields, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(FieldError {
                field: FormField::Name,
                message: NAME_REQUIRED,
            });
        }
        if self.species.is_empty() {
            errors.push(FieldError {
                field: FormField::Species,
                message: SPECIES_REQUIRED,
            });
        }
        if !self.last_seen.trim().is_empty() && parse_calendar_date(&self.last_seen).is_none() {
            errors.push(FieldError {
                field: FormField::LastSeen,
                message: LAST_SEEN_INVALID,
            });
        }

        self.errors = errors.clone();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(AnimalFields {
            name: self.name.clone(),
            species: self.species.clone(),
            breed: self.optional(non_empty(&self.breed)),
            age: self.optional(self.age.map(clamp_age)),
            weight: self.optional(self.weight.map(clamp_weight)),
            health: self.optional(self.health.clone().filter(|value| !value.is_empty())),
            location: self.optional(non_empty(&self.location)),
            last_seen: self.optional(non_empty(self.last_seen.trim())),
            notes: self.optional(non_empty(&self.notes)),
        })
    }

    fn optional<T>(&self, value: Option<T>) -> Option<Option<T>> {
        match value {
            Some(value) => Some(Some(value)),
            None if self.editing => Some(None),
            None => None,
        }
    }
}

/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

fn clamp_age(age: f64) -> f64 {
    age.clamp(AGE_MIN, AGE_MAX)
}

fn clamp_weight(weight: f64) -> f64 {
    weight.max(WEIGHT_MIN)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
