//! Charger domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::errors::{DomainError, DomainResult};

/// Operational status of a charging station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargerStatus {
    #[default]
    Active,
    Inactive,
}

impl ChargerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for ChargerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChargerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown charger status '{}'", other)),
        }
    }
}

/// A registered charging station
#[derive(Debug, Clone, PartialEq)]
pub struct ChargerRecord {
    pub id: String,
    /// Creating user. Fixed at creation.
    pub owner_id: String,
    pub name: String,
    /// Free-form address or site description
    pub location: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ChargerStatus,
    pub power_output_kw: Option<f64>,
    pub connector_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChargerRecord {
    /// Build a fresh record owned by `owner_id`.
    ///
    /// Any owner carried by `fields` is ignored.
    pub fn new(owner_id: impl Into<String>, fields: NewCharger) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            name: fields.name,
            location: fields.location,
            latitude: fields.latitude,
            longitude: fields.longitude,
            status: fields.status,
            power_output_kw: fields.power_output_kw,
            connector_type: fields.connector_type,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Fields supplied when registering a charger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCharger {
    pub name: String,
    pub location: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ChargerStatus,
    pub power_output_kw: Option<f64>,
    pub connector_type: Option<String>,
    /// Owner claimed by the client. Never trusted: the record is always
    /// owned by the creating caller.
    pub owner_id: Option<String>,
}

impl NewCharger {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = Vec::new();
        check_name(&self.name, &mut errors);
        check_latitude(self.latitude, &mut errors);
        check_longitude(self.longitude, &mut errors);
        if let Some(kw) = self.power_output_kw {
            check_power(kw, &mut errors);
        }
        into_result(errors)
    }
}

/// Partial update. `None` leaves the field untouched; there is no way to
/// change the owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargerChanges {
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<ChargerStatus>,
    pub power_output_kw: Option<f64>,
    pub connector_type: Option<String>,
}

impl ChargerChanges {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        if let Some(lat) = self.latitude {
            check_latitude(lat, &mut errors);
        }
        if let Some(lon) = self.longitude {
            check_longitude(lon, &mut errors);
        }
        if let Some(kw) = self.power_output_kw {
            check_power(kw, &mut errors);
        }
        into_result(errors)
    }

    pub fn apply_to(self, record: &mut ChargerRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(location) = self.location {
            record.location = Some(location);
        }
        if let Some(lat) = self.latitude {
            record.latitude = lat;
        }
        if let Some(lon) = self.longitude {
            record.longitude = lon;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(kw) = self.power_output_kw {
            record.power_output_kw = Some(kw);
        }
        if let Some(connector_type) = self.connector_type {
            record.connector_type = Some(connector_type);
        }
        record.updated_at = Utc::now();
    }
}

/// Query predicate over charger records.
///
/// `None` fields do not constrain the match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargerFilter {
    pub owner_id: Option<String>,
    pub status: Option<ChargerStatus>,
}

impl ChargerFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: ChargerStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, record: &ChargerRecord) -> bool {
        let owner_ok = self
            .owner_id
            .as_deref()
            .map_or(true, |owner| record.owner_id == owner);
        let status_ok = self.status.map_or(true, |status| record.status == status);
        owner_ok && status_ok
    }
}

// ── Field checks ───────────────────────────────────────────────

fn check_name(name: &str, errors: &mut Vec<String>) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.push("name: must not be empty".into());
    } else if trimmed.chars().count() > 100 {
        errors.push("name: must be at most 100 characters".into());
    }
}

fn check_latitude(lat: f64, errors: &mut Vec<String>) {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        errors.push("latitude: must be a number within [-90, 90]".into());
    }
}

fn check_longitude(lon: f64, errors: &mut Vec<String>) {
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        errors.push("longitude: must be a number within [-180, 180]".into());
    }
}

fn check_power(kw: f64, errors: &mut Vec<String>) {
    if !kw.is_finite() || kw < 0.0 {
        errors.push("power_output_kw: must be a non-negative number".into());
    }
}

fn into_result(errors: Vec<String>) -> DomainResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> NewCharger {
        NewCharger {
            name: "Depot A".into(),
            location: Some("12 Harbour Rd".into()),
            latitude: 41.3,
            longitude: 69.2,
            status: ChargerStatus::Active,
            power_output_kw: Some(50.0),
            connector_type: Some("CCS2".into()),
            owner_id: None,
        }
    }

    #[test]
    fn new_record_ignores_claimed_owner() {
        let mut input = fields();
        input.owner_id = Some("u2".into());
        let record = ChargerRecord::new("u1", input);
        assert_eq!(record.owner_id, "u1");
    }

    #[test]
    fn validate_collects_every_bad_field() {
        let mut input = fields();
        input.name = "  ".into();
        input.latitude = 91.0;
        input.longitude = f64::NAN;
        let Err(DomainError::Validation(errors)) = input.validate() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn changes_apply_only_given_fields() {
        let mut record = ChargerRecord::new("u1", fields());
        let changes = ChargerChanges {
            status: Some(ChargerStatus::Inactive),
            latitude: Some(-12.5),
            ..Default::default()
        };
        changes.apply_to(&mut record);
        assert_eq!(record.status, ChargerStatus::Inactive);
        assert_eq!(record.latitude, -12.5);
        assert_eq!(record.name, "Depot A");
        assert_eq!(record.owner_id, "u1");
    }

    #[test]
    fn filter_matches_owner_and_status() {
        let mut record = ChargerRecord::new("u1", fields());
        assert!(ChargerFilter::all().matches(&record));
        assert!(ChargerFilter::owned_by("u1").matches(&record));
        assert!(!ChargerFilter::owned_by("u2").matches(&record));

        record.status = ChargerStatus::Inactive;
        let active = ChargerFilter::all().with_status(ChargerStatus::Active);
        assert!(!active.matches(&record));
    }
}
