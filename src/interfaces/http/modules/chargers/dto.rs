//! Charger DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{ChargerChanges, ChargerRecord, ChargerStatus, DomainError, NewCharger};

/// Charger API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChargerDto {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// "active" or "inactive"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_output_kw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChargerRecord> for ChargerDto {
    fn from(r: ChargerRecord) -> Self {
        Self {
            id: r.id,
            owner_id: r.owner_id,
            name: r.name,
            location: r.location,
            latitude: r.latitude,
            longitude: r.longitude,
            status: r.status.to_string(),
            power_output_kw: r.power_output_kw,
            connector_type: r.connector_type,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateChargerRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub location: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within [-90, 90]"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be within [-180, 180]"))]
    pub longitude: f64,
    /// "active" (default) or "inactive"
    pub status: Option<String>,
    #[validate(range(min = 0.0, message = "power output must not be negative"))]
    pub power_output_kw: Option<f64>,
    pub connector_type: Option<String>,
    /// Ignored: chargers always belong to the authenticated caller.
    #[serde(default, alias = "UserId", alias = "userId")]
    pub owner_id: Option<String>,
}

impl CreateChargerRequest {
    pub fn into_domain(self) -> Result<NewCharger, DomainError> {
        Ok(NewCharger {
            name: self.name,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            status: parse_status(self.status.as_deref())?.unwrap_or_default(),
            power_output_kw: self.power_output_kw,
            connector_type: self.connector_type,
            owner_id: self.owner_id,
        })
    }
}

/// Partial update; absent fields are left untouched. Owner fields in
/// the body are not part of the schema and are dropped.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateChargerRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within [-90, 90]"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be within [-180, 180]"))]
    pub longitude: Option<f64>,
    pub status: Option<String>,
    #[validate(range(min = 0.0, message = "power output must not be negative"))]
    pub power_output_kw: Option<f64>,
    pub connector_type: Option<String>,
}

impl UpdateChargerRequest {
    pub fn into_domain(self) -> Result<ChargerChanges, DomainError> {
        Ok(ChargerChanges {
            name: self.name,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            status: parse_status(self.status.as_deref())?,
            power_output_kw: self.power_output_kw,
            connector_type: self.connector_type,
        })
    }
}

/// Query string for `GET /api/v1/chargers/nearby`.
///
/// Kept as raw strings so unparseable numbers surface as a 400 with a
/// message naming the parameter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    /// Query latitude in degrees
    pub latitude: Option<String>,
    /// Query longitude in degrees
    pub longitude: Option<String>,
    /// Search radius in kilometres
    pub radius: Option<String>,
}

fn parse_status(raw: Option<&str>) -> Result<Option<ChargerStatus>, DomainError> {
    raw.map(|s| s.parse::<ChargerStatus>().map_err(DomainError::validation))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_legacy_owner_key() {
        let req: CreateChargerRequest = serde_json::from_value(serde_json::json!({
            "name": "Depot",
            "latitude": 1.0,
            "longitude": 2.0,
            "UserId": "someone-else"
        }))
        .unwrap();

        let fields = req.into_domain().unwrap();
        assert_eq!(fields.owner_id.as_deref(), Some("someone-else"));
        assert_eq!(fields.status, ChargerStatus::Active);
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let req = UpdateChargerRequest {
            status: Some("broken".into()),
            ..Default::default()
        };
        assert!(matches!(req.into_domain(), Err(DomainError::Validation(_))));
    }
}
