//! Domain models for fleetcare.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::uuid_utils::canonical;

// =============================================================================
// ASSET & REFERENCE TYPES
// =============================================================================

/// A physical or logical item tracked for maintenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub label: String,
    #[serde(rename = "type", default)]
    pub asset_type: String,
    #[serde(default)]
    pub location: String,
    pub effective_date: DateTime<Utc>,
}

/// A reusable labour item referenced by schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub notes: String,
}

/// A reusable material item referenced by schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub notes: String,
}

/// Anything a schedule can point at by identifier and show by label.
pub trait Reference {
    fn id(&self) -> Uuid;
    fn label(&self) -> &str;
}

impl Reference for Service {
    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl Reference for Consumable {
    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

// =============================================================================
// SCHEDULE TYPES
// =============================================================================

/// The mutable part of a schedule entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleFields {
    pub label: String,
    #[serde(default)]
    pub schedule_type: String,
    /// Recurrence interval in days.
    #[serde(default)]
    pub days: i32,
    #[serde(default)]
    pub services: Vec<Uuid>,
    #[serde(default)]
    pub consumables: Vec<Uuid>,
    #[serde(default)]
    pub notes: String,
}

impl ScheduleFields {
    /// Reject fields the store must never see.
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(Error::InvalidInput("Label is required".to_string()));
        }
        Ok(())
    }
}

/// A schedule entry as embedded in its maintenance record's array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: ScheduleFields,
}

impl Schedule {
    pub fn new(id: Uuid, fields: ScheduleFields) -> Self {
        Self { id, fields }
    }
}

/// A schedule stored as an independent record, and the display shape of
/// every schedule regardless of how it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_id: Option<Uuid>,
    pub asset_id: Uuid,
    #[serde(flatten)]
    pub fields: ScheduleFields,
}

impl ScheduleRecord {
    /// Project an embedded entry into record form using its owner's ids.
    pub fn from_embedded(owner: &Maintenance, schedule: &Schedule) -> Self {
        Self {
            id: schedule.id,
            maintenance_id: Some(owner.id),
            asset_id: owner.asset_id,
            fields: schedule.fields.clone(),
        }
    }
}

/// How schedule entries are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageShape {
    /// Nested array inside the owning maintenance record.
    Embedded,
    /// Independent records carrying maintenance and asset ids.
    Referenced,
}

impl StorageShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageShape::Embedded => "embedded",
            StorageShape::Referenced => "referenced",
        }
    }
}

impl std::str::FromStr for StorageShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedded" => Ok(StorageShape::Embedded),
            "referenced" => Ok(StorageShape::Referenced),
            other => Err(Error::Config(format!(
                "unknown schedule storage shape '{}' (expected 'embedded' or 'referenced')",
                other
            ))),
        }
    }
}

// =============================================================================
// MAINTENANCE
// =============================================================================

/// A named maintenance program attached to exactly one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: Uuid,
    pub label: String,
    pub asset_id: Uuid,
    /// Never absent once read: a stored null or missing array becomes empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub schedules: Vec<Schedule>,
}

impl Maintenance {
    pub fn new(id: Uuid, asset_id: Uuid, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            asset_id,
            schedules: Vec::new(),
        }
    }

    pub fn schedule(&self, schedule_id: Uuid) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == schedule_id)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// RESOLUTION TYPES
// =============================================================================

/// Deduplicated identifier sets referenced by a group of schedules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdSets {
    pub services: BTreeSet<Uuid>,
    pub consumables: BTreeSet<Uuid>,
}

impl IdSets {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.consumables.is_empty()
    }

    pub fn extend(&mut self, fields: &ScheduleFields) {
        self.services.extend(fields.services.iter().copied());
        self.consumables.extend(fields.consumables.iter().copied());
    }
}

/// Identifier → label lookups built per request; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameMaps {
    pub services: BTreeMap<String, String>,
    pub consumables: BTreeMap<String, String>,
}

impl NameMaps {
    pub fn service_name(&self, id: &Uuid) -> Option<&str> {
        self.services.get(&canonical(id)).map(String::as_str)
    }

    pub fn consumable_name(&self, id: &Uuid) -> Option<&str> {
        self.consumables.get(&canonical(id)).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uuid_utils::new_v7;

    fn fields(label: &str) -> ScheduleFields {
        ScheduleFields {
            label: label.to_string(),
            schedule_type: "interval".to_string(),
            days: 90,
            ..Default::default()
        }
    }

    #[test]
    fn test_maintenance_null_schedules_normalise_to_empty() {
        let id = new_v7();
        let asset = new_v7();
        let json = format!(
            r#"{{"id":"{}","label":"Oil","asset_id":"{}","schedules":null}}"#,
            id, asset
        );
        let m: Maintenance = serde_json::from_str(&json).unwrap();
        assert!(m.schedules.is_empty());
    }

    #[test]
    fn test_maintenance_missing_schedules_normalise_to_empty() {
        let json = format!(
            r#"{{"id":"{}","label":"Oil","asset_id":"{}"}}"#,
            new_v7(),
            new_v7()
        );
        let m: Maintenance = serde_json::from_str(&json).unwrap();
        assert!(m.schedules.is_empty());
    }

    #[test]
    fn test_schedule_serialises_flat() {
        let s = Schedule::new(new_v7(), fields("Quarterly"));
        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(value["label"], "Quarterly");
        assert_eq!(value["days"], 90);
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn test_asset_type_field_name() {
        let asset = Asset {
            id: new_v7(),
            label: "Truck 7".into(),
            asset_type: "vehicle".into(),
            location: "Depot".into(),
            effective_date: Utc::now(),
        };
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["type"], "vehicle");
    }

    #[test]
    fn test_record_from_embedded_carries_owner_ids() {
        let mut m = Maintenance::new(new_v7(), new_v7(), "Oil Changes");
        let s = Schedule::new(new_v7(), fields("Quarterly"));
        m.schedules.push(s.clone());

        let record = ScheduleRecord::from_embedded(&m, &s);
        assert_eq!(record.maintenance_id, Some(m.id));
        assert_eq!(record.asset_id, m.asset_id);
        assert_eq!(record.fields, s.fields);
    }

    #[test]
    fn test_fields_validation() {
        assert!(fields("Quarterly").validate().is_ok());
        assert!(fields("  ").validate().unwrap_err().is_client_error());

        let mut negative = fields("Weekly");
        negative.days = -1;
        assert!(negative.validate().is_ok());
    }

    #[test]
    fn test_storage_shape_parse() {
        assert_eq!(
            "Embedded".parse::<StorageShape>().unwrap(),
            StorageShape::Embedded
        );
        assert_eq!(
            "referenced".parse::<StorageShape>().unwrap(),
            StorageShape::Referenced
        );
        assert!(matches!(
            "nested".parse::<StorageShape>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_id_sets_extend_deduplicates() {
        let a = new_v7();
        let b = new_v7();
        let mut sets = IdSets::default();
        sets.extend(&ScheduleFields {
            services: vec![a, b],
            ..fields("one")
        });
        sets.extend(&ScheduleFields {
            services: vec![b],
            ..fields("two")
        });
        assert_eq!(sets.services.len(), 2);
        assert!(sets.consumables.is_empty());
    }
}
