//! Display structures handed to the rendering collaborator.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use fleet_core::{Consumable, Maintenance, NameMaps, ScheduleRecord, Service};

/// Every schedule of one asset, with labels for the ids they reference.
#[derive(Debug, Clone, Serialize)]
pub struct AssetScheduleView {
    pub asset_id: Uuid,
    pub asset_label: String,
    pub maintenances: Vec<Maintenance>,
    pub schedules: Vec<ScheduleRecord>,
    /// Keyed by exactly the ids the listed schedules reference.
    pub names: NameMaps,
    /// Full catalogs for pickers.
    pub services: Vec<Service>,
    pub consumables: Vec<Consumable>,
    /// Maintenance id → label, for showing each schedule's owner.
    pub maintenance_labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
}

/// Maintenances of one asset.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceListView {
    pub asset_id: Uuid,
    pub asset_label: String,
    pub maintenances: Vec<Maintenance>,
    pub services: Vec<Service>,
    pub consumables: Vec<Consumable>,
    /// Built from the whole catalogs.
    pub names: NameMaps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
}

/// One maintenance with its schedules.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceView {
    pub maintenance: Maintenance,
    pub schedules: Vec<ScheduleRecord>,
    pub names: NameMaps,
}
