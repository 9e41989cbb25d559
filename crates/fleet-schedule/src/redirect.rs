//! Post-mutation redirects.
//!
//! Every redirect names a list page, always carries `asset_id`, and may carry
//! a human readable `message` with a `type` of `success` or `error`. Values
//! are percent-encoded; decoding the query yields the texts below exactly.

use std::fmt;

use uuid::Uuid;

use fleet_core::defaults::{MAINTENANCES_PATH, SCHEDULES_PATH};
use fleet_core::{canonical, Maintenance, Result};

pub const MAINTENANCE_CREATED: &str = "Maintenance created successfully";
pub const MAINTENANCE_UPDATED: &str = "Maintenance updated successfully";
pub const MAINTENANCE_DELETED: &str = "Maintenance deleted successfully";
pub const SCHEDULE_ADDED: &str = "Schedule added successfully";
pub const SCHEDULE_UPDATED: &str = "Schedule updated successfully";
pub const SCHEDULE_DELETED: &str = "Schedule deleted successfully";

/// Prefix of the message shown when creating a maintenance fails.
pub const MAINTENANCE_CREATE_FAILED: &str = "Error creating maintenance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Success => "success",
            MessageType::Error => "error",
        }
    }
}

/// A redirect back to a list page for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    path: &'static str,
    asset_id: Uuid,
    message: Option<(String, MessageType)>,
}

impl Redirect {
    pub fn maintenances(asset_id: Uuid) -> Self {
        Self {
            path: MAINTENANCES_PATH,
            asset_id,
            message: None,
        }
    }

    pub fn schedules(asset_id: Uuid) -> Self {
        Self {
            path: SCHEDULES_PATH,
            asset_id,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>, kind: MessageType) -> Self {
        self.message = Some((message.into(), kind));
        self
    }

    pub fn success(self, message: impl Into<String>) -> Self {
        self.with_message(message, MessageType::Success)
    }

    pub fn error(self, message: impl Into<String>) -> Self {
        self.with_message(message, MessageType::Error)
    }

    /// Result of a create-maintenance attempt.
    ///
    /// Storage failures become an error message on the list page instead of
    /// an error response. Client errors are still returned.
    pub fn after_create_maintenance(asset_id: Uuid, result: Result<Maintenance>) -> Result<Self> {
        match result {
            Ok(_) => Ok(Self::maintenances(asset_id).success(MAINTENANCE_CREATED)),
            Err(e) if e.is_client_error() => Err(e),
            Err(e) => Ok(Self::maintenances(asset_id)
                .error(format!("{}: {}", MAINTENANCE_CREATE_FAILED, e))),
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn asset_id(&self) -> Uuid {
        self.asset_id
    }

    pub fn message(&self) -> Option<(&str, MessageType)> {
        self.message.as_ref().map(|(m, k)| (m.as_str(), *k))
    }

    /// The `Location` header value.
    pub fn location(&self) -> String {
        let mut url = format!(
            "{}?asset_id={}",
            self.path,
            urlencoding::encode(&canonical(&self.asset_id))
        );
        if let Some((message, kind)) = &self.message {
            url.push_str("&message=");
            url.push_str(&urlencoding::encode(message));
            url.push_str("&type=");
            url.push_str(kind.as_str());
        }
        url
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::{new_v7, Error};

    fn decoded_query(location: &str) -> Vec<(String, String)> {
        let query = location.split_once('?').map(|(_, q)| q).unwrap_or("");
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), urlencoding::decode(v).unwrap().into_owned()))
            .collect()
    }

    #[test]
    fn test_plain_redirect_has_only_asset_id() {
        let asset = new_v7();
        let r = Redirect::schedules(asset);
        assert_eq!(r.location(), format!("/schedules?asset_id={}", asset));
    }

    #[test]
    fn test_success_message_round_trips_exactly() {
        let asset = new_v7();
        let location = Redirect::schedules(asset).success(SCHEDULE_ADDED).location();
        assert!(location.starts_with("/schedules?"));
        assert!(!location.contains(' '));

        let query = decoded_query(&location);
        assert_eq!(
            query,
            vec![
                ("asset_id".to_string(), asset.to_string()),
                ("message".to_string(), "Schedule added successfully".to_string()),
                ("type".to_string(), "success".to_string()),
            ]
        );
    }

    #[test]
    fn test_create_failure_downgrades_to_error_message() {
        let asset = new_v7();
        let failed: Result<Maintenance> = Err(Error::Timeout("insert_maintenance".into()));
        let r = Redirect::after_create_maintenance(asset, failed).unwrap();

        let (message, kind) = r.message().unwrap();
        assert_eq!(kind, MessageType::Error);
        assert_eq!(message, "Error creating maintenance: Timed out: insert_maintenance");

        let query = decoded_query(&r.location());
        assert_eq!(query[2], ("type".to_string(), "error".to_string()));
    }

    #[test]
    fn test_create_success_and_client_error() {
        let asset = new_v7();
        let ok = Redirect::after_create_maintenance(
            asset,
            Ok(Maintenance::new(new_v7(), asset, "Oil Changes")),
        )
        .unwrap();
        assert_eq!(ok.path(), "/maintenances");
        assert_eq!(ok.message(), Some((MAINTENANCE_CREATED, MessageType::Success)));

        let bad = Redirect::after_create_maintenance(
            asset,
            Err(Error::InvalidInput("Label is required".into())),
        );
        assert!(bad.is_err());
    }
}
