//! URL-encoded form and query parsing.
//!
//! Handlers read values from the request body first and the query string
//! second, so `asset_id` may arrive either way. Repeated keys are kept in
//! order for the `services[]` and `consumables[]` multi-selects.

use url::form_urlencoded;
use uuid::Uuid;

use fleet_core::{parse_id, parse_id_list, parse_optional_id, Result, ScheduleFields};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    pairs: Vec<(String, String)>,
}

impl RawForm {
    pub fn parse(input: &[u8]) -> Self {
        Self {
            pairs: form_urlencoded::parse(input).into_owned().collect(),
        }
    }

    /// Body pairs followed by query pairs.
    pub fn from_parts(query: Option<&str>, body: &[u8]) -> Self {
        let mut form = Self::parse(body);
        if let Some(query) = query {
            form.pairs.extend(Self::parse(query.as_bytes()).pairs);
        }
        form
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`, or the empty string.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Every value for `key`, in submission order.
    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self, field: &str) -> Result<Uuid> {
        parse_id(field, self.value(field))
    }

    pub fn optional_id(&self, field: &str) -> Result<Option<Uuid>> {
        parse_optional_id(field, self.get(field))
    }

    /// Schedule fields as submitted by the add and edit forms.
    pub fn schedule_fields(&self) -> ScheduleFields {
        let schedule_type = self
            .get("shedule_type")
            .or_else(|| self.get("schedule_type"))
            .unwrap_or("");

        ScheduleFields {
            label: self.value("label").trim().to_string(),
            schedule_type: schedule_type.to_string(),
            days: parse_days(self.value("days")),
            services: parse_id_list(self.all("services[]")),
            consumables: parse_id_list(self.all("consumables[]")),
            notes: self.value("notes").to_string(),
        }
    }
}

/// Unparseable input counts as zero days.
pub fn parse_days(raw: &str) -> i32 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::new_v7;

    #[test]
    fn test_body_precedes_query() {
        let form = RawForm::from_parts(Some("asset_id=from-query&x=1"), b"asset_id=from-body");
        assert_eq!(form.get("asset_id"), Some("from-body"));
        assert_eq!(form.get("x"), Some("1"));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn test_schedule_fields_from_form() {
        let (s1, s2, c1) = (new_v7(), new_v7(), new_v7());
        let body = format!(
            "label=+Quarterly+&shedule_type=interval&days=90&services%5B%5D={}&services%5B%5D=junk&services%5B%5D={}&consumables%5B%5D={}&notes=Use+5W-30",
            s1, s2, c1
        );
        let fields = RawForm::parse(body.as_bytes()).schedule_fields();

        assert_eq!(fields.label, "Quarterly");
        assert_eq!(fields.schedule_type, "interval");
        assert_eq!(fields.days, 90);
        assert_eq!(fields.services, vec![s1, s2]);
        assert_eq!(fields.consumables, vec![c1]);
        assert_eq!(fields.notes, "Use 5W-30");
    }

    #[test]
    fn test_schedule_type_alternate_spelling() {
        let fields = RawForm::parse(b"label=x&schedule_type=calendar").schedule_fields();
        assert_eq!(fields.schedule_type, "calendar");
    }

    #[test]
    fn test_days_fall_back_to_zero() {
        assert_eq!(parse_days("abc"), 0);
        assert_eq!(parse_days(""), 0);
        assert_eq!(parse_days(" 30 "), 30);
        assert_eq!(parse_days("-7"), -7);
    }

    #[test]
    fn test_id_errors_name_the_field() {
        let form = RawForm::parse(b"asset_id=nope");
        assert_eq!(
            form.id("asset_id").unwrap_err().to_string(),
            "Invalid input: Invalid asset_id"
        );
        assert_eq!(
            form.id("maintenance_id").unwrap_err().to_string(),
            "Invalid input: Missing maintenance_id"
        );
        assert_eq!(form.optional_id("maintenance_id").unwrap(), None);
    }
}
