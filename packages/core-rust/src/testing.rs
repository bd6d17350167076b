//! Recording fakes of the backing services, shared by unit tests.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::ServiceError;
use crate::traits::{PartnerDirectory, ValueMapping};
use crate::types::{ParameterKind, ParameterValue, Value};

/// Build a sequence key from string tokens.
pub(crate) fn key(tokens: &[&str]) -> Value {
    Value::Array(tokens.iter().map(|t| Value::from(*t)).collect())
}

/// Partner id whose every call fails.
const BROKEN: &str = "BROKEN";

fn check(partner_id: &str) -> Result<(), ServiceError> {
    if partner_id == BROKEN {
        return Err(ServiceError::new(format!("partner '{partner_id}' is unavailable")));
    }
    Ok(())
}

/// In-memory directory with a single partner, `S4H400`.
pub(crate) struct FakeDirectory {
    calls: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub(crate) fn sample() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl PartnerDirectory for FakeDirectory {
    fn partner_id(
        &self,
        agency: &str,
        scheme: &str,
        alternative_id: &str,
    ) -> Result<Option<String>, ServiceError> {
        self.record(format!("partner_id({agency}, {scheme}, {alternative_id})"));
        Ok(((agency, scheme, alternative_id) == ("Landscape", "S4HANA", "DEV"))
            .then(|| "S4H400".to_string()))
    }

    fn alternative_partner_id(
        &self,
        agency: &str,
        scheme: &str,
        partner_id: &str,
    ) -> Result<Option<String>, ServiceError> {
        self.record(format!("alternative_partner_id({agency}, {scheme}, {partner_id})"));
        check(partner_id)?;
        Ok(((agency, scheme, partner_id) == ("Landscape", "S4HANA", "S4H400"))
            .then(|| "DEV".to_string()))
    }

    fn authorized_users(&self, partner_id: &str) -> Result<Vec<String>, ServiceError> {
        self.record(format!("authorized_users({partner_id})"));
        check(partner_id)?;
        if partner_id != "S4H400" {
            return Ok(Vec::new());
        }
        Ok(vec!["payrollextension".into(), "user1".into(), "user2".into()])
    }

    fn parameter(
        &self,
        parameter_id: &str,
        partner_id: &str,
        kind: ParameterKind,
    ) -> Result<Option<ParameterValue>, ServiceError> {
        self.record(format!("parameter({parameter_id}, {partner_id}, {kind:?})"));
        check(partner_id)?;
        let value = match (partner_id, parameter_id) {
            ("S4H400", "hostname") => Some(ParameterValue::Text("s4h.somedomain.corp".into())),
            ("S4H400", "SSL_Cert") => Some(ParameterValue::Binary(b"-----BEGIN".to_vec())),
            _ => None,
        };
        Ok(value)
    }

    fn partner_id_of_authorized_user(&self, user: &str) -> Result<Option<String>, ServiceError> {
        self.record(format!("partner_id_of_authorized_user({user})"));
        Ok(matches!(user, "payrollextension" | "user1" | "user2").then(|| "S4H400".to_string()))
    }
}

/// Unit-of-measure mapping from `EDIFACT/UOM_CODE` to `COCO/UOM_TEXT`.
pub(crate) struct FakeMapping {
    table: HashMap<&'static str, &'static str>,
    calls: Mutex<Vec<String>>,
}

impl FakeMapping {
    pub(crate) fn sample() -> Self {
        Self {
            table: HashMap::from([("PCE", "piece"), ("KGM", "kg"), ("BX", "box")]),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl ValueMapping for FakeMapping {
    fn mapped_value(
        &self,
        source_agency: &str,
        source_identifier: &str,
        source_value: &str,
        target_agency: &str,
        target_identifier: &str,
    ) -> Result<Option<String>, ServiceError> {
        self.calls.lock().push(format!(
            "{source_agency}/{source_identifier}/{source_value}->{target_agency}/{target_identifier}"
        ));
        if source_value == BROKEN {
            return Err(ServiceError::new("value mapping store offline"));
        }
        let scheme = (source_agency, source_identifier, target_agency, target_identifier);
        if scheme != ("EDIFACT", "UOM_CODE", "COCO", "UOM_TEXT") {
            return Ok(None);
        }
        Ok(self.table.get(source_value).map(|v| (*v).to_string()))
    }
}
