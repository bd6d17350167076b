//! Fixture-backed implementations of the backing services.
//!
//! A fixture file is JSON:
//!
//! ```json
//! {
//!   "partners": {
//!     "S4H400": {
//!       "alternative_ids": [{ "agency": "Landscape", "scheme": "S4HANA", "id": "DEV" }],
//!       "authorized_users": ["user1"],
//!       "parameters": {
//!         "hostname": { "text": "s4h.somedomain.corp" },
//!         "SSL_Cert": { "binary": "LS0tLS1CRUdJTg==" }
//!       }
//!     }
//!   },
//!   "value_mappings": [{
//!     "source_agency": "EDIFACT", "source_identifier": "UOM_CODE", "source_value": "PCE",
//!     "target_agency": "COCO", "target_identifier": "UOM_TEXT", "target_value": "piece"
//!   }]
//! }
//! ```
//!
//! Both services are built once and are read-only afterwards.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use base64::Engine as _;
use lookup_core::{ParameterKind, ParameterValue, PartnerDirectory, ServiceError, ValueMapping};
use serde::Deserialize;

/// Errors raised while loading fixtures.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed fixture JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("parameter '{parameter}' of partner '{partner}' is not valid base64: {source}")]
    InvalidBinary {
        partner: String,
        parameter: String,
        source: base64::DecodeError,
    },
}

// ---------------------------------------------------------------------------
// Fixture file schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub partners: BTreeMap<String, PartnerFixture>,
    pub value_mappings: Vec<ValueMappingRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartnerFixture {
    pub alternative_ids: Vec<AlternativeId>,
    pub authorized_users: Vec<String>,
    pub parameters: BTreeMap<String, ParameterFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlternativeId {
    pub agency: String,
    pub scheme: String,
    pub id: String,
}

/// Parameter content; binary content is written as base64.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterFixture {
    Text(String),
    Binary(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValueMappingRow {
    pub source_agency: String,
    pub source_identifier: String,
    pub source_value: String,
    pub target_agency: String,
    pub target_identifier: String,
    pub target_value: String,
}

impl Fixtures {
    /// Parse fixtures from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Parse`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Io`] if the file cannot be read and
    /// [`FixtureError::Parse`] if it is not a valid fixture document.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

// ---------------------------------------------------------------------------
// InMemoryDirectory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Partner {
    alternative_ids: HashMap<(String, String), String>,
    authorized_users: Vec<String>,
    parameters: HashMap<String, ParameterValue>,
}

/// Read-only [`PartnerDirectory`] built from fixtures.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    partners: HashMap<String, Partner>,
    by_alternative_id: HashMap<(String, String, String), String>,
    by_user: HashMap<String, String>,
}

impl InMemoryDirectory {
    /// Index the partners of `fixtures`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidBinary`] if a binary parameter is not
    /// valid base64.
    pub fn from_fixtures(fixtures: &Fixtures) -> Result<Self, FixtureError> {
        let mut directory = Self::default();
        for (partner_id, fixture) in &fixtures.partners {
            let mut partner = Partner {
                authorized_users: fixture.authorized_users.clone(),
                ..Partner::default()
            };
            for alt in &fixture.alternative_ids {
                partner
                    .alternative_ids
                    .insert((alt.agency.clone(), alt.scheme.clone()), alt.id.clone());
                directory.by_alternative_id.insert(
                    (alt.agency.clone(), alt.scheme.clone(), alt.id.clone()),
                    partner_id.clone(),
                );
            }
            for user in &fixture.authorized_users {
                directory.by_user.insert(user.clone(), partner_id.clone());
            }
            for (parameter_id, value) in &fixture.parameters {
                let value = match value {
                    ParameterFixture::Text(text) => ParameterValue::Text(text.clone()),
                    ParameterFixture::Binary(encoded) => ParameterValue::Binary(
                        base64::engine::general_purpose::STANDARD
                            .decode(encoded)
                            .map_err(|source| FixtureError::InvalidBinary {
                                partner: partner_id.clone(),
                                parameter: parameter_id.clone(),
                                source,
                            })?,
                    ),
                };
                partner.parameters.insert(parameter_id.clone(), value);
            }
            directory.partners.insert(partner_id.clone(), partner);
        }
        Ok(directory)
    }
}

impl PartnerDirectory for InMemoryDirectory {
    fn partner_id(
        &self,
        agency: &str,
        scheme: &str,
        alternative_id: &str,
    ) -> Result<Option<String>, ServiceError> {
        let key = (agency.to_string(), scheme.to_string(), alternative_id.to_string());
        Ok(self.by_alternative_id.get(&key).cloned())
    }

    fn alternative_partner_id(
        &self,
        agency: &str,
        scheme: &str,
        partner_id: &str,
    ) -> Result<Option<String>, ServiceError> {
        let key = (agency.to_string(), scheme.to_string());
        Ok(self
            .partners
            .get(partner_id)
            .and_then(|p| p.alternative_ids.get(&key))
            .cloned())
    }

    fn authorized_users(&self, partner_id: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .partners
            .get(partner_id)
            .map(|p| p.authorized_users.clone())
            .unwrap_or_default())
    }

    fn parameter(
        &self,
        parameter_id: &str,
        partner_id: &str,
        kind: ParameterKind,
    ) -> Result<Option<ParameterValue>, ServiceError> {
        let Some(value) = self
            .partners
            .get(partner_id)
            .and_then(|p| p.parameters.get(parameter_id))
        else {
            return Ok(None);
        };
        match (value, kind) {
            (ParameterValue::Text(_), ParameterKind::Text)
            | (ParameterValue::Binary(_), ParameterKind::Binary) => Ok(Some(value.clone())),
            (ParameterValue::Binary(_), ParameterKind::Text) => Err(ServiceError::new(format!(
                "parameter '{parameter_id}' of partner '{partner_id}' is binary; request it as BinaryData"
            ))),
            (ParameterValue::Text(_), ParameterKind::Binary) => Err(ServiceError::new(format!(
                "parameter '{parameter_id}' of partner '{partner_id}' is a string parameter"
            ))),
        }
    }

    fn partner_id_of_authorized_user(&self, user: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.by_user.get(user).cloned())
    }
}

// ---------------------------------------------------------------------------
// InMemoryValueMapping
// ---------------------------------------------------------------------------

type MappingKey = (String, String, String, String, String);

/// Read-only [`ValueMapping`] built from fixture rows. Later rows win on
/// duplicate keys.
#[derive(Debug, Default)]
pub struct InMemoryValueMapping {
    rows: HashMap<MappingKey, String>,
}

impl InMemoryValueMapping {
    #[must_use]
    pub fn from_fixtures(fixtures: &Fixtures) -> Self {
        let rows = fixtures
            .value_mappings
            .iter()
            .map(|row| {
                (
                    (
                        row.source_agency.clone(),
                        row.source_identifier.clone(),
                        row.source_value.clone(),
                        row.target_agency.clone(),
                        row.target_identifier.clone(),
                    ),
                    row.target_value.clone(),
                )
            })
            .collect();
        Self { rows }
    }
}

impl ValueMapping for InMemoryValueMapping {
    fn mapped_value(
        &self,
        source_agency: &str,
        source_identifier: &str,
        source_value: &str,
        target_agency: &str,
        target_identifier: &str,
    ) -> Result<Option<String>, ServiceError> {
        let key = (
            source_agency.to_string(),
            source_identifier.to_string(),
            source_value.to_string(),
            target_agency.to_string(),
            target_identifier.to_string(),
        );
        Ok(self.rows.get(&key).cloned())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write as _;

    use super::*;

    pub(crate) const SAMPLE: &str = r#"{
        "partners": {
            "S4H400": {
                "alternative_ids": [{ "agency": "Landscape", "scheme": "S4HANA", "id": "DEV" }],
                "authorized_users": ["payrollextension", "user1", "user2"],
                "parameters": {
                    "hostname": { "text": "s4h.somedomain.corp" },
                    "SSL_Cert": { "binary": "LS0tLS1CRUdJTg==" }
                }
            }
        },
        "value_mappings": [
            { "source_agency": "EDIFACT", "source_identifier": "UOM_CODE", "source_value": "PCE",
              "target_agency": "COCO", "target_identifier": "UOM_TEXT", "target_value": "piece" },
            { "source_agency": "EDIFACT", "source_identifier": "UOM_CODE", "source_value": "KGM",
              "target_agency": "COCO", "target_identifier": "UOM_TEXT", "target_value": "kg" },
            { "source_agency": "EDIFACT", "source_identifier": "UOM_CODE", "source_value": "BX",
              "target_agency": "COCO", "target_identifier": "UOM_TEXT", "target_value": "box" }
        ]
    }"#;

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::from_fixtures(&Fixtures::from_json(SAMPLE).unwrap()).unwrap()
    }

    #[test]
    fn directory_resolves_alternative_ids_both_ways() {
        let dir = directory();
        assert_eq!(
            dir.partner_id("Landscape", "S4HANA", "DEV").unwrap().as_deref(),
            Some("S4H400")
        );
        assert_eq!(
            dir.alternative_partner_id("Landscape", "S4HANA", "S4H400").unwrap().as_deref(),
            Some("DEV")
        );
        assert!(dir.partner_id("Landscape", "S4HANA", "PRD").unwrap().is_none());
    }

    #[test]
    fn directory_users_and_reverse_lookup() {
        let dir = directory();
        assert_eq!(
            dir.authorized_users("S4H400").unwrap(),
            vec!["payrollextension", "user1", "user2"]
        );
        assert!(dir.authorized_users("UNKNOWN").unwrap().is_empty());
        assert_eq!(
            dir.partner_id_of_authorized_user("user2").unwrap().as_deref(),
            Some("S4H400")
        );
    }

    #[test]
    fn binary_parameters_are_decoded() {
        let dir = directory();
        assert_eq!(
            dir.parameter("SSL_Cert", "S4H400", ParameterKind::Binary).unwrap(),
            Some(ParameterValue::Binary(b"-----BEGIN".to_vec()))
        );
        assert_eq!(
            dir.parameter("hostname", "S4H400", ParameterKind::Text).unwrap(),
            Some(ParameterValue::Text("s4h.somedomain.corp".into()))
        );
        assert!(dir.parameter("missing", "S4H400", ParameterKind::Text).unwrap().is_none());
    }

    #[test]
    fn parameter_kind_mismatch_is_service_error() {
        let dir = directory();
        let err = dir.parameter("SSL_Cert", "S4H400", ParameterKind::Text).unwrap_err();
        assert!(err.message.contains("is binary"));
        assert!(dir.parameter("hostname", "S4H400", ParameterKind::Binary).is_err());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let fixtures = Fixtures::from_json(
            r#"{ "partners": { "P": { "parameters": { "cert": { "binary": "***" } } } } }"#,
        )
        .unwrap();
        let err = InMemoryDirectory::from_fixtures(&fixtures).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::InvalidBinary { ref partner, ref parameter, .. }
                if partner == "P" && parameter == "cert"
        ));
    }

    #[test]
    fn value_mapping_rows_are_exact_keys() {
        let mapping = InMemoryValueMapping::from_fixtures(&Fixtures::from_json(SAMPLE).unwrap());
        assert_eq!(
            mapping
                .mapped_value("EDIFACT", "UOM_CODE", "PCE", "COCO", "UOM_TEXT")
                .unwrap()
                .as_deref(),
            Some("piece")
        );
        assert!(mapping
            .mapped_value("EDIFACT", "UOM_CODE", "pce", "COCO", "UOM_TEXT")
            .unwrap()
            .is_none());
    }

    #[test]
    fn empty_document_is_valid() {
        let fixtures = Fixtures::from_json("{}").unwrap();
        assert!(fixtures.partners.is_empty());
        assert!(fixtures.value_mappings.is_empty());
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let fixtures = Fixtures::load(file.path()).unwrap();
        assert_eq!(fixtures.value_mappings.len(), 3);

        let missing = Fixtures::load(Path::new("/nonexistent/lookup-fixtures.json")).unwrap_err();
        assert!(matches!(missing, FixtureError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            Fixtures::from_json("{ not json"),
            Err(FixtureError::Parse(_))
        ));
    }
}
