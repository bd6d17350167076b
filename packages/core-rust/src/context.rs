use std::fmt;

/// Partner directory binding: a fixed partner id supplied to every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerBinding {
    pub partner_id: String,
}

impl PartnerBinding {
    pub fn new(partner_id: impl Into<String>) -> Self {
        Self {
            partner_id: partner_id.into(),
        }
    }
}

/// Value mapping binding: the source and target schemes of every mapping
/// performed by a bound resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingBinding {
    pub source_agency: String,
    pub source_identifier: String,
    pub target_agency: String,
    pub target_identifier: String,
}

impl fmt::Display for MappingBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}}}",
            self.source_agency, self.source_identifier, self.target_agency, self.target_identifier
        )
    }
}
