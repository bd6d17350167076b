use crate::error::ServiceError;
use crate::types::{ParameterKind, ParameterValue};

/// Trading-partner directory backing the partner directory resolver.
///
/// Implementations own their connection or session state; the resolver
/// calls them synchronously and converts every `ServiceError` into an error
/// value at its boundary.
pub trait PartnerDirectory: Send + Sync {
    /// Resolve a partner id from an alternative (agency, scheme, id) triple.
    /// Returns `None` when no partner carries that alternative id.
    fn partner_id(
        &self,
        agency: &str,
        scheme: &str,
        alternative_id: &str,
    ) -> Result<Option<String>, ServiceError>;

    /// Alternative id of `partner_id` under (agency, scheme).
    fn alternative_partner_id(
        &self,
        agency: &str,
        scheme: &str,
        partner_id: &str,
    ) -> Result<Option<String>, ServiceError>;

    /// Users authorized to act for `partner_id`, in directory order.
    fn authorized_users(&self, partner_id: &str) -> Result<Vec<String>, ServiceError>;

    /// Fetch a partner parameter in the requested storage kind.
    fn parameter(
        &self,
        parameter_id: &str,
        partner_id: &str,
        kind: ParameterKind,
    ) -> Result<Option<ParameterValue>, ServiceError>;

    /// Partner that `user` is authorized for.
    fn partner_id_of_authorized_user(&self, user: &str) -> Result<Option<String>, ServiceError>;
}

/// Value-mapping table backing the value mapping resolver.
pub trait ValueMapping: Send + Sync {
    /// Translate `source_value` from the source (agency, identifier) scheme
    /// into the target scheme. Returns `None` when no mapping exists.
    fn mapped_value(
        &self,
        source_agency: &str,
        source_identifier: &str,
        source_value: &str,
        target_agency: &str,
        target_identifier: &str,
    ) -> Result<Option<String>, ServiceError>;
}
