//! Partner directory resolver.
//!
//! The first token names the operation; the rest are its arguments. Calls on
//! an unbound resolver pass the partner id right after the operation name for
//! every operation that needs one. A bound resolver supplies it from its
//! [`PartnerBinding`] and the remaining tokens shift left by one.
//!
//! ```text
//! ["Parameter", "S4H400", "hostname"]            unbound
//! ["Parameter", "hostname"]                      bound to S4H400
//! ["Parameter", "S4H400", "SSL_Cert", "BINARYDATAB64"]
//! ["PartnerIdInstance", "Landscape", "S4HANA", "DEV"]   -> bound handle
//! "S4H400"                                       -> bound handle (Instance)
//! ```

use std::fmt;
use std::sync::{Arc, LazyLock};

use base64::Engine as _;
use tracing::{debug, debug_span};

use crate::context::PartnerBinding;
use crate::dispatch::{check_arity, downstream, text_or_empty, Resolution, Resolver};
use crate::error::{DispatchError, ServiceError};
use crate::registry::{OperationDescriptor, OperationRegistry};
use crate::tokens::{normalize, TokenSequence};
use crate::traits::PartnerDirectory;
use crate::types::{ContentType, ParameterValue, Payload, Value};

/// Service name reported in downstream error messages.
pub const SERVICE_NAME: &str = "PartnerDirectoryService";

/// Operation a bare scalar key is shorthand for.
const INSTANCE: &str = "Instance";

/// Validated arguments handed to a directory operation handler.
pub struct DirectoryCall<'a> {
    pub service: &'a dyn PartnerDirectory,
    /// Partner id from the binding context or the call tokens. `Some` exactly
    /// when the operation declares a bound parameter.
    pub partner_id: Option<&'a str>,
    /// Positional arguments after the operation name and partner id.
    pub args: &'a [String],
}

impl DirectoryCall<'_> {
    fn partner(&self) -> &str {
        self.partner_id.unwrap_or_default()
    }

    fn arg(&self, idx: usize) -> &str {
        self.args.get(idx).map_or("", String::as_str)
    }
}

/// What a directory handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryOutcome {
    Value(Payload),
    /// Bind a new resolver to this partner id.
    Bind(String),
}

pub type DirectoryHandler = fn(&DirectoryCall<'_>) -> Result<DirectoryOutcome, ServiceError>;

static OPERATIONS: &[OperationDescriptor<DirectoryHandler>] = &[
    OperationDescriptor {
        name: INSTANCE,
        min_args: 1,
        param_names: &["partnerId"],
        bound_param: None,
        handler: instance,
    },
    OperationDescriptor {
        name: "PartnerId",
        min_args: 3,
        param_names: &["agency", "scheme", "alternativePartnerId"],
        bound_param: None,
        handler: partner_id,
    },
    OperationDescriptor {
        name: "PartnerIdInstance",
        min_args: 3,
        param_names: &["agency", "scheme", "alternativePartnerId"],
        bound_param: None,
        handler: partner_id_instance,
    },
    OperationDescriptor {
        name: "AlternativePartnerId",
        min_args: 2,
        param_names: &["agency", "scheme"],
        bound_param: Some("partnerId"),
        handler: alternative_partner_id,
    },
    OperationDescriptor {
        name: "AuthorizedUsers",
        min_args: 0,
        param_names: &[],
        bound_param: Some("partnerId"),
        handler: authorized_users,
    },
    OperationDescriptor {
        name: "Parameter",
        min_args: 1,
        param_names: &[
            "parameterId",
            "type (optional 'String', 'BinaryData', 'BinaryDataB64')",
        ],
        bound_param: Some("partnerId"),
        handler: parameter,
    },
    OperationDescriptor {
        name: "PartnerIdOfAuthorizedUser",
        min_args: 1,
        param_names: &["authorizedUser"],
        bound_param: None,
        handler: partner_id_of_authorized_user,
    },
    OperationDescriptor {
        name: "PartnerIdInstanceOfAuthorizedUser",
        min_args: 1,
        param_names: &["authorizedUser"],
        bound_param: None,
        handler: partner_id_instance_of_authorized_user,
    },
];

static REGISTRY: LazyLock<OperationRegistry<DirectoryHandler>> =
    LazyLock::new(|| OperationRegistry::new(OPERATIONS));

/// Process-wide partner directory operation table.
pub fn registry() -> &'static OperationRegistry<DirectoryHandler> {
    &REGISTRY
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn instance(call: &DirectoryCall<'_>) -> Result<DirectoryOutcome, ServiceError> {
    Ok(DirectoryOutcome::Bind(call.arg(0).to_string()))
}

fn partner_id(call: &DirectoryCall<'_>) -> Result<DirectoryOutcome, ServiceError> {
    let pid = call.service.partner_id(call.arg(0), call.arg(1), call.arg(2))?;
    Ok(DirectoryOutcome::Value(text_or_empty(pid)))
}

fn partner_id_instance(call: &DirectoryCall<'_>) -> Result<DirectoryOutcome, ServiceError> {
    let (agency, scheme, alternative) = (call.arg(0), call.arg(1), call.arg(2));
    call.service
        .partner_id(agency, scheme, alternative)?
        .map(DirectoryOutcome::Bind)
        .ok_or_else(|| {
            ServiceError::new(format!(
                "no partner found for alternative partner id '{alternative}' ({agency}, {scheme})"
            ))
        })
}

fn alternative_partner_id(call: &DirectoryCall<'_>) -> Result<DirectoryOutcome, ServiceError> {
    let alternative = call
        .service
        .alternative_partner_id(call.arg(0), call.arg(1), call.partner())?;
    Ok(DirectoryOutcome::Value(text_or_empty(alternative)))
}

fn authorized_users(call: &DirectoryCall<'_>) -> Result<DirectoryOutcome, ServiceError> {
    let users = call.service.authorized_users(call.partner())?;
    Ok(DirectoryOutcome::Value(Payload::List(users)))
}

fn parameter(call: &DirectoryCall<'_>) -> Result<DirectoryOutcome, ServiceError> {
    let content_type = call
        .args
        .get(1)
        .map(|token| ContentType::from_token(token))
        .unwrap_or_default();
    let value = call
        .service
        .parameter(call.arg(0), call.partner(), content_type.parameter_kind())?;
    Ok(DirectoryOutcome::Value(shape_parameter(value, content_type)))
}

/// Binary content is returned raw unless base64 was requested; text content
/// is returned as is whatever the requested type.
fn shape_parameter(value: Option<ParameterValue>, content_type: ContentType) -> Payload {
    match value {
        None => Payload::Empty,
        Some(ParameterValue::Text(text)) => Payload::Text(text),
        Some(ParameterValue::Binary(bytes)) if content_type == ContentType::BinaryDataB64 => {
            Payload::Text(base64::engine::general_purpose::STANDARD.encode(bytes))
        }
        Some(ParameterValue::Binary(bytes)) => Payload::Binary(bytes),
    }
}

fn partner_id_of_authorized_user(
    call: &DirectoryCall<'_>,
) -> Result<DirectoryOutcome, ServiceError> {
    let pid = call.service.partner_id_of_authorized_user(call.arg(0))?;
    Ok(DirectoryOutcome::Value(text_or_empty(pid)))
}

fn partner_id_instance_of_authorized_user(
    call: &DirectoryCall<'_>,
) -> Result<DirectoryOutcome, ServiceError> {
    let user = call.arg(0);
    call.service
        .partner_id_of_authorized_user(user)?
        .map(DirectoryOutcome::Bind)
        .ok_or_else(|| {
            ServiceError::new(format!("no partner found for authorized user '{user}'"))
        })
}

// ---------------------------------------------------------------------------
// DirectoryResolver
// ---------------------------------------------------------------------------

/// Resolver over a [`PartnerDirectory`], optionally bound to one partner.
///
/// Binding never mutates an instance: binding operations return a new
/// resolver that shares the same backing service.
#[derive(Clone)]
pub struct DirectoryResolver {
    service: Arc<dyn PartnerDirectory>,
    binding: Option<PartnerBinding>,
}

impl DirectoryResolver {
    /// Unbound resolver.
    #[must_use]
    pub fn new(service: Arc<dyn PartnerDirectory>) -> Self {
        Self {
            service,
            binding: None,
        }
    }

    /// New resolver bound to `partner_id`, sharing this resolver's service.
    #[must_use]
    pub fn bind(&self, partner_id: impl Into<String>) -> Self {
        Self {
            service: Arc::clone(&self.service),
            binding: Some(PartnerBinding::new(partner_id)),
        }
    }

    #[must_use]
    pub fn binding(&self) -> Option<&PartnerBinding> {
        self.binding.as_ref()
    }

    fn tokens(key: &Value) -> Result<TokenSequence, DispatchError> {
        match key.as_token().filter(|_| key.is_scalar()) {
            Some(partner_id) => TokenSequence::try_from(vec![INSTANCE.to_string(), partner_id]),
            None => normalize(key),
        }
    }

    fn dispatch(&self, key: &Value) -> Result<Resolution<Self>, DispatchError> {
        let tokens = Self::tokens(key)?;
        let op = registry().lookup(tokens.head())?;
        let args = tokens.tail();
        check_arity(op, args.len(), self.binding.is_some())?;

        let (partner_id, args) = match (op.bound_param, &self.binding) {
            (None, _) => (None, args),
            (Some(_), Some(binding)) => (Some(binding.partner_id.as_str()), args),
            (Some(_), None) => (Some(args[0].as_str()), &args[1..]),
        };
        debug!(operation = op.name, partner_id, args = args.len(), "invoking operation");

        let call = DirectoryCall {
            service: self.service.as_ref(),
            partner_id,
            args,
        };
        match (op.handler)(&call).map_err(downstream(SERVICE_NAME, op.name))? {
            DirectoryOutcome::Value(payload) => Ok(Resolution::Value(payload)),
            DirectoryOutcome::Bind(pid) => Ok(Resolution::Bound(self.bind(pid))),
        }
    }
}

impl Resolver for DirectoryResolver {
    const SERVICE: &'static str = SERVICE_NAME;

    fn resolve(&self, key: &Value) -> Resolution<Self> {
        let span = debug_span!("resolve", service = SERVICE_NAME, bound = self.is_bound());
        let _enter = span.enter();
        Resolution::from_result(self.dispatch(key))
    }

    fn is_bound(&self) -> bool {
        self.binding.is_some()
    }
}

impl fmt::Display for DirectoryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            Some(binding) => write!(f, "PartnerDirectory ({})", binding.partner_id),
            None => f.write_str("PartnerDirectory (not bound to a partnerId)"),
        }
    }
}

impl fmt::Debug for DirectoryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryResolver")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
