//! Value mapping resolver.
//!
//! Unlike the partner directory, calls carry no operation name: the
//! operation follows from the token count and the binding state.
//!
//! | state   | tokens | operation  | tokens mean                                         |
//! |---------|--------|------------|-----------------------------------------------------|
//! | unbound | 4      | `Bind`     | srcAgency, srcIdentifier, trgAgency, trgIdentifier  |
//! | unbound | 5      | `Map`      | srcAgency, srcIdentifier, value, trgAgency, trgIdentifier |
//! | bound   | 1      | `MapBound` | value                                               |
//! | bound   | 2+     | `MapBatch` | value, value, ...                                   |

use std::fmt;
use std::sync::{Arc, LazyLock};

use tracing::{debug, debug_span};

use crate::context::MappingBinding;
use crate::dispatch::{downstream, text_or_empty, Resolution, Resolver};
use crate::error::{DispatchError, ServiceError};
use crate::registry::{OperationDescriptor, OperationRegistry};
use crate::tokens::normalize;
use crate::traits::ValueMapping;
use crate::types::{Payload, Value};

/// Service name reported in downstream error messages.
pub const SERVICE_NAME: &str = "ValueMappingService";

const UNBOUND_SHAPES: &str =
    "Please, pass a sequence with 4 values to bind source|target agency|identifier or 5 values to do value mapping";

/// Validated arguments handed to a mapping operation handler.
pub struct MappingCall<'a> {
    pub service: &'a dyn ValueMapping,
    /// Present for `MapBound` and `MapBatch`.
    pub binding: Option<&'a MappingBinding>,
    pub args: &'a [String],
}

/// What a mapping handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    Value(Payload),
    Bind(MappingBinding),
}

pub type MappingHandler = fn(&MappingCall<'_>) -> Result<MappingOutcome, ServiceError>;

const BIND: usize = 0;
const MAP: usize = 1;
const MAP_BOUND: usize = 2;
const MAP_BATCH: usize = 3;

static OPERATIONS: &[OperationDescriptor<MappingHandler>] = &[
    OperationDescriptor {
        name: "Bind",
        min_args: 4,
        param_names: &["sourceAgency", "sourceIdentifier", "targetAgency", "targetIdentifier"],
        bound_param: None,
        handler: bind,
    },
    OperationDescriptor {
        name: "Map",
        min_args: 5,
        param_names: &[
            "sourceAgency",
            "sourceIdentifier",
            "sourceValue",
            "targetAgency",
            "targetIdentifier",
        ],
        bound_param: None,
        handler: map,
    },
    OperationDescriptor {
        name: "MapBound",
        min_args: 1,
        param_names: &["sourceValue"],
        bound_param: None,
        handler: map_bound,
    },
    OperationDescriptor {
        name: "MapBatch",
        min_args: 2,
        param_names: &["sourceValue", "sourceValue..."],
        bound_param: None,
        handler: map_batch,
    },
];

static REGISTRY: LazyLock<OperationRegistry<MappingHandler>> =
    LazyLock::new(|| OperationRegistry::new(OPERATIONS));

/// Process-wide value mapping operation table.
pub fn registry() -> &'static OperationRegistry<MappingHandler> {
    &REGISTRY
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn bind(call: &MappingCall<'_>) -> Result<MappingOutcome, ServiceError> {
    let [source_agency, source_identifier, target_agency, target_identifier] = call.args else {
        return Err(ServiceError::new("binding needs exactly four values"));
    };
    Ok(MappingOutcome::Bind(MappingBinding {
        source_agency: source_agency.clone(),
        source_identifier: source_identifier.clone(),
        target_agency: target_agency.clone(),
        target_identifier: target_identifier.clone(),
    }))
}

fn map(call: &MappingCall<'_>) -> Result<MappingOutcome, ServiceError> {
    let [source_agency, source_identifier, value, target_agency, target_identifier] = call.args
    else {
        return Err(ServiceError::new("mapping needs exactly five values"));
    };
    let mapped = call.service.mapped_value(
        source_agency,
        source_identifier,
        value,
        target_agency,
        target_identifier,
    )?;
    Ok(MappingOutcome::Value(text_or_empty(mapped)))
}

fn map_with(
    service: &dyn ValueMapping,
    binding: &MappingBinding,
    value: &str,
) -> Result<Option<String>, ServiceError> {
    service.mapped_value(
        &binding.source_agency,
        &binding.source_identifier,
        value,
        &binding.target_agency,
        &binding.target_identifier,
    )
}

fn bound_context<'a>(call: &MappingCall<'a>) -> Result<&'a MappingBinding, ServiceError> {
    call.binding
        .ok_or_else(|| ServiceError::new("resolver is not bound to source|target agency|identifier"))
}

fn map_bound(call: &MappingCall<'_>) -> Result<MappingOutcome, ServiceError> {
    let binding = bound_context(call)?;
    let value = call.args.first().map_or("", String::as_str);
    let mapped = map_with(call.service, binding, value)?;
    Ok(MappingOutcome::Value(text_or_empty(mapped)))
}

/// One mapped value per input value, in input order. Values without a
/// mapping come back as empty strings so positions stay aligned.
fn map_batch(call: &MappingCall<'_>) -> Result<MappingOutcome, ServiceError> {
    let binding = bound_context(call)?;
    let mapped = call
        .args
        .iter()
        .map(|value| map_with(call.service, binding, value).map(Option::unwrap_or_default))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MappingOutcome::Value(Payload::List(mapped)))
}

// ---------------------------------------------------------------------------
// MappingResolver
// ---------------------------------------------------------------------------

/// Resolver over a [`ValueMapping`], optionally bound to a source/target
/// scheme pair.
#[derive(Clone)]
pub struct MappingResolver {
    service: Arc<dyn ValueMapping>,
    binding: Option<MappingBinding>,
}

impl MappingResolver {
    /// Unbound resolver.
    #[must_use]
    pub fn new(service: Arc<dyn ValueMapping>) -> Self {
        Self {
            service,
            binding: None,
        }
    }

    /// New resolver bound to `binding`, sharing this resolver's service.
    #[must_use]
    pub fn bind(&self, binding: MappingBinding) -> Self {
        Self {
            service: Arc::clone(&self.service),
            binding: Some(binding),
        }
    }

    #[must_use]
    pub fn binding(&self) -> Option<&MappingBinding> {
        self.binding.as_ref()
    }

    /// Pick the operation implied by `count` tokens in the current state.
    ///
    /// This is the whole arity check for value mapping: every count that
    /// selects an operation satisfies that operation's minimum.
    fn select(
        &self,
        count: usize,
    ) -> Result<&'static OperationDescriptor<MappingHandler>, DispatchError> {
        let idx = match (self.binding.is_some(), count) {
            (true, 1) => MAP_BOUND,
            (true, n) if n > 1 => MAP_BATCH,
            (false, 4) => BIND,
            (false, 5) => MAP,
            (true, _) => {
                return Err(DispatchError::TokenCount {
                    received: count,
                    expected: "Please, pass at least one value to map",
                })
            }
            (false, _) => {
                return Err(DispatchError::TokenCount {
                    received: count,
                    expected: UNBOUND_SHAPES,
                })
            }
        };
        Ok(&OPERATIONS[idx])
    }

    fn dispatch(&self, key: &Value) -> Result<Resolution<Self>, DispatchError> {
        let tokens = normalize(key)?;
        let op = self.select(tokens.len())?;
        debug!(operation = op.name, values = tokens.len(), "invoking operation");

        let call = MappingCall {
            service: self.service.as_ref(),
            binding: self.binding.as_ref(),
            args: &tokens,
        };
        match (op.handler)(&call).map_err(downstream(SERVICE_NAME, op.name))? {
            MappingOutcome::Value(payload) => Ok(Resolution::Value(payload)),
            MappingOutcome::Bind(binding) => Ok(Resolution::Bound(self.bind(binding))),
        }
    }
}

impl Resolver for MappingResolver {
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

impl fmt::Display for MappingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            Some(binding) => write!(f, "ValueMapping {binding}"),
            None => f.write_str("ValueMapping (not bound to source|target agency|identifier)"),
        }
    }
}

impl fmt::Debug for MappingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingResolver")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{key, FakeMapping};

    fn resolver() -> (Arc<FakeMapping>, MappingResolver) {
        let fake = Arc::new(FakeMapping::sample());
        let resolver = MappingResolver::new(fake.clone());
        (fake, resolver)
    }

    fn uom(resolver: &MappingResolver) -> MappingResolver {
        resolver
            .resolve(&key(&["EDIFACT", "UOM_CODE", "COCO", "UOM_TEXT"]))
            .into_bound()
            .expect("four tokens bind")
    }

    #[test]
    fn registry_lists_shape_operations() {
        assert_eq!(registry().names(), vec!["Bind", "Map", "MapBound", "MapBatch"]);
    }

    #[test]
    fn four_tokens_bind_without_calling_service() {
        let (fake, unbound) = resolver();
        let bound = uom(&unbound);
        assert_eq!(
            bound.binding(),
            Some(&MappingBinding {
                source_agency: "EDIFACT".into(),
                source_identifier: "UOM_CODE".into(),
                target_agency: "COCO".into(),
                target_identifier: "UOM_TEXT".into(),
            })
        );
        assert!(!unbound.is_bound());
        assert!(fake.calls().is_empty());
        assert_eq!(bound.to_string(), "ValueMapping {EDIFACT, UOM_CODE, COCO, UOM_TEXT}");
        assert_eq!(
            unbound.to_string(),
            "ValueMapping (not bound to source|target agency|identifier)"
        );
    }

    #[test]
    fn curried_mapping_matches_direct_mapping() {
        let (fake, unbound) = resolver();
        let direct = unbound.resolve(&key(&["EDIFACT", "UOM_CODE", "PCE", "COCO", "UOM_TEXT"]));
        let curried = uom(&unbound).resolve(&Value::from("PCE"));
        assert_eq!(direct.value(), Some(&Payload::Text("piece".into())));
        assert_eq!(direct.value(), curried.value());
        assert_eq!(
            fake.calls(),
            vec![
                "EDIFACT/UOM_CODE/PCE->COCO/UOM_TEXT",
                "EDIFACT/UOM_CODE/PCE->COCO/UOM_TEXT",
            ]
        );
    }

    #[test]
    fn single_element_sequence_maps_like_scalar() {
        let (_, unbound) = resolver();
        let bound = uom(&unbound);
        assert_eq!(
            bound.resolve(&key(&["KGM"])).value(),
            bound.resolve(&Value::from("KGM")).value()
        );
    }

    #[test]
    fn batch_preserves_order_and_length() {
        let (_, unbound) = resolver();
        let bound = uom(&unbound);
        assert_eq!(
            bound.resolve(&key(&["PCE", "KGM", "BX"])).value(),
            Some(&Payload::List(vec!["piece".into(), "kg".into(), "box".into()]))
        );
        assert_eq!(
            bound.resolve(&key(&["BX", "???", "PCE"])).value(),
            Some(&Payload::List(vec!["box".into(), String::new(), "piece".into()]))
        );
    }

    #[test]
    fn unmapped_value_is_empty() {
        let (_, unbound) = resolver();
        assert_eq!(uom(&unbound).resolve(&Value::from("XYZ")).value(), Some(&Payload::Empty));
    }

    #[test]
    fn unbound_rejects_other_token_counts() {
        let (fake, unbound) = resolver();
        for tokens in [
            &["PCE"][..],
            &["a", "b", "c"][..],
            &["a", "b", "c", "d", "e", "f"][..],
        ] {
            let resolution = unbound.resolve(&key(tokens));
            assert_eq!(
                resolution.error(),
                Some(&DispatchError::TokenCount {
                    received: tokens.len(),
                    expected: UNBOUND_SHAPES,
                })
            );
            assert_eq!(resolution.error().unwrap().kind(), ErrorKind::ArityMismatch);
        }
        assert_eq!(
            unbound.resolve(&Value::from("PCE")).error().unwrap().to_string(),
            format!("ERROR: Wrong number of values in sequence (1). {UNBOUND_SHAPES}")
        );
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn selected_operation_always_satisfies_its_minimum() {
        let (_, unbound) = resolver();
        let bound = uom(&unbound);
        for resolver in [&unbound, &bound] {
            for count in 1..=8 {
                match resolver.select(count) {
                    Ok(op) => assert!(count >= op.min_args, "{} with {count}", op.name),
                    Err(err) => assert!(matches!(err, DispatchError::TokenCount { .. })),
                }
            }
        }
        assert_eq!(bound.select(1).unwrap().name, "MapBound");
        assert_eq!(bound.select(7).unwrap().name, "MapBatch");
        assert_eq!(unbound.select(4).unwrap().name, "Bind");
        assert_eq!(unbound.select(5).unwrap().name, "Map");
    }

    #[test]
    fn null_and_empty_keys_fail_in_both_states() {
        let (_, unbound) = resolver();
        let bound = uom(&unbound);
        for resolver in [&unbound, &bound] {
            assert_eq!(
                resolver.resolve(&Value::Null).error().map(DispatchError::kind),
                Some(ErrorKind::NullInput)
            );
            assert_eq!(
                resolver.resolve(&key(&[])).error().map(DispatchError::kind),
                Some(ErrorKind::EmptySequence)
            );
        }
    }

    #[test]
    fn service_failure_is_downstream_error() {
        let (_, unbound) = resolver();
        let bound = uom(&unbound);
        let resolution = bound.resolve(&key(&["PCE", "BROKEN"]));
        assert_eq!(
            resolution.error(),
            Some(&DispatchError::Downstream {
                service: SERVICE_NAME,
                operation: "MapBatch",
                message: "value mapping store offline".to_string(),
            })
        );
    }

    #[test]
    fn bound_resolver_can_be_reused() {
        let (fake, unbound) = resolver();
        let bound = uom(&unbound);
        for _ in 0..3 {
            assert_eq!(
                bound.resolve(&Value::from("BX")).value(),
                Some(&Payload::Text("box".into()))
            );
        }
        assert_eq!(fake.calls().len(), 3);
    }

    proptest! {
        #[test]
        fn batch_length_matches_input(values in proptest::collection::vec("[A-Z]{2,3}", 2..8)) {
            let (_, unbound) = resolver();
            let bound = uom(&unbound);
            let tokens: Vec<&str> = values.iter().map(String::as_str).collect();
            let resolution = bound.resolve(&key(&tokens));
            let Some(Payload::List(mapped)) = resolution.value() else {
                panic!("expected list, got {resolution:?}");
            };
            prop_assert_eq!(mapped.len(), values.len());
            for (value, mapped) in values.iter().zip(mapped) {
                let single = bound.resolve(&Value::from(value.as_str()));
                let expected = single.value().and_then(Payload::as_text).unwrap_or_default();
                prop_assert_eq!(mapped.as_str(), expected);
            }
        }
    }
}
