//! Override keys
//!
//! Regular steps are matched against a short list of candidate names.
//! Synthetic steps derive a `SyntheticKey` and try each
//! `SyntheticKeyStrategy` in `SyntheticKeyStrategy::ORDER`.

use pipeweld_core::ir::StepDescriptor;
use pipeweld_core::naming::{kebab_case, simple_name};

const OBSERVE_PREFIX: &str = "observe";
const GENERIC_PAYLOAD: &str = "SideEffect";

/// Candidate override keys for a regular step, most specific first
pub fn candidate_keys(step: &StepDescriptor) -> Vec<String> {
    let candidates = [
        step.service_name(),
        step.base_name().to_string(),
        step.client_name(),
        kebab_case(step.base_name()),
    ];

    let mut keys: Vec<String> = Vec::with_capacity(candidates.len());
    for key in candidates {
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Aspect id with a leading `Observe` removed, if anything remains
pub fn strip_observe(aspect_id: &str) -> Option<&str> {
    let head = aspect_id.get(..OBSERVE_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(OBSERVE_PREFIX) {
        return None;
    }
    let rest = aspect_id[OBSERVE_PREFIX.len()..].trim_start_matches(|c| c == '-' || c == '_' || c == '.');
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Aspect family: the aspect id without its `Observe` prefix
pub fn aspect_family(aspect_id: &str) -> &str {
    strip_observe(aspect_id).unwrap_or(aspect_id)
}

/// Override keys derived for one synthetic step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticKey {
    /// `aspectId.PayloadSimple`
    pub payload_id: String,
    pub alt_payload_id: Option<String>,
    /// `aspectId.SideEffect`
    pub generic_id: String,
    pub alt_generic_id: Option<String>,
    /// Position within the group of synthetics sharing `payload_id`
    pub index: usize,
    /// Whether that group spans more than one base step
    pub ambiguous: bool,
}

impl SyntheticKey {
    /// Derive the keys of a synthetic step; `None` for regular steps
    pub fn derive(step: &StepDescriptor) -> Option<Self> {
        let origin = step.synthetic_origin()?;
        let payload = simple_name(&origin.payload_type);
        let alt = strip_observe(&origin.aspect_id);

        Some(Self {
            payload_id: format!("{}.{}", origin.aspect_id, payload),
            alt_payload_id: alt.map(|a| format!("{}.{}", a, payload)),
            generic_id: format!("{}.{}", origin.aspect_id, GENERIC_PAYLOAD),
            alt_generic_id: alt.map(|a| format!("{}.{}", a, GENERIC_PAYLOAD)),
            index: 0,
            ambiguous: false,
        })
    }

    fn indexed(id: &str, index: usize) -> String {
        format!("{}@{}", id, index)
    }
}

/// One way of deriving an override key from a `SyntheticKey`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticKeyStrategy {
    IndexedPayload,
    IndexedAltPayload,
    Payload,
    AltPayload,
    Generic,
    AltGeneric,
}

impl SyntheticKeyStrategy {
    /// Order in which override keys are tried
    pub const ORDER: [SyntheticKeyStrategy; 6] = [
        SyntheticKeyStrategy::IndexedPayload,
        SyntheticKeyStrategy::IndexedAltPayload,
        SyntheticKeyStrategy::Payload,
        SyntheticKeyStrategy::AltPayload,
        SyntheticKeyStrategy::Generic,
        SyntheticKeyStrategy::AltGeneric,
    ];

    pub fn key(self, key: &SyntheticKey) -> Option<String> {
        match self {
            SyntheticKeyStrategy::IndexedPayload => {
                Some(SyntheticKey::indexed(&key.payload_id, key.index))
            }
            SyntheticKeyStrategy::IndexedAltPayload => key
                .alt_payload_id
                .as_deref()
                .map(|alt| SyntheticKey::indexed(alt, key.index)),
            SyntheticKeyStrategy::Payload => Some(key.payload_id.clone()),
            SyntheticKeyStrategy::AltPayload => key.alt_payload_id.clone(),
            SyntheticKeyStrategy::Generic => Some(key.generic_id.clone()),
            SyntheticKeyStrategy::AltGeneric => key.alt_generic_id.clone(),
        }
    }

    /// Keys that pick one member out of a payload group
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            SyntheticKeyStrategy::IndexedPayload | SyntheticKeyStrategy::IndexedAltPayload
        )
    }

    /// Keys that name a payload and so collide across base steps
    pub fn is_payload_specific(self) -> bool {
        matches!(
            self,
            SyntheticKeyStrategy::Payload | SyntheticKeyStrategy::AltPayload
        )
    }
}
