//! Tri-state parameter variants
//!
//! Enumerates every assignment of N optional boolean parameters as a base-3
//! counter. Slot 0 cycles fastest; digit values map to
//! `[Unset, True, False]`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Optional boolean request parameter
///
/// `Unset` is omitted from the wire entirely, which the service treats
/// differently from an explicit `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    /// Digit order used by the variant counter
    pub const VALUES: [TriState; 3] = [TriState::Unset, TriState::True, TriState::False];

    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::Unset => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }

    pub fn is_set(self) -> bool {
        self != TriState::Unset
    }

    /// Resolve to a concrete value, falling back to `default` when unset
    pub fn or(self, default: bool) -> bool {
        self.as_option().unwrap_or(default)
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => TriState::Unset,
            Some(true) => TriState::True,
            Some(false) => TriState::False,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriState::Unset => f.write_str("unset"),
            TriState::True => f.write_str("true"),
            TriState::False => f.write_str("false"),
        }
    }
}

/// One assignment of tri-state flags across all parameter slots
pub type Variant = Vec<TriState>;

/// Largest slot count the generator will materialize (3^12 = 531,441 variants)
pub const MAX_PARAM_COUNT: u32 = 12;

/// Number of variants for `param_count` slots
///
/// Counts above [`MAX_PARAM_COUNT`] slots are rejected rather than allocated.
pub fn variant_count(param_count: u32) -> Result<usize> {
    if param_count > MAX_PARAM_COUNT {
        return Err(HarnessError::invalid_argument(format!(
            "3^{} boolean variants is too many to enumerate; at most {} parameters are supported",
            param_count, MAX_PARAM_COUNT
        )));
    }
    3usize.checked_pow(param_count).ok_or_else(|| {
        HarnessError::invalid_argument(format!(
            "3^{} boolean variants overflow the index type",
            param_count
        ))
    })
}

/// Every tri-state combination for `param_count` slots, in counter order
///
/// Zero slots yields a single empty variant.
pub fn boolean_variants(param_count: u32) -> Result<Vec<Variant>> {
    let count = variant_count(param_count)?;
    let slots = param_count as usize;

    let mut variants = Vec::with_capacity(count);
    for index in 0..count {
        let mut variant = Vec::with_capacity(slots);
        let mut repeat = 1usize;
        for _ in 0..slots {
            let digit = (index / repeat) % TriState::VALUES.len();
            variant.push(TriState::VALUES[digit]);
            repeat *= TriState::VALUES.len();
        }
        variants.push(variant);
    }
    Ok(variants)
}
