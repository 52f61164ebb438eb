//! Search options and engine flag resolution
//!
//! `SearchOptions` keeps every option tri-state as the caller asked for it.
//! `EffectiveOptions` is what the service actually applies once unset values
//! fall back to their defaults.

use serde::{Deserialize, Serialize};

use search_types::{FeatureMode, ResultType};

use crate::error::Result;
use crate::variants::TriState;

// ============================================================================
// RESULT TYPE FLAGS
// ============================================================================

/// Engine export flag for each result type, in `ResultType::ALL` order
pub const RESULT_TYPE_FLAGS: [(ResultType, u32); 4] = [
    (ResultType::Match, 1 << 2),
    (ResultType::PossibleMatch, 1 << 3),
    (ResultType::PossibleRelation, 1 << 4),
    (ResultType::NameOnlyMatch, 1 << 5),
];

pub fn result_type_flag(result_type: ResultType) -> u32 {
    RESULT_TYPE_FLAGS
        .iter()
        .find(|(t, _)| *t == result_type)
        .map(|(_, flag)| *flag)
        .unwrap_or(0)
}

/// OR of the flags for `result_types`; zero when filtering is unsupported
pub fn include_flags(result_types: &[ResultType], support_filtering: bool) -> u32 {
    if !support_filtering {
        return 0;
    }
    result_types
        .iter()
        .fold(0, |flags, t| flags | result_type_flag(*t))
}

/// Resolve `includeOnly` parameter values to result types
pub fn parse_include_only<S: AsRef<str>>(values: &[S]) -> Result<Vec<ResultType>> {
    let mut types = Vec::with_capacity(values.len());
    for value in values {
        let t: ResultType = value.as_ref().parse()?;
        if !types.contains(&t) {
            types.push(t);
        }
    }
    Ok(types)
}

/// Sort and dedup result types into `ResultType::ALL` order
pub fn sorted_result_types(types: impl IntoIterator<Item = ResultType>) -> Vec<ResultType> {
    let mut sorted: Vec<ResultType> = types.into_iter().collect();
    sorted.sort_by_key(|t| t.rank());
    sorted.dedup();
    sorted
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Options of one attribute search, exactly as requested
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub include_only: Vec<ResultType>,
    pub feature_mode: Option<FeatureMode>,
    pub with_feature_stats: TriState,
    pub with_internal_features: TriState,
    pub force_minimal: TriState,
    pub with_relationships: TriState,
    pub with_raw: TriState,
}

impl SearchOptions {
    pub fn effective(&self) -> EffectiveOptions {
        EffectiveOptions {
            include_only: self.include_only.clone(),
            feature_mode: self.feature_mode.unwrap_or_default(),
            with_feature_stats: self.with_feature_stats.or(false),
            with_internal_features: self.with_internal_features.or(false),
            force_minimal: self.force_minimal.or(false),
            with_relationships: self.with_relationships.or(false),
            with_raw: self.with_raw.or(false),
        }
    }
}

/// Options with defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveOptions {
    pub include_only: Vec<ResultType>,
    pub feature_mode: FeatureMode,
    pub with_feature_stats: bool,
    pub with_internal_features: bool,
    pub force_minimal: bool,
    pub with_relationships: bool,
    pub with_raw: bool,
}

impl EffectiveOptions {
    pub fn include_flags(&self, support_filtering: bool) -> u32 {
        include_flags(&self.include_only, support_filtering)
    }

    /// Representative mode drops duplicate feature values from results
    pub fn needs_duplicate_stripping(&self) -> bool {
        self.feature_mode == FeatureMode::Representative
    }

    /// Results come back partial when features are off or output is minimal
    pub fn marks_partial(&self) -> bool {
        self.feature_mode == FeatureMode::None || self.force_minimal
    }
}
