//! Scenario assembly for the search sweep
//!
//! Each criteria group is paired with a list of result-type subsets to
//! filter on, and every emitted scenario draws the next tri-state variant
//! from one boolean cycle shared by all groups. The subset cursor belongs to
//! the group and keeps turning across feature modes and iterations.
//!
//! Output order depends only on input order, so two runs with the same
//! catalog issue identical request sequences.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use search_types::{FeatureMode, ResultType};

use crate::criteria::SearchCriteria;
use crate::cyclic::CyclicSelector;
use crate::error::{HarnessError, Result};
use crate::options::{sorted_result_types, SearchOptions};
use crate::variants::{boolean_variants, TriState, Variant};

/// Slots of each boolean variant, in the order they are read
pub const BOOLEAN_OPTION_SLOTS: [&str; 5] = [
    "withRaw",
    "forceMinimal",
    "withRelationships",
    "withFeatureStats",
    "withInternalFeatures",
];

/// Expected result counts for one criteria group, in result-type order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedCounts {
    counts: Vec<(ResultType, u32)>,
}

impl ExpectedCounts {
    /// Sorts by result-type rank; a repeated type keeps its last count
    pub fn new(counts: impl IntoIterator<Item = (ResultType, u32)>) -> Self {
        let mut merged: Vec<(ResultType, u32)> = Vec::new();
        for (t, count) in counts {
            match merged.iter_mut().find(|(existing, _)| *existing == t) {
                Some(entry) => entry.1 = count,
                None => merged.push((t, count)),
            }
        }
        merged.sort_by_key(|(t, _)| t.rank());
        Self { counts: merged }
    }

    pub fn types(&self) -> Vec<ResultType> {
        self.counts.iter().map(|(t, _)| *t).collect()
    }

    pub fn get(&self, result_type: ResultType) -> Option<u32> {
        self.counts
            .iter()
            .find(|(t, _)| *t == result_type)
            .map(|(_, c)| *c)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResultType, u32)> + '_ {
        self.counts.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// A criteria group and the counts it should produce
#[derive(Debug, Clone)]
pub struct SearchGroup {
    pub criteria: Arc<SearchCriteria>,
    pub expected: ExpectedCounts,
}

impl SearchGroup {
    pub fn new(criteria: SearchCriteria, expected: ExpectedCounts) -> Self {
        Self {
            criteria: Arc::new(criteria),
            expected,
        }
    }
}

/// A result-type filter and the count it should yield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetCase {
    pub result_types: Vec<ResultType>,
    pub expected_count: u32,
}

/// One fully parameterized search invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchScenario {
    pub criteria: Arc<SearchCriteria>,
    pub options: SearchOptions,
    pub expected_count: u32,
}

/// Result-type subsets worth filtering on for one group
///
/// Order: empty set, each singleton, complement of the specified types,
/// each unordered pair, then the full specified set when it has more than
/// two members. Without filtering support every subset expects the total.
pub fn result_type_subsets(expected: &ExpectedCounts, support_filtering: bool) -> Vec<SubsetCase> {
    let total = expected.total();
    let filtered = |count: u32| if support_filtering { count } else { total };
    let mut cases = Vec::new();

    cases.push(SubsetCase {
        result_types: Vec::new(),
        expected_count: total,
    });

    for (t, count) in expected.iter() {
        cases.push(SubsetCase {
            result_types: vec![t],
            expected_count: filtered(count),
        });
    }

    let specified = expected.types();
    let complement: Vec<ResultType> = ResultType::ALL
        .into_iter()
        .filter(|t| !specified.contains(t))
        .collect();
    if !complement.is_empty() {
        cases.push(SubsetCase {
            result_types: complement,
            expected_count: filtered(0),
        });
    }

    let pairs: Vec<(ResultType, u32)> = expected.iter().collect();
    for (i, (t1, c1)) in pairs.iter().enumerate() {
        for (t2, c2) in &pairs[i + 1..] {
            cases.push(SubsetCase {
                result_types: sorted_result_types([*t1, *t2]),
                expected_count: filtered(c1 + c2),
            });
        }
    }

    if specified.len() > 2 {
        cases.push(SubsetCase {
            result_types: specified,
            expected_count: total,
        });
    }

    cases
}

/// Iterations per group so both the boolean cycle and the subset cycle turn
///
/// Ratio of the larger to the smaller of (variant count, groups × modes),
/// scaled by `multiplier`, plus one.
pub fn loop_count(variant_count: usize, combinations: usize, multiplier: usize) -> Result<usize> {
    let numerator = variant_count.max(combinations);
    let denominator = variant_count.min(combinations);
    if denominator == 0 {
        return Err(HarnessError::invalid_argument(
            "loop count needs at least one variant and one group",
        ));
    }
    numerator
        .checked_mul(multiplier)
        .map(|scaled| scaled / denominator + 1)
        .ok_or_else(|| {
            HarnessError::invalid_argument(format!(
                "loop multiplier {} overflows the loop count",
                multiplier
            ))
        })
}

/// Upper bound on the number of scenarios one sweep may assemble
pub const MAX_SCENARIOS: usize = 10_000_000;

/// Builds the flat scenario list for a sweep
#[derive(Debug, Clone)]
pub struct ScenarioAssembler {
    support_filtering: bool,
    boolean_param_count: u32,
    loop_multiplier: usize,
}

impl Default for ScenarioAssembler {
    fn default() -> Self {
        Self {
            support_filtering: true,
            boolean_param_count: BOOLEAN_OPTION_SLOTS.len() as u32,
            loop_multiplier: 2,
        }
    }
}

impl ScenarioAssembler {
    pub fn new(support_filtering: bool, boolean_param_count: u32, loop_multiplier: usize) -> Self {
        Self {
            support_filtering,
            boolean_param_count,
            loop_multiplier,
        }
    }

    /// Feature modes swept per iteration, starting with unset
    pub fn feature_modes() -> Vec<Option<FeatureMode>> {
        std::iter::once(None)
            .chain(FeatureMode::ALL.into_iter().map(Some))
            .collect()
    }

    pub fn assemble(&self, groups: &[SearchGroup]) -> Result<Vec<SearchScenario>> {
        if (self.boolean_param_count as usize) < BOOLEAN_OPTION_SLOTS.len() {
            return Err(HarnessError::invalid_argument(format!(
                "need at least {} boolean parameters, got {}",
                BOOLEAN_OPTION_SLOTS.len(),
                self.boolean_param_count
            )));
        }

        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let feature_modes = Self::feature_modes();
        let variants = boolean_variants(self.boolean_param_count)?;
        let loops = loop_count(
            variants.len(),
            groups.len() * feature_modes.len(),
            self.loop_multiplier,
        )?;
        let mut boolean_cycle = CyclicSelector::new(variants)?;

        info!(
            groups = groups.len(),
            loops,
            variants = boolean_cycle.len(),
            "Assembling search scenarios"
        );

        let total = groups
            .len()
            .checked_mul(loops)
            .and_then(|n| n.checked_mul(feature_modes.len()))
            .filter(|&n| n <= MAX_SCENARIOS)
            .ok_or_else(|| {
                HarnessError::invalid_argument(format!(
                    "sweep of {} groups x {} loops exceeds {} scenarios",
                    groups.len(),
                    loops,
                    MAX_SCENARIOS
                ))
            })?;
        let mut scenarios = Vec::with_capacity(total);
        for group in groups {
            let subsets = result_type_subsets(&group.expected, self.support_filtering);
            let mut subset_cycle = CyclicSelector::new(subsets)?;
            debug!(
                criteria = %group.criteria,
                subsets = subset_cycle.len(),
                "Expanding criteria group"
            );

            for _ in 0..loops {
                for feature_mode in &feature_modes {
                    let subset = subset_cycle.next_ref();
                    scenarios.push(SearchScenario {
                        criteria: Arc::clone(&group.criteria),
                        options: options_from_variant(
                            boolean_cycle.next_ref(),
                            *feature_mode,
                            subset,
                        ),
                        expected_count: subset.expected_count,
                    });
                }
            }
        }

        Ok(scenarios)
    }
}

fn options_from_variant(
    variant: &Variant,
    feature_mode: Option<FeatureMode>,
    subset: &SubsetCase,
) -> SearchOptions {
    let slot = |i: usize| variant.get(i).copied().unwrap_or(TriState::Unset);
    SearchOptions {
        include_only: subset.result_types.clone(),
        feature_mode,
        with_raw: slot(0),
        force_minimal: slot(1),
        with_relationships: slot(2),
        with_feature_stats: slot(3),
        with_internal_features: slot(4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_type_counts() -> ExpectedCounts {
        ExpectedCounts::new([(ResultType::PossibleMatch, 1), (ResultType::Match, 1)])
    }

    fn case_for<'a>(cases: &'a [SubsetCase], types: &[ResultType]) -> &'a SubsetCase {
        cases
            .iter()
            .find(|c| c.result_types == types)
            .unwrap_or_else(|| panic!("no subset {:?}", types))
    }

    #[test]
    fn test_expected_counts_sorted_by_rank() {
        let counts = two_type_counts();
        assert_eq!(counts.types(), vec![ResultType::Match, ResultType::PossibleMatch]);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_subsets_with_filtering() {
        let cases = result_type_subsets(&two_type_counts(), true);
        assert_eq!(case_for(&cases, &[]).expected_count, 2);
        assert_eq!(case_for(&cases, &[ResultType::Match]).expected_count, 1);
        assert_eq!(
            case_for(&cases, &[ResultType::Match, ResultType::PossibleMatch]).expected_count,
            2
        );
        assert_eq!(
            case_for(
                &cases,
                &[ResultType::PossibleRelation, ResultType::NameOnlyMatch]
            )
            .expected_count,
            0
        );
        // empty, 2 singletons, complement, 1 pair
        assert_eq!(cases.len(), 5);
    }

    #[test]
    fn test_subsets_without_filtering_expect_total() {
        let cases = result_type_subsets(&two_type_counts(), false);
        assert!(cases.iter().all(|c| c.expected_count == 2));
    }

    #[test]
    fn test_subsets_single_type_has_no_pairs() {
        let counts = ExpectedCounts::new([(ResultType::PossibleRelation, 1)]);
        let cases = result_type_subsets(&counts, true);
        let types: Vec<Vec<ResultType>> = cases.into_iter().map(|c| c.result_types).collect();
        assert_eq!(
            types,
            vec![
                vec![],
                vec![ResultType::PossibleRelation],
                vec![
                    ResultType::Match,
                    ResultType::PossibleMatch,
                    ResultType::NameOnlyMatch
                ],
            ]
        );
    }

    #[test]
    fn test_subsets_all_types_has_full_set_and_no_complement() {
        let counts = ExpectedCounts::new(ResultType::ALL.map(|t| (t, 1)));
        let cases = result_type_subsets(&counts, true);
        // empty + 4 singletons + 6 pairs + full set
        assert_eq!(cases.len(), 12);
        let last = cases.last().unwrap();
        assert_eq!(last.result_types, ResultType::ALL.to_vec());
        assert_eq!(last.expected_count, 4);
    }

    #[test]
    fn test_loop_count_ratio() {
        // 243 variants, 11 groups x 4 modes = 44
        assert_eq!(loop_count(243, 44, 2).unwrap(), 243 * 2 / 44 + 1);
        assert_eq!(loop_count(4, 44, 2).unwrap(), 44 * 2 / 4 + 1);
        assert!(loop_count(243, 0, 2).is_err());
    }

    #[test]
    fn test_assemble_shape_and_cycles() {
        let group = SearchGroup::new(
            SearchCriteria::single("PHONE_NUMBER", ["702-555-1212"]),
            ExpectedCounts::new([(ResultType::PossibleRelation, 1)]),
        );
        let scenarios = ScenarioAssembler::default().assemble(&[group]).unwrap();

        let loops = loop_count(243, 4, 2).unwrap();
        assert_eq!(scenarios.len(), loops * 4);

        // feature modes rotate within each iteration
        let modes: Vec<Option<FeatureMode>> =
            scenarios[..4].iter().map(|s| s.options.feature_mode).collect();
        assert_eq!(modes, ScenarioAssembler::feature_modes());

        // subsets rotate continuously: 3 subsets for a single type
        assert!(scenarios[0].options.include_only.is_empty());
        assert_eq!(
            scenarios[1].options.include_only,
            vec![ResultType::PossibleRelation]
        );
        assert_eq!(scenarios[2].options.include_only.len(), 3);
        assert!(scenarios[3].options.include_only.is_empty());
        assert_eq!(scenarios[2].expected_count, 0);

        // boolean variants advance once per scenario; slot 0 is withRaw
        assert_eq!(scenarios[0].options.with_raw, TriState::Unset);
        assert_eq!(scenarios[1].options.with_raw, TriState::True);
        assert_eq!(scenarios[2].options.with_raw, TriState::False);
        assert_eq!(scenarios[3].options.force_minimal, TriState::True);
    }

    #[test]
    fn test_boolean_cycle_shared_across_groups() {
        let groups = vec![
            SearchGroup::new(
                SearchCriteria::single("PHONE_NUMBER", ["1"]),
                ExpectedCounts::new([(ResultType::Match, 1)]),
            ),
            SearchGroup::new(
                SearchCriteria::single("PHONE_NUMBER", ["2"]),
                ExpectedCounts::new([(ResultType::Match, 1)]),
            ),
        ];
        let assembler = ScenarioAssembler::default();
        let scenarios = assembler.assemble(&groups).unwrap();
        let per_group = scenarios.len() / 2;

        let variants = boolean_variants(5).unwrap();
        let expected_raw = variants[per_group % variants.len()][0];
        assert_eq!(scenarios[per_group].options.with_raw, expected_raw);
        // subset cursor restarts for the second group
        assert!(scenarios[per_group].options.include_only.is_empty());
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let group = SearchGroup::new(
            SearchCriteria::single("NAME_FULL", ["Mark Hightower"]),
            ExpectedCounts::new([(ResultType::Match, 1), (ResultType::NameOnlyMatch, 1)]),
        );
        let assembler = ScenarioAssembler::new(false, 5, 1);
        let first = assembler.assemble(std::slice::from_ref(&group)).unwrap();
        let second = assembler.assemble(&[group]).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|s| s.expected_count == 2));
    }

    #[test]
    fn test_loop_count_overflow_rejected() {
        assert!(matches!(
            loop_count(243, 44, usize::MAX),
            Err(HarnessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_oversized_sweep_rejected() {
        let groups = [SearchGroup::new(
            SearchCriteria::single("PHONE_NUMBER", ["702-555-1212"]),
            two_type_counts(),
        )];
        for multiplier in [usize::MAX, MAX_SCENARIOS] {
            let assembler = ScenarioAssembler::new(true, 5, multiplier);
            assert!(matches!(
                assembler.assemble(&groups),
                Err(HarnessError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_too_many_boolean_params_rejected() {
        let groups = [SearchGroup::new(
            SearchCriteria::single("PHONE_NUMBER", ["702-555-1212"]),
            two_type_counts(),
        )];
        let assembler = ScenarioAssembler::new(true, 40, 2);
        assert!(matches!(
            assembler.assemble(&groups),
            Err(HarnessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_too_few_boolean_params_rejected() {
        let assembler = ScenarioAssembler::new(true, 3, 2);
        assert!(matches!(
            assembler.assemble(&[]),
            Err(HarnessError::InvalidArgument(_))
        ));
    }
}
