//! Search Types - shared wire types for the attribute search harness
//!
//! Pure data structures exchanged with the external entity search service:
//! result-type labels, feature modes, record identifiers and the REST
//! response envelope. No harness logic lives here.
//!
//! ## Ordering
//!
//! [`ResultType::ALL`] and [`FeatureMode::ALL`] are the canonical orders used
//! everywhere a set of labels is enumerated or sorted. Sorting goes through
//! [`ResultType::rank`], never through declaration order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A label that did not name any known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} value: {value}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Categorical outcome of an attribute search match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    Match,
    PossibleMatch,
    PossibleRelation,
    NameOnlyMatch,
}

impl ResultType {
    /// Canonical enumeration order
    pub const ALL: [ResultType; 4] = [
        ResultType::Match,
        ResultType::PossibleMatch,
        ResultType::PossibleRelation,
        ResultType::NameOnlyMatch,
    ];

    /// Position in [`ResultType::ALL`]
    pub fn rank(self) -> usize {
        match self {
            ResultType::Match => 0,
            ResultType::PossibleMatch => 1,
            ResultType::PossibleRelation => 2,
            ResultType::NameOnlyMatch => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResultType::Match => "MATCH",
            ResultType::PossibleMatch => "POSSIBLE_MATCH",
            ResultType::PossibleRelation => "POSSIBLE_RELATION",
            ResultType::NameOnlyMatch => "NAME_ONLY_MATCH",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResultType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "result type",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// FEATURE MODES
// ============================================================================

/// How entity features are returned with search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureMode {
    /// No features at all
    None,
    /// One representative value per feature
    Representative,
    /// Every value including duplicates
    #[default]
    WithDuplicates,
}

impl FeatureMode {
    pub const ALL: [FeatureMode; 3] = [
        FeatureMode::None,
        FeatureMode::Representative,
        FeatureMode::WithDuplicates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureMode::None => "NONE",
            FeatureMode::Representative => "REPRESENTATIVE",
            FeatureMode::WithDuplicates => "WITH_DUPLICATES",
        }
    }
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureMode {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownLabel {
                kind: "feature mode",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// Identifies one record within a data source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordId {
    pub data_source: String,
    pub record_id: String,
}

impl RecordId {
    pub fn new(data_source: impl Into<String>, record_id: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            record_id: record_id.into(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.data_source, self.record_id)
    }
}

/// Description of a single loaded record as returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub data_source: String,
    pub record_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_data: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_data: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_data: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_source_data: Option<serde_json::Value>,
}

impl EntityRecord {
    pub fn record_key(&self) -> RecordId {
        RecordId::new(&self.data_source, &self.record_id)
    }
}

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// Request metadata carried by every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub http_method: HttpMethod,
    pub http_status_code: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ResponseMeta {
    pub fn new(http_method: HttpMethod, http_status_code: u16) -> Self {
        Self {
            http_method,
            http_status_code,
            timestamp: Utc::now(),
            version: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Response carrying one [`EntityRecord`]
///
/// `data` may be left empty at construction and filled in later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub meta: ResponseMeta,
    pub links: ResponseLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,
    #[serde(default)]
    data: Option<EntityRecord>,
}

impl RecordResponse {
    /// Create with method, status and self link, leaving the record unset
    pub fn new(
        http_method: HttpMethod,
        http_status_code: u16,
        self_link: impl Into<String>,
    ) -> Self {
        Self {
            meta: ResponseMeta::new(http_method, http_status_code),
            links: ResponseLinks {
                self_link: self_link.into(),
            },
            raw_data: None,
            data: None,
        }
    }

    pub fn with_data(
        http_method: HttpMethod,
        http_status_code: u16,
        self_link: impl Into<String>,
        data: EntityRecord,
    ) -> Self {
        let mut response = Self::new(http_method, http_status_code, self_link);
        response.data = Some(data);
        response
    }

    pub fn data(&self) -> Option<&EntityRecord> {
        self.data.as_ref()
    }

    pub fn set_data(&mut self, data: Option<EntityRecord>) {
        self.data = data;
    }
}

// ============================================================================
// SEARCH RESPONSE
// ============================================================================

/// Payload of an attribute search response
///
/// Individual results stay untyped; the harness only counts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSearchData {
    #[serde(default)]
    pub search_results: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ResponseLinks>,
    #[serde(default)]
    pub data: AttributeSearchData,
}

impl AttributeSearchResponse {
    pub fn result_count(&self) -> usize {
        self.data.search_results.len()
    }
}
