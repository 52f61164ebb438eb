//! Request URI construction for the attribute search endpoint
//!
//! Parameter order is fixed: `attrs`, each `includeOnly`, `featureMode`,
//! `withFeatureStats`, `withInternalFeatures`, `forceMinimal`,
//! `withRelationships`, `withRaw`. Unset options are left out entirely.

use url::form_urlencoded;
use url::Url;

use crate::criteria::SearchCriteria;
use crate::error::Result;
use crate::options::SearchOptions;

/// Stand-in for the service's request context
///
/// The search endpoint only ever reads the request URI (for self links).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_uri: Url,
}

impl RequestContext {
    pub fn new(request_uri: Url) -> Self {
        Self { request_uri }
    }

    pub fn parse(request_uri: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(request_uri)?))
    }

    pub fn request_uri(&self) -> &Url {
        &self.request_uri
    }
}

/// Root `path` under `base`, unless it is already an absolute URI under it
pub fn format_server_uri(base: &str, path: &str) -> Result<Url> {
    let base = base.trim_end_matches('/');
    if path.starts_with(base) {
        return Ok(Url::parse(path)?);
    }
    Ok(Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?)
}

/// Form-encoded query string for one search
pub fn search_query_string(criteria: &SearchCriteria, options: &SearchOptions) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("attrs", &criteria.to_attrs_text());

    for result_type in &options.include_only {
        query.append_pair("includeOnly", result_type.as_str());
    }
    if let Some(mode) = options.feature_mode {
        query.append_pair("featureMode", mode.as_str());
    }

    let flags = [
        ("withFeatureStats", options.with_feature_stats),
        ("withInternalFeatures", options.with_internal_features),
        ("forceMinimal", options.force_minimal),
        ("withRelationships", options.with_relationships),
        ("withRaw", options.with_raw),
    ];
    for (name, flag) in flags {
        if let Some(value) = flag.as_option() {
            query.append_pair(name, if value { "true" } else { "false" });
        }
    }

    query.finish()
}

/// Full `GET /entities?...` URI for one search
pub fn search_uri(base: &str, criteria: &SearchCriteria, options: &SearchOptions) -> Result<Url> {
    let mut uri = format_server_uri(base, "entities")?;
    uri.set_query(Some(&search_query_string(criteria, options)));
    Ok(uri)
}
