//! Query string assembly for the Dealmap API
//!
//! Values are passed through as given; the remote service owns validation
//! (including the required location).

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Name of the parameter that carries the API key.
pub const API_KEY_PARAM: &str = "key";

/// Query parameters for one request, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of these parameters with `key` forced to `api_key`.
    ///
    /// Any caller-supplied `key` is overwritten.
    pub fn with_api_key(&self, api_key: &str) -> QueryParams {
        let mut merged = self.clone();
        merged.insert(API_KEY_PARAM, api_key);
        merged
    }

    /// Parameter names for logging, with the key value never included.
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Typed form of the parameters accepted by the deal and business searches.
///
/// | field             | param | meaning                                   |
/// |-------------------|-------|-------------------------------------------|
/// | `location`        | `l`   | city/state text or `lat,lon`              |
/// | `query`           | `q`   | keyword filter, `*` or absent for all     |
/// | `distance`        | `d`   | radius in miles (server default 5)        |
/// | `start_index`     | `si`  | paging offset (server default 0)          |
/// | `page_size`       | `ps`  | page size (server default 20, max 100)    |
/// | `activity`        | `a`   | activity category code                    |
/// | `capability`      | `c`   | capability / deal type code               |
/// | `expiration_date` | `ed`  | only deals expiring on or after this date |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub location: Option<String>,
    pub query: Option<String>,
    pub distance: Option<u32>,
    pub start_index: Option<u32>,
    pub page_size: Option<u32>,
    pub activity: Option<u32>,
    pub capability: Option<u32>,
    pub expiration_date: Option<NaiveDate>,
    /// Anything else to send as-is.
    pub extra: BTreeMap<String, String>,
}

impl SearchOptions {
    pub fn location(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params: QueryParams = self.extra.clone().into_iter().collect();

        if let Some(location) = &self.location {
            params.insert("l", location);
        }
        if let Some(query) = &self.query {
            params.insert("q", query);
        }
        for (name, value) in [
            ("d", self.distance),
            ("si", self.start_index),
            ("ps", self.page_size),
            ("a", self.activity),
            ("c", self.capability),
        ] {
            if let Some(value) = value {
                params.insert(name, value.to_string());
            }
        }
        if let Some(date) = self.expiration_date {
            params.insert("ed", date.format("%Y-%m-%d").to_string());
        }

        params
    }
}

impl From<&SearchOptions> for QueryParams {
    fn from(options: &SearchOptions) -> Self {
        options.to_params()
    }
}

/// Parse a `name=value` pair as given on the command line.
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=VALUE, got: {input}"))?;

    if name.is_empty() {
        return Err(format!("Parameter name cannot be empty: {input}"));
    }

    Ok((name.to_string(), value.to_string()))
}
