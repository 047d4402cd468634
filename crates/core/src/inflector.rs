//! Tag name normalization
//!
//! Converts the Pascal/camel-case element names used by the Dealmap XML API
//! (`TotalResults`, `BusinessID`, `dealUrl`) into the snake-case keys exposed
//! on [`AttributeSet`](crate::attributes::AttributeSet).

use regex::Regex;
use std::sync::LazyLock;

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Convert a tag name into its snake-case lookup key.
///
/// Applied in order:
///
/// 1. `::` becomes `/`
/// 2. an uppercase run followed by an uppercase+lowercase pair is split (`HTTPServer` -> `HTTP_Server`)
/// 3. a lowercase letter or digit followed by an uppercase letter is split (`DealId` -> `Deal_Id`)
/// 4. `-` becomes `_`
/// 5. everything is lower-cased
///
/// The function is total: every input, including the empty string, maps to a key,
/// and running it on its own output returns that output unchanged.
///
/// ```
/// use dealmap_core::inflector::underscore;
///
/// assert_eq!(underscore("TotalResults"), "total_results");
/// assert_eq!(underscore("Foo::BarBaz"), "foo/bar_baz");
/// ```
pub fn underscore(word: &str) -> String {
    let word = word.replace("::", "/");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = CAMEL_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}
