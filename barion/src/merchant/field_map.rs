//! Case-insensitive field reconciliation.
//!
//! Callers may spell a field `poskey`, `POSKEY` or `PosKey`; the gateway only knows
//! `POSKey`. This module maps caller-supplied keys onto canonical names.
//!
//! # Ambiguous keys
//!
//! When several caller keys match the same canonical name (e.g. both `PaymentId` and
//! `paymentid`), the key spelled exactly like the canonical name wins. Otherwise the
//! first matching key in the object's insertion order wins.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Returns true if `a` and `b` name the same field.
#[must_use]
pub fn same_field(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Locates the value supplied for `canonical` under any casing.
///
/// Returns the caller's key together with its value, or `None` when no key matches.
/// A present `null` is returned as `Some((key, &Value::Null))`.
///
/// # Examples
///
/// ```
/// use barion::merchant::field_map::find;
/// use serde_json::json;
///
/// let options = json!({ "paymentid": "abc", "Comment": null });
/// let options = options.as_object().unwrap();
///
/// assert_eq!(find("PaymentId", options), Some(("paymentid", &json!("abc"))));
/// assert_eq!(find("Comment", options), Some(("Comment", &json!(null))));
/// assert_eq!(find("Total", options), None);
/// ```
#[must_use]
pub fn find<'a>(canonical: &str, candidate: &'a Map<String, Value>) -> Option<(&'a str, &'a Value)> {
    if let Some((key, value)) = candidate.get_key_value(canonical) {
        return Some((key.as_str(), value));
    }
    candidate
        .iter()
        .find(|(key, _)| same_field(key, canonical))
        .map(|(key, value)| (key.as_str(), value))
}

/// Returns the canonical names that also appear, under any casing, in `other`.
///
/// The result keeps the order and casing of `canonical`.
#[must_use]
pub fn intersection<'a, I, S>(canonical: &[&'a str], other: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let other: Vec<S> = other.into_iter().collect();
    canonical
        .iter()
        .filter(|name| other.iter().any(|candidate| same_field(candidate.as_ref(), name)))
        .copied()
        .collect()
}

/// Index from lowercased keys to canonical field names.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    by_folded_name: HashMap<String, &'static str>,
}

impl FieldIndex {
    /// Builds an index over the given canonical names.
    #[must_use]
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        let by_folded_name =
            names.into_iter().map(|name| (name.to_ascii_lowercase(), name)).collect();
        Self { by_folded_name }
    }

    /// Maps a caller-supplied key onto its canonical spelling.
    #[must_use]
    pub fn canonical(&self, key: &str) -> Option<&'static str> {
        self.by_folded_name.get(&key.to_ascii_lowercase()).copied()
    }

    /// Rewrites known keys to canonical casing, keeping unknown keys untouched.
    ///
    /// Values are not inspected. When two keys collapse onto the same canonical name the
    /// winner is chosen as described in the module documentation.
    #[must_use]
    pub fn normalize(&self, candidate: &Map<String, Value>) -> Map<String, Value> {
        let mut normalized = Map::with_capacity(candidate.len());
        for (key, value) in candidate {
            match self.canonical(key) {
                Some(canonical) => {
                    if normalized.contains_key(canonical) {
                        continue;
                    }
                    if let Some((_, winner)) = find(canonical, candidate) {
                        normalized.insert(canonical.to_owned(), winner.clone());
                    }
                }
                None => {
                    normalized.insert(key.clone(), value.clone());
                }
            }
        }
        normalized
    }
}
