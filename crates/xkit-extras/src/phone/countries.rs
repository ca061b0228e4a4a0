#![forbid(unsafe_code)]

//! Country dial-code table.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use xkit_core::error;
use xkit_widgets::OptionCollection;

const EMBEDDED: &str = include_str!("../../data/country_dial_codes.json");

/// One country.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, upper case.
    pub code: String,
    /// English short name.
    pub name: String,
    /// Flag emoji.
    pub emoji: String,
    /// International dial prefix including the leading `+`.
    pub dial_code: String,
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.emoji, self.name, self.dial_code)
    }
}

/// Failure to load a country table.
#[derive(Debug)]
pub enum CountryTableError {
    /// The document is not a JSON object of country records.
    Parse(serde_json::Error),
    /// A record is inconsistent.
    InvalidEntry {
        /// Map key of the record.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for CountryTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid country table: {err}"),
            Self::InvalidEntry { key, reason } => {
                write!(f, "invalid country entry \"{key}\": {reason}")
            }
        }
    }
}

impl std::error::Error for CountryTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidEntry { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CountryTableError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Countries keyed by lowercase ISO code, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTable {
    countries: BTreeMap<String, Country>,
}

impl CountryTable {
    /// Parse a JSON object `{ "<lowercase code>": Country, ... }`.
    ///
    /// # Errors
    /// Malformed JSON, a key that is not the lowercase record code, or a dial
    /// code that is not `+` followed by digits.
    pub fn from_json(json: &str) -> Result<Self, CountryTableError> {
        let countries: BTreeMap<String, Country> = serde_json::from_str(json)?;
        for (key, country) in &countries {
            if *key != country.code.to_lowercase() {
                return Err(CountryTableError::InvalidEntry {
                    key: key.clone(),
                    reason: format!("key does not match code {}", country.code),
                });
            }
            let digits = country.dial_code.strip_prefix('+').unwrap_or_default();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CountryTableError::InvalidEntry {
                    key: key.clone(),
                    reason: format!("bad dial code {:?}", country.dial_code),
                });
            }
        }
        Ok(Self { countries })
    }

    /// The embedded table, parsed once per process.
    pub fn global() -> &'static CountryTable {
        static TABLE: OnceLock<CountryTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            CountryTable::from_json(EMBEDDED).unwrap_or_else(|err| {
                error!(error = %err, "embedded country table failed to load");
                CountryTable::default()
            })
        })
    }

    /// Country by ISO code (any case).
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Country> {
        self.countries.get(&code.to_lowercase())
    }

    /// Restrict to `allow` (any case). An empty allow-list keeps everything;
    /// unknown codes are ignored.
    #[must_use]
    pub fn filtered<S: AsRef<str>>(&self, allow: &[S]) -> CountryTable {
        if allow.is_empty() {
            return self.clone();
        }
        let countries = allow
            .iter()
            .filter_map(|code| {
                let key = code.as_ref().to_lowercase();
                self.countries.get(&key).map(|c| (key, c.clone()))
            })
            .collect();
        CountryTable { countries }
    }

    /// `(key, country)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Country)> {
        self.countries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// True when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Options for a select, keyed by lowercase code.
    #[must_use]
    pub fn to_options(&self) -> OptionCollection<Country> {
        OptionCollection::keyed(self.countries.clone())
    }
}

/// Key of the country in `options` whose dial code is the longest prefix of
/// `number`. Ties go to `preferred`, then to key order.
pub(crate) fn longest_dial_prefix<'a>(
    options: &'a OptionCollection<Country>,
    number: &str,
    preferred: Option<&str>,
) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for (key, country) in options.iter() {
        if !number.starts_with(&country.dial_code) {
            continue;
        }
        let len = country.dial_code.len();
        let better = match best {
            None => true,
            Some((_, best_len)) => len > best_len || (len == best_len && Some(key) == preferred),
        };
        if better {
            best = Some((key, len));
        }
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_table_loads() {
        let table = CountryTable::global();
        assert!(table.len() > 200);
        let us = table.get("us").unwrap();
        assert_eq!(us.code, "US");
        assert_eq!(us.dial_code, "+1");
        assert_eq!(us.emoji, "\u{1F1FA}\u{1F1F8}");
        assert_eq!(table.get("VN").unwrap().name, "Vietnam");
    }

    #[test]
    fn global_keys_are_lowercase_codes() {
        for (key, country) in CountryTable::global().iter() {
            assert_eq!(key, country.code.to_lowercase());
        }
    }

    #[test]
    fn filtered_allow_list() {
        let table = CountryTable::global().filtered(&["US", "vn", "zz"]);
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["us", "vn"]);
        let empty: [&str; 0] = [];
        assert_eq!(
            CountryTable::global().filtered(&empty).len(),
            CountryTable::global().len()
        );
    }

    #[test]
    fn rejects_mismatched_key() {
        let json = r#"{"us": {"code": "VN", "name": "Vietnam", "emoji": "", "dial_code": "+84"}}"#;
        let err = CountryTable::from_json(json).unwrap_err();
        assert!(matches!(err, CountryTableError::InvalidEntry { ref key, .. } if key == "us"));
    }

    #[test]
    fn rejects_bad_dial_code() {
        let json = r#"{"vn": {"code": "VN", "name": "Vietnam", "emoji": "", "dial_code": "84"}}"#;
        assert!(CountryTable::from_json(json).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = CountryTable::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, CountryTableError::Parse(_)));
        assert!(err.to_string().starts_with("invalid country table"));
    }

    #[test]
    fn display_is_long_format() {
        let vn = CountryTable::global().get("vn").unwrap();
        assert_eq!(vn.to_string(), format!("{} Vietnam +84", vn.emoji));
    }

    #[test]
    fn longest_prefix_wins() {
        let options = CountryTable::global().filtered(&["us", "ag", "vn"]).to_options();
        assert_eq!(longest_dial_prefix(&options, "+12685551234", None), Some("ag"));
        assert_eq!(longest_dial_prefix(&options, "+15551234", None), Some("us"));
        assert_eq!(longest_dial_prefix(&options, "+849", None), Some("vn"));
        assert_eq!(longest_dial_prefix(&options, "0901", None), None);
    }

    #[test]
    fn longest_prefix_tie_prefers_current() {
        let options = CountryTable::global().filtered(&["us", "ca"]).to_options();
        assert_eq!(longest_dial_prefix(&options, "+1555", None), Some("ca"));
        assert_eq!(longest_dial_prefix(&options, "+1555", Some("us")), Some("us"));
    }
}
