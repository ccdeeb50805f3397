//! MSISDN normalization
//!
//! Subscriber records carry a primary MSISDN plus an optional comma-separated
//! list of additional numbers. Both arrive in whatever shape the provisioning
//! side used (`+49 172 1234567`, `0049-172...`). Everything except ASCII
//! digits is dropped; numbers that end up empty are ignored.

use serde::Serialize;

/// Strip every non-digit character from `raw`
///
/// Never fails: input with no digits normalizes to the empty string.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a primary MSISDN and a comma-separated list into one set
///
/// The normalized primary (if non-empty) comes first, followed by list
/// entries in their original order. Duplicates are dropped.
pub fn parse_all(primary: Option<&str>, list: Option<&str>) -> MsisdnSet {
    let mut set = MsisdnSet::new();

    if let Some(primary) = primary {
        set.insert(normalize(primary));
    }

    if let Some(list) = list {
        for entry in list.split(',') {
            set.insert(normalize(entry.trim()));
        }
    }

    set
}

/// Ordered, deduplicated set of digit-only MSISDNs
///
/// Insertion order is kept so that logs and reports echo numbers in the
/// order they were provisioned. Subscribers only carry a handful of numbers,
/// so membership is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MsisdnSet {
    items: Vec<String>,
}

impl MsisdnSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-normalized MSISDN
    ///
    /// Returns `false` if the value was empty or already present.
    pub fn insert(&mut self, msisdn: String) -> bool {
        if msisdn.is_empty() || self.contains(&msisdn) {
            return false;
        }
        self.items.push(msisdn);
        true
    }

    /// Check membership
    pub fn contains(&self, msisdn: &str) -> bool {
        self.items.iter().any(|m| m == msisdn)
    }

    /// Numbers in `self` that are not in `other`, in `self`'s order
    pub fn difference(&self, other: &MsisdnSet) -> MsisdnSet {
        MsisdnSet {
            items: self
                .items
                .iter()
                .filter(|m| !other.contains(m))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<S: AsRef<str>> FromIterator<S> for MsisdnSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = MsisdnSet::new();
        for raw in iter {
            set.insert(normalize(raw.as_ref()));
        }
        set
    }
}

impl std::fmt::Display for MsisdnSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.items.join(", "))
    }
}
