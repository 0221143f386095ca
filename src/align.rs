use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Resolution order when several source columns share a normalized token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The leftmost column with the token feeds the reference column.
    FirstWins,
    /// The rightmost column with the token feeds the reference column.
    #[default]
    LastWins,
}

/// Column alignment of one file against the reference schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    positions: HashMap<String, usize>,
    /// Reference tokens the file does not provide, in reference order.
    pub missing: Vec<String>,
    /// File tokens absent from the reference, in file order.
    pub extra: Vec<String>,
    /// File tokens carried by more than one column.
    pub duplicates: Vec<String>,
}

impl Alignment {
    /// Source column feeding the given reference token.
    pub fn source_index(&self, token: &str) -> Option<usize> {
        self.positions.get(token).copied()
    }

    pub fn missing_ratio(&self, reference_len: usize) -> f64 {
        if reference_len == 0 {
            return 0.0;
        }
        self.missing.len() as f64 / reference_len as f64
    }

    /// Whether the file omits strictly more than `max_ratio` of the reference.
    pub fn exceeds_missing_ratio(&self, reference_len: usize, max_ratio: f64) -> bool {
        self.missing_ratio(reference_len) > max_ratio
    }
}

/// Maps reference tokens onto the columns of a detected header by name.
///
/// Column order in the file is irrelevant; only token equality counts.
pub fn align(detected: &[String], reference: &[String], policy: DuplicatePolicy) -> Alignment {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(detected.len());
    let mut duplicates = Vec::new();

    for (index, token) in detected.iter().enumerate() {
        match positions.entry(token.clone()) {
            Entry::Occupied(mut entry) => {
                if !duplicates.contains(token) {
                    duplicates.push(token.clone());
                }
                if policy == DuplicatePolicy::LastWins {
                    entry.insert(index);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(index);
            }
        }
    }

    let reference_set: HashSet<&str> = reference.iter().map(String::as_str).collect();

    let missing = reference
        .iter()
        .filter(|token| !positions.contains_key(token.as_str()))
        .cloned()
        .collect();

    let mut extra: Vec<String> = Vec::new();
    for token in detected {
        if !reference_set.contains(token.as_str()) && !extra.contains(token) {
            extra.push(token.clone());
        }
    }

    positions.retain(|token, _| reference_set.contains(token.as_str()));

    Alignment {
        positions,
        missing,
        extra,
        duplicates,
    }
}
