use std::collections::BTreeSet;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::data::models::{Domain, Region, Snapshot};

/// How an identifier was matched to a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMatch<'a> {
    Exact(&'a Region),
    Fuzzy(&'a Region),
}

impl<'a> RegionMatch<'a> {
    pub const fn region(self) -> &'a Region {
        match self {
            Self::Exact(region) | Self::Fuzzy(region) => region,
        }
    }
}

/// Resolves a NUTS code, name or short label to a region.
///
/// Exact matches (case-insensitive) win; otherwise the best fuzzy match on
/// the region name is used, earlier regions winning ties.
pub fn find_region<'a>(snapshot: &'a Snapshot, ident: &str) -> Option<RegionMatch<'a>> {
    let needle = ident.trim();
    if needle.is_empty() {
        return None;
    }

    let exact = snapshot.regions.iter().find(|region| {
        region.id.eq_ignore_ascii_case(needle)
            || region.name == needle
            || region.name.to_lowercase() == needle.to_lowercase()
            || region.short_label.eq_ignore_ascii_case(needle)
    });
    if let Some(region) = exact {
        return Some(RegionMatch::Exact(region));
    }

    let matcher = SkimMatcherV2::default();
    let mut best: Option<(i64, &Region)> = None;
    for region in &snapshot.regions {
        if let Some(score) = matcher.fuzzy_match(&region.name, needle) {
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, region));
            }
        }
    }
    best.map(|(_, region)| RegionMatch::Fuzzy(region))
}

pub fn domains<'a>(snapshot: &'a Snapshot, region: &str) -> &'a [Domain] {
    snapshot
        .domains
        .get(region)
        .map(|declared| declared.domains.as_slice())
        .unwrap_or_default()
}

pub fn emerging<'a>(snapshot: &'a Snapshot, region: &str) -> &'a [String] {
    snapshot
        .domains
        .get(region)
        .map(|declared| declared.emerging.as_slice())
        .unwrap_or_default()
}

/// Union of the codes of every domain the region declares
pub fn code_set(snapshot: &Snapshot, region: &str) -> BTreeSet<String> {
    domains(snapshot, region)
        .iter()
        .flat_map(|domain| domain.codes.iter().cloned())
        .collect()
}

/// Code sets of all regions, in catalogue order
pub fn code_sets(snapshot: &Snapshot) -> Vec<(String, BTreeSet<String>)> {
    snapshot
        .regions
        .iter()
        .map(|region| (region.name.clone(), code_set(snapshot, &region.name)))
        .collect()
}
