//! Filtering helpers for listing results
//!
//! Every listing operation returns an identifier → attributes mapping. These
//! helpers narrow such a mapping by name and, where the entries carry one, by
//! tool, without ever mutating the input. `find_first` short-circuits to the
//! first match and returns `None` (not an error) when nothing matches.

use crate::error::Result;
use crate::models::{ItemEntry, MediaEntry};
use regex::Regex;
use std::collections::BTreeMap;

/// Criterion applied to an entry's name or tool
#[derive(Debug, Clone)]
pub enum NameFilter {
    /// Match everything
    Any,
    /// Match the exact string
    Exact(String),
    /// Match a regular expression anchored at the start of the candidate
    Pattern(Regex),
}

impl NameFilter {
    /// Exact-string criterion
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Leading-anchored pattern criterion
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self::Pattern(Regex::new(&format!("^(?:{pattern})"))?))
    }

    /// Does `candidate` satisfy this criterion?
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(name) => candidate == name,
            Self::Pattern(re) => re.is_match(candidate),
        }
    }

    /// Apply to an optional tool: entries without a tool only pass `Any`
    fn matches_tool(&self, tool: Option<&str>) -> bool {
        match tool {
            Some(tool) => self.matches(tool),
            None => matches!(self, Self::Any),
        }
    }
}

/// Listing values that expose a name and, optionally, a tool
pub trait Filterable {
    fn name(&self) -> &str;

    fn tool(&self) -> Option<&str> {
        None
    }
}

impl Filterable for String {
    fn name(&self) -> &str {
        self
    }
}

impl Filterable for MediaEntry {
    fn name(&self) -> &str {
        &self.title
    }

    fn tool(&self) -> Option<&str> {
        Some(&self.tool)
    }
}

impl Filterable for ItemEntry {
    fn name(&self) -> &str {
        &self.title
    }

    fn tool(&self) -> Option<&str> {
        Some(&self.tool)
    }
}

/// All entries satisfying both criteria, as a new mapping
pub fn filter<V>(
    listing: &BTreeMap<String, V>,
    name: &NameFilter,
    tool: &NameFilter,
) -> BTreeMap<String, V>
where
    V: Filterable + Clone,
{
    listing
        .iter()
        .filter(|(_, v)| name.matches(v.name()) && tool.matches_tool(v.tool()))
        .map(|(id, v)| (id.clone(), v.clone()))
        .collect()
}

/// The first entry satisfying both criteria, or `None`
pub fn find_first<V>(
    listing: &BTreeMap<String, V>,
    name: &NameFilter,
    tool: &NameFilter,
) -> Option<(String, V)>
where
    V: Filterable + Clone,
{
    listing
        .iter()
        .find(|(_, v)| name.matches(v.name()) && tool.matches_tool(v.tool()))
        .map(|(id, v)| (id.clone(), v.clone()))
}
