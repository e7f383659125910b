//! Storage-agnostic query specification.
//!
//! A [`QuerySpec`] is built once per listing call from a validated request
//! and handed to storage as an opaque value: an ordered list of conjunctive
//! predicates, exactly one sort key with its direction, and an
//! offset/limit window. Building never fails and depends on nothing but
//! its input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::listing::ValidListing;

/// Attributes that support equality filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAttribute {
    Name,
}

/// Attributes that support inclusive range filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericAttribute {
    Height,
    Weight,
}

/// The enumerated sortable attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Height,
    Weight,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Id, SortKey::Name, SortKey::Height, SortKey::Weight];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Height => "height",
            SortKey::Weight => "weight",
        }
    }
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL.into_iter().find(|k| k.as_str() == s).ok_or(())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const ALL: [SortDirection; 2] = [SortDirection::Asc, SortDirection::Desc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortDirection::ALL.into_iter().find(|d| d.as_str() == s).ok_or(())
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Closed interval `[min, max]`. Inverted bounds are passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub min: i32,
    pub max: i32,
}

impl Range {
    pub fn contains(&self, value: i32) -> bool { self.min <= value && value <= self.max }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// `attribute = value`; case handling is left to storage.
    Equals { attribute: TextAttribute, value: String },
    /// `attribute >= range.min AND attribute <= range.max`.
    Between { attribute: NumericAttribute, range: Range },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Pagination window: rows `[offset, offset + limit)` of the sorted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySpec {
    predicates: Vec<Predicate>,
    sort: Sort,
    window: Window,
}

impl QuerySpec {
    /// Translate a validated listing into a query specification.
    ///
    /// Predicates are emitted in a fixed order (name, height, weight) so the
    /// same listing always yields an identical spec.
    pub fn build(listing: &ValidListing) -> Self {
        let mut predicates = Vec::with_capacity(3);
        if let Some(name) = &listing.name {
            predicates.push(Predicate::Equals { attribute: TextAttribute::Name, value: name.clone() });
        }
        if let Some(range) = listing.height {
            predicates.push(Predicate::Between { attribute: NumericAttribute::Height, range });
        }
        if let Some(range) = listing.weight {
            predicates.push(Predicate::Between { attribute: NumericAttribute::Weight, range });
        }
        Self {
            predicates,
            sort: listing.sort,
            window: Window { offset: listing.skip, limit: listing.take },
        }
    }

    pub fn predicates(&self) -> &[Predicate] { &self.predicates }

    pub fn sort(&self) -> Sort { self.sort }

    pub fn window(&self) -> Window { self.window }
}
