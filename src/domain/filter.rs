//! Allow/deny/include policy over liquidity sources.

use std::collections::BTreeSet;

use super::side::MarketSide;
use super::source::LiquiditySource;

/// Immutable source filter.
///
/// A source is allowed when it is in the valid set (or the valid set is
/// empty, meaning unrestricted), it is not excluded, and, if an inclusion
/// list is present, it is included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFilters {
    valid: BTreeSet<LiquiditySource>,
    excluded: BTreeSet<LiquiditySource>,
    included: BTreeSet<LiquiditySource>,
}

impl SourceFilters {
    /// Create a filter from explicit valid, excluded and included sets.
    pub fn new(
        valid: impl IntoIterator<Item = LiquiditySource>,
        excluded: impl IntoIterator<Item = LiquiditySource>,
        included: impl IntoIterator<Item = LiquiditySource>,
    ) -> Self {
        Self {
            valid: valid.into_iter().collect(),
            excluded: excluded.into_iter().collect(),
            included: included.into_iter().collect(),
        }
    }

    /// Filter whose valid set is every known source.
    #[must_use]
    pub fn all() -> Self {
        Self::new(LiquiditySource::ALL, [], [])
    }

    /// Filter of sources able to quote the given side.
    #[must_use]
    pub fn for_side(side: MarketSide) -> Self {
        Self::default().validate(
            LiquiditySource::ALL
                .into_iter()
                .filter(|source| side.is_sell() || source.supports_buys()),
        )
    }

    #[must_use]
    pub fn is_allowed(&self, source: LiquiditySource) -> bool {
        if !self.valid.is_empty() && !self.valid.contains(&source) {
            return false;
        }
        if self.excluded.contains(&source) {
            return false;
        }
        if !self.included.is_empty() && !self.included.contains(&source) {
            return false;
        }
        true
    }

    /// Allowed members of the valid set.
    ///
    /// An unrestricted filter reports every known source that passes the
    /// exclusion and inclusion lists.
    #[must_use]
    pub fn sources(&self) -> Vec<LiquiditySource> {
        if self.valid.is_empty() {
            return self.get_allowed(&LiquiditySource::ALL);
        }
        self.valid
            .iter()
            .copied()
            .filter(|source| self.is_allowed(*source))
            .collect()
    }

    /// Subset of `sources` that this filter allows, in input order.
    #[must_use]
    pub fn get_allowed(&self, sources: &[LiquiditySource]) -> Vec<LiquiditySource> {
        sources
            .iter()
            .copied()
            .filter(|source| self.is_allowed(*source))
            .collect()
    }

    /// New filter that additionally excludes `sources`.
    #[must_use]
    pub fn exclude(&self, sources: impl IntoIterator<Item = LiquiditySource>) -> Self {
        let mut next = self.clone();
        next.excluded.extend(sources);
        next
    }

    /// New filter that additionally restricts to `sources`.
    #[must_use]
    pub fn include(&self, sources: impl IntoIterator<Item = LiquiditySource>) -> Self {
        let mut next = self.clone();
        next.included.extend(sources);
        next
    }

    /// New filter that additionally marks `sources` as valid.
    #[must_use]
    pub fn validate(&self, sources: impl IntoIterator<Item = LiquiditySource>) -> Self {
        let mut next = self.clone();
        next.valid.extend(sources);
        next
    }

    /// Combine two filters.
    ///
    /// Valid sets intersect (an empty side defers to the other); exclusion
    /// and inclusion lists are unioned.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let valid = if self.valid.is_empty() {
            other.valid.clone()
        } else if other.valid.is_empty() {
            self.valid.clone()
        } else {
            self.valid.intersection(&other.valid).copied().collect()
        };
        Self {
            valid,
            excluded: self.excluded.union(&other.excluded).copied().collect(),
            included: self.included.union(&other.included).copied().collect(),
        }
    }
}
