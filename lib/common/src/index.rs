use crate::error::StorageError;
use hdtq_model::{Term, TriplePosition};
use std::fmt::Debug;

/// A triple whose terms have been replaced by their dictionary ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EncodedTriple {
    pub subject: u64,
    pub predicate: u64,
    pub object: u64,
}

impl EncodedTriple {
    pub const fn new(subject: u64, predicate: u64, object: u64) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// A search pattern over dictionary ids. A [None] slot is a wildcard.
///
/// The index has no notion of variable names. A pattern such as `?x <p> ?x` is issued with two
/// wildcards and the co-reference has to be enforced by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EncodedTriplePattern {
    pub subject: Option<u64>,
    pub predicate: Option<u64>,
    pub object: Option<u64>,
}

impl EncodedTriplePattern {
    pub const fn new(subject: Option<u64>, predicate: Option<u64>, object: Option<u64>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Returns the number of slots that are not wildcards.
    pub fn ground_count(&self) -> usize {
        [self.subject, self.predicate, self.object]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

/// How much an [EstimatedCount] can be trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EstimateConfidence {
    /// The count is the exact number of matches.
    Exact,
    /// The count is an approximation of the number of matches.
    Approximate,
    /// The index does not know how good the count is.
    Unknown,
}

/// The number of matches an index expects for a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EstimatedCount {
    pub value: u64,
    pub confidence: EstimateConfidence,
}

impl EstimatedCount {
    pub const fn exact(value: u64) -> Self {
        Self {
            value,
            confidence: EstimateConfidence::Exact,
        }
    }

    pub const fn approximate(value: u64) -> Self {
        Self {
            value,
            confidence: EstimateConfidence::Approximate,
        }
    }

    pub const fn unknown(value: u64) -> Self {
        Self {
            value,
            confidence: EstimateConfidence::Unknown,
        }
    }
}

/// The result of a [TripleIndex::search]: the estimated count and a lazy iterator over the
/// matching triples.
pub struct TripleMatches<'index> {
    estimated_count: EstimatedCount,
    triples: Box<dyn Iterator<Item = EncodedTriple> + Send + 'index>,
}

impl<'index> TripleMatches<'index> {
    pub fn new(
        estimated_count: EstimatedCount,
        triples: impl Iterator<Item = EncodedTriple> + Send + 'index,
    ) -> Self {
        Self {
            estimated_count,
            triples: Box::new(triples),
        }
    }

    /// Returns the number of matches the index expects.
    pub fn estimated_count(&self) -> EstimatedCount {
        self.estimated_count
    }
}

impl Iterator for TripleMatches<'_> {
    type Item = EncodedTriple;

    fn next(&mut self) -> Option<Self::Item> {
        self.triples.next()
    }
}

impl Debug for TripleMatches<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleMatches")
            .field("estimated_count", &self.estimated_count)
            .finish_non_exhaustive()
    }
}

/// Ground counts of the dictionary backing a [TripleIndex].
///
/// If `triples` is zero, the other counts may be zero as well.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DictionaryStatistics {
    pub subjects: u64,
    pub predicates: u64,
    pub objects: u64,
    pub triples: u64,
}

/// A read-only, dictionary-encoded triple index.
///
/// Dictionary ids are positive and assigned per [TriplePosition]. `0` is never a valid id.
///
/// # Consistency
///
/// The index is immutable. Repeated searches for the same pattern must yield the same estimated
/// count, as the cardinality estimator relies on probes being idempotent.
pub trait TripleIndex: Debug + Send + Sync {
    /// Returns the ground counts of the dictionary.
    fn statistics(&self) -> DictionaryStatistics;

    /// Looks up the id of `term` in the dictionary section for `position`.
    ///
    /// Returns [None] if the term does not occur in that position. A pattern containing such a
    /// term cannot match any triple.
    fn term_to_id(
        &self,
        term: &Term,
        position: TriplePosition,
    ) -> Result<Option<u64>, StorageError>;

    /// Searches the index for all triples matching `pattern`.
    fn search(
        &self,
        pattern: EncodedTriplePattern,
    ) -> Result<TripleMatches<'_>, StorageError>;
}
