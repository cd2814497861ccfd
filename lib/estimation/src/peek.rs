use crate::cache::{ClassCache, EstimateCache, PredicateCache};
use crate::heuristic::statistical_estimate;
use crate::prefetch::PrefetchTask;
use crate::{CardinalityEstimator, EstimatorOptions};
use datafusion::common::stats::Precision;
use hdtq_algebra::TriplePatternNode;
use hdtq_common::{
    DFResult, DictionaryStatistics, EncodedTriplePattern, EstimateConfidence, TripleIndex,
};
use hdtq_model::{vocab, Term, TriplePosition};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Controls when the [PeekEstimator] consults the triple index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LookupMode {
    /// Only use the statistical heuristic.
    Never,
    /// Consult the index for the cached `?s <p> ?o` and `?s a <C>` shapes.
    #[default]
    Cached,
    /// Additionally probe the index for every other partially bound pattern.
    Always,
}

/// Searches the index for `pattern` and reports the index's own count estimate.
///
/// Unknown counts are trusted as exact if at least two slots are bound, as the index resolves
/// such patterns precisely.
pub fn peek(index: &dyn TripleIndex, pattern: EncodedTriplePattern) -> DFResult<Precision<u64>> {
    let count = index.search(pattern)?.estimated_count();
    let precision = match count.confidence {
        EstimateConfidence::Exact => Precision::Exact(count.value),
        EstimateConfidence::Approximate => Precision::Inexact(count.value.max(1)),
        EstimateConfidence::Unknown if pattern.ground_count() >= 2 => {
            Precision::Exact(count.value)
        }
        EstimateConfidence::Unknown => Precision::Absent,
    };
    Ok(precision)
}

/// Combines an index estimate with the heuristic estimate.
fn blend(estimate: Precision<u64>, heuristic: u64) -> u64 {
    match estimate {
        Precision::Exact(value) => value,
        Precision::Inexact(value) => (heuristic.saturating_add(value) / 2).max(1),
        Precision::Absent => heuristic,
    }
}

/// Estimates patterns with dictionary statistics and probes into the triple index.
///
/// Index probes for the common `?s <p> ?o` and `?s a <C>` shapes are memoized in a
/// [PredicateCache] and a [ClassCache]. Both caches can be filled by background threads, see
/// [PeekEstimator::start_prefetch].
#[derive(Debug)]
pub struct PeekEstimator {
    index: Arc<dyn TripleIndex>,
    statistics: DictionaryStatistics,
    /// The id of `rdf:type`, if it occurs as a predicate.
    rdf_type: Option<u64>,
    lookup: LookupMode,
    predicate_cache: Arc<PredicateCache>,
    class_cache: Arc<ClassCache>,
    prefetch_tasks: Mutex<Vec<PrefetchTask>>,
}

impl PeekEstimator {
    pub fn try_new(index: Arc<dyn TripleIndex>, options: &EstimatorOptions) -> DFResult<Self> {
        let statistics = index.statistics();
        let rdf_type =
            index.term_to_id(&Term::from(vocab::RDF_TYPE), TriplePosition::Predicate)?;
        let predicate_cache = Arc::new(PredicateCache::new(
            Arc::clone(&index),
            statistics.predicates,
            options.predicate_cache_size,
        ));
        let class_cache = Arc::new(ClassCache::new(
            Arc::clone(&index),
            rdf_type,
            options.class_cache_capacity,
        ));

        Ok(Self {
            index,
            statistics,
            rdf_type,
            lookup: options.lookup,
            predicate_cache,
            class_cache,
            prefetch_tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn predicate_cache(&self) -> &Arc<PredicateCache> {
        &self.predicate_cache
    }

    pub fn class_cache(&self) -> &Arc<ClassCache> {
        &self.class_cache
    }

    /// Starts filling both caches on background threads.
    ///
    /// Does nothing if prefetching has already been started.
    pub fn start_prefetch(&self) -> DFResult<()> {
        let mut tasks = self
            .prefetch_tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !tasks.is_empty() {
            return Ok(());
        }

        let predicate_cache: Arc<dyn EstimateCache> =
            Arc::<PredicateCache>::clone(&self.predicate_cache);
        tasks.push(PrefetchTask::spawn(predicate_cache)?);
        let class_cache: Arc<dyn EstimateCache> = Arc::<ClassCache>::clone(&self.class_cache);
        tasks.push(PrefetchTask::spawn(class_cache)?);
        Ok(())
    }

    /// Signals all prefetch threads to stop and waits until they have exited.
    pub fn stop_prefetch(&self) {
        let tasks = std::mem::take(
            &mut *self
                .prefetch_tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for mut task in tasks {
            task.stop();
        }
    }

    /// Encodes the ground terms of `pattern`. Returns [None] if a term is not in the dictionary.
    fn encode(&self, pattern: &TriplePatternNode) -> DFResult<Option<EncodedTriplePattern>> {
        let mut ids = [None; 3];
        for position in TriplePosition::ALL {
            let term = pattern.term(position);
            if term.is_variable() {
                continue;
            }
            match self.index.term_to_id(term, position)? {
                Some(id) => ids[position.index()] = Some(id),
                None => return Ok(None),
            }
        }
        let [subject, predicate, object] = ids;
        Ok(Some(EncodedTriplePattern::new(subject, predicate, object)))
    }

    /// The heuristic, weighted by how large the cached estimate of the bound predicate is
    /// compared to all other predicates.
    fn weighted_heuristic(&self, pattern: &EncodedTriplePattern) -> u64 {
        let heuristic = statistical_estimate(&self.statistics, pattern, self.rdf_type);
        let normalized = match pattern.predicate {
            Some(predicate) if Some(predicate) != self.rdf_type => {
                self.predicate_cache.normalized(predicate)
            }
            _ => 1.0,
        };
        weigh(heuristic, normalized)
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Estimates are rough and far from the precision limits"
)]
fn weigh(heuristic: u64, normalized: f64) -> u64 {
    (heuristic as f64 * (0.5 + 0.5 * normalized)) as u64
}

impl CardinalityEstimator for PeekEstimator {
    fn estimate(&self, pattern: &TriplePatternNode) -> DFResult<u64> {
        if self.statistics.triples == 0 {
            return Ok(0);
        }
        match pattern.ground_count() {
            3 => return Ok(1),
            0 => return Ok(self.statistics.triples),
            _ => {}
        }
        let Some(encoded) = self.encode(pattern)? else {
            return Ok(0);
        };

        let heuristic = self.weighted_heuristic(&encoded);
        if self.lookup == LookupMode::Never {
            return Ok(heuristic);
        }

        let probe = match (encoded.subject, encoded.predicate, encoded.object) {
            (None, Some(predicate), None) if Some(predicate) != self.rdf_type => {
                self.predicate_cache.get(predicate)?
            }
            (None, Some(predicate), Some(class)) if Some(predicate) == self.rdf_type => {
                self.class_cache.get(class)?
            }
            _ if self.lookup == LookupMode::Always => peek(self.index.as_ref(), encoded)?,
            _ => Precision::Absent,
        };
        let estimate = blend(probe, heuristic);
        trace!(%pattern, ?probe, heuristic, estimate, "Estimated triple pattern");
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_exact_wins() {
        assert_eq!(blend(Precision::Exact(0), 500), 0);
        assert_eq!(blend(Precision::Exact(42), 500), 42);
    }

    #[test]
    fn blend_inexact_averages() {
        assert_eq!(blend(Precision::Inexact(100), 300), 200);
        assert_eq!(blend(Precision::Inexact(1), 0), 1);
    }

    #[test]
    fn weighting_halves_unimportant_predicates() {
        assert_eq!(weigh(1_000, 1.0), 1_000);
        assert_eq!(weigh(1_000, 0.0), 500);
        assert_eq!(weigh(1_000, 0.5), 750);
    }

    #[test]
    fn blend_absent_uses_heuristic() {
        assert_eq!(blend(Precision::Absent, 300), 300);
    }
}
