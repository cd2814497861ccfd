use hdtq_common::{DictionaryStatistics, EncodedTriplePattern};

/// Estimates a pattern from dictionary statistics alone.
///
/// Assumes that every subject has at least one `rdf:type` triple, that there are few classes, and
/// that the remaining triples are spread evenly among subjects and non-type predicates.
pub fn statistical_estimate(
    statistics: &DictionaryStatistics,
    pattern: &EncodedTriplePattern,
    rdf_type: Option<u64>,
) -> u64 {
    let subject_bound = pattern.subject.is_some();
    let object_bound = pattern.object.is_some();

    match pattern.predicate {
        Some(predicate) if Some(predicate) == rdf_type => match (subject_bound, object_bound) {
            (false, false) => statistics.subjects,
            (false, true) => statistics.subjects / 2,
            (true, false) => 5,
            (true, true) => 1,
        },
        Some(_) => {
            let triples_with_predicate = statistics.triples.saturating_sub(statistics.subjects)
                / statistics.predicates.saturating_sub(1).max(1);
            match (subject_bound, object_bound) {
                (false, false) => triples_with_predicate.max(500),
                (false, true) => (triples_with_predicate / statistics.objects.max(1)).max(100),
                (true, false) => (triples_with_predicate / statistics.subjects.max(1)).max(10),
                (true, true) => 1,
            }
        }
        None => match (subject_bound, object_bound) {
            (false, false) => statistics.triples,
            (false, true) => (statistics.triples / statistics.objects.max(1)).max(300),
            (true, false) => (statistics.triples / statistics.subjects.max(1)).max(50),
            (true, true) => 2,
        },
    }
}
