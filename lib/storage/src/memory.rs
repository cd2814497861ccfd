use crate::dictionary::Dictionary;
use crate::permutation::Permutation;
use hdtq_common::error::StorageError;
use hdtq_common::{
    DictionaryStatistics, EncodedTriple, EncodedTriplePattern, EstimatedCount, TripleIndex,
    TripleMatches,
};
use hdtq_model::{Term, Triple, TriplePosition};

/// An immutable, dictionary-encoded triple index held in memory.
///
/// Subjects, predicates and objects are encoded by separate dictionaries whose ids start at 1.
/// The triples are kept in three sort orders (SPO, POS and OSP) so that every pattern is
/// answered by a single range scan.
///
/// # Estimates
///
/// Patterns with at most one bound slot report the exact number of matches. Patterns with more
/// bound slots report the smallest count of any single bound slot as an approximation.
#[derive(Debug)]
pub struct MemTripleIndex {
    subjects: Dictionary,
    predicates: Dictionary,
    objects: Dictionary,
    spo: Permutation,
    pos: Permutation,
    osp: Permutation,
}

impl MemTripleIndex {
    /// Builds an index over `triples`. Duplicate triples are stored once.
    pub fn try_new(triples: impl IntoIterator<Item = Triple>) -> Result<Self, StorageError> {
        let mut subjects = Dictionary::default();
        let mut predicates = Dictionary::default();
        let mut objects = Dictionary::default();

        let mut encoded = Vec::new();
        for triple in triples {
            let subject = subjects.encode(subject_to_term(triple.subject)?);
            let predicate = predicates.encode(triple.predicate.into());
            let object = objects.encode(object_to_term(triple.object)?);
            encoded.push(EncodedTriple::new(subject, predicate, object));
        }
        encoded.sort_unstable();
        encoded.dedup();

        Ok(Self {
            subjects,
            predicates,
            objects,
            spo: Permutation::new(
                [
                    TriplePosition::Subject,
                    TriplePosition::Predicate,
                    TriplePosition::Object,
                ],
                &encoded,
            ),
            pos: Permutation::new(
                [
                    TriplePosition::Predicate,
                    TriplePosition::Object,
                    TriplePosition::Subject,
                ],
                &encoded,
            ),
            osp: Permutation::new(
                [
                    TriplePosition::Object,
                    TriplePosition::Subject,
                    TriplePosition::Predicate,
                ],
                &encoded,
            ),
        })
    }

    /// Returns the term with the given `id` in the dictionary section for `position`.
    pub fn id_to_term(&self, id: u64, position: TriplePosition) -> Option<&Term> {
        self.dictionary(position).term(id)
    }

    fn dictionary(&self, position: TriplePosition) -> &Dictionary {
        match position {
            TriplePosition::Subject => &self.subjects,
            TriplePosition::Predicate => &self.predicates,
            TriplePosition::Object => &self.objects,
        }
    }

    /// Picks the permutation whose leading components are exactly the bound slots.
    fn scan(&self, pattern: &EncodedTriplePattern) -> &[EncodedTriple] {
        match (pattern.subject, pattern.predicate, pattern.object) {
            (None, None, None) => self.spo.scan(&[]),
            (Some(s), None, None) => self.spo.scan(&[s]),
            (None, Some(p), None) => self.pos.scan(&[p]),
            (None, None, Some(o)) => self.osp.scan(&[o]),
            (Some(s), Some(p), None) => self.spo.scan(&[s, p]),
            (None, Some(p), Some(o)) => self.pos.scan(&[p, o]),
            (Some(s), None, Some(o)) => self.osp.scan(&[o, s]),
            (Some(s), Some(p), Some(o)) => self.spo.scan(&[s, p, o]),
        }
    }

    fn estimate(&self, pattern: &EncodedTriplePattern, matches: usize) -> EstimatedCount {
        if pattern.ground_count() <= 1 {
            return EstimatedCount::exact(as_count(matches));
        }

        let slot_counts = [
            pattern.subject.map(|s| self.spo.scan(&[s]).len()),
            pattern.predicate.map(|p| self.pos.scan(&[p]).len()),
            pattern.object.map(|o| self.osp.scan(&[o]).len()),
        ];
        let smallest = slot_counts.into_iter().flatten().min().unwrap_or(matches);
        EstimatedCount::approximate(as_count(smallest))
    }
}

impl TripleIndex for MemTripleIndex {
    fn statistics(&self) -> DictionaryStatistics {
        DictionaryStatistics {
            subjects: self.subjects.len(),
            predicates: self.predicates.len(),
            objects: self.objects.len(),
            triples: as_count(self.spo.scan(&[]).len()),
        }
    }

    fn term_to_id(
        &self,
        term: &Term,
        position: TriplePosition,
    ) -> Result<Option<u64>, StorageError> {
        Ok(self.dictionary(position).id(term))
    }

    fn search(
        &self,
        pattern: EncodedTriplePattern,
    ) -> Result<TripleMatches<'_>, StorageError> {
        let matches = self.scan(&pattern);
        let estimated_count = self.estimate(&pattern, matches.len());
        Ok(TripleMatches::new(estimated_count, matches.iter().copied()))
    }
}

fn as_count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[allow(
    unreachable_patterns,
    reason = "Quoted triples only exist if the rdf-star feature of oxrdf is enabled"
)]
fn subject_to_term(subject: oxrdf::Subject) -> Result<Term, StorageError> {
    match subject {
        oxrdf::Subject::NamedNode(node) => Ok(node.into()),
        oxrdf::Subject::BlankNode(node) => Ok(node.into()),
        _ => Err(quoted_triples_unsupported()),
    }
}

#[allow(
    unreachable_patterns,
    reason = "Quoted triples only exist if the rdf-star feature of oxrdf is enabled"
)]
fn object_to_term(object: oxrdf::Term) -> Result<Term, StorageError> {
    match object {
        oxrdf::Term::NamedNode(node) => Ok(node.into()),
        oxrdf::Term::BlankNode(node) => Ok(node.into()),
        oxrdf::Term::Literal(literal) => Ok(literal.into()),
        _ => Err(quoted_triples_unsupported()),
    }
}

fn quoted_triples_unsupported() -> StorageError {
    StorageError::Other("Quoted triples are not supported by the triple index".into())
}
