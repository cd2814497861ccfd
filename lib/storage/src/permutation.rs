use hdtq_common::EncodedTriple;
use hdtq_model::TriplePosition;

/// All triples sorted by one ordering of their components.
#[derive(Debug)]
pub(crate) struct Permutation {
    order: [TriplePosition; 3],
    triples: Vec<EncodedTriple>,
}

impl Permutation {
    pub(crate) fn new(order: [TriplePosition; 3], triples: &[EncodedTriple]) -> Self {
        let mut triples = triples.to_vec();
        triples.sort_unstable_by_key(|triple| key(order, triple));
        Self { order, triples }
    }

    /// Returns all triples whose leading components equal `prefix`.
    pub(crate) fn scan(&self, prefix: &[u64]) -> &[EncodedTriple] {
        let len = prefix.len();
        let start = self.triples.partition_point(|triple| {
            let key = key(self.order, triple);
            &key[..len] < prefix
        });
        let end = self.triples.partition_point(|triple| {
            let key = key(self.order, triple);
            &key[..len] <= prefix
        });
        &self.triples[start..end]
    }
}

fn key(order: [TriplePosition; 3], triple: &EncodedTriple) -> [u64; 3] {
    order.map(|position| match position {
        TriplePosition::Subject => triple.subject,
        TriplePosition::Predicate => triple.predicate,
        TriplePosition::Object => triple.object,
    })
}
