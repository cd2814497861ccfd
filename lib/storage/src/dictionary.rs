use hdtq_model::Term;
use rustc_hash::FxHashMap;

/// Maps the terms of one triple position to dense ids starting at 1.
#[derive(Debug, Default)]
pub(crate) struct Dictionary {
    ids: FxHashMap<Term, u64>,
    terms: Vec<Term>,
}

impl Dictionary {
    pub(crate) fn encode(&mut self, term: Term) -> u64 {
        if let Some(id) = self.ids.get(&term) {
            return *id;
        }
        self.terms.push(term.clone());
        let id = self.len();
        self.ids.insert(term, id);
        id
    }

    pub(crate) fn id(&self, term: &Term) -> Option<u64> {
        self.ids.get(term).copied()
    }

    pub(crate) fn term(&self, id: u64) -> Option<&Term> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.terms.get(index)
    }

    pub(crate) fn len(&self) -> u64 {
        u64::try_from(self.terms.len()).unwrap_or(u64::MAX)
    }
}
