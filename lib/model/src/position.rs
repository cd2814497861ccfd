use std::fmt;
use std::fmt::{Display, Formatter};

/// A slot of a triple.
///
/// The declaration order is the slot order used everywhere in the crate (`Subject <
/// Predicate < Object`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TriplePosition {
    Subject,
    Predicate,
    Object,
}

impl TriplePosition {
    /// All positions in slot order.
    pub const ALL: [TriplePosition; 3] = [
        TriplePosition::Subject,
        TriplePosition::Predicate,
        TriplePosition::Object,
    ];

    /// Returns the zero-based index of the slot.
    pub const fn index(self) -> usize {
        match self {
            TriplePosition::Subject => 0,
            TriplePosition::Predicate => 1,
            TriplePosition::Object => 2,
        }
    }

    /// Returns the bit representing this slot in a three-bit slot mask. The subject is the
    /// most significant bit.
    pub const fn mask_bit(self) -> u8 {
        match self {
            TriplePosition::Subject => 0b100,
            TriplePosition::Predicate => 0b010,
            TriplePosition::Object => 0b001,
        }
    }
}

impl Display for TriplePosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TriplePosition::Subject => write!(f, "SUB"),
            TriplePosition::Predicate => write!(f, "PRE"),
            TriplePosition::Object => write!(f, "OBJ"),
        }
    }
}
