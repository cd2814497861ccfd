//! Vocabulary terms the query core needs to recognize.

use oxrdf::NamedNodeRef;

/// `rdf:type`, the predicate the class-based estimates are keyed on.
pub const RDF_TYPE: NamedNodeRef<'static> = oxrdf::vocab::rdf::TYPE;
