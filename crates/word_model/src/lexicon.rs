//! Lexicon store interface (consumed, never implemented here)

/// Translation lookup used to pre-fill a newly created annotation box.
///
/// The engine only reads from the lexicon; it never writes back.
pub trait LexiconStore {
    /// Ordered candidate translations for a primary-language word
    fn lookup_translations(&self, primary: &str) -> Vec<String>;
}

/// A lexicon that knows nothing. Annotations start out blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLexicon;

impl LexiconStore for EmptyLexicon {
    fn lookup_translations(&self, _primary: &str) -> Vec<String> {
        Vec::new()
    }
}
