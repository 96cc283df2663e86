// Morphological analysis: find every stored form or stem + ending reading of
// a word.

use std::collections::BTreeMap;

use tracing::trace;

use crate::dictionary::LexicalStore;
use crate::sounds;
use crate::trie::SuffixTrie;
use crate::types::*;

/// Analyzes complete words (padas) against a lexical store. Holds an index
/// of nominal endings built once at construction.
pub struct Analyzer<'a> {
    store: &'a dyn LexicalStore,
    endings: SuffixTrie<Ending>,
}

impl<'a> Analyzer<'a> {
    pub fn new(store: &'a dyn LexicalStore) -> Self {
        let mut endings = SuffixTrie::new();
        for e in store.nominal_endings() {
            endings.insert(&e.name, e.clone());
        }
        Self { store, endings }
    }

    pub fn store(&self) -> &'a dyn LexicalStore {
        self.store
    }

    /// Every reading of `word`: stored forms first, then stem + ending
    /// decompositions. A word can have both; neither list is deduplicated
    /// against the other.
    pub fn analyze(&self, word: &str) -> Vec<LexicalCandidate> {
        let mut out = self.analyze_as_form(word);
        out.extend(self.analyze_as_stem(word));
        out
    }

    /// Exact lookup of `word` among stored forms.
    pub fn analyze_as_form(&self, word: &str) -> Vec<LexicalCandidate> {
        self.store
            .forms_named(word)
            .iter()
            .cloned()
            .map(LexicalCandidate::Exact)
            .collect()
    }

    /// Split `word` into a known stem and a regular nominal ending.
    pub fn analyze_as_stem(&self, word: &str) -> Vec<LexicalCandidate> {
        if word.is_empty() {
            return Vec::new();
        }

        // Candidate stem name -> endings that would produce `word` from it.
        let mut stem_endings: BTreeMap<String, Vec<&Ending>> = BTreeMap::new();
        for ending in self.endings.lookup(word) {
            if let Some(stem) = candidate_stem(word, ending) {
                stem_endings.entry(stem).or_default().push(ending);
            }
        }

        let enums = self.store.enums();
        let mut out = Vec::new();
        for (name, endings) in &stem_endings {
            for stem in self.store.stems_named(name) {
                let group = match stem.pos {
                    Pos::Nominal => stem.genders.and_then(|g| enums.gender_group(g)),
                    _ => None,
                };
                for e in endings {
                    if let Some(group) = group {
                        if !group.contains(e.gender) {
                            continue;
                        }
                    }
                    out.push(LexicalCandidate::Decomposed(NominalForm {
                        name: word.to_string(),
                        stem: stem.id,
                        pos: stem.pos,
                        gender: e.gender,
                        case: e.case,
                        number: e.number,
                        compounded: e.compounded,
                    }));
                }
            }
        }
        trace!(word, candidates = out.len(), "stem analysis");
        out
    }
}

/// The stem `word` would have if it ended in `ending`, or `None` for a
/// degenerate consonant stem.
fn candidate_stem(word: &str, ending: &Ending) -> Option<String> {
    let word_len = word.chars().count();
    let ending_len = ending.name.chars().count();
    let truncated: String = word.chars().take(word_len - ending_len).collect();

    match &ending.stem_type {
        StemType::Consonant => {
            let last = truncated.chars().last()?;
            if sounds::is_vowel(last) {
                return None;
            }
            // A lone consonant is never a stem.
            if truncated.chars().count() == 1 && sounds::is_consonant(last) {
                return None;
            }
            Some(truncated)
        }
        StemType::Vowel(stem_type) => Some(truncated + stem_type),
    }
}
