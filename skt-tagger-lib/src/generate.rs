// Regular nominal paradigms generated from a stem and the stored endings.

use std::collections::{BTreeMap, HashMap};

use crate::dictionary::LexicalStore;
use crate::enums::{EnumId, EnumKind, EnumTable};
use crate::error::QueryError;
use crate::trie::SuffixTrie;
use crate::types::StemType;

/// `(case abbr, number abbr)` -> form.
pub type NominalParadigm = BTreeMap<(String, String), String>;

/// Builds full nominal paradigms for regular stems, so that only stems and
/// endings need to be stored.
pub struct NominalGenerator<'a> {
    enums: &'a EnumTable,
    stem_types: SuffixTrie<String>,
    /// stem type -> (gender, case, number) -> ending.
    endings: HashMap<String, HashMap<(EnumId, EnumId, EnumId), String>>,
}

impl<'a> NominalGenerator<'a> {
    pub fn new(store: &'a dyn LexicalStore) -> Self {
        let mut stem_types = SuffixTrie::new();
        let mut endings: HashMap<String, HashMap<_, _>> = HashMap::new();
        for e in store.nominal_endings() {
            // Compounded endings only appear inside compounds.
            if e.compounded {
                continue;
            }
            let StemType::Vowel(stem_type) = &e.stem_type else {
                continue;
            };
            stem_types.insert(stem_type, stem_type.clone());
            endings
                .entry(stem_type.clone())
                .or_default()
                .insert((e.gender, e.case, e.number), e.name.clone());
        }
        Self {
            enums: store.enums(),
            stem_types,
            endings,
        }
    }

    /// Inflect `stem_name` in `gender` across every case and number. The
    /// stem is treated as regular: the longest known stem type it ends in is
    /// replaced by each ending. Cells with no stored ending are left out.
    ///
    /// `gender` may be a name or an abbreviation.
    pub fn paradigm(&self, stem_name: &str, gender: &str) -> Result<NominalParadigm, QueryError> {
        let gender_id =
            self.enums
                .id(EnumKind::Gender, gender)
                .ok_or_else(|| QueryError::UnknownEnumValue {
                    kind: EnumKind::Gender,
                    value: gender.to_string(),
                })?;

        let stem_type = self
            .stem_types
            .lookup(stem_name)
            .into_iter()
            .max_by_key(|t| t.chars().count())
            .ok_or_else(|| QueryError::NoStemType(stem_name.to_string()))?;
        let endings = self
            .endings
            .get(stem_type)
            .ok_or_else(|| QueryError::NoStemType(stem_name.to_string()))?;

        let keep = stem_name.chars().count() - stem_type.chars().count();
        let truncated: String = stem_name.chars().take(keep).collect();

        let mut out = BTreeMap::new();
        for case in self.enums.entries(EnumKind::Case) {
            for number in self.enums.entries(EnumKind::Number) {
                if let Some(ending) = endings.get(&(gender_id, case.id, number.id)) {
                    out.insert(
                        (case.abbr.clone(), number.abbr.clone()),
                        format!("{truncated}{ending}"),
                    );
                }
            }
        }
        Ok(out)
    }
}
