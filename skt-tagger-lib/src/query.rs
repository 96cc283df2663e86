// Paradigm tables assembled from forms stored in the lexicon.

use std::collections::BTreeMap;

use crate::dictionary::LexicalStore;
use crate::enums::{EnumId, EnumKind};
use crate::error::QueryError;
use crate::types::Form;

/// `(first key abbr, second key abbr)` -> form, e.g. `("3", "s") -> gacCati`.
pub type Paradigm = BTreeMap<(String, String), String>;

/// Looks up stored paradigms: conjugated verbs and irregular nominals such
/// as pronouns.
pub struct ParadigmQuery<'a> {
    store: &'a dyn LexicalStore,
}

impl<'a> ParadigmQuery<'a> {
    pub fn new(store: &'a dyn LexicalStore) -> Self {
        Self { store }
    }

    fn enum_id(&self, kind: EnumKind, value: &str) -> Result<EnumId, QueryError> {
        self.store
            .enums()
            .id(kind, value)
            .ok_or_else(|| QueryError::UnknownEnumValue {
                kind,
                value: value.to_string(),
            })
    }

    fn abbr(&self, kind: EnumKind, id: EnumId) -> String {
        self.store.enums().abbr(kind, id).unwrap_or("").to_string()
    }

    /// Forms of `root_name` in `mode` and `voice`, keyed by
    /// `(person, number)`. The first root with that name is used.
    pub fn verb(&self, root_name: &str, mode: &str, voice: &str) -> Result<Paradigm, QueryError> {
        let root = self
            .store
            .roots_named(root_name)
            .first()
            .ok_or_else(|| QueryError::UnknownRoot(root_name.to_string()))?;
        let mode_id = self.enum_id(EnumKind::Mode, mode)?;
        let voice_id = self.enum_id(EnumKind::Voice, voice)?;

        let mut out = BTreeMap::new();
        for form in self.store.forms_of_root(root.id) {
            if let Form::Verb {
                name,
                person,
                number,
                mode,
                voice,
                ..
            } = form
            {
                if *mode == mode_id && *voice == voice_id {
                    out.insert(
                        (
                            self.abbr(EnumKind::Person, *person),
                            self.abbr(EnumKind::Number, *number),
                        ),
                        name.clone(),
                    );
                }
            }
        }
        Ok(out)
    }

    /// Stored forms of `stem_name` in `gender`, keyed by `(case, number)`.
    pub fn nominal(&self, stem_name: &str, gender: &str) -> Result<Paradigm, QueryError> {
        let stem = self
            .store
            .stems_named(stem_name)
            .first()
            .ok_or_else(|| QueryError::UnknownStem(stem_name.to_string()))?;
        let gender_id = self.enum_id(EnumKind::Gender, gender)?;

        let mut out = BTreeMap::new();
        for form in self.store.forms_of_stem(stem.id) {
            if let Form::Nominal(n) = form {
                if n.gender == gender_id {
                    out.insert(
                        (
                            self.abbr(EnumKind::Case, n.case),
                            self.abbr(EnumKind::Number, n.number),
                        ),
                        n.name.clone(),
                    );
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::fixture;

    fn verify(actual: &Paradigm, expected: &[((&str, &str), &str)]) {
        for ((a, b), form) in expected {
            let key = (a.to_string(), b.to_string());
            assert_eq!(
                actual.get(&key).map(String::as_str),
                Some(*form),
                "cell {key:?}"
            );
        }
    }

    #[test]
    fn test_verb() {
        let lex = fixture();
        let q = ParadigmQuery::new(&lex);
        let expected = [
            (("3", "s"), "gacCati"),
            (("3", "d"), "gacCatas"),
            (("3", "p"), "gacCanti"),
            (("2", "s"), "gacCasi"),
            (("2", "d"), "gacCaTas"),
            (("2", "p"), "gacCaTa"),
            (("1", "s"), "gacCAmi"),
            (("1", "d"), "gacCAvas"),
            (("1", "p"), "gacCAmas"),
        ];
        let by_abbr = q.verb("gam", "pres", "P").unwrap();
        let by_name = q.verb("gam", "present", "parasmaipada").unwrap();
        verify(&by_abbr, &expected);
        assert_eq!(by_abbr, by_name);
        assert_eq!(by_abbr.len(), 9);
    }

    #[test]
    fn test_verb_other_mode() {
        let lex = fixture();
        let q = ParadigmQuery::new(&lex);
        let opt = q.verb("gam", "opt", "P").unwrap();
        assert_eq!(opt.len(), 1);
        verify(&opt, &[(("3", "s"), "gacCet")]);
    }

    #[test]
    fn test_pronoun() {
        let lex = fixture();
        let q = ParadigmQuery::new(&lex);
        let expected = [(("1", "d"), "tO"), (("4", "s"), "tasmE"), (("6", "p"), "tezAm")];
        verify(&q.nominal("tad", "masculine").unwrap(), &expected);
        verify(&q.nominal("tad", "m").unwrap(), &expected);
        let neuter = q.nominal("tad", "n").unwrap();
        verify(&neuter, &[(("1", "s"), "tat")]);
    }

    #[test]
    fn test_errors() {
        let lex = fixture();
        let q = ParadigmQuery::new(&lex);
        assert_eq!(
            q.verb("zzz", "pres", "P"),
            Err(QueryError::UnknownRoot("zzz".to_string()))
        );
        assert_eq!(
            q.nominal("zzz", "m"),
            Err(QueryError::UnknownStem("zzz".to_string()))
        );
        assert_eq!(
            q.verb("gam", "aorist", "P"),
            Err(QueryError::UnknownEnumValue {
                kind: EnumKind::Mode,
                value: "aorist".to_string()
            })
        );
    }
}
