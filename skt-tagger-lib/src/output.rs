// Output formatting for tagged items.

use serde::{Deserialize, Serialize};

use crate::dictionary::LexicalStore;
use crate::enums::{EnumId, EnumKind};
use crate::types::*;

/// Human-readable summary of a tagged item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// The text the item covers.
    pub surface: String,
    /// `verb`, `nominal`, `indeclinable`, `infinitive`, `gerund`,
    /// `perfect-indeclinable`, or empty for a non-form.
    pub kind: String,
    /// Root or stem name, if any.
    pub base: String,
    /// Grammatical abbreviations joined by `-`. An unknown slot is left
    /// empty.
    pub tags: String,
}

fn enum_string(store: &dyn LexicalStore, fields: &[(EnumKind, Option<EnumId>)]) -> String {
    fields
        .iter()
        .map(|&(kind, id)| {
            id.and_then(|id| store.enums().abbr(kind, id))
                .unwrap_or("")
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn root_name(store: &dyn LexicalStore, id: RootId) -> String {
    store.root(id).map(|r| r.name.clone()).unwrap_or_default()
}

fn nominal(store: &dyn LexicalStore, n: &NominalForm) -> (String, String, String) {
    (
        "nominal".to_string(),
        store.stem(n.stem).map(|s| s.name.clone()).unwrap_or_default(),
        enum_string(
            store,
            &[
                (EnumKind::Gender, Some(n.gender)),
                (EnumKind::Case, Some(n.case)),
                (EnumKind::Number, Some(n.number)),
            ],
        ),
    )
}

/// Describe `item` as `(surface, kind, base, tags)`.
pub fn describe(item: &TaggedItem, store: &dyn LexicalStore) -> Description {
    let (kind, base, tags) = match &item.form {
        ItemForm::NonForm(_) => (String::new(), String::new(), String::new()),
        ItemForm::Lexical(LexicalCandidate::Decomposed(n)) => nominal(store, n),
        ItemForm::Lexical(LexicalCandidate::Exact(form)) => match form {
            Form::Indeclinable { .. } => ("indeclinable".to_string(), String::new(), String::new()),
            Form::Verb {
                root,
                vclass,
                person,
                number,
                mode,
                voice,
                ..
            } => (
                "verb".to_string(),
                root_name(store, *root),
                enum_string(
                    store,
                    &[
                        (EnumKind::VClass, *vclass),
                        (EnumKind::Person, Some(*person)),
                        (EnumKind::Number, Some(*number)),
                        (EnumKind::Mode, Some(*mode)),
                        (EnumKind::Voice, Some(*voice)),
                    ],
                ),
            ),
            Form::Nominal(n) => nominal(store, n),
            Form::Infinitive { root, .. } => {
                ("infinitive".to_string(), root_name(store, *root), String::new())
            }
            Form::Gerund { root, .. } => ("gerund".to_string(), root_name(store, *root), String::new()),
            Form::PerfectIndeclinable { root, .. } => (
                "perfect-indeclinable".to_string(),
                root_name(store, *root),
                String::new(),
            ),
        },
    };
    Description {
        surface: item.surface().to_string(),
        kind,
        base,
        tags,
    }
}

/// Format an item as `{surface:kind:base:tags}`.
pub fn to_bracketed(item: &TaggedItem, store: &dyn LexicalStore) -> String {
    let d = describe(item, store);
    format!("{{{}:{}:{}:{}}}", d.surface, d.kind, d.base, d.tags)
}

/// Format a tagged segment, one bracketed item per form, joined by `, `.
pub fn segment_to_bracketed(items: &[TaggedItem], store: &dyn LexicalStore) -> String {
    items
        .iter()
        .map(|item| to_bracketed(item, store))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::fixture;

    fn exact(lex: &dyn LexicalStore, name: &str) -> TaggedItem {
        let form = lex.forms_named(name)[0].clone();
        TaggedItem::lexical(None, 0, LexicalCandidate::Exact(form))
    }

    #[test]
    fn test_non_form() {
        let lex = fixture();
        let item = TaggedItem::non_form(None, 0, "|");
        assert_eq!(to_bracketed(&item, &lex), "{|:::}");
    }

    #[test]
    fn test_verb() {
        let lex = fixture();
        let d = describe(&exact(&lex, "gacCati"), &lex);
        assert_eq!(d.kind, "verb");
        assert_eq!(d.base, "gam");
        assert_eq!(d.tags, "1-3-s-pres-P");
    }

    #[test]
    fn test_verb_without_class() {
        let lex = fixture();
        let d = describe(&exact(&lex, "gamayati"), &lex);
        assert_eq!(d.base, "gamaya");
        assert_eq!(d.tags, "-3-s-pres-P");
    }

    #[test]
    fn test_nominal() {
        let lex = fixture();
        assert_eq!(
            to_bracketed(&exact(&lex, "tasmE"), &lex),
            "{tasmE:nominal:tad:m-4-s}"
        );
    }

    #[test]
    fn test_other_kinds() {
        let lex = fixture();
        assert_eq!(to_bracketed(&exact(&lex, "iti"), &lex), "{iti:indeclinable::}");
        assert_eq!(to_bracketed(&exact(&lex, "gantum"), &lex), "{gantum:infinitive:gam:}");
        assert_eq!(to_bracketed(&exact(&lex, "gatvA"), &lex), "{gatvA:gerund:gam:}");
        assert_eq!(
            to_bracketed(&exact(&lex, "IkzAm"), &lex),
            "{IkzAm:perfect-indeclinable:Ikz:}"
        );
    }

    #[test]
    fn test_segment() {
        let lex = fixture();
        let items = vec![exact(&lex, "iti"), TaggedItem::non_form(None, 1, "|")];
        assert_eq!(
            segment_to_bracketed(&items, &lex),
            "{iti:indeclinable::}, {|:::}"
        );
    }
}
