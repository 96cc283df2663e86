use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::enums::{EnumEntry, EnumId, EnumKind, EnumTable, GenderGroup};
use crate::error::LexiconError;
use crate::sandhi::SandhiRule;
use crate::types::*;

/// Read-only access to the lexical dataset: stored forms, stems, roots,
/// nominal endings, and sandhi rules.
pub trait LexicalStore: Send + Sync {
    fn enums(&self) -> &EnumTable;

    /// Complete forms spelled exactly `name`.
    fn forms_named(&self, name: &str) -> &[Form];

    fn stems_named(&self, name: &str) -> &[Stem];

    fn roots_named(&self, name: &str) -> &[Root];

    fn root(&self, id: RootId) -> Option<&Root>;

    fn stem(&self, id: StemId) -> Option<&Stem>;

    fn prefix(&self, id: PrefixId) -> Option<&VerbPrefix>;

    /// Stored forms built on root `id`, in dataset order.
    fn forms_of_root(&self, id: RootId) -> Vec<&Form>;

    /// Stored nominal forms of stem `id`, in dataset order.
    fn forms_of_stem(&self, id: StemId) -> Vec<&Form>;

    fn sandhi_rules(&self) -> &[SandhiRule];

    fn nominal_endings(&self) -> &[Ending];
}

// ---------------------------------------------------------------------------
// Serialized dataset
// ---------------------------------------------------------------------------

/// The dataset as stored on disk. Enum values are referenced by name or
/// abbreviation and resolved when the lexicon is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLexicon {
    pub enums: BTreeMap<EnumKind, Vec<EnumEntry>>,
    pub gender_groups: Vec<RawGenderGroup>,
    pub verb_prefixes: Vec<VerbPrefix>,
    pub roots: Vec<RawRoot>,
    pub stems: Vec<RawStem>,
    pub endings: Vec<RawEnding>,
    pub forms: Vec<RawForm>,
    pub sandhi_rules: Vec<SandhiRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGenderGroup {
    pub id: EnumId,
    pub name: String,
    pub abbr: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParadigm {
    pub vclass: String,
    pub voice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRoot {
    pub id: RootId,
    pub name: String,
    #[serde(default)]
    pub basis: Option<RootId>,
    #[serde(default)]
    pub prefixes: Vec<PrefixId>,
    #[serde(default)]
    pub modifications: Vec<String>,
    #[serde(default)]
    pub paradigms: Vec<RawParadigm>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParticiple {
    pub root: RootId,
    pub mode: String,
    pub voice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStem {
    pub id: StemId,
    pub name: String,
    pub pos: Pos,
    /// Gender group name or abbreviation.
    #[serde(default)]
    pub genders: Option<String>,
    #[serde(default)]
    pub dependent: bool,
    #[serde(default)]
    pub participle: Option<RawParticiple>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnding {
    pub name: String,
    /// A stem-final vowel such as `a`, or `$cons` for consonant stems.
    pub stem_type: String,
    pub gender: String,
    pub case: String,
    pub number: String,
    #[serde(default)]
    pub compounded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawForm {
    Indeclinable {
        name: String,
    },
    Verb {
        name: String,
        root: RootId,
        #[serde(default)]
        vclass: Option<String>,
        person: String,
        number: String,
        mode: String,
        voice: String,
    },
    Nominal {
        name: String,
        stem: StemId,
        gender: String,
        case: String,
        number: String,
        #[serde(default)]
        compounded: bool,
    },
    Infinitive {
        name: String,
        root: RootId,
    },
    Gerund {
        name: String,
        root: RootId,
    },
    PerfectIndeclinable {
        name: String,
        root: RootId,
    },
}

// ---------------------------------------------------------------------------
// In-memory lexicon
// ---------------------------------------------------------------------------

/// An in-memory `LexicalStore` with every reference resolved to an id.
#[derive(Debug, Clone)]
pub struct Lexicon {
    enums: EnumTable,
    prefixes: HashMap<PrefixId, VerbPrefix>,
    roots: HashMap<String, Vec<Root>>,
    root_index: HashMap<RootId, (String, usize)>,
    stems: HashMap<String, Vec<Stem>>,
    stem_index: HashMap<StemId, (String, usize)>,
    forms: HashMap<String, Vec<Form>>,
    /// Positions into `forms`, in dataset order.
    root_forms: HashMap<RootId, Vec<(String, usize)>>,
    stem_forms: HashMap<StemId, Vec<(String, usize)>>,
    endings: Vec<Ending>,
    sandhi_rules: Vec<SandhiRule>,
}

impl Lexicon {
    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let raw: RawLexicon = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LexiconError> {
        let raw: RawLexicon = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Resolve every reference in `raw`. Fails on the first dangling or
    /// unknown reference.
    pub fn from_raw(raw: RawLexicon) -> Result<Self, LexiconError> {
        let enums = build_enums(&raw)?;

        let mut prefixes = HashMap::new();
        for p in raw.verb_prefixes {
            if prefixes.contains_key(&p.id) {
                return Err(LexiconError::DuplicateId {
                    kind: "verb prefix",
                    id: p.id,
                });
            }
            prefixes.insert(p.id, p);
        }

        let root_ids = unique_ids("root", raw.roots.iter().map(|r| r.id))?;
        let mut roots: HashMap<String, Vec<Root>> = HashMap::new();
        let mut root_index = HashMap::new();
        for r in raw.roots {
            let root = resolve_root(&enums, &prefixes, &root_ids, r)?;
            let list = roots.entry(root.name.clone()).or_default();
            root_index.insert(root.id, (root.name.clone(), list.len()));
            list.push(root);
        }

        unique_ids("stem", raw.stems.iter().map(|s| s.id))?;
        let mut stems: HashMap<String, Vec<Stem>> = HashMap::new();
        let mut stem_index = HashMap::new();
        for s in raw.stems {
            let stem = resolve_stem(&enums, &root_ids, s)?;
            let list = stems.entry(stem.name.clone()).or_default();
            stem_index.insert(stem.id, (stem.name.clone(), list.len()));
            list.push(stem);
        }

        let endings = raw
            .endings
            .into_iter()
            .map(|e| resolve_ending(&enums, e))
            .collect::<Result<Vec<_>, _>>()?;

        let mut forms: HashMap<String, Vec<Form>> = HashMap::new();
        let mut root_forms: HashMap<RootId, Vec<(String, usize)>> = HashMap::new();
        let mut stem_forms: HashMap<StemId, Vec<(String, usize)>> = HashMap::new();
        for f in raw.forms {
            let form = resolve_form(&enums, &root_ids, &stems, &stem_index, f)?;
            let name = form.name().to_string();
            let list = forms.entry(name.clone()).or_default();
            let position = (name, list.len());
            if let Some(root) = form.root() {
                root_forms.entry(root).or_default().push(position.clone());
            }
            if let Some(stem) = form.stem() {
                stem_forms.entry(stem).or_default().push(position);
            }
            list.push(form);
        }

        let lexicon = Self {
            enums,
            prefixes,
            roots,
            root_index,
            stems,
            stem_index,
            forms,
            root_forms,
            stem_forms,
            endings,
            sandhi_rules: raw.sandhi_rules,
        };
        info!(
            forms = lexicon.form_count(),
            stems = lexicon.stem_index.len(),
            roots = lexicon.root_index.len(),
            endings = lexicon.endings.len(),
            sandhi_rules = lexicon.sandhi_rules.len(),
            "loaded lexicon"
        );
        Ok(lexicon)
    }

    /// Total number of stored forms.
    pub fn form_count(&self) -> usize {
        self.forms.values().map(Vec::len).sum()
    }

    fn forms_at(&self, positions: Option<&Vec<(String, usize)>>) -> Vec<&Form> {
        positions
            .into_iter()
            .flatten()
            .filter_map(|(name, i)| self.forms.get(name).and_then(|v| v.get(*i)))
            .collect()
    }
}

impl LexicalStore for Lexicon {
    fn enums(&self) -> &EnumTable {
        &self.enums
    }

    fn forms_named(&self, name: &str) -> &[Form] {
        self.forms.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn stems_named(&self, name: &str) -> &[Stem] {
        self.stems.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn roots_named(&self, name: &str) -> &[Root] {
        self.roots.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn root(&self, id: RootId) -> Option<&Root> {
        let (name, i) = self.root_index.get(&id)?;
        self.roots.get(name)?.get(*i)
    }

    fn stem(&self, id: StemId) -> Option<&Stem> {
        let (name, i) = self.stem_index.get(&id)?;
        self.stems.get(name)?.get(*i)
    }

    fn prefix(&self, id: PrefixId) -> Option<&VerbPrefix> {
        self.prefixes.get(&id)
    }

    fn forms_of_root(&self, id: RootId) -> Vec<&Form> {
        self.forms_at(self.root_forms.get(&id))
    }

    fn forms_of_stem(&self, id: StemId) -> Vec<&Form> {
        self.forms_at(self.stem_forms.get(&id))
    }

    fn sandhi_rules(&self) -> &[SandhiRule] {
        &self.sandhi_rules
    }

    fn nominal_endings(&self) -> &[Ending] {
        &self.endings
    }
}

// ---------------------------------------------------------------------------
// Reference resolution
// ---------------------------------------------------------------------------

fn resolve(enums: &EnumTable, kind: EnumKind, value: &str) -> Result<EnumId, LexiconError> {
    enums
        .id(kind, value)
        .ok_or_else(|| LexiconError::UnknownEnumValue {
            kind,
            value: value.to_string(),
        })
}

fn unique_ids(
    kind: &'static str,
    ids: impl Iterator<Item = u32>,
) -> Result<HashSet<u32>, LexiconError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(LexiconError::DuplicateId { kind, id });
        }
    }
    Ok(seen)
}

fn build_enums(raw: &RawLexicon) -> Result<EnumTable, LexiconError> {
    let mut enums = EnumTable::new();
    for (&kind, entries) in &raw.enums {
        for entry in entries {
            enums.insert(kind, entry.clone())?;
        }
    }
    enums.check_complete()?;

    for g in &raw.gender_groups {
        let members = g
            .members
            .iter()
            .map(|m| resolve(&enums, EnumKind::Gender, m))
            .collect::<Result<_, _>>()?;
        enums.insert_gender_group(GenderGroup {
            id: g.id,
            name: g.name.clone(),
            abbr: g.abbr.clone(),
            members,
        })?;
    }
    Ok(enums)
}

fn resolve_root(
    enums: &EnumTable,
    prefixes: &HashMap<PrefixId, VerbPrefix>,
    root_ids: &HashSet<RootId>,
    raw: RawRoot,
) -> Result<Root, LexiconError> {
    if let Some(basis) = raw.basis {
        if !root_ids.contains(&basis) {
            return Err(LexiconError::UnknownRoot {
                form: raw.name,
                id: basis,
            });
        }
    }
    if let Some(&id) = raw.prefixes.iter().find(|&&id| !prefixes.contains_key(&id)) {
        return Err(LexiconError::UnknownPrefix { root: raw.name, id });
    }
    let modifications = raw
        .modifications
        .iter()
        .map(|m| resolve(enums, EnumKind::Modification, m))
        .collect::<Result<_, _>>()?;
    let paradigms = raw
        .paradigms
        .iter()
        .map(|p| -> Result<Paradigm, LexiconError> {
            Ok(Paradigm {
                vclass: resolve(enums, EnumKind::VClass, &p.vclass)?,
                voice: resolve(enums, EnumKind::Voice, &p.voice)?,
            })
        })
        .collect::<Result<_, _>>()?;

    Ok(Root {
        id: raw.id,
        name: raw.name,
        basis: raw.basis,
        prefixes: raw.prefixes,
        modifications,
        paradigms,
    })
}

fn resolve_stem(
    enums: &EnumTable,
    root_ids: &HashSet<RootId>,
    raw: RawStem,
) -> Result<Stem, LexiconError> {
    let genders = match &raw.genders {
        Some(g) => Some(enums.gender_group_id(g).ok_or_else(|| {
            LexiconError::UnknownGenderGroup {
                stem: raw.name.clone(),
                value: g.clone(),
            }
        })?),
        None if raw.pos == Pos::Nominal => {
            return Err(LexiconError::MissingGenders { stem: raw.name });
        }
        None => None,
    };

    let participle = match &raw.participle {
        Some(p) => {
            if !root_ids.contains(&p.root) {
                return Err(LexiconError::UnknownRoot {
                    form: raw.name,
                    id: p.root,
                });
            }
            Some(ParticipleSource {
                root: p.root,
                mode: resolve(enums, EnumKind::Mode, &p.mode)?,
                voice: resolve(enums, EnumKind::Voice, &p.voice)?,
            })
        }
        None => None,
    };

    Ok(Stem {
        id: raw.id,
        name: raw.name,
        pos: raw.pos,
        genders,
        dependent: raw.dependent,
        participle,
    })
}

fn resolve_ending(enums: &EnumTable, raw: RawEnding) -> Result<Ending, LexiconError> {
    Ok(Ending {
        stem_type: StemType::from_marker(&raw.stem_type),
        gender: resolve(enums, EnumKind::Gender, &raw.gender)?,
        case: resolve(enums, EnumKind::Case, &raw.case)?,
        number: resolve(enums, EnumKind::Number, &raw.number)?,
        compounded: raw.compounded,
        name: raw.name,
    })
}

fn resolve_form(
    enums: &EnumTable,
    root_ids: &HashSet<RootId>,
    stems: &HashMap<String, Vec<Stem>>,
    stem_index: &HashMap<StemId, (String, usize)>,
    raw: RawForm,
) -> Result<Form, LexiconError> {
    let check_root = |name: &str, id: RootId| {
        if root_ids.contains(&id) {
            Ok(id)
        } else {
            Err(LexiconError::UnknownRoot {
                form: name.to_string(),
                id,
            })
        }
    };

    let form = match raw {
        RawForm::Indeclinable { name } => Form::Indeclinable { name },
        RawForm::Verb {
            name,
            root,
            vclass,
            person,
            number,
            mode,
            voice,
        } => Form::Verb {
            root: check_root(&name, root)?,
            vclass: vclass
                .map(|v| resolve(enums, EnumKind::VClass, &v))
                .transpose()?,
            person: resolve(enums, EnumKind::Person, &person)?,
            number: resolve(enums, EnumKind::Number, &number)?,
            mode: resolve(enums, EnumKind::Mode, &mode)?,
            voice: resolve(enums, EnumKind::Voice, &voice)?,
            name,
        },
        RawForm::Nominal {
            name,
            stem,
            gender,
            case,
            number,
            compounded,
        } => {
            let pos = stem_index
                .get(&stem)
                .and_then(|(n, i)| stems.get(n)?.get(*i))
                .map(|s| s.pos)
                .ok_or_else(|| LexiconError::UnknownStem {
                    form: name.clone(),
                    id: stem,
                })?;
            Form::Nominal(NominalForm {
                stem,
                pos,
                gender: resolve(enums, EnumKind::Gender, &gender)?,
                case: resolve(enums, EnumKind::Case, &case)?,
                number: resolve(enums, EnumKind::Number, &number)?,
                compounded,
                name,
            })
        }
        RawForm::Infinitive { name, root } => Form::Infinitive {
            root: check_root(&name, root)?,
            name,
        },
        RawForm::Gerund { name, root } => Form::Gerund {
            root: check_root(&name, root)?,
            name,
        },
        RawForm::PerfectIndeclinable { name, root } => Form::PerfectIndeclinable {
            root: check_root(&name, root)?,
            name,
        },
    };
    Ok(form)
}

/// The lexicon shared by unit tests.
#[cfg(test)]
pub(crate) fn fixture() -> Lexicon {
    Lexicon::from_json_str(include_str!("../tests/data/lexicon.json"))
        .expect("test lexicon should load")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        let mut enums = serde_json::Map::new();
        for kind in EnumKind::ALL {
            enums.insert(
                kind.as_str().to_string(),
                json!([{"id": 1, "name": "one", "abbr": "1"}]),
            );
        }
        json!({
            "enums": enums,
            "gender_groups": [{"id": 1, "name": "one", "abbr": "1", "members": ["1"]}],
        })
    }

    fn load(value: serde_json::Value) -> Result<Lexicon, LexiconError> {
        Lexicon::from_json_str(&value.to_string())
    }

    #[test]
    fn test_fixture_loads() {
        let lex = fixture();
        assert!(lex.form_count() > 20);
        assert_eq!(lex.sandhi_rules().len(), 10);
        assert!(!lex.nominal_endings().is_empty());
    }

    #[test]
    fn test_forms_named() {
        let lex = fixture();
        let forms = lex.forms_named("gacCati");
        assert_eq!(forms.len(), 1);
        assert!(matches!(forms[0], Form::Verb { root: 1, .. }));
        assert!(lex.forms_named("zzzz").is_empty());
    }

    #[test]
    fn test_stems_and_roots() {
        let lex = fixture();
        let nara = &lex.stems_named("nara")[0];
        assert_eq!(nara.pos, Pos::Nominal);
        assert_eq!(lex.stem(nara.id), Some(nara));

        let saMgam = &lex.roots_named("saMgam")[0];
        assert_eq!(saMgam.basis, Some(1));
        assert_eq!(lex.prefix(saMgam.prefixes[0]).map(|p| p.name.as_str()), Some("sam"));
        assert_eq!(lex.root(1).map(|r| r.name.as_str()), Some("gam"));
        assert!(lex.root(99).is_none());
    }

    #[test]
    fn test_forms_of_root_and_stem() {
        let lex = fixture();
        let gam: Vec<&str> = lex.forms_of_root(1).iter().map(|f| f.name()).collect();
        assert!(gam.contains(&"gacCati"));
        assert!(gam.contains(&"gantum"));
        assert!(gam.contains(&"gatvA"));
        let tad = lex.forms_of_stem(4);
        assert!(tad.iter().any(|f| f.name() == "tasmE"));
        assert!(lex.forms_of_stem(1).is_empty());
    }

    #[test]
    fn test_nominal_form_takes_stem_pos() {
        let lex = fixture();
        match &lex.forms_named("tasya")[0] {
            Form::Nominal(n) => assert_eq!(n.pos, Pos::Pronoun),
            other => panic!("expected a nominal form, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_lexicon_loads() {
        let lex = load(minimal()).unwrap();
        assert_eq!(lex.form_count(), 0);
        assert!(lex.enums().gender_group(1).unwrap().contains(1));
    }

    #[test]
    fn test_missing_enum_kind() {
        let mut value = minimal();
        value["enums"].as_object_mut().unwrap().remove("case");
        assert!(matches!(
            load(value),
            Err(LexiconError::EmptyEnum {
                kind: EnumKind::Case
            })
        ));
    }

    #[test]
    fn test_unknown_enum_value() {
        let mut value = minimal();
        value["endings"] = json!([
            {"name": "aH", "stem_type": "a", "gender": "1", "case": "9", "number": "1"}
        ]);
        match load(value) {
            Err(LexiconError::UnknownEnumValue { kind, value }) => {
                assert_eq!(kind, EnumKind::Case);
                assert_eq!(value, "9");
            }
            other => panic!("expected unknown enum value, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_root() {
        let mut value = minimal();
        value["forms"] = json!([{"kind": "gerund", "name": "gatvA", "root": 7}]);
        assert!(matches!(
            load(value),
            Err(LexiconError::UnknownRoot { id: 7, .. })
        ));
    }

    #[test]
    fn test_dangling_stem() {
        let mut value = minimal();
        value["forms"] = json!([
            {"kind": "nominal", "name": "saH", "stem": 3, "gender": "1", "case": "1", "number": "1"}
        ]);
        assert!(matches!(
            load(value),
            Err(LexiconError::UnknownStem { id: 3, .. })
        ));
    }

    #[test]
    fn test_nominal_stem_needs_genders() {
        let mut value = minimal();
        value["stems"] = json!([{"id": 1, "name": "nara", "pos": "nominal"}]);
        assert!(matches!(
            load(value),
            Err(LexiconError::MissingGenders { .. })
        ));
    }

    #[test]
    fn test_duplicate_stem_id() {
        let mut value = minimal();
        value["stems"] = json!([
            {"id": 1, "name": "tad", "pos": "pronoun"},
            {"id": 1, "name": "idam", "pos": "pronoun"}
        ]);
        assert!(matches!(
            load(value),
            Err(LexiconError::DuplicateId { kind: "stem", id: 1 })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Lexicon::from_json_str("{not json"),
            Err(LexiconError::Json(_))
        ));
    }
}
