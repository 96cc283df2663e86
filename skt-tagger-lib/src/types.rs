use serde::{Deserialize, Serialize};

use crate::enums::EnumId;

pub type PrefixId = u32;
pub type RootId = u32;
pub type StemId = u32;

/// Marker used by the dataset for endings that attach to consonant stems.
pub const CONSONANT_STEM_TYPE: &str = "$cons";

/// Part of speech of a stem or form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pos {
    Verb,
    Nominal,
    Pronoun,
    Participle,
    Indeclinable,
    VerbalIndeclinable,
    Gerund,
    Infinitive,
    PerfectIndeclinable,
    NounPrefix,
    VerbPrefix,
}

/// A verb prefix (upasarga), e.g. `sam`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbPrefix {
    pub id: PrefixId,
    pub name: String,
}

/// A verb class and voice a root conjugates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paradigm {
    pub vclass: EnumId,
    pub voice: EnumId,
}

/// A verb root, possibly prefixed or modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    pub id: RootId,
    pub name: String,
    /// The unprefixed, unmodified root this one derives from (`gam` for
    /// `saMgam`).
    pub basis: Option<RootId>,
    /// In order of attachment.
    pub prefixes: Vec<PrefixId>,
    /// In order of application.
    pub modifications: Vec<EnumId>,
    pub paradigms: Vec<Paradigm>,
}

/// The root a participle stem is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipleSource {
    pub root: RootId,
    pub mode: EnumId,
    pub voice: EnumId,
}

/// A nominal, pronominal, or participle stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stem {
    pub id: StemId,
    pub name: String,
    pub pos: Pos,
    /// Gender group id. Always present for nominal stems.
    pub genders: Option<EnumId>,
    /// True for stems that cannot stand alone (`ja` in `agra-ja`).
    pub dependent: bool,
    pub participle: Option<ParticipleSource>,
}

/// The kind of stem a nominal ending attaches to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemType {
    Consonant,
    /// The final vowel (or vowel sequence) of the stem, e.g. `a` or `in`.
    Vowel(String),
}

impl StemType {
    pub fn from_marker(marker: &str) -> Self {
        if marker == CONSONANT_STEM_TYPE {
            StemType::Consonant
        } else {
            StemType::Vowel(marker.to_string())
        }
    }
}

/// A regular nominal ending (sup), e.g. `asya` for genitive singular
/// masculine a-stems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub name: String,
    pub stem_type: StemType,
    pub gender: EnumId,
    pub case: EnumId,
    pub number: EnumId,
    pub compounded: bool,
}

/// An inflected nominal: either stored in the dataset or recovered by
/// splitting a word into stem and ending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominalForm {
    pub name: String,
    pub stem: StemId,
    pub pos: Pos,
    pub gender: EnumId,
    pub case: EnumId,
    pub number: EnumId,
    pub compounded: bool,
}

/// A complete word stored in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Form {
    Indeclinable {
        name: String,
    },
    Verb {
        name: String,
        root: RootId,
        vclass: Option<EnumId>,
        person: EnumId,
        number: EnumId,
        mode: EnumId,
        voice: EnumId,
    },
    Nominal(NominalForm),
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

impl Form {
    pub fn name(&self) -> &str {
        match self {
            Form::Indeclinable { name }
            | Form::Verb { name, .. }
            | Form::Infinitive { name, .. }
            | Form::Gerund { name, .. }
            | Form::PerfectIndeclinable { name, .. } => name,
            Form::Nominal(n) => &n.name,
        }
    }

    /// The root this form is built on, if any.
    pub fn root(&self) -> Option<RootId> {
        match self {
            Form::Verb { root, .. }
            | Form::Infinitive { root, .. }
            | Form::Gerund { root, .. }
            | Form::PerfectIndeclinable { root, .. } => Some(*root),
            Form::Indeclinable { .. } | Form::Nominal(_) => None,
        }
    }

    pub fn stem(&self) -> Option<StemId> {
        match self {
            Form::Nominal(n) => Some(n.stem),
            _ => None,
        }
    }
}

/// One way a word can be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "match", content = "form", rename_all = "snake_case")]
pub enum LexicalCandidate {
    /// The word is stored as-is.
    Exact(Form),
    /// The word is a known stem plus a regular ending.
    Decomposed(NominalForm),
}

impl LexicalCandidate {
    pub fn name(&self) -> &str {
        match self {
            LexicalCandidate::Exact(f) => f.name(),
            LexicalCandidate::Decomposed(n) => &n.name,
        }
    }

    /// The nominal reading, whether stored or decomposed.
    pub fn as_nominal(&self) -> Option<&NominalForm> {
        match self {
            LexicalCandidate::Exact(Form::Nominal(n)) | LexicalCandidate::Decomposed(n) => Some(n),
            LexicalCandidate::Exact(_) => None,
        }
    }
}

/// What a tagged item stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemForm {
    Lexical(LexicalCandidate),
    /// Text no analysis could account for: punctuation, numerals, unknown
    /// words.
    NonForm(String),
}

/// One unit of tagger output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<u64>,
    pub chunk_index: usize,
    pub form: ItemForm,
}

impl TaggedItem {
    pub fn lexical(segment_id: Option<u64>, chunk_index: usize, form: LexicalCandidate) -> Self {
        Self {
            segment_id,
            chunk_index,
            form: ItemForm::Lexical(form),
        }
    }

    pub fn non_form(segment_id: Option<u64>, chunk_index: usize, text: impl Into<String>) -> Self {
        Self {
            segment_id,
            chunk_index,
            form: ItemForm::NonForm(text.into()),
        }
    }

    /// The text this item covers.
    pub fn surface(&self) -> &str {
        match &self.form {
            ItemForm::Lexical(c) => c.name(),
            ItemForm::NonForm(text) => text,
        }
    }

    pub fn is_non_form(&self) -> bool {
        matches!(self.form, ItemForm::NonForm(_))
    }
}
