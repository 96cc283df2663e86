// Error types for lexicon loading, configuration, and paradigm queries.

use thiserror::Error;

use crate::enums::EnumKind;

/// A malformed or inconsistent lexical dataset.
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("invalid lexicon JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),

    /// An enum reference matched neither a name nor an abbreviation.
    #[error("unknown {kind} value '{value}'")]
    UnknownEnumValue { kind: EnumKind, value: String },

    #[error("form '{form}' refers to missing root id {id}")]
    UnknownRoot { form: String, id: u32 },

    #[error("form '{form}' refers to missing stem id {id}")]
    UnknownStem { form: String, id: u32 },

    #[error("root '{root}' refers to missing prefix id {id}")]
    UnknownPrefix { root: String, id: u32 },

    #[error("stem '{stem}' refers to unknown gender group '{value}'")]
    UnknownGenderGroup { stem: String, value: String },

    /// Nominal stems are filtered by gender during analysis, so they must
    /// carry a gender group.
    #[error("nominal stem '{stem}' has no gender group")]
    MissingGenders { stem: String },

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("enum '{kind}' has no entries")]
    EmptyEnum { kind: EnumKind },
}

/// An unreadable or out-of-range tagger configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A paradigm lookup that names something the dataset does not have.
#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("no root named '{0}'")]
    UnknownRoot(String),

    #[error("no stem named '{0}'")]
    UnknownStem(String),

    #[error("unknown {kind} value '{value}'")]
    UnknownEnumValue { kind: EnumKind, value: String },

    #[error("no known stem type ends '{0}'")]
    NoStemType(String),
}
