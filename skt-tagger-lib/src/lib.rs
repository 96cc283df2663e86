pub mod sounds;
pub mod trie;
pub mod queue;
pub mod error;
pub mod enums;
pub mod types;
pub mod dictionary;
pub mod sandhi;
pub mod morphology;
pub mod generate;
pub mod query;
pub mod config;
pub mod confidence;
pub mod tagger;
pub mod output;

pub use config::{ScoringConfig, TaggerConfig};
pub use confidence::{LengthScorer, Scorer};
pub use dictionary::{LexicalStore, Lexicon};
pub use error::{ConfigError, LexiconError, QueryError};
pub use morphology::Analyzer;
pub use sandhi::{internal_retroflex, RuleType, Sandhi, SandhiRule, Term};
pub use tagger::Tagger;
pub use types::{ItemForm, LexicalCandidate, TaggedItem};
