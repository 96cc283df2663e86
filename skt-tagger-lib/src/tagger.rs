// Segment-level tagging: undo sandhi and identify the forms in each chunk with
// a best-first search.

use tracing::{debug, trace, warn};

use crate::confidence::{LengthScorer, Scorer};
use crate::config::TaggerConfig;
use crate::dictionary::LexicalStore;
use crate::morphology::Analyzer;
use crate::queue::PriorityQueue;
use crate::sandhi::Sandhi;
use crate::types::TaggedItem;

/// What is left of the current chunk.
#[derive(Debug, Clone, PartialEq)]
enum Remainder {
    /// Text still to be explained. Empty once the chunk is fully read.
    Open(String),
    /// The chunk was given up on and tagged as a non-form.
    Abandoned,
}

impl Remainder {
    fn is_done(&self) -> bool {
        match self {
            Remainder::Open(text) => text.is_empty(),
            Remainder::Abandoned => true,
        }
    }
}

/// A partial tagging of a segment.
#[derive(Debug, Clone)]
struct ParseState {
    committed: Vec<TaggedItem>,
    chunk_index: usize,
    remainder: Remainder,
}

/// Tags segments of SLP1 text. A segment (a verse or paragraph) is split on
/// whitespace into chunks, and each chunk is resolved into the forms that
/// were joined to produce it.
pub struct Tagger<'a> {
    sandhi: Sandhi,
    analyzer: Analyzer<'a>,
    scorer: Box<dyn Scorer + 'a>,
    config: TaggerConfig,
}

impl<'a> Tagger<'a> {
    pub fn new(store: &'a dyn LexicalStore, config: TaggerConfig) -> Self {
        Self {
            sandhi: Sandhi::with_rules(store.sandhi_rules().iter().cloned()),
            analyzer: Analyzer::new(store),
            scorer: Box::new(LengthScorer::from(config.scoring)),
            config,
        }
    }

    /// Replace the default length-based scorer.
    pub fn with_scorer(mut self, scorer: impl Scorer + 'a) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn sandhi(&self) -> &Sandhi {
        &self.sandhi
    }

    pub fn analyzer(&self) -> &Analyzer<'a> {
        &self.analyzer
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    /// The chunks of `segment`: its lines, split on whitespace.
    pub fn iter_chunks(segment: &str) -> impl Iterator<Item = &str> {
        segment.lines().flat_map(str::split_whitespace)
    }

    /// Tag every chunk of `segment`. Each chunk contributes the forms found
    /// in it, in order, or a single non-form if none could be found.
    pub fn tag(&self, segment: &str, segment_id: Option<u64>) -> Vec<TaggedItem> {
        let chunks: Vec<&str> = Self::iter_chunks(segment).collect();
        let Some(first) = chunks.first() else {
            return Vec::new();
        };

        let mut queue = PriorityQueue::new();
        queue.push(
            ParseState {
                committed: Vec::new(),
                chunk_index: 0,
                remainder: Remainder::Open(first.to_string()),
            },
            0.0,
        );

        let mut pops = 0;
        while let Some((state, priority)) = queue.pop_with_priority() {
            if pops >= self.config.max_expansions {
                warn!(
                    segment_id = ?segment_id,
                    chunks = chunks.len(),
                    max_expansions = self.config.max_expansions,
                    "search budget exhausted; tagging remaining chunks as non-forms"
                );
                return exhausted(state, &chunks, segment_id);
            }
            pops += 1;

            let remainder = match &state.remainder {
                Remainder::Open(text) if !text.is_empty() => text,
                _ => {
                    let next = state.chunk_index + 1;
                    if next == chunks.len() {
                        debug!(
                            segment_id = ?segment_id,
                            chunks = chunks.len(),
                            pops,
                            queued = queue.len(),
                            "tagged segment"
                        );
                        return state.committed;
                    }
                    queue.push(
                        ParseState {
                            committed: state.committed,
                            chunk_index: next,
                            remainder: Remainder::Open(chunks[next].to_string()),
                        },
                        priority,
                    );
                    continue;
                }
            };
            trace!(chunk = state.chunk_index, remainder = %remainder, priority, "expanding");

            let remainder_len = remainder.chars().count();
            for (before, after) in self.sandhi.iter_splits(remainder) {
                // Rules like ("a", "a", "a") reproduce the same remainder, and
                // rules whose `second` outgrows their result would lengthen it.
                if after == *remainder || after.chars().count() > remainder_len {
                    continue;
                }
                for candidate in self.analyzer.analyze(&before) {
                    let item = TaggedItem::lexical(segment_id, state.chunk_index, candidate);
                    let score = self.scorer.score(&state.committed, &item, &after);
                    let mut committed = state.committed.clone();
                    committed.push(item);
                    queue.push(
                        ParseState {
                            committed,
                            chunk_index: state.chunk_index,
                            remainder: Remainder::Open(after.clone()),
                        },
                        priority + score,
                    );
                }
            }

            // Nothing of this chunk has been read yet, so it may still be
            // abandoned.
            if remainder == chunks[state.chunk_index] {
                let item = TaggedItem::non_form(segment_id, state.chunk_index, remainder.clone());
                let score = self.scorer.score(&state.committed, &item, remainder);
                let mut committed = state.committed.clone();
                committed.push(item);
                queue.push(
                    ParseState {
                        committed,
                        chunk_index: state.chunk_index,
                        remainder: Remainder::Abandoned,
                    },
                    priority + score,
                );
            }
        }

        // Every chunk can be abandoned, so the queue never empties first.
        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| TaggedItem::non_form(segment_id, i, *chunk))
            .collect()
    }
}

/// Keep the items of the chunks `state` has finished and give up on the rest.
fn exhausted(state: ParseState, chunks: &[&str], segment_id: Option<u64>) -> Vec<TaggedItem> {
    let finished = if state.remainder.is_done() {
        state.chunk_index + 1
    } else {
        state.chunk_index
    };
    let mut items: Vec<TaggedItem> = state
        .committed
        .into_iter()
        .filter(|item| item.chunk_index < finished)
        .collect();
    for (i, chunk) in chunks.iter().enumerate().skip(finished) {
        items.push(TaggedItem::non_form(segment_id, i, *chunk));
    }
    items
}
