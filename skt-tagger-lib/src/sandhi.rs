// Sandhi: joining terms by applying merge rules, and splitting merged text by
// undoing them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sounds;
use crate::trie::SuffixTrie;

/// Where a rule applies: between words, between morphemes inside a word, or
/// both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    #[default]
    General,
    Internal,
    External,
}

impl RuleType {
    fn applies_externally(self) -> bool {
        matches!(self, RuleType::General | RuleType::External)
    }

    fn applies_internally(self) -> bool {
        matches!(self, RuleType::General | RuleType::Internal)
    }
}

/// A merge rule: `first` at the end of one term and `second` at the start of
/// the next combine into `result`. A space in `result` marks where the terms
/// stay separated (`i` + `a` gives `y a`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandhiRule {
    pub first: String,
    pub second: String,
    pub result: String,
    #[serde(default)]
    pub rule_type: RuleType,
}

impl SandhiRule {
    pub fn new(first: impl Into<String>, second: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            result: result.into(),
            rule_type: RuleType::General,
        }
    }

    pub fn with_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = rule_type;
        self
    }

    /// `result` with separators removed, as it appears inside a chunk.
    pub fn stripped_result(&self) -> String {
        self.result.chars().filter(|&c| c != ' ').collect()
    }
}

impl From<(&str, &str, &str)> for SandhiRule {
    fn from((first, second, result): (&str, &str, &str)) -> Self {
        SandhiRule::new(first, second, result)
    }
}

/// A term to join. Exempt terms (pragrhya words such as duals in `e`) never
/// undergo sandhi at their trailing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub text: String,
    pub exempt: bool,
}

impl Term {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exempt: false,
        }
    }

    pub fn exempt(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exempt: true,
        }
    }
}

impl From<&str> for Term {
    fn from(text: &str) -> Self {
        Term::new(text)
    }
}

impl From<String> for Term {
    fn from(text: String) -> Self {
        Term::new(text)
    }
}

/// A rule as the splitter needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reversal {
    first: String,
    second: String,
    result_len: usize,
}

type JoinTable = HashMap<(String, String), String>;

/// Joins and splits Sanskrit terms. Read-only once the rules are loaded.
#[derive(Debug, Clone, Default)]
pub struct Sandhi {
    /// `(end of first term, start of second term)` -> result, for joining
    /// words.
    external: JoinTable,
    /// The same, for joining morphemes inside a word.
    internal: JoinTable,
    /// Indexed by reversed stripped result, so that a lookup with a reversed
    /// remainder finds every rule whose result starts the remainder. Holds
    /// only rules that apply between words.
    splits: SuffixTrie<Reversal>,
}

/// Insert into `table`, returning the replaced result if it differs.
fn insert_join(table: &mut JoinTable, key: &(String, String), result: &str) -> Option<String> {
    table
        .insert(key.clone(), result.to_string())
        .filter(|previous| previous != result)
}

impl Sandhi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules<I, R>(rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<SandhiRule>,
    {
        let mut sandhi = Self::new();
        sandhi.add_rules(rules);
        sandhi
    }

    /// Merge `rules` into the tables. A later rule with the same
    /// `(first, second)` replaces the earlier one for joining.
    pub fn add_rules<I, R>(&mut self, rules: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<SandhiRule>,
    {
        for rule in rules {
            let rule = rule.into();
            let key = (rule.first.clone(), rule.second.clone());
            let mut replaced = None;
            if rule.rule_type.applies_externally() {
                replaced = insert_join(&mut self.external, &key, &rule.result);
            }
            if rule.rule_type.applies_internally() {
                replaced = insert_join(&mut self.internal, &key, &rule.result).or(replaced);
            }
            if let Some(previous) = replaced {
                warn!(
                    first = %rule.first,
                    second = %rule.second,
                    previous = %previous,
                    result = %rule.result,
                    "duplicate sandhi rule; keeping the later result"
                );
            }
            if !rule.rule_type.applies_externally() {
                continue;
            }
            let stripped = rule.stripped_result();
            let reversed: String = stripped.chars().rev().collect();
            self.splits.insert(
                &reversed,
                Reversal {
                    first: rule.first,
                    second: rule.second,
                    result_len: stripped.chars().count(),
                },
            );
        }
    }

    /// Number of distinct `(first, second)` join keys.
    pub fn len(&self) -> usize {
        self.external
            .keys()
            .chain(self.internal.keys().filter(|k| !self.external.contains_key(*k)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.external.is_empty() && self.internal.is_empty()
    }

    /// Join `chunks` by applying the loaded rules at each junction.
    ///
    /// ```
    /// use skt_tagger_lib::sandhi::{Sandhi, Term};
    ///
    /// let s = Sandhi::with_rules([("a", "i", "e"), ("e", "i", "a i")]);
    /// assert_eq!(s.join(["tasya", "icCA"], false), "tasyecCA");
    /// assert_eq!(s.join(["te", "iti"], false), "ta iti");
    /// assert_eq!(s.join([Term::exempt("te"), Term::new("iti")], false), "te iti");
    /// ```
    ///
    /// With `internal`, terms are joined without spaces using the general and
    /// internal rules, and internal retroflexion is applied to the result.
    /// Otherwise the general and external rules apply.
    pub fn join<I, T>(&self, chunks: I, internal: bool) -> String
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        let (table, separator) = if internal {
            (&self.internal, "")
        } else {
            (&self.external, " ")
        };
        let mut acc = String::new();
        let mut exempt = false;

        for chunk in chunks.into_iter().map(Into::into) {
            if chunk.text.is_empty() {
                continue;
            }
            if acc.is_empty() {
                acc = chunk.text;
            } else if exempt {
                acc.push_str(separator);
                acc.push_str(&chunk.text);
            } else {
                acc = join_pair(table, &acc, &chunk.text, separator);
            }
            exempt = chunk.exempt;
        }

        if internal {
            internal_retroflex(&acc)
        } else {
            acc
        }
    }

    /// Every `(before, after)` pair `chunk` might have been joined from.
    ///
    /// For each position this yields the literal cut, then one pair per
    /// general or external rule whose result starts at that position. The last pair is always
    /// `(chunk, "")`. Most pairs are implausible; callers filter them.
    pub fn iter_splits<'a>(&'a self, chunk: &str) -> impl Iterator<Item = (String, String)> + 'a {
        let chars: Vec<char> = chunk.chars().collect();
        let whole = chunk.to_string();
        (0..chars.len())
            .flat_map(move |i| self.splits_at(&chars, i))
            .chain(std::iter::once((whole, String::new())))
    }

    fn splits_at(&self, chars: &[char], i: usize) -> Vec<(String, String)> {
        let before: String = chars[..i].iter().collect();
        let mut out = Vec::new();
        if i > 0 {
            out.push((before.clone(), chars[i..].iter().collect()));
        }
        let reversed: String = chars[i..].iter().rev().collect();
        for rule in self.splits.lookup(&reversed) {
            let tail: String = chars[i + rule.result_len..].iter().collect();
            out.push((
                format!("{before}{}", rule.first),
                format!("{}{tail}", rule.second),
            ));
        }
        out
    }
}

fn join_pair(table: &JoinTable, acc: &str, chunk: &str, separator: &str) -> String {
    let acc_chars: Vec<char> = acc.chars().collect();
    let mut rest = chunk.chars();
    let head = match rest.next() {
        Some(c) => c.to_string(),
        None => return acc.to_string(),
    };

    // Visarga rules need two letters of context, so try those first.
    for n in [2, 1] {
        if n > acc_chars.len() {
            continue;
        }
        let cut = acc_chars.len() - n;
        let tail: String = acc_chars[cut..].iter().collect();
        if let Some(result) = table.get(&(tail, head.clone())) {
            let kept: String = acc_chars[..cut].iter().collect();
            return format!("{kept}{result}{}", rest.as_str());
        }
    }
    format!("{acc}{separator}{chunk}")
}

/// Apply the internal sandhi changes `n -> R` and `s -> z` (with `t -> w`
/// after a retroflexed `s`).
///
/// The final letter is only used as look-ahead and is never changed.
pub fn internal_retroflex(term: &str) -> String {
    const S_TRIGGER: &str = "iIuUfFeEoOkr";
    const N_TRIGGER: &str = "fFrz";
    // May stand between an n trigger and the n it retroflexes.
    let n_between = |c: char| sounds::is_vowel(c) || "kKgGNpPbBmhvyM".contains(c);
    // Must follow a retroflexed n.
    let n_after = |c: char| sounds::is_vowel(c) || "myvn".contains(c);

    let mut letters: Vec<char> = term.chars().collect();
    let mut apply_s = false;
    let mut apply_n = false;
    // Double retroflexion: nisanna -> nizaRRa.
    let mut had_n = false;
    let mut had_s = false;

    for i in 0..letters.len().saturating_sub(1) {
        let mut c = letters[i];

        if had_s {
            had_s = false;
            letters[i] = match c {
                't' => 'w',
                'T' => 'W',
                other => other,
            };
        }

        if apply_s && c == 's' {
            c = 'z';
            letters[i] = c;
            had_s = true;
        }
        apply_s = S_TRIGGER.contains(c);

        if had_n && c == 'n' {
            letters[i] = 'R';
            had_n = false;
        } else if apply_n && c == 'n' && n_after(letters[i + 1]) {
            letters[i] = 'R';
            had_n = true;
        }

        apply_n = if N_TRIGGER.contains(c) {
            true
        } else {
            apply_n && n_between(c)
        };
    }

    letters.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn joiner() -> Sandhi {
        Sandhi::with_rules([
            ("a", "i", "e"),
            ("a", "a", "A"),
            ("a", "A", "A"),
            ("i", "a", "y a"),
            ("I", "a", "y a"),
            ("O", "a", "Av a"),
        ])
    }

    fn splitter() -> Sandhi {
        Sandhi::with_rules([("a", "a", "A"), ("a", "A", "A"), ("O", "a", "Av a")])
    }

    fn splits(s: &Sandhi, chunk: &str) -> HashSet<(String, String)> {
        s.iter_splits(chunk).collect()
    }

    fn pairs(items: &[(&str, &str)]) -> HashSet<(String, String)> {
        items
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_join_external() {
        let s = joiner();
        assert_eq!(s.join(["tasya", "icCA"], false), "tasyecCA");
        assert_eq!(s.join(["tasya", "aSvaH"], false), "tasyASvaH");
        assert_eq!(s.join(["tasya", "Amoda"], false), "tasyAmoda");
        assert_eq!(s.join(["PalAni", "apaSyat"], false), "PalAny apaSyat");
        assert_eq!(s.join(["kumArI", "apaSyat"], false), "kumAry apaSyat");
        assert_eq!(s.join(["narO", "apaSyat"], false), "narAv apaSyat");
        assert_eq!(s.join(["tasya", "aSvena", "iti"], false), "tasyASveneti");
        assert_eq!(s.join(["tam", "eva"], false), "tam eva");
    }

    #[test]
    fn test_join_internal() {
        let s = joiner();
        assert_eq!(s.join(["nara", "ina"], true), "nareRa");
    }

    #[test]
    fn test_join_skips_empty_chunks() {
        let s = joiner();
        assert_eq!(s.join(["tasya", "", "icCA"], false), "tasyecCA");
        assert_eq!(s.join(["", "tam"], false), "tam");
        assert_eq!(s.join(Vec::<&str>::new(), false), "");
    }

    #[test]
    fn test_join_exempt() {
        let s = Sandhi::with_rules([("e", "i", "a i")]);
        assert_eq!(s.join(["te", "iti"], false), "ta iti");
        assert_eq!(s.join([Term::exempt("te"), Term::new("iti")], false), "te iti");
        // Exemption covers only the junction after the exempt term.
        assert_eq!(
            s.join([Term::exempt("te"), Term::new("te"), Term::new("iti")], false),
            "te ta iti"
        );
    }

    #[test]
    fn test_two_letter_context_wins() {
        let s = Sandhi::with_rules([("H", "i", "r i"), ("aH", "i", "a i")]);
        assert_eq!(s.join(["naraH", "iti"], false), "nara iti");
        assert_eq!(s.join(["agniH", "iti"], false), "agnir iti");
    }

    #[test]
    fn test_duplicate_rule_last_wins() {
        let s = Sandhi::with_rules([("a", "i", "e"), ("a", "i", "E")]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.join(["ca", "iti"], false), "cEti");
    }

    /// Run `f` and return what it logged at `warn` and above.
    fn warnings(f: impl FnOnce()) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = {
            let buffer = Arc::clone(&buffer);
            move || LogBuffer(Arc::clone(&buffer))
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_conflicting_duplicate_warns() {
        let logged = warnings(|| {
            Sandhi::with_rules([("a", "i", "e"), ("a", "i", "E")]);
        });
        assert!(logged.contains("duplicate sandhi rule"), "logged: {logged:?}");
        assert!(logged.contains("previous=e"), "logged: {logged:?}");
        assert_eq!(logged.matches("duplicate sandhi rule").count(), 1);
    }

    #[test]
    fn test_identical_duplicate_is_silent() {
        let logged = warnings(|| {
            let s = Sandhi::with_rules([("a", "i", "e"), ("a", "i", "e"), ("a", "u", "o")]);
            assert_eq!(s.len(), 2);
        });
        assert_eq!(logged, "");
    }

    #[test]
    fn test_rule_types() {
        let s = Sandhi::with_rules([
            SandhiRule::new("a", "i", "e"),
            SandhiRule::new("a", "u", "o").with_type(RuleType::External),
            SandhiRule::new("n", "y", "Ry").with_type(RuleType::Internal),
        ]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.join(["ca", "iti"], false), "ceti");
        assert_eq!(s.join(["ca", "iti"], true), "ceti");
        assert_eq!(s.join(["ca", "uta"], false), "cota");
        assert_eq!(s.join(["ca", "uta"], true), "cauta");
        assert_eq!(s.join(["tan", "yate"], false), "tan yate");
        assert_eq!(s.join(["tan", "yate"], true), "taRyate");
        // Internal rules never split running text.
        assert!(!splits(&s, "taRyate").contains(&("tan".to_string(), "yate".to_string())));
        assert!(splits(&s, "cota").contains(&("ca".to_string(), "uta".to_string())));
    }

    #[test]
    fn test_rule_type_from_json() {
        let rule: SandhiRule =
            serde_json::from_str(r#"{"first": "n", "second": "y", "result": "Ry", "rule_type": "internal"}"#)
                .unwrap();
        assert_eq!(rule.rule_type, RuleType::Internal);
        let rule: SandhiRule =
            serde_json::from_str(r#"{"first": "a", "second": "i", "result": "e"}"#).unwrap();
        assert_eq!(rule.rule_type, RuleType::General);
    }

    #[test]
    fn test_internal_retroflex() {
        assert_eq!(internal_retroflex("narena"), "nareRa");
        assert_eq!(internal_retroflex("vAksu"), "vAkzu");
        assert_eq!(internal_retroflex("nisanna"), "nizaRRa");
        assert_eq!(internal_retroflex("agnInAm"), "agnInAm");
        assert_eq!(internal_retroflex("havisA"), "havizA");
        assert_eq!(internal_retroflex("rAmAyana"), "rAmAyaRa");
        assert_eq!(internal_retroflex(""), "");
        assert_eq!(internal_retroflex("s"), "s");
    }

    #[test]
    fn test_t_follows_retroflexed_s() {
        assert_eq!(internal_retroflex("nistAra"), "nizwAra");
    }

    #[test]
    fn test_iter_splits() {
        let s = splitter();
        assert_eq!(
            splits(&s, "yAH"),
            pairs(&[("ya", "aH"), ("ya", "AH"), ("y", "AH"), ("yA", "H"), ("yAH", "")])
        );
        assert_eq!(
            splits(&s, "rAva"),
            pairs(&[
                ("ra", "ava"),
                ("ra", "Ava"),
                ("rO", "a"),
                ("r", "Ava"),
                ("rA", "va"),
                ("rAv", "a"),
                ("rAva", ""),
            ])
        );
    }

    #[test]
    fn test_iter_splits_without_rules() {
        let s = Sandhi::new();
        let all: Vec<_> = s.iter_splits("ka").collect();
        assert_eq!(
            all,
            vec![
                ("k".to_string(), "a".to_string()),
                ("ka".to_string(), String::new()),
            ]
        );
        let empty: Vec<_> = s.iter_splits("").collect();
        assert_eq!(empty, vec![(String::new(), String::new())]);
    }

    #[test]
    fn test_iter_splits_is_restartable() {
        let s = splitter();
        let first: Vec<_> = s.iter_splits("narAva").collect();
        let second: Vec<_> = s.iter_splits("narAva").collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iter_splits_non_ascii() {
        let s = Sandhi::with_rules([("a", "a", "ā")]);
        assert!(splits(&s, "rāma").contains(&("ra".to_string(), "ama".to_string())));
    }

    proptest! {
        #[test]
        fn proptest_join_then_split_round_trips(
            rule in prop::sample::select(vec![
                ("a", "i", "e"),
                ("a", "a", "A"),
                ("i", "a", "y a"),
                ("O", "a", "Av a"),
                ("aH", "i", "a i"),
            ]),
            left in "[kgtdpbmnsv]{0,4}",
            right in "[a-zA-Z]{0,4}",
        ) {
            let (first, second, result) = rule;
            let s = Sandhi::with_rules([rule]);
            let joined = s.join([format!("{left}{first}"), format!("{second}{right}")], false);
            prop_assert_eq!(&joined, &format!("{left}{result}{right}"));

            let merged = format!("{left}{}{right}", result.replace(' ', ""));
            let expected = (format!("{left}{first}"), format!("{second}{right}"));
            prop_assert!(s.iter_splits(&merged).any(|pair| pair == expected));
        }
    }
}
