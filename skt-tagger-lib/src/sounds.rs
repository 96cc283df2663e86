// Sound classification, letter transforms, and metrical scanning for SLP1 text.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sound classes
// ---------------------------------------------------------------------------

/// Every legal sound, including anusvara, ardhachandra, and Vedic `L`.
pub const ALL_SOUNDS: &str = "aAiIuUfFxXeEoOMHkKgGNcCjJYwWqQRtTdDnpPbBmyrlLvSzsh'~";

/// Every legal token: sounds plus danda, space, and newline.
pub const ALL_TOKENS: &str = "aAiIuUfFxXeEoOMHkKgGNcCjJYwWqQRtTdDnpPbBmyrlLvSzsh'~| \n";

pub const VOWELS: &str = "aAiIuUfFxXeEoO";
pub const SHORT_VOWELS: &str = "aiufx";
pub const LONG_VOWELS: &str = "AIUFXeEoO";

pub const STOPS: &str = "kKgGcCjJwWqQtTdDpPbB";
pub const NASALS: &str = "NYRnm";
pub const SEMIVOWELS: &str = "yrlLv";
pub const SAVARGA: &str = "Szsh";
pub const CONSONANTS: &str = "kKgGcCjJwWqQtTdDpPbBNYRnmyrlLvSzsh";

/// Anusvara and visarga.
pub const MARKERS: &str = "MH";

/// Sounds that may end a word.
pub const VALID_FINALS: &str = "aAiIuUfeEoOkwtpNnmsr";

/// Coarse class of a single code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundClass {
    Vowel,
    Consonant,
    Marker,
    Other,
}

pub fn classify(c: char) -> SoundClass {
    if is_vowel(c) {
        SoundClass::Vowel
    } else if is_consonant(c) {
        SoundClass::Consonant
    } else if MARKERS.contains(c) {
        SoundClass::Marker
    } else {
        SoundClass::Other
    }
}

pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

pub fn is_short_vowel(c: char) -> bool {
    SHORT_VOWELS.contains(c)
}

pub fn is_long_vowel(c: char) -> bool {
    LONG_VOWELS.contains(c)
}

pub fn is_consonant(c: char) -> bool {
    CONSONANTS.contains(c)
}

pub fn is_valid_final(c: char) -> bool {
    VALID_FINALS.contains(c)
}

/// Remove every character of `phrase` that is not in `allowed`, keeping order.
/// `ALL_TOKENS` is a sensible default for `allowed`.
pub fn clean(phrase: &str, allowed: &str) -> String {
    phrase.chars().filter(|&c| allowed.contains(c)).collect()
}

/// Number of syllables (vowels) in `phrase`.
pub fn num_syllables(phrase: &str) -> usize {
    phrase.chars().filter(|&c| is_vowel(c)).count()
}

/// Collation key that orders SLP1 words in traditional alphabetical order.
/// Characters outside `ALL_SOUNDS` are ignored.
pub fn sort_key(word: &str) -> String {
    const SA: &str = "aAiIuUfFxXeEoOMHkKgGNcCjJYwWqQRtTdDnpPbBmyrlvSzsh '~";
    const EN: &str = "123ABCDEFGHIJKLMNOPQRSTUVWabcdefghijklmnopqrstuvwxyz";
    word.chars()
        .filter(|&c| ALL_SOUNDS.contains(c))
        .filter_map(|c| SA.chars().position(|s| s == c))
        .filter_map(|i| EN.chars().nth(i))
        .collect()
}

// ---------------------------------------------------------------------------
// Letter transforms
// ---------------------------------------------------------------------------

/// Named letter transforms. Each is total: a letter with no mapping is
/// returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    Shorten,
    Lengthen,
    Semivowel,
    Aspirate,
    Deaspirate,
    Voice,
    Devoice,
    Nasalize,
    Dentalize,
    Retroflex,
    Simplify,
    Guna,
    Vrddhi,
    Samprasarana,
}

impl Transform {
    pub const ALL: [Transform; 14] = [
        Transform::Shorten,
        Transform::Lengthen,
        Transform::Semivowel,
        Transform::Aspirate,
        Transform::Deaspirate,
        Transform::Voice,
        Transform::Devoice,
        Transform::Nasalize,
        Transform::Dentalize,
        Transform::Retroflex,
        Transform::Simplify,
        Transform::Guna,
        Transform::Vrddhi,
        Transform::Samprasarana,
    ];

    /// Source letters and their replacements. Multi-letter outputs (guna of
    /// `f` is `ar`) are why the table holds strings.
    fn table(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Transform::Shorten => ("AIUFX", &["a", "i", "u", "f", "x"]),
            Transform::Lengthen => ("aiufx", &["A", "I", "U", "F", "X"]),
            Transform::Semivowel => (
                "iIuUfFxXeEoO",
                &["y", "y", "v", "v", "r", "r", "l", "l", "ay", "Ay", "av", "Av"],
            ),
            Transform::Aspirate => (
                "kgcjwqtdpb",
                &["K", "G", "C", "J", "W", "Q", "T", "D", "P", "B"],
            ),
            Transform::Deaspirate => (
                "KGCJWQTDPB",
                &["k", "g", "c", "j", "w", "q", "t", "d", "p", "b"],
            ),
            Transform::Voice => (
                "kKcCwWtTpP",
                &["g", "G", "j", "J", "q", "Q", "d", "D", "b", "B"],
            ),
            Transform::Devoice => (
                "gGjJqQdDbB",
                &["k", "K", "c", "C", "w", "W", "t", "T", "p", "P"],
            ),
            Transform::Nasalize => (
                "kKgGhcCjJwWqQtTdDpPbB",
                &[
                    "N", "N", "N", "N", "N", "Y", "Y", "Y", "Y", "R", "R", "R", "R", "n", "n", "n",
                    "n", "m", "m", "m", "m",
                ],
            ),
            Transform::Dentalize => ("wWqQRz", &["t", "T", "d", "D", "n", "s"]),
            Transform::Retroflex => ("tTdDns", &["w", "W", "q", "Q", "R", "z"]),
            Transform::Simplify => (
                "kgGNhcjtTdDpPbBnmsrH",
                &[
                    "k", "k", "k", "k", "k", "k", "w", "t", "t", "t", "t", "p", "p", "p", "p", "n", "m",
                    "H", "H", "H",
                ],
            ),
            Transform::Guna => (
                "iIuUfFxX",
                &["e", "e", "o", "o", "ar", "ar", "al", "al"],
            ),
            Transform::Vrddhi => (
                "aiIuUfFxXeo",
                &["A", "E", "E", "O", "O", "Ar", "Ar", "Al", "Al", "E", "O"],
            ),
            Transform::Samprasarana => ("yrlv", &["i", "f", "x", "u"]),
        }
    }

    /// Apply the transform to `letter`, or return it unchanged if no mapping
    /// exists.
    pub fn apply(self, letter: char) -> String {
        let (from, to) = self.table();
        match from.chars().position(|c| c == letter) {
            Some(i) => to[i].to_string(),
            None => letter.to_string(),
        }
    }
}

/// Reduce `letter` to a sound permitted at the end of a word (`c` in `vAc`
/// becomes `k`). Every simplify output is itself a fixed point.
pub fn simplify(letter: char) -> char {
    Transform::Simplify
        .apply(letter)
        .chars()
        .next()
        .unwrap_or(letter)
}

/// Simplify the final letter of `term`.
pub fn simplify_final(term: &str) -> String {
    let mut chars: Vec<char> = term.chars().collect();
    if let Some(last) = chars.last_mut() {
        *last = simplify(*last);
    }
    chars.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Meter
// ---------------------------------------------------------------------------

/// Syllable weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    Heavy,
    Light,
}

impl Weight {
    /// Traditional notation: `_` heavy, `.` light.
    pub fn symbol(self) -> char {
        match self {
            Weight::Heavy => '_',
            Weight::Light => '.',
        }
    }
}

/// Scan `phrase` into heavy and light syllables.
///
/// A syllable is heavy if its vowel is long, if a short vowel is followed by
/// a consonant cluster, or if the vowel is followed by anusvara or visarga.
/// Weight depends on what follows, so the phrase is scanned in reverse.
pub fn meter(phrase: &str) -> Vec<Weight> {
    let mut scan = Vec::new();
    let mut had_consonant = false;
    // Set on anusvara, visarga, or a conjunct consonant.
    let mut saw_cluster = false;

    for c in clean(phrase, ALL_SOUNDS).chars().rev() {
        if is_vowel(c) {
            if saw_cluster || !is_short_vowel(c) {
                scan.push(Weight::Heavy);
            } else {
                scan.push(Weight::Light);
            }
            saw_cluster = false;
        } else if MARKERS.contains(c) || had_consonant {
            saw_cluster = true;
        }
        had_consonant = is_consonant(c);
    }

    scan.reverse();
    scan
}

/// `meter` rendered as a string of `_` and `.`.
pub fn meter_string(phrase: &str) -> String {
    meter(phrase).into_iter().map(Weight::symbol).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean("kaTam! idam...", ALL_TOKENS), "kaTam idam");
        assert_eq!(clean("ka!!!Tamida23m//", CONSONANTS), "kTmdm");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify('a'), SoundClass::Vowel);
        assert_eq!(classify('k'), SoundClass::Consonant);
        assert_eq!(classify('H'), SoundClass::Marker);
        assert_eq!(classify('|'), SoundClass::Other);
    }

    #[test]
    fn test_every_sound_has_one_class() {
        for c in ALL_SOUNDS.chars().filter(|c| !"'~".contains(*c)) {
            let classes = [is_vowel(c), is_consonant(c), MARKERS.contains(c)];
            assert_eq!(
                classes.iter().filter(|&&b| b).count(),
                1,
                "{c} should belong to exactly one class"
            );
        }
    }

    #[test]
    fn test_transforms() {
        assert_eq!(Transform::Aspirate.apply('k'), "K");
        assert_eq!(Transform::Aspirate.apply('J'), "J");
        assert_eq!(Transform::Deaspirate.apply('J'), "j");
        assert_eq!(Transform::Voice.apply('p'), "b");
        assert_eq!(Transform::Devoice.apply('J'), "C");
        assert_eq!(Transform::Nasalize.apply('k'), "N");
        assert_eq!(Transform::Nasalize.apply('p'), "m");
        assert_eq!(Transform::Dentalize.apply('w'), "t");
        assert_eq!(Transform::Dentalize.apply('z'), "s");
        assert_eq!(Transform::Samprasarana.apply('v'), "u");
        for t in Transform::ALL {
            assert_eq!(t.apply('|'), "|", "{t:?} should leave unknown letters alone");
        }
    }

    #[test]
    fn test_guna_and_vrddhi() {
        let guna: Vec<String> = "aAiIuUfFxXeEoO"
            .chars()
            .map(|c| Transform::Guna.apply(c))
            .collect();
        assert_eq!(
            guna,
            ["a", "A", "e", "e", "o", "o", "ar", "ar", "al", "al", "e", "E", "o", "O"]
        );
        let vrddhi: Vec<String> = "aAiIuUfFxXeEoO"
            .chars()
            .map(|c| Transform::Vrddhi.apply(c))
            .collect();
        assert_eq!(
            vrddhi,
            ["A", "A", "E", "E", "O", "O", "Ar", "Ar", "Al", "Al", "E", "E", "O", "O"]
        );
    }

    #[test]
    fn test_simplify() {
        assert_eq!(simplify('G'), 'k');
        assert_eq!(simplify('j'), 'w');
        assert_eq!(simplify('c'), 'k');
        assert_eq!(simplify(simplify('c')), 'k');
        assert_eq!(simplify_final("vAc"), "vAk");
        assert_eq!(simplify('a'), 'a');
        assert_eq!(simplify_final("suhfd"), "suhft");
        assert_eq!(simplify_final(""), "");
    }

    #[test]
    fn test_num_syllables() {
        assert_eq!(num_syllables("a"), 1);
        assert_eq!(num_syllables("zwre"), 1);
        assert_eq!(num_syllables("uM"), 1);
        assert_eq!(num_syllables("Darmakzetre kurukzetre"), 8);
    }

    #[test]
    fn test_meter_single_vowels() {
        for v in SHORT_VOWELS.chars() {
            assert_eq!(meter_string(&v.to_string()), ".");
        }
        for v in LONG_VOWELS.chars() {
            assert_eq!(meter_string(&v.to_string()), "_");
        }
        assert_eq!(meter_string("aM"), "_");
        assert_eq!(meter_string("naH"), "_");
    }

    #[test]
    fn test_meter_mandakranta() {
        let verse = "kaScitkAntAvirahaguruRA svADikArapramattaH\n\
                     SApenAstaMgamitamahimA varzaBogyeRa BartuH .\n\
                     yakzaScakre janakatanayAsnAnapuRyodakezu\n\
                     snigDacCAyAtaruzu vasatiM rAmagiryASramezu .. 1 ..";
        for line in verse.lines() {
            let mut scan = meter(line);
            // The last syllable of a verse quarter counts as heavy.
            if let Some(last) = scan.last_mut() {
                *last = Weight::Heavy;
            }
            let rendered: String = scan.into_iter().map(Weight::symbol).collect();
            assert_eq!(rendered, "____.....__.__.__", "line: {line}");
        }
    }

    #[test]
    fn test_sort_key_orders_traditionally() {
        let mut words = vec!["kAma", "aSva", "Agama", "ka"];
        words.sort_by_key(|w| sort_key(w));
        assert_eq!(words, vec!["aSva", "Agama", "ka", "kAma"]);
    }

    proptest! {
        #[test]
        fn proptest_simplify_is_idempotent(c in proptest::char::any()) {
            prop_assert_eq!(simplify(simplify(c)), simplify(c));
        }

        #[test]
        fn proptest_clean_keeps_only_allowed(s in "[a-zA-Z !|.0-9]{0,40}") {
            let cleaned = clean(&s, ALL_SOUNDS);
            prop_assert!(cleaned.chars().all(|c| ALL_SOUNDS.contains(c)));
        }
    }
}
