// Grammatical enumerations (person, number, case, ...) loaded from the dataset.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LexiconError;

pub type EnumId = u32;

/// The enumerations every dataset must define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumKind {
    Person,
    Number,
    Mode,
    Voice,
    Gender,
    Case,
    VClass,
    Modification,
}

impl EnumKind {
    pub const ALL: [EnumKind; 8] = [
        EnumKind::Person,
        EnumKind::Number,
        EnumKind::Mode,
        EnumKind::Voice,
        EnumKind::Gender,
        EnumKind::Case,
        EnumKind::VClass,
        EnumKind::Modification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnumKind::Person => "person",
            EnumKind::Number => "number",
            EnumKind::Mode => "mode",
            EnumKind::Voice => "voice",
            EnumKind::Gender => "gender",
            EnumKind::Case => "case",
            EnumKind::VClass => "vclass",
            EnumKind::Modification => "modification",
        }
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value of an enumeration, e.g. `{id: 6, name: "genitive", abbr: "6"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub id: EnumId,
    pub name: String,
    pub abbr: String,
}

/// A set of genders a nominal stem may take, e.g. masculine and neuter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderGroup {
    pub id: EnumId,
    pub name: String,
    pub abbr: String,
    /// Gender enum ids.
    pub members: BTreeSet<EnumId>,
}

impl GenderGroup {
    pub fn contains(&self, gender: EnumId) -> bool {
        self.members.contains(&gender)
    }
}

/// Every enumeration of the dataset, keyed by kind. Built once at load time
/// and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    entries: HashMap<EnumKind, Vec<EnumEntry>>,
    gender_groups: Vec<GenderGroup>,
}

impl EnumTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, keeping each kind sorted by id.
    pub fn insert(&mut self, kind: EnumKind, entry: EnumEntry) -> Result<(), LexiconError> {
        let list = self.entries.entry(kind).or_default();
        match list.binary_search_by_key(&entry.id, |e| e.id) {
            Ok(_) => Err(LexiconError::DuplicateId {
                kind: kind.as_str(),
                id: entry.id,
            }),
            Err(pos) => {
                list.insert(pos, entry);
                Ok(())
            }
        }
    }

    pub fn insert_gender_group(&mut self, group: GenderGroup) -> Result<(), LexiconError> {
        if self.gender_groups.iter().any(|g| g.id == group.id) {
            return Err(LexiconError::DuplicateId {
                kind: "gender group",
                id: group.id,
            });
        }
        self.gender_groups.push(group);
        self.gender_groups.sort_by_key(|g| g.id);
        Ok(())
    }

    /// Entries of `kind` in id order.
    pub fn entries(&self, kind: EnumKind) -> &[EnumEntry] {
        self.entries.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Resolve a name or abbreviation. Abbreviations are tried first since
    /// data files mostly use them.
    pub fn id(&self, kind: EnumKind, key: &str) -> Option<EnumId> {
        let entries = self.entries(kind);
        entries
            .iter()
            .find(|e| e.abbr == key)
            .or_else(|| entries.iter().find(|e| e.name == key))
            .map(|e| e.id)
    }

    pub fn get(&self, kind: EnumKind, id: EnumId) -> Option<&EnumEntry> {
        let entries = self.entries(kind);
        entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &entries[i])
    }

    pub fn abbr(&self, kind: EnumKind, id: EnumId) -> Option<&str> {
        self.get(kind, id).map(|e| e.abbr.as_str())
    }

    pub fn name(&self, kind: EnumKind, id: EnumId) -> Option<&str> {
        self.get(kind, id).map(|e| e.name.as_str())
    }

    pub fn gender_groups(&self) -> &[GenderGroup] {
        &self.gender_groups
    }

    pub fn gender_group(&self, id: EnumId) -> Option<&GenderGroup> {
        self.gender_groups.iter().find(|g| g.id == id)
    }

    /// Resolve a gender group by abbreviation or name.
    pub fn gender_group_id(&self, key: &str) -> Option<EnumId> {
        self.gender_groups
            .iter()
            .find(|g| g.abbr == key)
            .or_else(|| self.gender_groups.iter().find(|g| g.name == key))
            .map(|g| g.id)
    }

    /// Fail if any required kind has no entries.
    pub fn check_complete(&self) -> Result<(), LexiconError> {
        for kind in EnumKind::ALL {
            if self.entries(kind).is_empty() {
                return Err(LexiconError::EmptyEnum { kind });
            }
        }
        Ok(())
    }
}
