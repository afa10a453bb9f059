use super::hash::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Group kind used for families of LAPW basis-set files.
pub const BASIS_SET_FAMILY_KIND: &str = "data.lapwbasis.family";

/// An opaque caller identity, compared for equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminates families of basis files from other named groups held by the same backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyKind(String);

impl FamilyKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// The kind of every family created by the upload workflow by default.
    pub fn basis_set() -> Self {
        Self(BASIS_SET_FAMILY_KIND.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FamilyKind {
    fn default() -> Self {
        Self::basis_set()
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, owned collection of basis files, identified by `(name, kind)`.
///
/// Membership is a set of content hashes, so the same content can never be a member twice no
/// matter how many copies of it were uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    name: String,
    kind: FamilyKind,
    owner: UserId,
    description: String,
    members: BTreeSet<ContentHash>,
}

impl Family {
    /// Creates an empty family owned by `owner`.
    pub fn new(name: impl Into<String>, kind: FamilyKind, owner: UserId) -> Self {
        Self {
            name: name.into(),
            kind,
            owner,
            description: String::new(),
            members: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FamilyKind {
        &self.kind
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn members(&self) -> &BTreeSet<ContentHash> {
        &self.members
    }

    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.members.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Overwrites the description unconditionally.
    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    /// Adds hashes to the member set and returns how many of them were not members yet.
    pub fn add_members<I>(&mut self, hashes: I) -> usize
    where
        I: IntoIterator<Item = ContentHash>,
    {
        hashes
            .into_iter()
            .filter(|hash| self.members.insert(hash.clone()))
            .count()
    }
}
