use std::{
    fmt,
    iter::FromIterator,
    str::FromStr,
};

/// What sort of image a managed file holds
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Kind {
    Unknown,
    VM,
    Container,
    ISO,
}

impl Kind {
    /// Every kind, in declaration order
    pub const ALL: [Kind; 4] = [Kind::Unknown, Kind::VM, Kind::Container, Kind::ISO];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Unknown => "Unknown",
            Kind::VM => "VM",
            Kind::Container => "Container",
            Kind::ISO => "ISO",
        }
    }

    /// Interpret a kind name, ignoring case
    ///
    /// Names that aren't recognized are [Kind::Unknown].
    pub fn from_name(s: &str) -> Kind {
        match s.trim().to_lowercase().as_str() {
            "vm" => Kind::VM,
            "container" => Kind::Container,
            "iso" => Kind::ISO,
            _ => Kind::Unknown,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Default for Kind {
    fn default() -> Self {
        Kind::Unknown
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for Kind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Kind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Kind::from_name(&s))
    }
}

/// A set of [Kind]s, used to filter a catalog
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct KindSet {
    members: [bool; 4],
}

impl KindSet {
    /// The set with no kinds in it
    pub fn empty() -> Self {
        KindSet::default()
    }

    /// The set of every kind
    pub fn all() -> Self {
        KindSet { members: [true; 4] }
    }

    pub fn insert(&mut self, kind: Kind) {
        self.members[kind.index()] = true;
    }

    pub fn with(mut self, kind: Kind) -> Self {
        self.insert(kind);
        self
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.members[kind.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.members.iter().any(|member| *member)
    }

    pub fn iter(&self) -> impl Iterator<Item = Kind> + '_ {
        Kind::ALL.iter().copied().filter(move |kind| self.contains(*kind))
    }

    /// Parse a comma separated list of kind names
    ///
    /// An empty string means every kind. Anything else is an explicit list,
    /// where unrecognized or blank names select [Kind::Unknown].
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return KindSet::all();
        }
        s.split(',').map(Kind::from_name).collect()
    }
}

impl FromIterator<Kind> for KindSet {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        let mut set = KindSet::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl FromStr for KindSet {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KindSet::parse(s))
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|kind| kind.as_str()).collect();
        write!(f, "{}", names.join(","))
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KindSet({})", self)
    }
}
