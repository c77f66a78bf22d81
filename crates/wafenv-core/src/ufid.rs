//! Universal flag id (ufid): the set of build feature flags.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WafEnvError};

/// Separator between ufid flags.
pub const SEPARATOR: char = '_';

/// Feature string used when none is requested.
pub const DEFAULT_UFID: &str = "dbg_mt_exc";

/// A recognized build feature flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    Dbg,
    Opt,
    Exc,
    Mt,
    Ndebug,
    Bits64,
    Safe,
    Safe2,
    Shr,
    Pic,
    Cpp11,
    Cpp14,
    Cpp17,
    Cpp20,
    Asan,
    Msan,
    Tsan,
    Ubsan,
}

impl Flag {
    /// Every flag, in vocabulary order.
    pub const ALL: [Flag; 18] = [
        Flag::Dbg,
        Flag::Opt,
        Flag::Exc,
        Flag::Mt,
        Flag::Ndebug,
        Flag::Bits64,
        Flag::Safe,
        Flag::Safe2,
        Flag::Shr,
        Flag::Pic,
        Flag::Cpp11,
        Flag::Cpp14,
        Flag::Cpp17,
        Flag::Cpp20,
        Flag::Asan,
        Flag::Msan,
        Flag::Tsan,
        Flag::Ubsan,
    ];

    /// The flag's token in a ufid string.
    pub fn token(self) -> &'static str {
        match self {
            Flag::Dbg => "dbg",
            Flag::Opt => "opt",
            Flag::Exc => "exc",
            Flag::Mt => "mt",
            Flag::Ndebug => "ndebug",
            Flag::Bits64 => "64",
            Flag::Safe => "safe",
            Flag::Safe2 => "safe2",
            Flag::Shr => "shr",
            Flag::Pic => "pic",
            Flag::Cpp11 => "cpp11",
            Flag::Cpp14 => "cpp14",
            Flag::Cpp17 => "cpp17",
            Flag::Cpp20 => "cpp20",
            Flag::Asan => "asan",
            Flag::Msan => "msan",
            Flag::Tsan => "tsan",
            Flag::Ubsan => "ubsan",
        }
    }

    /// Short description, shown in help output.
    pub fn description(self) -> &'static str {
        match self {
            Flag::Dbg => "build with debugging information",
            Flag::Opt => "build optimized",
            Flag::Exc => "exception support",
            Flag::Mt => "multithread support",
            Flag::Ndebug => "build with NDEBUG defined",
            Flag::Bits64 => "build for 64-bit architecture",
            Flag::Safe => "build safe (paranoid) library",
            Flag::Safe2 => "build safe2 (paranoid and binary-incompatible) library",
            Flag::Shr => "build dynamic libraries",
            Flag::Pic => "build static PIC libraries",
            Flag::Cpp11 => "build with C++11 support",
            Flag::Cpp14 => "build with C++14 support",
            Flag::Cpp17 => "build with C++17 support",
            Flag::Cpp20 => "build with C++20 support",
            Flag::Asan => "build with the address sanitizer",
            Flag::Msan => "build with the memory sanitizer",
            Flag::Tsan => "build with the thread sanitizer",
            Flag::Ubsan => "build with the undefined-behavior sanitizer",
        }
    }

    /// Look up a flag by token.
    pub fn from_token(token: &str) -> Option<Flag> {
        Flag::ALL.into_iter().find(|f| f.token() == token)
    }

    /// All valid tokens, in vocabulary order.
    pub fn vocabulary() -> Vec<String> {
        Flag::ALL.iter().map(|f| f.token().to_string()).collect()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An ordered, duplicate-free set of feature flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeatureSet {
    flags: Vec<Flag>,
}

impl FeatureSet {
    /// The empty feature set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a `_`-separated ufid string.
    ///
    /// The empty string is the empty set. Any unrecognized token rejects the
    /// whole string; repeated tokens keep their first position.
    pub fn parse(s: &str) -> Result<Self> {
        let mut set = Self::empty();
        if s.is_empty() {
            return Ok(set);
        }
        for token in s.split(SEPARATOR) {
            let flag = Flag::from_token(token).ok_or_else(|| WafEnvError::InvalidFlag {
                ufid: s.into(),
                flag: token.into(),
                valid: Flag::vocabulary(),
            })?;
            set.insert(flag);
        }
        Ok(set)
    }

    /// Add a flag at the end unless already present.
    pub fn insert(&mut self, flag: Flag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    /// True if `flag` is in the set.
    pub fn contains(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// True if every flag of `other` is in this set.
    pub fn contains_all(&self, other: &FeatureSet) -> bool {
        other.flags.iter().all(|f| self.contains(*f))
    }

    /// True if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of distinct flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Flags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.flags.iter().copied()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, flag) in self.flags.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(flag.token())?;
        }
        Ok(())
    }
}

impl FromStr for FeatureSet {
    type Err = WafEnvError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
