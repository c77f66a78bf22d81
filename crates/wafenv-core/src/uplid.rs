//! Universal platform id (uplid).
//!
//! A uplid names an operating system, CPU, and compiler combination, e.g.
//! `unix-linux-x86_64-2.6.18-gcc-4.7.2`. Rule patterns use the same shape but
//! may leave any field as a wildcard (`*`) or as the axis default (`def`).

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WafEnvError};

/// Number of fields in a uplid.
pub const FIELD_COUNT: usize = 6;

/// Separator between uplid fields.
pub const SEPARATOR: char = '-';

/// One field of a platform id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// `*`: matches any value.
    Any,
    /// `def`: matches only the configured default for the axis.
    Default,
    /// A concrete token.
    Exact(String),
}

impl Field {
    /// Parse a single field token.
    pub fn parse(token: &str) -> std::result::Result<Self, String> {
        match token {
            "*" => Ok(Field::Any),
            "def" => Ok(Field::Default),
            "" => Err("empty field".into()),
            t if t.chars().all(is_token_char) => Ok(Field::Exact(t.to_string())),
            t => Err(format!("field '{t}' contains invalid characters")),
        }
    }

    /// Create a concrete field, validating the token.
    pub fn exact(token: &str) -> Result<Self> {
        match Field::parse(token) {
            Ok(Field::Exact(t)) => Ok(Field::Exact(t)),
            Ok(_) => Err(WafEnvError::Format {
                input: token.into(),
                detail: "expected a concrete value, found a wildcard".into(),
            }),
            Err(detail) => Err(WafEnvError::Format {
                input: token.into(),
                detail,
            }),
        }
    }

    /// The concrete token, if any.
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Field::Exact(t) => Some(t),
            _ => None,
        }
    }

    /// True for a concrete token.
    pub fn is_exact(&self) -> bool {
        matches!(self, Field::Exact(_))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Any => f.write_str("*"),
            Field::Default => f.write_str("def"),
            Field::Exact(t) => f.write_str(t),
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

/// A platform id: OS family, OS name, CPU, OS version, compiler type and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformId {
    /// OS family (e.g., "unix", "windows").
    pub os_family: Field,
    /// Unversioned OS name (e.g., "linux", "darwin", "aix", "sunos").
    pub os_name: Field,
    /// CPU architecture (e.g., "x86_64", "sparc").
    pub cpu_arch: Field,
    /// OS version (e.g., "2.6.18").
    pub os_version: Field,
    /// Compiler type (e.g., "gcc", "clang").
    pub compiler_type: Field,
    /// Compiler version (e.g., "4.7.2").
    pub compiler_version: Field,
}

impl PlatformId {
    /// Build a platform id from its six fields.
    pub fn new(
        os_family: Field,
        os_name: Field,
        cpu_arch: Field,
        os_version: Field,
        compiler_type: Field,
        compiler_version: Field,
    ) -> Self {
        Self {
            os_family,
            os_name,
            cpu_arch,
            os_version,
            compiler_type,
            compiler_version,
        }
    }

    /// The pattern that matches every platform id.
    pub fn any() -> Self {
        Self::from_fields(std::array::from_fn(|_| Field::Any))
    }

    /// Parse a full uplid: exactly six non-empty `-`-separated fields.
    pub fn parse(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split(SEPARATOR).collect();
        if tokens.len() != FIELD_COUNT {
            return Err(WafEnvError::Format {
                input: s.into(),
                detail: format!(
                    "expected {FIELD_COUNT} '{SEPARATOR}'-separated fields, found {}",
                    tokens.len()
                ),
            });
        }
        Self::from_tokens(s, &tokens)
    }

    /// Parse a rule pattern. Trailing fields may be omitted and default to `*`.
    pub fn parse_pattern(s: &str) -> Result<Self> {
        let mut tokens: Vec<&str> = s.split(SEPARATOR).collect();
        if tokens.len() > FIELD_COUNT {
            return Err(WafEnvError::Format {
                input: s.into(),
                detail: format!(
                    "expected at most {FIELD_COUNT} fields, found {}",
                    tokens.len()
                ),
            });
        }
        tokens.resize(FIELD_COUNT, "*");
        Self::from_tokens(s, &tokens)
    }

    fn from_tokens(input: &str, tokens: &[&str]) -> Result<Self> {
        let mut fields = Vec::with_capacity(FIELD_COUNT);
        for token in tokens {
            let field = Field::parse(token).map_err(|detail| WafEnvError::Format {
                input: input.into(),
                detail,
            })?;
            fields.push(field);
        }
        let fields: [Field; FIELD_COUNT] =
            fields.try_into().map_err(|_| WafEnvError::Format {
                input: input.into(),
                detail: "wrong number of fields".into(),
            })?;
        Ok(Self::from_fields(fields))
    }

    fn from_fields(fields: [Field; FIELD_COUNT]) -> Self {
        let [os_family, os_name, cpu_arch, os_version, compiler_type, compiler_version] = fields;
        Self::new(
            os_family,
            os_name,
            cpu_arch,
            os_version,
            compiler_type,
            compiler_version,
        )
    }

    /// Fields in string order.
    pub fn fields(&self) -> [&Field; FIELD_COUNT] {
        [
            &self.os_family,
            &self.os_name,
            &self.cpu_arch,
            &self.os_version,
            &self.compiler_type,
            &self.compiler_version,
        ]
    }

    /// True if no field is a wildcard or default marker.
    pub fn is_concrete(&self) -> bool {
        self.fields().iter().all(|f| f.is_exact())
    }

    /// Return an error unless this id is fully concrete.
    pub fn ensure_concrete(&self) -> Result<()> {
        if self.is_concrete() {
            Ok(())
        } else {
            Err(WafEnvError::NotConcrete {
                uplid: self.to_string(),
            })
        }
    }

    /// Copy of this id with the compiler axis replaced.
    pub fn with_compiler(&self, compiler_type: Field, compiler_version: Field) -> Self {
        Self {
            compiler_type,
            compiler_version,
            ..self.clone()
        }
    }

    /// The OS and CPU part: `os_family-os_name-cpu_arch-os_version`.
    pub fn os_prefix(&self) -> String {
        format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.os_family, self.os_name, self.cpu_arch, self.os_version
        )
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.os_prefix(),
            self.compiler_type,
            self.compiler_version
        )
    }
}

impl FromStr for PlatformId {
    type Err = WafEnvError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_uplid() {
        let id = PlatformId::parse("unix-linux-x86_64-2.6.18-gcc-4.7.2").unwrap();
        assert_eq!(id.os_family, Field::Exact("unix".into()));
        assert_eq!(id.cpu_arch, Field::Exact("x86_64".into()));
        assert_eq!(id.compiler_version, Field::Exact("4.7.2".into()));
        assert!(id.is_concrete());
    }

    #[test]
    fn round_trip() {
        for s in [
            "unix-linux-x86_64-2.6.18-gcc-4.7.2",
            "unix-darwin-x86_64-13.4.0-clang-5.0",
            "*-*-*-*-*-*",
            "unix-sunos-sparc-def-cc-def",
        ] {
            assert_eq!(PlatformId::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn wrong_field_count() {
        assert!(matches!(
            PlatformId::parse("unix-linux-x86_64-2.6.18-gcc"),
            Err(WafEnvError::Format { .. })
        ));
        assert!(PlatformId::parse("unix-linux-x86_64-2.6.18-gcc-4.7.2-extra").is_err());
    }

    #[test]
    fn empty_field_rejected() {
        assert!(PlatformId::parse("unix--x86_64-2.6.18-gcc-4.7.2").is_err());
        assert!(PlatformId::parse("").is_err());
    }

    #[test]
    fn invalid_characters_rejected() {
        assert!(PlatformId::parse("unix-linux-x86/64-2.6.18-gcc-4.7.2").is_err());
    }

    #[test]
    fn wildcard_and_default_are_not_concrete() {
        let id = PlatformId::parse("unix-linux-x86_64-2.6.18-*-*").unwrap();
        assert_eq!(id.compiler_type, Field::Any);
        assert!(!id.is_concrete());
        assert!(id.ensure_concrete().is_err());

        let id = PlatformId::parse("unix-linux-x86_64-def-gcc-4.7.2").unwrap();
        assert_eq!(id.os_version, Field::Default);
        assert!(!id.is_concrete());
    }

    #[test]
    fn pattern_pads_missing_fields() {
        let id = PlatformId::parse_pattern("unix-linux").unwrap();
        assert_eq!(id.to_string(), "unix-linux-*-*-*-*");
        assert_eq!(PlatformId::parse_pattern("*").unwrap(), PlatformId::any());
        assert!(PlatformId::parse_pattern("a-b-c-d-e-f-g").is_err());
    }

    #[test]
    fn with_compiler_replaces_only_compiler_axis() {
        let probe = PlatformId::parse("unix-linux-x86_64-2.6.18-*-*").unwrap();
        let id = probe.with_compiler(
            Field::exact("gcc").unwrap(),
            Field::exact("4.7.2").unwrap(),
        );
        assert_eq!(id.to_string(), "unix-linux-x86_64-2.6.18-gcc-4.7.2");
        assert_eq!(id.os_prefix(), probe.os_prefix());
    }

    #[test]
    fn exact_rejects_markers() {
        assert!(Field::exact("*").is_err());
        assert!(Field::exact("def").is_err());
        assert!(Field::exact("").is_err());
    }
}
