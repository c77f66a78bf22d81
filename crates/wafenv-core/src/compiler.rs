//! Default compiler detection and validation of compiler requests.
//!
//! The rule set declares the default compiler through two special keys,
//! [`COMPILER_TYPE_KEY`] and [`COMPILER_VERSION_KEY`], and declares every
//! available compiler implicitly through rules whose patterns name a concrete
//! compiler type and version.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::error::{Result, WafEnvError};
use crate::matcher::{AxisDefaults, RuleMatcher};
use crate::rule::RuleSet;
use crate::uplid::{Field, PlatformId};

/// Rule key whose value names the default compiler type.
pub const COMPILER_TYPE_KEY: &str = "BDE_COMPILER_FLAG";

/// Rule key whose value names the default compiler version.
pub const COMPILER_VERSION_KEY: &str = "BDE_COMPILERVERSION_FLAG";

/// A concrete compiler type and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompilerChoice {
    pub compiler_type: String,
    pub compiler_version: String,
}

impl CompilerChoice {
    pub fn new(compiler_type: impl Into<String>, compiler_version: impl Into<String>) -> Self {
        Self {
            compiler_type: compiler_type.into(),
            compiler_version: compiler_version.into(),
        }
    }

    /// Apply this compiler to a host probe id.
    pub fn apply(&self, probe: &PlatformId) -> Result<PlatformId> {
        Ok(probe.with_compiler(
            Field::exact(&self.compiler_type)?,
            Field::exact(&self.compiler_version)?,
        ))
    }

    /// `def` resolution values for the compiler axis.
    pub fn axis_defaults(&self) -> AxisDefaults {
        AxisDefaults::compiler(&self.compiler_type, &self.compiler_version)
    }
}

impl fmt::Display for CompilerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.compiler_type, self.compiler_version)
    }
}

/// Running state of the default-detection fold.
#[derive(Debug, Default)]
struct DefaultScan {
    compiler_type: Option<String>,
    compiler_version: Option<String>,
}

/// The compilers available on a host, and its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCatalog {
    host: String,
    default: Option<CompilerChoice>,
    available: BTreeSet<CompilerChoice>,
}

impl CompilerCatalog {
    /// The default compiler, if the rules declare both its type and version.
    pub fn default_compiler(&self) -> Option<&CompilerChoice> {
        self.default.as_ref()
    }

    /// Available compilers rendered as `type-version`, sorted and deduplicated.
    pub fn available(&self) -> Vec<String> {
        let names: BTreeSet<String> = self.available.iter().map(|c| c.to_string()).collect();
        names.into_iter().collect()
    }

    /// Resolve a compiler request to a concrete compiler.
    ///
    /// `None` selects the default. Anything else must name an available
    /// `type-version` exactly; a bare `type` is not a member.
    pub fn resolve(&self, requested: Option<&str>) -> Result<CompilerChoice> {
        let Some(requested) = requested else {
            return self
                .default
                .clone()
                .ok_or_else(|| WafEnvError::NoDefaultCompiler {
                    host: self.host.clone(),
                });
        };

        self.available
            .iter()
            .find(|choice| choice.to_string() == requested)
            .cloned()
            .ok_or_else(|| WafEnvError::UnknownCompiler {
                requested: requested.into(),
                valid: self.available(),
            })
    }
}

/// Scans a rule set for compiler declarations.
#[derive(Debug, Clone, Copy)]
pub struct CompilerResolver<'a> {
    rules: &'a RuleSet,
}

impl<'a> CompilerResolver<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Build the compiler catalog for a host probe.
    ///
    /// `probe` carries the host's concrete OS fields and `*` compiler fields.
    /// Rules are folded in order; a version rule only counts when its pattern's
    /// compiler type is `*` or equals the default type seen so far.
    pub fn catalog(&self, probe: &PlatformId) -> CompilerCatalog {
        let matcher = RuleMatcher::default();
        let mut available = BTreeSet::new();

        let scan = self
            .rules
            .iter()
            .filter(|rule| matcher.matches_probe(&rule.pattern, probe))
            .fold(DefaultScan::default(), |mut scan, rule| {
                let pattern = &rule.pattern;
                if rule.key == COMPILER_TYPE_KEY {
                    scan.compiler_type = Some(rule.value.clone());
                } else if rule.key == COMPILER_VERSION_KEY {
                    let type_applies = match &pattern.compiler_type {
                        Field::Any => true,
                        Field::Exact(t) => scan.compiler_type.as_deref() == Some(t.as_str()),
                        Field::Default => false,
                    };
                    if type_applies {
                        scan.compiler_version = Some(rule.value.clone());
                    }
                }

                if let (Some(t), Some(v)) = (
                    pattern.compiler_type.as_exact(),
                    pattern.compiler_version.as_exact(),
                ) {
                    available.insert(CompilerChoice::new(t, v));
                }
                scan
            });

        let default = match (scan.compiler_type, scan.compiler_version) {
            (Some(t), Some(v)) => Some(CompilerChoice::new(t, v)),
            _ => None,
        };
        debug!(
            host = %probe,
            default = ?default.as_ref().map(|c| c.to_string()),
            available = available.len(),
            "scanned compiler rules"
        );

        CompilerCatalog {
            host: probe.to_string(),
            default,
            available,
        }
    }
}
