//! Field-by-field matching of rule patterns against platform ids.

use crate::uplid::{Field, PlatformId};

/// The resolved default value for each uplid axis, used to match `def`.
///
/// An axis without a known default never matches `def`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisDefaults {
    /// Default OS family, e.g. `unix`.
    pub os_family: Option<String>,
    /// Default OS name.
    pub os_name: Option<String>,
    /// Default CPU architecture.
    pub cpu_arch: Option<String>,
    /// Default OS version.
    pub os_version: Option<String>,
    /// Default compiler type, from `BDE_COMPILER_FLAG`.
    pub compiler_type: Option<String>,
    /// Default compiler version, from `BDE_COMPILERVERSION_FLAG`.
    pub compiler_version: Option<String>,
}

impl AxisDefaults {
    /// Defaults for the compiler axis only.
    pub fn compiler(compiler_type: impl Into<String>, compiler_version: impl Into<String>) -> Self {
        Self {
            compiler_type: Some(compiler_type.into()),
            compiler_version: Some(compiler_version.into()),
            ..Self::default()
        }
    }

    fn as_array(&self) -> [Option<&str>; 6] {
        [
            self.os_family.as_deref(),
            self.os_name.as_deref(),
            self.cpu_arch.as_deref(),
            self.os_version.as_deref(),
            self.compiler_type.as_deref(),
            self.compiler_version.as_deref(),
        ]
    }
}

/// Decides whether a rule pattern applies to a platform id.
#[derive(Debug, Clone, Default)]
pub struct RuleMatcher {
    defaults: AxisDefaults,
}

impl RuleMatcher {
    pub fn new(defaults: AxisDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &AxisDefaults {
        &self.defaults
    }

    /// Match `pattern` against a fully concrete id.
    ///
    /// Returns false when `concrete` has any wildcard field.
    pub fn matches(&self, pattern: &PlatformId, concrete: &PlatformId) -> bool {
        concrete.is_concrete() && self.match_fields(pattern, concrete)
    }

    /// Match `pattern` against a probe id whose `*` fields are unconstrained.
    pub fn matches_probe(&self, pattern: &PlatformId, probe: &PlatformId) -> bool {
        self.match_fields(pattern, probe)
    }

    fn match_fields(&self, pattern: &PlatformId, target: &PlatformId) -> bool {
        pattern
            .fields()
            .into_iter()
            .zip(target.fields())
            .zip(self.defaults.as_array())
            .all(|((p, t), default)| field_matches(p, t, default))
    }
}

fn field_matches(pattern: &Field, target: &Field, default: Option<&str>) -> bool {
    match (pattern, target) {
        (Field::Any, _) => true,
        (_, Field::Any) => true,
        (Field::Exact(p), Field::Exact(t)) => p == t,
        (Field::Default, Field::Exact(t)) => default == Some(t.as_str()),
        (_, Field::Default) => false,
    }
}
