//! TOML loading of rule databases.
//!
//! A rule database is a `[[rule]]` array; rule order in the file is the
//! evaluation order.
//!
//! ```toml
//! [[rule]]
//! uplid = "unix-linux-*-*-gcc-4.7.2"
//! key = "CXX"
//! value = "/opt/gcc-4.7.2/bin/g++"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use wafenv_core::{FeatureSet, PlatformId, Rule, RuleOp, RuleSet};

use crate::error::{Result, RulesError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default)]
    rule: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    /// Uplid pattern; trailing fields may be omitted.
    #[serde(default = "any_uplid")]
    uplid: String,
    /// Feature condition; every listed flag must be requested.
    #[serde(default)]
    ufid: String,
    #[serde(default)]
    op: RawOp,
    key: String,
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RawOp {
    #[default]
    Assign,
    Append,
}

fn any_uplid() -> String {
    "*".to_string()
}

impl RawRule {
    fn into_rule(self) -> wafenv_core::Result<Rule> {
        let op = match self.op {
            RawOp::Assign => RuleOp::Assign,
            RawOp::Append => RuleOp::Append,
        };
        Ok(Rule::assign(PlatformId::parse_pattern(&self.uplid)?, self.key, self.value)
            .with_features(FeatureSet::parse(&self.ufid)?)
            .with_op(op))
    }
}

/// Load a rule set from a TOML file.
pub fn load_rules_toml(path: &Path) -> Result<RuleSet> {
    if !path.exists() {
        return Err(RulesError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let rules = parse_rules_toml(&content)?;
    debug!(path = %path.display(), rules = rules.len(), "loaded rule database");
    Ok(rules)
}

/// Parse a rule set from a TOML string.
pub fn parse_rules_toml(toml_str: &str) -> Result<RuleSet> {
    let file: RuleFile = toml::from_str(toml_str)?;
    let rules = file
        .rule
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            raw.into_rule()
                .map_err(|source| RulesError::InvalidRule { index, source })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RuleSet::new(rules))
}
