//! Option evaluation: applying a rule set to one build configuration.
//!
//! Rules are applied in file order. After all rules are applied, `$(KEY)`
//! references in values are replaced with the value of `KEY`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

use wafenv_core::{AxisDefaults, FeatureSet, PlatformId, RuleMatcher, RuleOp, RuleSet};

use crate::error::{Result, RulesError};

/// Maximum substitution passes before a value is considered recursive.
const MAX_EXPANSION_PASSES: usize = 16;

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\((\w+)\)").expect("invalid reference regex"));

/// Resolved option values for one build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    uplid: String,
    values: BTreeMap<String, String>,
}

impl Options {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The value of `key`, or [`RulesError::MissingKey`].
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| RulesError::MissingKey {
            key: key.into(),
            uplid: self.uplid.clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evaluates a rule set for a concrete uplid and a ufid.
#[derive(Debug, Clone)]
pub struct OptionsEvaluator<'a> {
    uplid: &'a PlatformId,
    ufid: &'a FeatureSet,
    matcher: RuleMatcher,
    debug_keys: Vec<String>,
}

impl<'a> OptionsEvaluator<'a> {
    pub fn new(uplid: &'a PlatformId, ufid: &'a FeatureSet, defaults: AxisDefaults) -> Self {
        Self {
            uplid,
            ufid,
            matcher: RuleMatcher::new(defaults),
            debug_keys: Vec::new(),
        }
    }

    /// Log every rule application for these keys.
    pub fn with_debug_keys(mut self, keys: Vec<String>) -> Self {
        self.debug_keys = keys;
        self
    }

    fn traced(&self, key: &str) -> bool {
        self.debug_keys.iter().any(|k| k == key)
    }

    /// Apply `rules` in order and expand references.
    pub fn evaluate(&self, rules: &RuleSet) -> Result<Options> {
        self.uplid.ensure_concrete()?;

        let mut values: BTreeMap<String, String> = BTreeMap::new();
        for rule in rules {
            if !self.matcher.matches(&rule.pattern, self.uplid)
                || !self.ufid.contains_all(&rule.features)
            {
                continue;
            }
            let entry = values.entry(rule.key.clone()).or_default();
            match rule.op {
                RuleOp::Assign => *entry = rule.value.clone(),
                RuleOp::Append => {
                    if !entry.is_empty() {
                        entry.push(' ');
                    }
                    entry.push_str(&rule.value);
                }
            }
            if self.traced(&rule.key) {
                info!(
                    key = %rule.key,
                    pattern = %rule.pattern,
                    op = ?rule.op,
                    value = %entry,
                    "rule applied"
                );
            }
        }

        let values = expand(values)?;
        for key in &self.debug_keys {
            info!(%key, value = ?values.get(key), "evaluated");
        }
        debug!(uplid = %self.uplid, ufid = %self.ufid, options = values.len(), "evaluated options");

        Ok(Options {
            uplid: self.uplid.to_string(),
            values,
        })
    }
}

/// Replace `$(KEY)` references until no value changes.
///
/// A pass that changes nothing but leaves a reference behind means a value
/// refers to itself, directly or through a chain.
fn expand(mut values: BTreeMap<String, String>) -> Result<BTreeMap<String, String>> {
    let reference = &*REFERENCE;
    for _ in 0..MAX_EXPANSION_PASSES {
        let mut changed = false;
        let snapshot = values.clone();
        for value in values.values_mut() {
            if !reference.is_match(value.as_str()) {
                continue;
            }
            let expanded = reference
                .replace_all(value.as_str(), |caps: &Captures<'_>| {
                    snapshot.get(&caps[1]).cloned().unwrap_or_default()
                })
                .into_owned();
            if expanded != *value {
                *value = expanded;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    match values.iter().find(|(_, v)| reference.is_match(v.as_str())) {
        Some((key, _)) => Err(RulesError::RecursiveExpansion { key: key.clone() }),
        None => Ok(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wafenv_core::{Rule, WafEnvError};

    fn pattern(s: &str) -> PlatformId {
        PlatformId::parse_pattern(s).unwrap()
    }

    fn uplid() -> PlatformId {
        PlatformId::parse("unix-linux-x86_64-2.6.18-gcc-4.7.2").unwrap()
    }

    fn ufid() -> FeatureSet {
        FeatureSet::parse("dbg_mt_exc").unwrap()
    }

    #[test]
    fn later_rules_override_earlier() {
        let rules = RuleSet::new(vec![
            Rule::assign(pattern("*"), "CXX", "/usr/bin/g++"),
            Rule::assign(pattern("unix-linux-*-*-gcc-4.7.2"), "CXX", "/opt/gcc-4.7.2/bin/g++"),
            Rule::assign(pattern("unix-linux-*-*-gcc-4.9.1"), "CXX", "/opt/gcc-4.9.1/bin/g++"),
        ]);
        let (uplid, ufid) = (uplid(), ufid());
        let options = OptionsEvaluator::new(&uplid, &ufid, AxisDefaults::default())
            .evaluate(&rules)
            .unwrap();
        assert_eq!(options.get("CXX"), Some("/opt/gcc-4.7.2/bin/g++"));
    }

    #[test]
    fn append_and_feature_conditions() {
        let rules = RuleSet::new(vec![
            Rule::assign(pattern("*"), "CXXFLAGS", "-m64"),
            Rule::assign(pattern("*"), "CXXFLAGS", "-g")
                .with_op(RuleOp::Append)
                .with_features(FeatureSet::parse("dbg").unwrap()),
            Rule::assign(pattern("*"), "CXXFLAGS", "-O2")
                .with_op(RuleOp::Append)
                .with_features(FeatureSet::parse("opt").unwrap()),
            Rule::assign(pattern("*"), "LDFLAGS", "-pthread").with_op(RuleOp::Append),
        ]);
        let (uplid, ufid) = (uplid(), ufid());
        let options = OptionsEvaluator::new(&uplid, &ufid, AxisDefaults::default())
            .evaluate(&rules)
            .unwrap();
        assert_eq!(options.get("CXXFLAGS"), Some("-m64 -g"));
        assert_eq!(options.get("LDFLAGS"), Some("-pthread"));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn default_marker_uses_axis_defaults() {
        let rules = RuleSet::new(vec![Rule::assign(pattern("*-*-*-*-def-def"), "IS_DEFAULT", "1")]);
        let (uplid, ufid) = (uplid(), ufid());

        let options = OptionsEvaluator::new(&uplid, &ufid, AxisDefaults::compiler("gcc", "4.7.2"))
            .evaluate(&rules)
            .unwrap();
        assert_eq!(options.get("IS_DEFAULT"), Some("1"));

        let options = OptionsEvaluator::new(&uplid, &ufid, AxisDefaults::default())
            .evaluate(&rules)
            .unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn references_are_expanded() {
        let rules = RuleSet::new(vec![
            Rule::assign(pattern("*"), "CXX", "$(COMPILER_DIR)/bin/g++"),
            Rule::assign(pattern("*"), "COMPILER_DIR", "$(TOOLS_ROOT)/gcc-4.7.2"),
            Rule::assign(pattern("*"), "TOOLS_ROOT", "/opt"),
            Rule::assign(pattern("*"), "EMPTY", "[$(UNDEFINED)]"),
        ]);
        let (uplid, ufid) = (uplid(), ufid());
        let options = OptionsEvaluator::new(&uplid, &ufid, AxisDefaults::default())
            .evaluate(&rules)
            .unwrap();
        assert_eq!(options.get("CXX"), Some("/opt/gcc-4.7.2/bin/g++"));
        assert_eq!(options.get("EMPTY"), Some("[]"));
    }

    #[test]
    fn cyclic_references_fail() {
        let rules = RuleSet::new(vec![
            Rule::assign(pattern("*"), "A", "x$(B)"),
            Rule::assign(pattern("*"), "B", "y$(A)"),
        ]);
        let (uplid, ufid) = (uplid(), ufid());
        let result = OptionsEvaluator::new(&uplid, &ufid, AxisDefaults::default()).evaluate(&rules);
        assert!(matches!(result, Err(RulesError::RecursiveExpansion { .. })));
    }

    #[test]
    fn self_reference_fails() {
        let rules = RuleSet::new(vec![
            Rule::assign(pattern("*"), "B", "/opt"),
            Rule::assign(pattern("*"), "A", "$(A)"),
        ]);
        let (uplid, ufid) = (uplid(), ufid());
        let result = OptionsEvaluator::new(&uplid, &ufid, AxisDefaults::default()).evaluate(&rules);
        match result {
            Err(RulesError::RecursiveExpansion { key }) => assert_eq!(key, "A"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn wildcard_uplid_is_rejected() {
        let probe = PlatformId::parse("unix-linux-x86_64-2.6.18-*-*").unwrap();
        let ufid = ufid();
        let result = OptionsEvaluator::new(&probe, &ufid, AxisDefaults::default())
            .evaluate(&RuleSet::default());
        assert!(matches!(
            result,
            Err(RulesError::Core(WafEnvError::NotConcrete { .. }))
        ));
    }

    #[test]
    fn require_reports_missing_key() {
        let (uplid, ufid) = (uplid(), ufid());
        let options = OptionsEvaluator::new(&uplid, &ufid, AxisDefaults::default())
            .with_debug_keys(vec!["CXX".into()])
            .evaluate(&RuleSet::default())
            .unwrap();
        assert!(matches!(
            options.require("CXX"),
            Err(RulesError::MissingKey { .. })
        ));
    }
}
