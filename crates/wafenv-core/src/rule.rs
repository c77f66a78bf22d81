//! Conditional configuration rules.

use crate::ufid::FeatureSet;
use crate::uplid::PlatformId;

/// How a matching rule combines its value with the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleOp {
    /// Replace the current value.
    #[default]
    Assign,
    /// Append to the current value, separated by a space.
    Append,
}

/// One conditional assignment: when `pattern` matches and every flag in
/// `features` is requested, apply `value` to `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Platforms the rule applies to.
    pub pattern: PlatformId,
    /// Flags that must all be requested; empty means any build.
    pub features: FeatureSet,
    /// How `value` combines with the current value of `key`.
    pub op: RuleOp,
    /// Option name, e.g. `CXX`.
    pub key: String,
    /// Raw value; may hold `$(KEY)` references.
    pub value: String,
}

impl Rule {
    /// An unconditional-feature assignment rule.
    pub fn assign(pattern: PlatformId, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            pattern,
            features: FeatureSet::empty(),
            op: RuleOp::Assign,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Restrict this rule to builds that request all of `features`.
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    /// Use `op` instead of assignment.
    pub fn with_op(mut self, op: RuleOp) -> Self {
        self.op = op;
        self
    }
}

/// An ordered, read-only sequence of rules. Order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Wrap rules in the order they apply.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rules in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
