//! Platform and feature identifiers, rule matching, and compiler resolution
//! for configuring waf build environments.
//!
//! A build configuration is identified by two values:
//! - **uplid** ([`PlatformId`]): OS family, OS name, CPU, OS version,
//!   compiler type and compiler version, e.g. `unix-linux-x86_64-2.6.18-gcc-4.7.2`
//! - **ufid** ([`FeatureSet`]): build feature flags, e.g. `dbg_mt_exc`
//!
//! Configuration rules attach values to uplid patterns. This crate matches
//! those patterns, derives the host's default and available compilers from
//! them, recovers a previously used install root, and assembles the exported
//! environment.

pub mod compiler;
pub mod environment;
pub mod error;
pub mod host;
pub mod install;
pub mod matcher;
pub mod rule;
pub mod ufid;
pub mod uplid;

pub use compiler::{CompilerCatalog, CompilerChoice, CompilerResolver};
pub use environment::{compiler_executable, unset_statements, BuildId, WafEnvironment};
pub use error::{Result, WafEnvError};
pub use host::HostInfo;
pub use install::recover_install_root;
pub use matcher::{AxisDefaults, RuleMatcher};
pub use rule::{Rule, RuleOp, RuleSet};
pub use ufid::{FeatureSet, Flag, DEFAULT_UFID};
pub use uplid::{Field, PlatformId};
