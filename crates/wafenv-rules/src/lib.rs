//! Rule database loading, discovery, and option evaluation for waf build
//! environments.
//!
//! Rule databases are TOML files of `[[rule]]` entries. Each entry attaches a
//! value to a key for the platforms matching its uplid pattern; evaluation
//! applies the matching entries in file order.

pub mod discover;
pub mod error;
pub mod evaluator;
pub mod parse;

pub use discover::{find_in_path, locate_rules, RULES_FILE_NAME};
pub use error::{Result, RulesError};
pub use evaluator::{Options, OptionsEvaluator};
pub use parse::{load_rules_toml, parse_rules_toml};
