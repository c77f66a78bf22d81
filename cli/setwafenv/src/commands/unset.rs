//! `setwafenv unset` — clear every variable this tool exports.

/// Render the `unset` statements.
pub fn render() -> String {
    wafenv_core::unset_statements()
}
