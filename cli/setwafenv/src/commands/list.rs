//! `setwafenv list` — show the default and available compilers.

use wafenv_core::{CompilerResolver, PlatformId, RuleSet};

/// Render the default compiler and every available compiler for `probe`.
///
/// The compilers come from the rule database only; nothing checks that they
/// are installed.
pub fn render(rules: &RuleSet, probe: &PlatformId) -> String {
    let catalog = CompilerResolver::new(rules).catalog(probe);
    let default = catalog
        .default_compiler()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "(none)".to_string());

    let mut out = format!("default: {default}\n");
    for name in catalog.available() {
        out.push_str(&name);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wafenv_core::Rule;

    fn pattern(s: &str) -> PlatformId {
        PlatformId::parse_pattern(s).unwrap()
    }

    #[test]
    fn lists_default_then_sorted_compilers() {
        let rules = RuleSet::new(vec![
            Rule::assign(pattern("unix-linux-*-*-gcc-4.9.1"), "CXX", "g++-4.9"),
            Rule::assign(pattern("unix-linux"), "BDE_COMPILER_FLAG", "gcc"),
            Rule::assign(pattern("unix-linux"), "BDE_COMPILERVERSION_FLAG", "4.7.2"),
            Rule::assign(pattern("unix-linux-*-*-gcc-4.7.2"), "CXX", "g++-4.7"),
            Rule::assign(pattern("unix-linux-*-*-clang-3.4"), "CXX", "clang++"),
            Rule::assign(pattern("unix-linux-*-*-gcc-4.7.2"), "CXXFLAGS", "-m64"),
        ]);
        let probe = PlatformId::parse("unix-linux-x86_64-2.6.18-*-*").unwrap();
        assert_eq!(
            render(&rules, &probe),
            "default: gcc-4.7.2\nclang-3.4\ngcc-4.7.2\ngcc-4.9.1\n"
        );
    }

    #[test]
    fn no_default_is_reported() {
        let probe = PlatformId::parse("unix-linux-x86_64-2.6.18-*-*").unwrap();
        assert_eq!(render(&RuleSet::default(), &probe), "default: (none)\n");
    }
}
