//! Assembly of the waf environment variables and their shell statements.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::ufid::FeatureSet;
use crate::uplid::PlatformId;

/// Leading token of a compiler invocation that sets a library path.
pub const LIBPATH_MARKER: &str = "LIBPATH";

/// Every variable this tool may export, in output order.
pub const VARIABLES: [&str; 7] = [
    "CXX",
    "BDE_WAF_UFID",
    "BDE_WAF_UPLID",
    "BDE_WAF_BUILD_DIR",
    "WAFLOCK",
    "PREFIX",
    "PKG_CONFIG_PATH",
];

/// The identity of one build configuration: `<uplid>-<ufid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildId {
    pub uplid: PlatformId,
    pub ufid: FeatureSet,
}

impl BuildId {
    pub fn new(uplid: PlatformId, ufid: FeatureSet) -> Self {
        Self { uplid, ufid }
    }

    /// Name of the waf lock file for this configuration.
    pub fn lock_file(&self) -> String {
        format!(".lock-waf-{self}")
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.uplid, self.ufid)
    }
}

/// The executable in a compiler invocation string.
///
/// Skips a leading library-path token such as `LIBPATH=/opt/lib`.
pub fn compiler_executable(invocation: &str) -> Option<&str> {
    let mut tokens = invocation.split_whitespace();
    let first = tokens.next()?;
    if first.starts_with(LIBPATH_MARKER) {
        tokens.next()
    } else {
        Some(first)
    }
}

/// The resolved set of variables for one build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WafEnvironment {
    pub cxx: String,
    pub ufid: String,
    pub uplid: String,
    pub build_dir: String,
    pub waflock: String,
    /// Install prefix, present only when an install root is known.
    pub prefix: Option<PathBuf>,
}

impl WafEnvironment {
    /// Assemble the variables from a compiler invocation, the build identity
    /// and an optional install root.
    ///
    /// Returns `None` if the compiler invocation names no executable.
    pub fn assemble(cxx_invocation: &str, id: &BuildId, install_root: Option<&Path>) -> Option<Self> {
        let cxx = compiler_executable(cxx_invocation)?.to_string();
        let build_dir = id.to_string();
        Some(Self {
            cxx,
            ufid: id.ufid.to_string(),
            uplid: id.uplid.to_string(),
            waflock: id.lock_file(),
            prefix: install_root.map(|root| root.join(&build_dir)),
            build_dir,
        })
    }

    /// `(name, value)` pairs in output order.
    pub fn exports(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            (VARIABLES[0], self.cxx.clone()),
            (VARIABLES[1], self.ufid.clone()),
            (VARIABLES[2], self.uplid.clone()),
            (VARIABLES[3], self.build_dir.clone()),
            (VARIABLES[4], self.waflock.clone()),
        ];
        if let Some(prefix) = &self.prefix {
            let prefix = prefix.display().to_string();
            vars.push((VARIABLES[5], prefix.clone()));
            vars.push((VARIABLES[6], format!("{prefix}/lib/pkgconfig")));
        }
        vars
    }

    /// Bourne shell `export` statements, one per line.
    pub fn to_shell(&self) -> String {
        self.exports()
            .into_iter()
            .map(|(name, value)| format!("export {name}=\"{}\"\n", shell_escape(&value)))
            .collect()
    }
}

/// Bourne shell `unset` statements for every variable, one per line.
pub fn unset_statements() -> String {
    VARIABLES.iter().map(|name| format!("unset {name}\n")).collect()
}

/// Escape a value for use inside double quotes.
fn shell_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_id() -> BuildId {
        BuildId::new(
            PlatformId::parse("unix-linux-x86_64-2.6.18-gcc-4.7.2").unwrap(),
            FeatureSet::parse("dbg_mt_exc").unwrap(),
        )
    }

    #[test]
    fn build_id_and_lock_file() {
        let id = build_id();
        assert_eq!(id.to_string(), "unix-linux-x86_64-2.6.18-gcc-4.7.2-dbg_mt_exc");
        assert_eq!(
            id.lock_file(),
            ".lock-waf-unix-linux-x86_64-2.6.18-gcc-4.7.2-dbg_mt_exc"
        );
    }

    #[test]
    fn executable_skips_libpath_token() {
        assert_eq!(compiler_executable("/opt/bin/g++"), Some("/opt/bin/g++"));
        assert_eq!(
            compiler_executable("LIBPATH=/opt/gcc/lib64 /opt/gcc/bin/g++ -m64"),
            Some("/opt/gcc/bin/g++")
        );
        assert_eq!(compiler_executable("  /usr/bin/clang++   -std=c++11"), Some("/usr/bin/clang++"));
        assert_eq!(compiler_executable(""), None);
        assert_eq!(compiler_executable("LIBPATH=/x"), None);
    }

    #[test]
    fn shell_without_prefix() {
        let env = WafEnvironment::assemble("/opt/gcc-4.7.2/bin/g++", &build_id(), None).unwrap();
        assert_eq!(
            env.to_shell(),
            "export CXX=\"/opt/gcc-4.7.2/bin/g++\"\n\
             export BDE_WAF_UFID=\"dbg_mt_exc\"\n\
             export BDE_WAF_UPLID=\"unix-linux-x86_64-2.6.18-gcc-4.7.2\"\n\
             export BDE_WAF_BUILD_DIR=\"unix-linux-x86_64-2.6.18-gcc-4.7.2-dbg_mt_exc\"\n\
             export WAFLOCK=\".lock-waf-unix-linux-x86_64-2.6.18-gcc-4.7.2-dbg_mt_exc\"\n"
        );
    }

    #[test]
    fn shell_with_prefix() {
        let env = WafEnvironment::assemble(
            "/opt/gcc-4.7.2/bin/g++",
            &build_id(),
            Some(Path::new("/home/u/bde-install/")),
        )
        .unwrap();
        let exports = env.exports();
        assert_eq!(exports.len(), 7);
        assert_eq!(
            exports[5],
            (
                "PREFIX",
                "/home/u/bde-install/unix-linux-x86_64-2.6.18-gcc-4.7.2-dbg_mt_exc".to_string()
            )
        );
        assert_eq!(
            exports[6].1,
            "/home/u/bde-install/unix-linux-x86_64-2.6.18-gcc-4.7.2-dbg_mt_exc/lib/pkgconfig"
        );
    }

    #[test]
    fn values_are_escaped() {
        assert_eq!(shell_escape(r#"a"b$c`d\e"#), r#"a\"b\$c\`d\\e"#);
    }

    #[test]
    fn unset_lists_all_variables_in_order() {
        assert_eq!(
            unset_statements(),
            "unset CXX\nunset BDE_WAF_UFID\nunset BDE_WAF_UPLID\nunset BDE_WAF_BUILD_DIR\n\
             unset WAFLOCK\nunset PREFIX\nunset PKG_CONFIG_PATH\n"
        );
    }
}
