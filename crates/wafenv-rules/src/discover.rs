//! Locating the rule database.
//!
//! The rule database ships next to the waf customizations: it is found in
//! the `lib` directory beside the first `waf` executable on `PATH`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, RulesError};

/// File name of the rule database inside waf's `lib` directory.
pub const RULES_FILE_NAME: &str = "wafenv-rules.toml";

/// Name of the executable used to locate the rule database.
pub const WAF_PROGRAM: &str = "waf";

/// Return the first directory in `path_var` that holds an executable `program`.
pub fn find_in_path(program: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| PathBuf::from(dir.to_string_lossy().trim_matches('"')))
        .find(|dir| is_executable(&dir.join(program)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Pick the rule file: `explicit` if given, otherwise the one beside `waf`
/// on `path_var`.
pub fn locate_rules(explicit: Option<&Path>, path_var: Option<&OsStr>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let not_found = || RulesError::WafNotFound {
        file: RULES_FILE_NAME.into(),
    };
    let waf_dir = path_var
        .and_then(|p| find_in_path(WAF_PROGRAM, p))
        .ok_or_else(not_found)?;
    let lib_dir = waf_dir.join("lib");
    if !lib_dir.is_dir() {
        debug!(dir = %lib_dir.display(), "waf lib directory missing");
        return Err(not_found());
    }
    let rules = lib_dir.join(RULES_FILE_NAME);
    debug!(path = %rules.display(), "located rule database");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_waf(dir: &Path) {
        let waf = dir.join(WAF_PROGRAM);
        std::fs::write(&waf, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&waf, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn explicit_path_wins() {
        let path = locate_rules(Some(Path::new("/etc/rules.toml")), None).unwrap();
        assert_eq!(path, Path::new("/etc/rules.toml"));
    }

    #[test]
    fn finds_rules_beside_waf() {
        let empty = tempfile::tempdir().unwrap();
        let tools = tempfile::tempdir().unwrap();
        fake_waf(tools.path());
        std::fs::create_dir_all(tools.path().join("lib")).unwrap();

        let path_var = std::env::join_paths([empty.path(), tools.path()]).unwrap();
        assert_eq!(
            find_in_path(WAF_PROGRAM, &path_var).unwrap(),
            tools.path().to_path_buf()
        );
        let rules = locate_rules(None, Some(&path_var)).unwrap();
        assert_eq!(rules, tools.path().join("lib").join(RULES_FILE_NAME));
    }

    #[test]
    fn waf_without_lib_dir_is_an_error() {
        let tools = tempfile::tempdir().unwrap();
        fake_waf(tools.path());
        let path_var = std::env::join_paths([tools.path()]).unwrap();
        assert!(matches!(
            locate_rules(None, Some(&path_var)),
            Err(RulesError::WafNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_waf_is_skipped() {
        let tools = tempfile::tempdir().unwrap();
        std::fs::write(tools.path().join(WAF_PROGRAM), "").unwrap();
        let path_var = std::env::join_paths([tools.path()]).unwrap();
        assert!(find_in_path(WAF_PROGRAM, &path_var).is_none());
    }

    #[test]
    fn no_path_is_an_error() {
        assert!(matches!(
            locate_rules(None, None),
            Err(RulesError::WafNotFound { .. })
        ));
    }
}
