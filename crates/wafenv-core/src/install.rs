//! Recovery of a previously used installation root.
//!
//! An exported prefix has the form `<root>/<uplid>-<ufid>`. Given the current
//! platform, the root can be recovered from that prefix so that repeated runs
//! without an explicit install directory keep installing to the same place.

use std::path::PathBuf;

use regex::Regex;
use tracing::debug;

use crate::uplid::PlatformId;

/// Recover the install root encoded in `prefix` for `uplid`.
///
/// Only the OS and CPU fields of `uplid` are considered, so builds with any
/// compiler or feature set share one root. The returned root keeps its
/// trailing separator. This is a string operation only; the path need not
/// exist.
pub fn recover_install_root(prefix: Option<&str>, uplid: &PlatformId) -> Option<PathBuf> {
    let prefix = prefix?;
    let pattern = format!(r"^(.*/){}(?:-[\w.]*)*", regex::escape(&uplid.os_prefix()));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            debug!(%pattern, error = %e, "install root pattern did not compile");
            return None;
        }
    };
    let root = re.captures(prefix)?.get(1)?.as_str();
    debug!(%prefix, %root, "recovered install root");
    Some(PathBuf::from(root))
}
