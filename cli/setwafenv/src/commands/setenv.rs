//! `setwafenv` — resolve and print the `export` statements.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use wafenv_core::{
    recover_install_root, AxisDefaults, BuildId, CompilerResolver, FeatureSet, HostInfo,
    PlatformId, RuleSet, WafEnvironment, DEFAULT_UFID,
};
use wafenv_rules::OptionsEvaluator;

/// Rule key holding the compiler invocation.
pub const CXX_KEY: &str = "CXX";

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// `type-version`; the host default when absent.
    pub compiler: Option<String>,
    /// Feature string; [`DEFAULT_UFID`] when absent.
    pub ufid: Option<String>,
    /// Explicit install root.
    pub install_dir: Option<PathBuf>,
    /// Keys whose evaluation is logged.
    pub debug_keys: Vec<String>,
    /// Full uplid that bypasses host probing and compiler validation.
    pub force_uplid: Option<String>,
    /// The currently exported `PREFIX`, consulted without `install_dir`.
    pub previous_prefix: Option<String>,
}

/// Parse the requested feature string, or the default one.
pub fn requested_ufid(request: &Request) -> Result<FeatureSet> {
    let ufid = request.ufid.as_deref().unwrap_or(DEFAULT_UFID);
    Ok(FeatureSet::parse(ufid)?)
}

/// Resolve the build configuration and render its `export` statements.
///
/// `probe_host` is only called when no uplid is forced.
pub fn render<H>(request: &Request, rules: &RuleSet, probe_host: H) -> Result<String>
where
    H: FnOnce() -> wafenv_core::Result<HostInfo>,
{
    let ufid = requested_ufid(request)?;

    let (uplid, defaults) = match &request.force_uplid {
        Some(forced) => {
            let uplid = PlatformId::parse(forced).context("parsing --force-uplid")?;
            (uplid, AxisDefaults::default())
        }
        None => {
            let host = probe_host()?;
            let probe = host.probe_id()?;
            let catalog = CompilerResolver::new(rules).catalog(&probe);
            let choice = catalog.resolve(request.compiler.as_deref())?;
            info!("using compiler: {choice}");
            let defaults = catalog
                .default_compiler()
                .map(|c| c.axis_defaults())
                .unwrap_or_default();
            (choice.apply(&probe)?, defaults)
        }
    };
    info!("using ufid: {ufid}");

    let options = OptionsEvaluator::new(&uplid, &ufid, defaults)
        .with_debug_keys(request.debug_keys.clone())
        .evaluate(rules)?;
    let cxx = options.require(CXX_KEY)?;

    let install_root = match &request.install_dir {
        Some(dir) => Some(dir.clone()),
        None => recover_install_root(request.previous_prefix.as_deref(), &uplid),
    };
    if let Some(root) = &install_root {
        info!("using install directory: {}", root.display());
    }

    let id = BuildId::new(uplid, ufid);
    let env = WafEnvironment::assemble(cxx, &id, install_root.as_deref())
        .ok_or_else(|| anyhow!("{CXX_KEY} value '{cxx}' names no executable"))?;
    Ok(env.to_shell())
}
