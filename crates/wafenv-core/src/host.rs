//! Host operating system and CPU probing.

use std::process::Command;

use tracing::debug;

use crate::error::{Result, WafEnvError};
use crate::uplid::{Field, PlatformId};

/// How the CPU architecture is read on a given OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuProbe {
    /// `uname -m`
    Machine,
    /// `uname -p`
    Processor,
}

/// OS and CPU facts about the current host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os_family: String,
    pub os_name: String,
    pub os_version: String,
    pub cpu_arch: String,
}

impl HostInfo {
    /// Probe the running host through `uname`.
    pub fn probe() -> Result<Self> {
        let os_name = uname("-s")?.to_lowercase();
        if os_name.starts_with("windows") || os_name.starts_with("cygwin") {
            return Err(WafEnvError::UnsupportedHost { os: os_name });
        }
        let cpu_arch = match cpu_probe_for(&os_name)? {
            CpuProbe::Machine => uname("-m")?,
            CpuProbe::Processor => uname("-p")?,
        };
        let release = uname("-r")?;
        let version = uname("-v")?;
        let host = Self {
            os_family: os_family_for(&os_name).to_string(),
            os_version: normalize_os_version(&os_name, &release, &version),
            os_name,
            cpu_arch,
        };
        debug!(?host, "probed host");
        Ok(host)
    }

    /// A platform id for this host with the given compiler fields.
    pub fn platform_id(&self, compiler_type: Field, compiler_version: Field) -> Result<PlatformId> {
        Ok(PlatformId::new(
            Field::exact(&self.os_family)?,
            Field::exact(&self.os_name)?,
            Field::exact(&self.cpu_arch)?,
            Field::exact(&self.os_version)?,
            compiler_type,
            compiler_version,
        ))
    }

    /// A platform id for this host with `*` compiler fields.
    pub fn probe_id(&self) -> Result<PlatformId> {
        self.platform_id(Field::Any, Field::Any)
    }
}

/// The OS family for an unversioned OS name.
pub fn os_family_for(os_name: &str) -> &'static str {
    if os_name.starts_with("windows") {
        "windows"
    } else {
        "unix"
    }
}

/// Which `uname` flag reports the CPU on `os_name`.
pub fn cpu_probe_for(os_name: &str) -> Result<CpuProbe> {
    match os_name {
        "linux" | "darwin" => Ok(CpuProbe::Machine),
        "aix" | "sunos" => Ok(CpuProbe::Processor),
        other => Err(WafEnvError::UnsupportedHost { os: other.into() }),
    }
}

/// The OS version field for a host, from `uname -r` and `uname -v`.
///
/// Linux and Darwin keep the leading dotted number of the release
/// (`2.6.18-308.el5` becomes `2.6.18`); AIX combines version and release
/// (`7.1`); other systems use the release as is.
pub fn normalize_os_version(os_name: &str, release: &str, version: &str) -> String {
    match os_name {
        "linux" | "darwin" => {
            let end = release
                .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                .unwrap_or(release.len());
            release[..end].trim_end_matches('.').to_string()
        }
        "aix" => format!("{}.{}", version.trim(), release.trim()),
        _ => release.trim().to_string(),
    }
}

fn uname(flag: &str) -> Result<String> {
    let command = format!("uname {flag}");
    let output = Command::new("uname")
        .arg(flag)
        .output()
        .map_err(|e| WafEnvError::HostProbe {
            command: command.clone(),
            detail: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(WafEnvError::HostProbe {
            command,
            detail: format!("exited with {}", output.status),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
