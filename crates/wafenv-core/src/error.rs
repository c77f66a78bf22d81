//! Error types for identifier parsing and build-environment resolution.

/// Errors that can occur while resolving a build environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WafEnvError {
    /// Malformed platform identifier string.
    #[error("invalid platform id '{input}': {detail}")]
    Format {
        /// The string that failed to parse.
        input: String,
        /// Description of the problem.
        detail: String,
    },

    /// Feature flag outside the known vocabulary.
    #[error("\"{ufid}\" is an invalid ufid: unknown flag '{flag}'. Valid flags are: {}", valid.join(","))]
    InvalidFlag {
        /// The full feature string as given.
        ufid: String,
        /// The offending token.
        flag: String,
        /// Every recognized flag.
        valid: Vec<String>,
    },

    /// Requested compiler is not declared by any rule for this host.
    #[error("{requested} is not valid, choose from the following: {}", valid.join(", "))]
    UnknownCompiler {
        /// The compiler string as requested.
        requested: String,
        /// All concrete compilers, sorted.
        valid: Vec<String>,
    },

    /// The rule set does not declare a default compiler for this host.
    #[error("no default compiler is configured for {host}")]
    NoDefaultCompiler {
        /// The host probe identifier.
        host: String,
    },

    /// Host operating system is not recognized.
    #[error("unsupported platform {os}")]
    UnsupportedHost {
        /// The unversioned OS name.
        os: String,
    },

    /// A host probe command failed.
    #[error("failed to probe host with '{command}': {detail}")]
    HostProbe {
        /// The command line that was run.
        command: String,
        /// Description of the failure.
        detail: String,
    },

    /// A fully concrete platform id was required.
    #[error("platform id '{uplid}' contains wildcard fields")]
    NotConcrete {
        /// The offending identifier.
        uplid: String,
    },
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, WafEnvError>;
