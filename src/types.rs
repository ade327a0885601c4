use std::fmt;

/// Where a command is executed.
///
/// - `Host`: directly on the machine running the installer.
/// - `Target`: inside the system being installed (via `chroot` when the
///   target root is not `/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunLocation {
    Host,
    #[default]
    Target,
}

impl fmt::Display for RunLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunLocation::Host => f.write_str("host"),
            RunLocation::Target => f.write_str("target"),
        }
    }
}

/// Lifecycle stages a script job passes through during one execution.
///
/// Stages are reached strictly in declaration order. A failure at any stage
/// jumps straight to `Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Unvalidated,
    Validated,
    RuntimeAcquired,
    ApiInstalled,
    PreScriptRun,
    ScriptLoaded,
    EntryInvoked,
    Finalized,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Unvalidated => "unvalidated",
            Stage::Validated => "validated",
            Stage::RuntimeAcquired => "runtime-acquired",
            Stage::ApiInstalled => "api-installed",
            Stage::PreScriptRun => "pre-script-run",
            Stage::ScriptLoaded => "script-loaded",
            Stage::EntryInvoked => "entry-invoked",
            Stage::Finalized => "finalized",
        };
        f.write_str(s)
    }
}
