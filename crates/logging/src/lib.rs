#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` bridges the command line's repeated `-v`/`-q` flags to a
//! [`tracing`] subscriber. [`Verbosity`] collects the flag count; [`init`]
//! installs a formatting layer at the corresponding level, falling back to
//! `RUST_LOG` when the caller asks for the default verbosity.
//!
//! # Design
//!
//! This crate carries no state beyond what `init` installs globally in the
//! `tracing` dispatcher; it is not a general logging facade, only the
//! verbosity-to-filter mapping this workspace's binaries need.

use std::sync::Once;

static INIT: Once = Once::new();

/// A verbosity level derived from the command line's repeated `-v` flag and
/// `-q`/`--quiet`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// `-q`/`--quiet`: only warnings and errors.
    Quiet,
    /// No verbosity flags: informational messages and above.
    #[default]
    Normal,
    /// One `-v`: debug messages and above.
    Verbose,
    /// Two or more `-v`: trace messages and above.
    Trace,
}

impl Verbosity {
    /// Derives a verbosity level from a `-v` occurrence count and whether
    /// `-q`/`--quiet` was given. `quiet` takes precedence over any `-v`
    /// count.
    #[must_use]
    pub fn from_flags(verbose_count: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose_count {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// The `RUST_LOG`-style filter directive for this level.
    #[must_use]
    pub fn as_filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Verbose => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Installs a [`tracing_subscriber`] formatting layer at `verbosity`,
/// honoring `RUST_LOG` if set. Safe to call more than once: only the first
/// call takes effect, matching `tracing`'s own global-subscriber contract.
#[cfg(feature = "tracing")]
pub fn init(verbosity: Verbosity) {
    use tracing_subscriber::EnvFilter;

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(verbosity.as_filter_directive()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    });
}

/// No-op installation used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
pub fn init(_verbosity: Verbosity) {
    INIT.call_once(|| {});
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_overrides_verbose_count() {
        assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
    }

    #[test]
    fn verbosity_escalates_with_flag_count() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(2, false), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(5, false), Verbosity::Trace);
    }

    #[test]
    fn filter_directives_escalate_in_order() {
        assert_eq!(Verbosity::Quiet.as_filter_directive(), "warn");
        assert_eq!(Verbosity::Normal.as_filter_directive(), "info");
        assert_eq!(Verbosity::Verbose.as_filter_directive(), "debug");
        assert_eq!(Verbosity::Trace.as_filter_directive(), "trace");
    }
}
