//! Path classification and the `available_local_path` contract.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

fn ssh_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9._-]+@[A-Za-z0-9._-]+):(.+)$").expect("valid ssh regex")
    })
}

fn xrootd_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^root://([A-Za-z0-9._-]+)/(.*)$").expect("valid xrootd regex"))
}

/// The classification of a protocol-qualified path.
///
/// Exactly one of [`Protocol::is_local`], [`Protocol::is_ssh`],
/// [`Protocol::is_xrootd`] holds for any path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Protocol {
    /// A plain filesystem path, not matching the SSH or XRootD grammar.
    Local {
        /// The path itself.
        path: String,
    },
    /// An SSH-qualified path of the form `user@host:/absolute/path`.
    Ssh {
        /// The `user@host` portion.
        user_host: String,
        /// The absolute path on the remote host.
        path: String,
    },
    /// An XRootD-qualified path of the form `root://host//absolute/path`.
    XRootD {
        /// The hostname.
        host: String,
        /// The absolute path on the remote host.
        path: String,
    },
}

impl Protocol {
    /// Returns `true` if this is a plain local path.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }

    /// Returns `true` if this is an SSH-qualified path.
    #[must_use]
    pub const fn is_ssh(&self) -> bool {
        matches!(self, Self::Ssh { .. })
    }

    /// Returns `true` if this is an XRootD-qualified path.
    #[must_use]
    pub const fn is_xrootd(&self) -> bool {
        matches!(self, Self::XRootD { .. })
    }

    /// Returns `true` if this path names an SSH or XRootD endpoint.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        !self.is_local()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { path } => write!(f, "{path}"),
            Self::Ssh { user_host, path } => write!(f, "{user_host}:{path}"),
            Self::XRootD { host, path } => write!(f, "root://{host}/{path}"),
        }
    }
}

/// Classifies a path string as [`Protocol::Ssh`], [`Protocol::XRootD`], or
/// [`Protocol::Local`].
///
/// Classification order matters: SSH is checked before XRootD since the
/// two grammars cannot both match the same string.
#[must_use]
pub fn classify(path: &str) -> Protocol {
    if let Some(caps) = ssh_re().captures(path) {
        return Protocol::Ssh {
            user_host: caps[1].to_string(),
            path: caps[2].to_string(),
        };
    }
    if let Some(caps) = xrootd_re().captures(path) {
        return Protocol::XRootD {
            host: caps[1].to_string(),
            path: caps[2].to_string(),
        };
    }
    Protocol::Local {
        path: path.to_string(),
    }
}

fn current_hostname() -> Option<String> {
    hostname::get().ok()?.into_string().ok()
}

/// Returns the local filesystem path at which `path` can be read directly
/// on this host, or `None` if it cannot.
///
/// - A local path resolves when the file is readable.
/// - An SSH path resolves only when the host component matches this
///   host's hostname.
/// - An XRootD path never resolves; it is never considered locally
///   addressable.
#[must_use]
pub fn available_local_path(path: &str) -> Option<PathBuf> {
    match classify(path) {
        Protocol::Local { path } => {
            let candidate = PathBuf::from(&path);
            std::fs::metadata(&candidate).ok().map(|_| candidate)
        }
        Protocol::Ssh { user_host, path } => {
            let host = user_host.rsplit('@').next()?;
            let this_host = current_hostname()?;
            if host == this_host {
                Some(PathBuf::from(path))
            } else {
                None
            }
        }
        Protocol::XRootD { .. } => None,
    }
}

/// Returns the path, stripped of any protocol prefix, suitable for direct
/// filesystem access.
#[must_use]
pub fn local_path_of(protocol: &Protocol) -> &Path {
    match protocol {
        Protocol::Local { path } | Protocol::Ssh { path, .. } | Protocol::XRootD { path, .. } => {
            Path::new(path.as_str())
        }
    }
}
