//! Path composition: building a protocol-qualified path from a bare
//! filesystem path and an optional remote prefix.

use std::path::{Path, PathBuf};

use crate::classify::{available_local_path, classify, local_path_of, Protocol};
use crate::error::ProtocolError;

/// Composes a protocol-qualified path from a bare filesystem path and an
/// optional remote prefix.
///
/// - `remote` is `Some("user@host")` for an SSH remote or
///   `Some("root://host")` for an XRootD remote; its trailing `/`, if any,
///   is stripped.
/// - When `remote` is provided the bare path is always qualified against
///   it, regardless of `bare_flag`.
/// - When `remote` is `None` and `bare_flag` is `false`, `bare_path` must
///   resolve via [`available_local_path`] or this returns
///   [`ProtocolError::NonLocalPath`].
/// - When `remote` is `None` and `bare_flag` is `true`, `bare_path` is
///   returned unchanged: a "bare" declaration of where a file should live,
///   not yet backed by a readable file.
pub fn compose_path(
    bare_path: &str,
    remote: Option<&str>,
    bare_flag: bool,
) -> Result<String, ProtocolError> {
    match remote {
        Some(prefix) => {
            let prefix = prefix.trim_end_matches('/');
            let qualified_path = if bare_path.starts_with('/') {
                bare_path.to_string()
            } else {
                format!("/{bare_path}")
            };
            match classify(prefix) {
                Protocol::Local { .. } if prefix.starts_with("root://") => {
                    // `root://host` alone doesn't match the XRootD regex
                    // (it requires a path component); reclassify manually.
                    Ok(format!("{prefix}/{qualified_path}"))
                }
                Protocol::Local { .. } => Ok(format!("{prefix}:{qualified_path}")),
                Protocol::Ssh { .. } => Ok(format!("{prefix}:{qualified_path}")),
                Protocol::XRootD { .. } => Ok(format!("{prefix}/{qualified_path}")),
            }
        }
        None if bare_flag => Ok(bare_path.to_string()),
        None => {
            if available_local_path(bare_path).is_some() {
                Ok(bare_path.to_string())
            } else {
                Err(ProtocolError::NonLocalPath(bare_path.to_string()))
            }
        }
    }
}

/// Returns `path`, stripped of any protocol prefix, as a filesystem path.
#[must_use]
pub fn local_path(path: &str) -> PathBuf {
    local_path_of(&classify(path)).to_path_buf()
}

pub(crate) fn as_path(protocol: &Protocol) -> &Path {
    local_path_of(protocol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_ssh_bare_remote() {
        let path = compose_path("files/file1.txt", Some("user@h"), true).expect("compose");
        assert_eq!(path, "user@h:/files/file1.txt");
    }

    #[test]
    fn composes_xrootd_remote_with_doubled_slash() {
        let path = compose_path("/abs/path", Some("root://host"), true).expect("compose");
        assert_eq!(path, "root://host//abs/path");
    }

    #[test]
    fn strips_trailing_slash_on_remote() {
        let path = compose_path("f.txt", Some("user@h/"), true).expect("compose");
        assert_eq!(path, "user@h:/f.txt");
    }

    #[test]
    fn no_remote_non_bare_requires_local_availability() {
        let err = compose_path("/definitely/missing/path", None, false).unwrap_err();
        assert!(matches!(err, ProtocolError::NonLocalPath(_)));
    }

    #[test]
    fn no_remote_bare_is_accepted_even_if_missing() {
        let path = compose_path("/definitely/missing/path", None, true).expect("compose");
        assert_eq!(path, "/definitely/missing/path");
    }

    #[test]
    fn local_path_strips_ssh_prefix() {
        assert_eq!(local_path("user@h:/tmp/a.txt"), PathBuf::from("/tmp/a.txt"));
    }

    #[test]
    fn local_path_strips_xrootd_prefix() {
        assert_eq!(
            local_path("root://h//tmp/a.txt"),
            PathBuf::from("/tmp/a.txt")
        );
    }
}
