//! Copy dispatch: choosing and invoking the right transfer tool for a pair
//! of protocol-qualified paths.

use std::process::Command;

use crate::classify::{classify, Protocol};
use crate::error::ProtocolError;
use crate::path::as_path;

/// Copies `src` to `dst`, dispatching to the appropriate tool for the pair
/// of endpoints:
///
/// - local→local: a byte copy via [`std::fs::copy`].
/// - any↔SSH (excluding SSH↔XRootD): a single `scp` invocation.
/// - any↔XRootD (excluding SSH↔XRootD): a single `xrdcp` invocation.
/// - SSH↔XRootD: staged through a local temporary file, released on every
///   exit path.
///
/// A non-zero exit status from an external tool surfaces as
/// [`ProtocolError::Transfer`].
pub fn copy(src: &str, dst: &str) -> Result<(), ProtocolError> {
    let src_p = classify(src);
    let dst_p = classify(dst);

    match (&src_p, &dst_p) {
        (Protocol::Local { .. }, Protocol::Local { .. }) => local_copy(&src_p, &dst_p, src, dst),
        (Protocol::Ssh { .. }, Protocol::XRootD { .. })
        | (Protocol::XRootD { .. }, Protocol::Ssh { .. }) => staged_copy(src, dst),
        _ if src_p.is_ssh() || dst_p.is_ssh() => run_tool("scp", &["-q", src, dst], src, dst),
        _ if src_p.is_xrootd() || dst_p.is_xrootd() => {
            run_tool("xrdcp", &["-f", "-s", src, dst], src, dst)
        }
        _ => local_copy(&src_p, &dst_p, src, dst),
    }
}

fn local_copy(
    src_p: &Protocol,
    dst_p: &Protocol,
    src: &str,
    dst: &str,
) -> Result<(), ProtocolError> {
    std::fs::copy(as_path(src_p), as_path(dst_p)).map_err(|err| ProtocolError::Transfer {
        src: src.to_string(),
        dst: dst.to_string(),
        reason: err.to_string(),
    })?;
    Ok(())
}

fn run_tool(tool: &str, args: &[&str], src: &str, dst: &str) -> Result<(), ProtocolError> {
    #[cfg(feature = "tracing")]
    tracing::debug!(tool, src, dst, "invoking copy tool");

    let status = Command::new(tool)
        .args(args)
        .status()
        .map_err(|err| ProtocolError::Transfer {
            src: src.to_string(),
            dst: dst.to_string(),
            reason: format!("failed to spawn {tool}: {err}"),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ProtocolError::Transfer {
            src: src.to_string(),
            dst: dst.to_string(),
            reason: format!("{tool} exited with {status}"),
        })
    }
}

/// Routes an SSH↔XRootD copy through a local staging file: `src` is copied
/// to a temporary file, then the temporary file is copied to `dst`. The
/// temporary directory is released whether staging succeeds or fails.
fn staged_copy(src: &str, dst: &str) -> Result<(), ProtocolError> {
    let staging_dir = tempfile::tempdir()?;
    let staging_path = staging_dir.path().join("staged");
    let staging_str = staging_path
        .to_str()
        .ok_or_else(|| ProtocolError::Format(staging_path.display().to_string()))?;

    copy_leg(src, staging_str)?;
    copy_leg(staging_str, dst)?;
    Ok(())
}

fn copy_leg(src: &str, dst: &str) -> Result<(), ProtocolError> {
    let src_p = classify(src);
    let dst_p = classify(dst);
    if src_p.is_xrootd() || dst_p.is_xrootd() {
        run_tool("xrdcp", &["-f", "-s", src, dst], src, dst)
    } else {
        run_tool("scp", &["-q", src, dst], src, dst)
    }
}
