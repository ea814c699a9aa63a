// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::{io, process::Stdio};

use async_trait::async_trait;
use log::*;
use tokio::{io::AsyncWriteExt, process::Command as TokioCommand};

use crate::error::ClipboardError;

const LOG_TARGET: &str = "soroswap::faucet::clipboard";

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Copies to the system clipboard through the first platform clipboard utility found on the `PATH`.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard;

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];
#[cfg(windows)]
const CANDIDATES: &[(&str, &[&str])] = &[("clip", &[])];
#[cfg(not(any(target_os = "macos", windows)))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

impl SystemClipboard {
    async fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
        let mut child = TokioCommand::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // close stdin so the utility sees EOF
            drop(stdin);
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(ClipboardError::CommandFailed {
                program: program.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    /// Tries each utility in turn until one accepts `text`. An installed utility that fails (e.g. `wl-copy` without
    /// a Wayland display) does not stop the search. If none succeeds, the last failure is returned.
    async fn write_with(candidates: &[(&str, &[&str])], text: &str) -> Result<(), ClipboardError> {
        let mut last_error = None;
        for &(program, args) in candidates {
            match Self::pipe_to(program, args, text).await {
                Ok(()) => {
                    debug!(target: LOG_TARGET, "Copied {} byte(s) with {}", text.len(), program);
                    return Ok(());
                },
                Err(ClipboardError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(target: LOG_TARGET, "{} not available", program);
                },
                Err(e) => {
                    warn!(target: LOG_TARGET, "{} failed: {}", program, e);
                    last_error = Some(e);
                },
            }
        }

        Err(last_error.unwrap_or_else(|| ClipboardError::Unavailable {
            tried: candidates.iter().map(|(p, _)| *p).collect::<Vec<_>>().join(", "),
        }))
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        Self::write_with(CANDIDATES, text).await
    }
}

#[cfg(test)]
pub use memory::MemoryClipboard;


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_clipboard_keeps_the_last_write() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);
        clipboard.write_text("CFIRST").await.unwrap();
        clipboard.write_text("CSECOND").await.unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("CSECOND"));
    }

    #[tokio::test]
    async fn missing_utility_is_reported_as_not_found() {
        let err = SystemClipboard::pipe_to("soroswap-definitely-not-a-clipboard", &[], "C1")
            .await
            .unwrap_err();
        assert!(matches!(err, ClipboardError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn it_reports_unavailable_when_no_utility_is_installed() {
        let candidates: [(&str, &[&str]); 2] = [("soroswap-missing-one", &[]), ("soroswap-missing-two", &[])];
        let err = SystemClipboard::write_with(&candidates, "C1").await.unwrap_err();
        assert!(
            matches!(err, ClipboardError::Unavailable { ref tried } if tried == "soroswap-missing-one, soroswap-missing-two")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn it_falls_through_to_the_next_utility_when_one_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clipboard");
        let write_out = format!("cat > '{}'", out.display());

        let candidates: [(&str, &[&str]); 3] = [
            ("soroswap-missing", &[]),
            // installed, but e.g. no display to talk to
            ("sh", &["-c", "exit 1"]),
            ("sh", &["-c", write_out.as_str()]),
        ];

        SystemClipboard::write_with(&candidates, "CCW67TSZV3SSS2HXMBQ5JFGCKJNXKZM7UQUWUZPUTHXSTZLEO7SJMI75")
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "CCW67TSZV3SSS2HXMBQ5JFGCKJNXKZM7UQUWUZPUTHXSTZLEO7SJMI75"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn it_returns_the_last_failure_when_every_utility_fails() {
        let candidates: [(&str, &[&str]); 3] = [
            ("sh", &["-c", "exit 1"]),
            ("soroswap-missing", &[]),
            ("sh", &["-c", "exit 3"]),
        ];
        let err = SystemClipboard::write_with(&candidates, "C1").await.unwrap_err();
        assert!(
            matches!(err, ClipboardError::CommandFailed { ref program, ref status } if program == "sh" && status.contains('3'))
        );
    }
}
