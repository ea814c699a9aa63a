// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    fmt::{self, Display},
    io,
};

/// Why the interactive shell was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Interrupt,
    #[cfg(unix)]
    Hangup,
    #[cfg(windows)]
    Break,
}

impl Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Interrupt => write!(f, "Ctrl-C"),
            #[cfg(unix)]
            ExitReason::Hangup => write!(f, "SIGHUP"),
            #[cfg(windows)]
            ExitReason::Break => write!(f, "Ctrl-Break"),
        }
    }
}

/// Listens for the signals that end the shell. Handlers are installed on construction, so a signal arriving before
/// the first `recv` is not lost.
pub struct ExitSignal {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    hangup: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
    #[cfg(windows)]
    ctrl_break: tokio::signal::windows::CtrlBreak,
}

impl ExitSignal {
    #[cfg(unix)]
    pub fn new() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            hangup: signal(SignalKind::hangup())?,
        })
    }

    #[cfg(windows)]
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
            ctrl_break: tokio::signal::windows::ctrl_break()?,
        })
    }

    /// Waits for the next exit signal. Cancel safe.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> ExitReason {
        tokio::select! {
            biased;
            _ = self.interrupt.recv() => ExitReason::Interrupt,
            _ = self.hangup.recv() => ExitReason::Hangup,
        }
    }

    /// Waits for the next exit signal. Cancel safe.
    #[cfg(windows)]
    pub async fn recv(&mut self) -> ExitReason {
        tokio::select! {
            biased;
            _ = self.ctrl_c.recv() => ExitReason::Interrupt,
            _ = self.ctrl_break.recv() => ExitReason::Break,
        }
    }
}
