// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::{future::Future, str::FromStr};

use log::*;
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines},
    task::{JoinError, JoinSet},
};

use crate::{
    command::{no_tokens_message, outcome_message, token_table},
    session::FaucetSession,
    shutdown::{ExitReason, ExitSignal},
};

const LOG_TARGET: &str = "soroswap::faucet::shell";

const HELP: &str = "\
Commands:
  address <G...>   set the wallet address to mint to (no argument clears it)
  list             show the tokens and their mint state
  mint <TOKEN>     mint a token by ticker code or contract id
  copy <TOKEN>     copy a token contract address to the clipboard
  status           show the wallet address, mints in flight and the last message
  help             show this help
  quit             leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Address(String),
    List,
    Mint(String),
    Copy(String),
    Status,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Empty input")]
    EmptyLine,
    #[error("Unknown command '{0}', type 'help' for a list of commands")]
    UnknownCommand(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
}

impl FromStr for ShellCommand {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((line, ""));

        let required = |name| {
            if arg.is_empty() {
                Err(ShellError::MissingArgument(name))
            } else {
                Ok(arg.to_string())
            }
        };

        match command.to_ascii_lowercase().as_str() {
            "" => Err(ShellError::EmptyLine),
            "address" | "addr" => Ok(ShellCommand::Address(arg.to_string())),
            "list" | "ls" => Ok(ShellCommand::List),
            "mint" => required("token").map(ShellCommand::Mint),
            "copy" | "cp" => required("token").map(ShellCommand::Copy),
            "status" => Ok(ShellCommand::Status),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            _ => Err(ShellError::UnknownCommand(command.to_string())),
        }
    }
}

/// Reads commands from stdin until `quit`, end of input or an exit signal.
pub async fn run_shell(session: FaucetSession) -> anyhow::Result<()> {
    let mut signal = ExitSignal::new()?;
    let lines = BufReader::new(io::stdin()).lines();

    println!("{}", HELP);
    run_lines(&session, lines, signal.recv()).await
}

/// Executes each line of `lines` against `session`. Pending mints are awaited on `quit` and end of input, and
/// abandoned once `signal` fires. Finished mints are reaped as they complete.
async fn run_lines<R, F>(session: &FaucetSession, mut lines: Lines<R>, signal: F) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ExitReason>,
{
    tokio::pin!(signal);
    let mut mints = JoinSet::new();

    loop {
        tokio::select! {
            reason = &mut signal => {
                info!(target: LOG_TARGET, "Received {}, leaving the faucet shell", reason);
                mints.abort_all();
                return Ok(());
            },
            Some(finished) = mints.join_next(), if !mints.is_empty() => report_finished(finished),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.parse::<ShellCommand>() {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => execute(session, command, &mut mints).await,
                    Err(ShellError::EmptyLine) => {},
                    Err(err) => println!("{}", err),
                }
            }
        }
    }

    if !mints.is_empty() {
        info!(target: LOG_TARGET, "Waiting for {} mint(s) in flight", mints.len());
    }
    while let Some(finished) = mints.join_next().await {
        report_finished(finished);
    }
    Ok(())
}

fn report_finished(finished: Result<(), JoinError>) {
    if let Some(err) = mint_task_failure(finished) {
        error!(target: LOG_TARGET, "{}", err);
        println!("❌ {}", err);
    }
}

/// A mint task that panicked is reported. Tasks aborted on exit are not.
fn mint_task_failure(finished: Result<(), JoinError>) -> Option<String> {
    match finished {
        Ok(()) => None,
        Err(err) if err.is_cancelled() => None,
        Err(err) => Some(format!("Mint task failed: {}", err)),
    }
}

async fn execute(session: &FaucetSession, command: ShellCommand, mints: &mut JoinSet<()>) {
    match command {
        ShellCommand::Address(address) => {
            if address.is_empty() {
                println!("Wallet address cleared");
            } else {
                println!("Wallet address set to {}", address);
            }
            session.set_wallet_address(address);
        },
        ShellCommand::List => {
            let rows = session.rows();
            if rows.is_empty() {
                println!("{}", no_tokens_message(session.catalog().network()));
            } else {
                print!("{}", token_table(&rows, true));
            }
        },
        ShellCommand::Mint(query) => {
            // Mints run in the background so the shell keeps accepting input
            let session = session.clone();
            mints.spawn(async move {
                let result = session.mint_by_query(&query).await;
                println!("{}", outcome_message(&session, &query, &result));
            });
        },
        ShellCommand::Copy(query) => {
            let Some(token) = session.catalog().find(&query) else {
                println!("Unknown token '{}'", query);
                return;
            };
            match session.copy_address(&token.contract).await {
                Ok(()) => println!("✓ Copied! {}", token.contract),
                Err(_) => {
                    if let Some(message) = session.message() {
                        println!("{}", message);
                    }
                },
            }
        },
        ShellCommand::Status => {
            let address = session.wallet_address();
            println!(
                "Wallet address: {}",
                if address.trim().is_empty() { "(none)" } else { address.as_str() }
            );
            let in_flight = session.in_flight();
            if in_flight.is_empty() {
                println!("Minting: -");
            } else {
                println!("Minting: {}", in_flight.join(", "));
            }
            if let Some(message) = session.message() {
                println!("Last message: {}", message);
            }
            if let Some(contract) = session.copied_contract() {
                println!("Copied: {}", contract);
            }
        },
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {},
    }
}
