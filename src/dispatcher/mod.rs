//! The command loop: read a verb, collect and confirm its arguments, call the ledger, then ask
//! whether to carry on.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::console::{ask_yes_no, read_input, Console};
use crate::ledger::CreditLedger;
use crate::types::ClientError;

use credit::{collect_issue_draft, collect_query_draft};
use format::format_json;
use help::render_help;

mod credit;
mod format;
mod help;

const COMMAND_PROMPT: &str = "-> Please enter the name of the smart contract function you want to invoke, enter help to print the functions available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Instantiate,
    Issue,
    Query,
    Help,
    Unknown(String),
}

impl Verb {
    pub fn parse(line: &str) -> Self {
        match line.to_ascii_lowercase().as_str() {
            "instantiate" => Verb::Instantiate,
            "issue" => Verb::Issue,
            "query" => Verb::Query,
            "help" | "" => Verb::Help,
            _ => Verb::Unknown(line.to_string()),
        }
    }
}

pub struct Dispatcher<C, L> {
    console: C,
    ledger: L,
    user_label: String,
    /// Wallet and key cache directories, removed when the operator asks for a clean up on the way out.
    cleanup_paths: Vec<PathBuf>,
}

impl<C: Console, L: CreditLedger> Dispatcher<C, L> {
    pub fn new(console: C, ledger: L, user_label: String, cleanup_paths: Vec<PathBuf>) -> Self {
        Self {
            console,
            ledger,
            user_label,
            cleanup_paths,
        }
    }

    /// Runs until the operator declines to continue. `exit` at any prompt ends it with
    /// [`ClientError::Exit`] instead.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        loop {
            self.console.write_line(COMMAND_PROMPT);
            let line = read_input(&mut self.console, "")?;

            let outcome = match Verb::parse(&line) {
                Verb::Help => {
                    self.console.write_line(&render_help());
                    continue;
                }
                Verb::Unknown(verb) => {
                    info!("Unknown function {:?}", verb);
                    self.console.write_line("->Wrong input! Please try again!");
                    continue;
                }
                Verb::Instantiate => self.instantiate().await,
                Verb::Issue => self.issue().await,
                Verb::Query => self.query().await,
            };

            match outcome {
                Ok(()) => {}
                Err(error) if error.is_recoverable() => {
                    self.console.write_line(&format!(
                        "Occurred an error while invoking chaincode function: {}... please try again.",
                        error
                    ));
                }
                Err(error) => return Err(error),
            }

            if !self.continue_or_finish()? {
                return Ok(());
            }
        }
    }

    async fn instantiate(&mut self) -> Result<(), ClientError> {
        info!("Submit Transaction: Instantiate, function calls the instantiate function, with no effect.");
        self.ledger.submit("Instantiate", &[]).await.map_err(ClientError::Ledger)?;

        self.console.write_line("*** Transaction committed successfully!");
        Ok(())
    }

    async fn issue(&mut self) -> Result<(), ClientError> {
        info!("============ Issuing a new credit ============");
        let draft = collect_issue_draft(&mut self.console, &self.user_label)?;

        info!("Submit Transaction: Issue, creates new credit with credit number, issuer and issue date and time.");
        self.ledger.submit("Issue", &draft.args()).await.map_err(ClientError::Ledger)?;

        self.console.write_line("*** Transaction committed successfully");
        Ok(())
    }

    async fn query(&mut self) -> Result<(), ClientError> {
        info!("============ Querying a credit ============");
        let draft = collect_query_draft(&mut self.console)?;

        self.console.write_line("Evaluate Transaction: Query, function returns credit attributes");
        let payload = self.ledger.evaluate("Query", &draft.args()).await.map_err(ClientError::Ledger)?;
        let result = format_json(&payload)?;

        self.console.write_line(&format!("*** Result:{}", result));
        Ok(())
    }

    /// `true` to go back to the command prompt, `false` once the operator is done.
    fn continue_or_finish(&mut self) -> Result<bool, ClientError> {
        if ask_yes_no(&mut self.console, "Do you want to continue? [y/n]: ")? {
            self.console.write_line("Preparing for invoking next smart contract function");
            return Ok(true);
        }

        if ask_yes_no(&mut self.console, "Do you want to clean up the wallet? [y/n]: ")? {
            info!("-> Cleaning up wallet...");
            remove_dirs(&self.cleanup_paths)?;
            info!("-> Wallet cleaned up successfully");
        }
        Ok(false)
    }
}

/// Removes each directory that exists. Missing ones are skipped.
fn remove_dirs(paths: &[PathBuf]) -> Result<(), ClientError> {
    for path in paths.iter().filter(|path| path.exists()) {
        fs::remove_dir_all(path).map_err(|source| ClientError::Cleanup {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}
