use crate::config::StorageBackend;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ledger-chain")]
pub struct Opt {
    #[arg(long, global = true, help = "Node owner; receives mining rewards")]
    pub owner: Option<String>,
    #[arg(long, global = true, help = "Path of the state file or database")]
    pub data: Option<PathBuf>,
    #[arg(long, global = true, help = "Storage backend (json, sled)")]
    pub backend: Option<StorageBackend>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "send", about = "Queue a transaction in the pending pool")]
    Send {
        #[arg(help = "Recipient identifier")]
        recipient: String,
        #[arg(help = "Amount to send, e.g. 3 or 2.5")]
        amount: String,
        #[arg(long = "sender", help = "Sender identifier (defaults to the node owner)")]
        sender: Option<String>,
    },
    #[command(name = "mine", about = "Mine the pending pool into a new block")]
    Mine,
    #[command(name = "printchain", about = "Print all blocks in the ledger")]
    Printchain,
    #[command(name = "participants", about = "List every known participant")]
    Participants,
    #[command(name = "balance", about = "Show a participant's spendable balance")]
    Balance {
        #[arg(help = "Participant identifier (defaults to the node owner)")]
        participant: Option<String>,
    },
    #[command(name = "verify", about = "Audit the whole chain")]
    Verify,
    #[command(
        name = "verifypending",
        about = "Check that every pending transaction is still covered"
    )]
    VerifyPending,
    #[command(name = "shell", about = "Start the interactive menu")]
    Shell,
}
