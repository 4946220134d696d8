// Entry point for the ledger CLI
use clap::Parser;
use env_logger::Env;
use ledger_chain::cli::{run_shell, write_chain};
use ledger_chain::{open_store, Amount, Command, Opt, Session, GLOBAL_CONFIG};
use log::error;
use std::io;
use std::process;

fn main() {
    // Info by default; RUST_LOG still wins when set
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let opt = Opt::parse();

    if let Err(e) = run(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    // Defaults < ledger.toml < LEDGER_* environment < command-line flags
    GLOBAL_CONFIG.load_default_file()?;
    if let Some(owner) = opt.owner {
        GLOBAL_CONFIG.set_owner(owner);
    }
    if let Some(backend) = opt.backend {
        GLOBAL_CONFIG.set_backend(backend);
    }
    if let Some(data) = opt.data {
        GLOBAL_CONFIG.set_data_path(data);
    }

    let owner = GLOBAL_CONFIG.get_owner();
    let state = open_store(GLOBAL_CONFIG.get_backend()?, &GLOBAL_CONFIG.get_data_path()?)?;
    let mut session = Session::open(&owner, state)?;

    match opt.command {
        Command::Send {
            recipient,
            amount,
            sender,
        } => {
            let amount: Amount = amount.parse()?;
            let sender = sender.unwrap_or_else(|| owner.clone());
            session.send(&sender, &recipient, amount)?;
            println!("Added transaction!");
        }
        Command::Mine => {
            let block = session.mine()?;
            println!("Mined block {} ({})", block.get_index(), block.digest());
        }
        Command::Printchain => {
            write_chain(&mut io::stdout().lock(), session.ledger().blocks())?;
        }
        Command::Participants => {
            for participant in session.ledger().list_participants() {
                println!("{participant}");
            }
        }
        Command::Balance { participant } => {
            let participant = participant.unwrap_or_else(|| owner.clone());
            println!(
                "Balance of {participant}: {}",
                session.ledger().balance(&participant)
            );
        }
        Command::Verify => {
            session.ensure_valid()?;
            println!("Chain is valid ({} blocks)", session.ledger().len());
        }
        Command::VerifyPending => {
            if session.ledger().verify_all_pending() {
                println!("All transactions are valid");
            } else {
                return Err("There are invalid transactions".into());
            }
        }
        Command::Shell => {
            let stdin = io::stdin();
            run_shell(&mut session, &mut stdin.lock(), &mut io::stdout())?;
        }
    }
    Ok(())
}
