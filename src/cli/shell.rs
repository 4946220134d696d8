// Interactive menu. Reads choices line by line, so it runs the same against a
// terminal or a scripted input in tests.

use crate::cli::output::write_chain;
use crate::cli::Session;
use crate::core::Amount;
use crate::error::{LedgerError, Result};
use std::io::{BufRead, Write};

const MENU: &str = "Please choose:
1: Add a new transaction value
2: Mine a new block
3: Output the blockchain blocks
4: Output participants
5: Check transaction validity";

#[cfg(debug_assertions)]
const DEBUG_MENU: &str = "h: Manipulate the chain";

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run the menu until the user quits or input ends.
///
/// The chain is audited after every choice; a failed audit prints the chain
/// and stops the loop with the violation.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let mut quit = false;
    while !quit {
        writeln!(out, "{MENU}")?;
        #[cfg(debug_assertions)]
        writeln!(out, "{DEBUG_MENU}")?;
        writeln!(out, "q: Quit")?;
        let choice = match prompt(input, out, "Your choice: ")? {
            Some(choice) => choice,
            None => break,
        };

        match choice.as_str() {
            "1" => {
                let recipient_prompt = "Enter the recipient of the transaction: ";
                let Some(recipient) = prompt(input, out, recipient_prompt)? else {
                    break;
                };
                let amount_prompt = "Your transaction amount please: ";
                let Some(amount_text) = prompt(input, out, amount_prompt)? else {
                    break;
                };
                let owner = session.ledger().owner().to_string();
                let outcome = amount_text
                    .parse::<Amount>()
                    .and_then(|amount| session.send(&owner, &recipient, amount));
                match outcome {
                    Ok(()) => writeln!(out, "Added transaction!")?,
                    Err(e @ LedgerError::ChainIntegrityViolation { .. }) => return Err(e),
                    Err(e) => writeln!(out, "Transaction failed: {e}")?,
                }
            }
            "2" => match session.mine() {
                Ok(block) => writeln!(out, "Mined block {}", block.get_index())?,
                Err(e @ LedgerError::ChainIntegrityViolation { .. }) => return Err(e),
                Err(e) => writeln!(out, "Mining failed: {e}")?,
            },
            "3" => write_chain(out, session.ledger().blocks())?,
            "4" => writeln!(out, "{}", session.ledger().list_participants().join(", "))?,
            "5" => {
                if session.ledger().verify_all_pending() {
                    writeln!(out, "All transactions are valid")?;
                } else {
                    writeln!(out, "There are invalid transactions")?;
                }
            }
            #[cfg(debug_assertions)]
            "h" => session.manipulate_chain()?,
            "q" => quit = true,
            _ => writeln!(out, "Input was invalid, please pick a value from the list!")?,
        }

        if let Err(e) = session.ensure_valid() {
            write_chain(out, session.ledger().blocks())?;
            writeln!(out, "Invalid blockchain!")?;
            return Err(e);
        }
        let owner = session.ledger().owner();
        writeln!(
            out,
            "Balance of {owner}: {}",
            session.ledger().balance(owner)
        )?;
        if quit {
            writeln!(out, "User left!")?;
        }
    }
    writeln!(out, "Done!")?;
    Ok(())
}
