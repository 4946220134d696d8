use crate::core::Block;
use std::io::{self, Write};

pub fn write_block<W: Write>(out: &mut W, block: &Block) -> io::Result<()> {
    writeln!(out, "Block {}", block.get_index())?;
    writeln!(out, "  Previous hash: {}", block.get_previous_hash())?;
    writeln!(out, "  Hash:          {}", block.digest())?;
    writeln!(out, "  Proof:         {}", block.get_proof())?;
    for tx in block.get_transactions() {
        writeln!(
            out,
            "  - {} -> {}: {}",
            tx.get_sender(),
            tx.get_recipient(),
            tx.get_amount()
        )?;
    }
    Ok(())
}

pub fn write_chain<W: Write>(out: &mut W, blocks: &[Block]) -> io::Result<()> {
    for block in blocks {
        write_block(out, block)?;
    }
    writeln!(out, "{}", "-".repeat(20))
}
