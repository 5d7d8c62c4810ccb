use anyhow::Result;

use corvid::uci::protocol::UciSession;

fn main() -> Result<()> {
    let mut session = UciSession::new();
    session.run()?;
    Ok(())
}
