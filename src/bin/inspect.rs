use std::path::PathBuf;

use anyhow::{bail, Result};
use ticketd::catalog::Catalog;

fn main() -> Result<()> {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: inspect <catalog-file>");
    };
    let catalog = Catalog::load(&path)?;

    let mut tickets = 0u64;
    for ev in catalog.iter() {
        println!("{}\t{}\t{}", ev.id, ev.initial, ev.description);
        tickets += ev.initial as u64;
    }

    println!("events={}", catalog.len());
    println!("tickets={tickets}");
    Ok(())
}
