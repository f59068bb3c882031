use std::fs::File;

use anyhow::{Context, Result};
use bank_ledger::{
    bin_utils::{Service, logger::init_logger},
    config::LedgerConfig,
};

fn main() -> Result<()> {
    let config = LedgerConfig::from_env().context("Invalid configuration")?;
    init_logger(config.verbose);

    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        config,
        error_printer: Box::new(|line, err| eprintln!("Error at line {line}: {err}")),
    };
    service.run()
}
