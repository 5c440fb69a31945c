use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use legal_codes::LegalCodeDirectory;

mod workbook;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Converts the official legal-dong code workbook into the server's CSV table.
    ExtractLegalCodes {
        workbook: PathBuf,
        #[arg(long, default_value = "data/legal_codes.csv")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::ExtractLegalCodes { workbook, out } => {
            let written = workbook::extract_legal_codes(&workbook, &out)?;
            let directory = LegalCodeDirectory::load(&out)?;
            println!(
                "wrote {} ({written} rows, {} provinces)",
                out.display(),
                directory.sido().len()
            );
        }
    }

    Ok(())
}
