use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = marble::cli::Cli::parse();
    marble::logging::init_tracing(cli.log_filter.clone())?;

    let config = marble::config::from_cli(&cli)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    marble::commands::execute(&config, &cli, stdin.lock(), &mut handle)?;

    Ok(())
}
