use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Log to stderr so summaries on stdout stay clean. `RUST_LOG` refines the default directive.
pub fn init_tracing(filter: Option<String>) -> Result<()> {
    let filter = filter.unwrap_or_else(|| "warn".to_string());
    let directive: Directive = filter
        .parse()
        .with_context(|| format!("invalid log directive '{filter}'"))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
