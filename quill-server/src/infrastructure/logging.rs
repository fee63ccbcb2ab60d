use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins when set; otherwise `default_level` applies with sqlx
/// statement logging turned down to warnings.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(default_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn default_filter(level: &str) -> String {
    let level = level.trim();
    if level.contains("sqlx") {
        level.to_string()
    } else {
        format!("{level},sqlx=warn")
    }
}

#[cfg(test)]
mod tests {
    use super::default_filter;

    #[test]
    fn quiets_sqlx_unless_configured() {
        assert_eq!(default_filter("debug"), "debug,sqlx=warn");
        assert_eq!(default_filter("info,sqlx=debug"), "info,sqlx=debug");
    }
}
