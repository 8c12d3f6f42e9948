use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset; stdout must carry only the status line
const DEFAULT_FILTER: &str = "off";

/// Initialize the logger, writing diagnostics to stderr
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Version banner printed for `-v`
pub fn version_banner() -> String {
    let mut banner = format!(
        "{} {} (Build {})\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        option_env!("BUILD_DATE").unwrap_or("unknown")
    );

    let repository = env!("CARGO_PKG_REPOSITORY");
    if !repository.is_empty() {
        banner.push('\n');
        banner.push_str(repository);
        banner.push('\n');
    }

    banner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_banner() {
        let banner = version_banner();
        assert!(banner.starts_with(&format!(
            "pg-health-check {} (Build ",
            env!("CARGO_PKG_VERSION")
        )));
        assert!(banner.ends_with('\n'));
    }
}
