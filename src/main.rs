use std::process;

use pg_health_check::cli::Cli;
use pg_health_check::db::PostgresConnector;
use pg_health_check::dns::DnsResolver;
use pg_health_check::utils::logging;
use pg_health_check::CheckRunner;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    if cli.version {
        println!("{}", logging::version_banner());
        process::exit(0);
    }

    logging::init_logger();

    let config = cli.into_config();
    tracing::debug!("Configuration loaded: {:?}", config.database);

    let resolver = DnsResolver::new();
    let connector = PostgresConnector::new();
    let result = CheckRunner::new(&config, &resolver, &connector).run().await;

    println!("{}", result.status_line(&config.service_name));
    process::exit(result.exit_code);
}
