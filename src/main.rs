use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use readiness_engine::config::Config;
use readiness_engine::error::ReportError;
use readiness_engine::logging::init_tracing;
use readiness_engine::report::{build_report, read_snapshots, write_report};
use readiness_engine::TopicCatalog;

fn run(config: &Config, path: Option<String>) -> Result<(), ReportError> {
    let stats = match path.as_deref() {
        Some("-") | None => read_snapshots(io::stdin().lock())?,
        Some(path) => read_snapshots(BufReader::new(File::open(path)?))?,
    };
    tracing::info!(snapshots = stats.len(), mode = %config.lock_mode, "building readiness report");

    let report = build_report(&stats, &TopicCatalog::default(), config.lock_mode);
    tracing::info!(
        topics = report.topics.len(),
        locked = report.locked_topics().count(),
        "readiness report ready"
    );

    write_report(io::stdout().lock(), &report)
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config);

    match run(&config, std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "readiness report failed");
            ExitCode::FAILURE
        }
    }
}
