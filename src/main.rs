use std::process::ExitCode;

use sales_etl::config::PipelineConfig;
use sales_etl::logging::init_logging;
use sales_etl::pipeline::run;
use sales_etl::sink::SqliteStore;
use sales_etl::EtlResult;

fn main() -> ExitCode {
    init_logging();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "ETL run failed");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> EtlResult<()> {
    let config = PipelineConfig::default();
    let mut store = SqliteStore::open(&config.database_path)?;
    run(&config, &mut store)?;
    Ok(())
}
