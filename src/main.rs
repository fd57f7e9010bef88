use std::env;
use std::process::ExitCode;

use log::{error, info};

use sforginfo::error::RunError;
use sforginfo::http::CrmClient;
use sforginfo::logger::RunLogger;
use sforginfo::options::{load_dotenv, RunOptions};
use sforginfo::workflow::{RunReport, Workflow};

#[tokio::main]
async fn main() -> ExitCode {
    let (options, log) = match prepare() {
        Ok(prepared) => prepared,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!(logger: log, "Script started. Logging to: {}", log.file_path().display());

    let outcome = run(&options, &log).await;
    info!(logger: log, "Script finished.");

    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Everything that has to work before there is a log file to report to.
fn prepare() -> Result<(RunOptions, RunLogger), RunError> {
    load_dotenv()?;

    let options = RunOptions::from_env()?;
    let options = match env::args_os().nth(1) {
        Some(path) => options.with_config_path(path),
        None => options,
    };

    let log = RunLogger::open(options.log_dir(), options.log_level())?;
    Ok((options, log))
}

async fn run(options: &RunOptions, log: &RunLogger) -> Result<RunReport, RunError> {
    let client = CrmClient::new(options.http_timeout()).map_err(|err| {
        error!(logger: log, "{err}");
        err
    })?;

    Workflow::new(&client, log, options.fetch_user_info())
        .run(options.config_path())
        .await
}
