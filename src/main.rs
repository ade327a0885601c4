// src/main.rs

use scriptjob::job::JobResult;
use scriptjob::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("scriptjob error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<bool> {
    let args = cli::parse();
    logging::init_logging(args.log_level, args.guest_log_level)?;
    let result = run(args).await?;

    match &result {
        JobResult::Success => println!("success"),
        JobResult::Error { summary, details } => {
            println!("error: {summary}");
            println!("{details}");
        }
        JobResult::InternalError {
            summary,
            details,
            code,
        } => {
            println!("internal error ({code}): {summary}");
            println!("{details}");
        }
    }
    Ok(result.is_success())
}
