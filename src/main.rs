// src/main.rs

use batchdag::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("batchdag error: {err:?}");
        std::process::exit(1);
    }

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("batchdag error: {err:?}");
            std::process::exit(1);
        }
    }
}
