use std::process::ExitCode;

use configs::AppConfig;
use tracing::{error, info};

fn main() -> ExitCode {
    // .env may carry RUST_LOG, so load it before the subscriber
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_default();

    std::panic::set_hook(Box::new(|info| {
        error!(event = "panic", message = %info, "pvsave stub panicked");
    }));

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        addr = %cfg.server.bind_addr(),
        snapshot = %cfg.snapshot.path.display(),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "pvsave stub starting"
    );

    match rt.block_on(server::run_with(cfg, server::startup::ctrl_c())) {
        Ok(()) => {
            info!("pvsave stub stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "pvsave stub failed");
            ExitCode::FAILURE
        }
    }
}
