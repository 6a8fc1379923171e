//! Todo service - REST and gRPC server

use core_config::tracing::{init_tracing, install_color_eyre};
use todos_server::{Config, run};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    run(config).await
}
