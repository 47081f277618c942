use anyhow::Context;
use goldrush::config::{self, Config};
use goldrush::{logging, server};

fn main() -> anyhow::Result<()> {
    // Environment is settled before the runtime spawns any threads
    config::load_dotenv();
    logging::init();

    let config = Config::from_env().context("invalid configuration")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(server::serve(&config))
}
