use errors::AppResult;
use nse_cli::{cli, errors};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> AppResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nse_cli=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let rt =
        tokio::runtime::Runtime::new().map_err(|e| errors::AppError::IoError(e.to_string()))?;
    rt.block_on(cli::cli())
}
