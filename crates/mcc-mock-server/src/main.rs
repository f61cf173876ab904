use std::process::ExitCode;

use mcc_mock_server::MockServerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcc_mock_server=info,tower_http=debug".into()),
        )
        .init();

    match mcc_mock_server::run(MockServerConfig::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
