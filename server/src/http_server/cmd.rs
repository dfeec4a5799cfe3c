use std::net::SocketAddr;

use color_eyre::eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    http_server::{routes, run_server, shutdown_signal},
    AppConfig, AppState,
};

pub(crate) async fn serve(config: &AppConfig) -> Result<()> {
    let app_state = AppState::from_config(config);
    info!(?config, "Loaded config");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err("Failed to open port")?;

    info!("Server started on port {}", config.listen_port);

    run_server(
        routes::make_router(app_state),
        listener,
        config.shutdown_grace(),
        shutdown_signal(),
    )
    .await?;

    info!("Main Returning");

    Ok(())
}
