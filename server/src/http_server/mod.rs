use std::{future::Future, future::IntoFuture, time::Duration};

use axum::{response::Response, Router};
use color_eyre::eyre::{eyre, Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

pub(crate) use errors::ResponseError;
pub(crate) use routes::ThreadEnvelope;

pub(crate) mod cmd;
pub(crate) mod routes;

mod config;
pub mod errors;
mod trace;

#[cfg(test)]
pub(crate) mod test_helpers;

type ResponseResult<T = Response> = Result<T, ResponseError>;

/// Serves `app` on `listener` until `signal` resolves.
///
/// Once the signal fires no new connections are accepted. Requests already in
/// flight get `grace` to finish; if they have not, this returns an error.
pub(crate) async fn run_server<F>(
    app: Router,
    listener: TcpListener,
    grace: Duration,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stopping_tx, stopping_rx) = tokio::sync::oneshot::channel::<()>();
    let signal = async move {
        signal.await;
        info!("Shutting down the server...");
        let _ = stopping_tx.send(());
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.wrap_err("Failed to run server"),
        _ = stopping_rx => {}
    }

    tokio::time::timeout(grace, server)
        .await
        .map_err(|_| eyre!("Server did not shut down within {grace:?}"))?
        .wrap_err("Failed to run server")
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
