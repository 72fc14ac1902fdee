//! The local asset server backing the renderer.
//!
//! The renderer loads the transcript-generation webapp over HTTP, so the
//! webapp directory is served on localhost for as long as rendering runs.

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use diplo_core::PipelineError;
use diplo_traits::{AssetError, AssetProvider};
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::oneshot;

/// A static file server, not yet started.
#[derive(Debug, Clone)]
pub struct AssetServer {
    provider: Arc<dyn AssetProvider>,
    entry: String,
    port: u16,
}

impl AssetServer {
    pub fn new(provider: Arc<dyn AssetProvider>, entry: impl Into<String>, port: u16) -> Self {
        Self {
            provider,
            entry: entry.into(),
            port,
        }
    }

    /// Binds the listener and starts serving on a background thread.
    ///
    /// The port is bound before this returns, so the reported URL is usable
    /// immediately. Port 0 picks a free port.
    pub fn start(self) -> Result<AssetServerGuard, PipelineError> {
        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, self.port)))
            .map_err(|e| PipelineError::Server(format!("cannot bind port {}: {}", self.port, e)))?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();

        if !self.provider.exists(&self.entry) {
            log::warn!("Entry resource {} is not available", self.entry);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("diplo-assets")
            .enable_all()
            .build()?;
        let app = Router::new()
            .fallback(serve_asset)
            .with_state(Arc::clone(&self.provider));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("diplo-asset-server".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let listener = tokio::net::TcpListener::from_std(listener)?;
                    axum::serve(listener, app)
                        .with_graceful_shutdown(async {
                            let _ = shutdown_rx.await;
                        })
                        .await
                })
            })?;

        let url = format!("http://localhost:{}/{}", port, self.entry);
        log::info!("Web server runs on {}", url);
        Ok(AssetServerGuard {
            url,
            port,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }
}

async fn serve_asset(State(provider): State<Arc<dyn AssetProvider>>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    match provider.load(path) {
        Ok(data) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.essence_str().to_string())],
                data.to_vec(),
            )
                .into_response()
        }
        Err(AssetError::NotFound(_)) => {
            log::debug!("Asset not found: /{}", path);
            StatusCode::NOT_FOUND.into_response()
        }
        Err(AssetError::Rejected(_)) => {
            log::warn!("Rejected asset request: /{}", path);
            StatusCode::FORBIDDEN.into_response()
        }
        Err(e) => {
            log::error!("{}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// A running asset server. Dropping the guard stops it and releases the port.
#[derive(Debug)]
pub struct AssetServerGuard {
    url: String,
    port: u16,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<std::io::Result<()>>>,
}

impl AssetServerGuard {
    /// The URL of the entry resource.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stops the server and waits for it to shut down.
    pub fn stop(mut self) {
        self.shutdown_now();
    }

    fn shutdown_now(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            match thread.join() {
                Ok(Ok(())) => log::debug!("Web server on port {} stopped", self.port),
                Ok(Err(e)) => log::warn!("Web server on port {} failed: {}", self.port, e),
                Err(_) => log::error!("Web server thread panicked"),
            }
        }
    }
}

impl Drop for AssetServerGuard {
    fn drop(&mut self) {
        self.shutdown_now();
    }
}
