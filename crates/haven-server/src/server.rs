use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{delete, get},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;

use crate::handlers::{
    cache::{flush_all, flush_namespace},
    health::health_check,
    listings::{
        create_listing, delete_listing, delete_owner_listings, get_listing, list_listings,
        list_owner_listings, update_listing,
    },
    metrics::metrics_handler,
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// How long shutdown waits for background cache writes.
const CACHE_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Listing routes
        .route("/listings", get(list_listings).post(create_listing))
        .route(
            "/listings/{id}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route(
            "/owners/{owner_id}/listings",
            get(list_owner_listings).delete(delete_owner_listings),
        )
        // Cache flush routes
        .route("/cache", delete(flush_all))
        .route("/cache/{namespace}", delete(flush_namespace))
        .with_state(state)
}

fn with_middleware(router: Router) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    router
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Creates the full router, including `/metrics`.
pub fn create_router_with_metrics(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    with_middleware(Router::new().merge(app_routes(state)).merge(metrics_router))
}

/// Creates the router without the metrics endpoint.
pub fn create_router(state: AppState) -> Router {
    with_middleware(app_routes(state))
}

/// Runs the server until Ctrl-C or SIGTERM.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let service = state.service().clone();
    let app = create_router_with_metrics(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let pending = service.pending_writes().in_flight();
    if tokio::time::timeout(CACHE_DRAIN_TIMEOUT, service.wait_for_cache_writes())
        .await
        .is_err()
    {
        tracing::warn!(pending, "Cache writes still running at shutdown; dropping them");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
