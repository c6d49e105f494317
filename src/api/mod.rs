// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dex::{BalanceSummary, TxOutcome},
    state::AppState,
};

pub mod dex;
pub mod health;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/dex/balance", post(dex::get_balance))
        .route("/dex/wrap", post(dex::wrap_native))
        .route("/dex/swap", post(dex::swap))
        .route("/dex/liquidity/add", post(dex::add_liquidity))
        .route("/dex/liquidity/remove", post(dex::remove_liquidity));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        dex::get_balance,
        dex::wrap_native,
        dex::swap,
        dex::add_liquidity,
        dex::remove_liquidity
    ),
    components(
        schemas(
            BalanceSummary,
            TxOutcome,
            dex::OperationRequest,
            dex::SwapRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "DEX", description = "Citea exchange workflows")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DexConfig;
    use crate::dex::DexEngine;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let config = DexConfig::from_env().expect("default config loads");
        let engine = DexEngine::new(config).expect("engine builds");
        let app = router(AppState::new(engine));
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
