use std::{collections::HashSet, env, net::SocketAddr, sync::Arc, time::Duration};

#[macro_use]
extern crate lazy_static;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    BoxError, Router,
};
use tokio::sync::RwLock;
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::{
    app::{env::Envy, errors::DefaultApiError},
    media::apis::{gradio::service::GradioClient, image_generator::ImageGenerator},
};

mod app;
mod datasets;
mod media;

pub struct AppState {
    pub envy: Arc<Envy>,
    pub generator: Arc<dyn ImageGenerator>,
    pub active_requests: Arc<RwLock<HashSet<String>>>,
}

#[tokio::main]
async fn main() {
    // tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // environment
    let app_env = env::var("APP_ENV").unwrap_or("development".to_string());
    let _ = dotenvy::from_filename(format!(".env.{}", app_env));
    let envy = match envy::from_env::<Envy>() {
        Ok(config) => config,
        Err(e) => panic!("{:#?}", e),
    };

    // properties
    let port = envy.port.to_owned().unwrap_or(5000);

    let generator = GradioClient::new(&envy.gradio_url, envy.generation_timeout())
        .expect("failed to build gradio client");

    tracing::info!("forwarding prompts to {}", envy.gradio_url);

    let state = Arc::new(AppState {
        envy: Arc::new(envy),
        generator: Arc::new(generator),
        active_requests: Arc::new(RwLock::new(HashSet::new())),
    });

    app::util::janitor::spawn(state.clone());

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .expect("server error");
}

pub fn router(state: Arc<AppState>) -> Router {
    let origin = state
        .envy
        .frontend_url
        .parse::<HeaderValue>()
        .expect("FRONTEND_URL is not a valid origin");

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/", get(app::controller::get_root))
        // datasets
        .route("/llm", post(datasets::controller::generate_dataset))
        // layers
        .layer(cors)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    tracing::error!("{}", err);
                    DefaultApiError::InternalServerError.value()
                }))
                .layer(BufferLayer::new(1024))
                .layer(RateLimitLayer::new(5, Duration::from_secs(1))),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
