use biblioteca_shared::config::Config;
use biblioteca_shared::memory::{DirectorySeed, MemoryDirectory};
use biblioteca_shared::AppState;
use lambda_http::{run, service_fn, tracing, Error, Request};
use std::sync::Arc;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    // Read configuration once at cold start
    let config = Config::from_env();

    let seed = match &config.directory_seed {
        Some(path) => {
            tracing::info!("Seeding user directory from {}", path.display());
            DirectorySeed::from_file(path)?
        }
        None => {
            tracing::warn!("DIRECTORY_SEED not set, starting with an empty user directory");
            DirectorySeed::default()
        }
    };

    let directory = MemoryDirectory::from_seed(seed)?;
    let state = AppState::new(Arc::new(directory), config);

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
