use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use pitchmatch::config::{LoggingSettings, Settings};
use pitchmatch::core::Matcher;
use pitchmatch::routes::{self, AppState};
use pitchmatch::services::{build_generator, Matchmaker};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings.logging);

    info!("Starting Pitchmatch matching service...");

    let matcher = Matcher::new(settings.scoring.points(), settings.matching.max_results);

    info!("Matcher initialized with points: {:?}", settings.scoring.points());

    let mut matchmaker = Matchmaker::new(matcher)
        .with_max_prompt_candidates(settings.matching.max_prompt_candidates)
        .with_structured_output(settings.ai.structured_output);

    match settings.ai.provider_config() {
        Some(provider_config) => match build_generator(settings.ai.provider, provider_config) {
            Ok(generator) => {
                info!("AI matching enabled via {}", generator.provider());
                matchmaker = matchmaker.with_generator(generator);
            }
            Err(e) => {
                error!("Failed to initialize AI provider ({}), running heuristic-only", e);
            }
        },
        None => warn!("No AI API key configured, running heuristic-only"),
    }

    if settings.cache.enabled {
        matchmaker = matchmaker.with_cache(settings.cache.max_entries, settings.cache.ttl_secs);
        info!(
            "Match cache enabled ({} entries, TTL: {}s)",
            settings.cache.max_entries, settings.cache.ttl_secs
        );
    }

    let app_state = AppState::new(matchmaker).with_max_pool_size(settings.matching.max_pool_size);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
