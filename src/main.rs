//! Wiring & DI. Entry point: load config, bootstrap adapters once, inject into services, run UI.
//! No business logic here. Clients built here live for the whole process; there is no teardown.

use cronscribe::adapters::ai::{MockAiAdapter, OpenAiAdapter};
use cronscribe::adapters::ratelimit::{InMemoryRateLimiter, UpstashRateLimiter};
use cronscribe::adapters::ui::tui::TuiInputPort;
use cronscribe::ports::{AiPort, InputPort, RateLimiterPort};
use cronscribe::shared::config::{AppConfig, RateLimitBackend};
use cronscribe::usecases::{
    DescriptionTranslationService, RequestGuard, ScheduleTranslationService,
};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    // --- Rate limiter (one instance shared by both flows) ---
    let window = Duration::from_secs(cfg.rate_limit_window_secs_or_default());
    let max_requests = cfg.rate_limit_max_requests_or_default();
    let prefix = cfg.rate_limit_prefix_or_default();
    let backend = match cfg.rate_limit_backend() {
        Ok(backend) => backend,
        Err(e) => anyhow::bail!("config: {}", e),
    };
    let limiter: Arc<dyn RateLimiterPort> = match backend {
        RateLimitBackend::Upstash { url, token } => {
            info!(
                %url,
                max_requests,
                window_secs = window.as_secs(),
                %prefix,
                "rate limiter: Upstash Redis"
            );
            Arc::new(UpstashRateLimiter::new(
                url,
                token,
                max_requests,
                window,
                prefix,
                Duration::from_secs(cfg.rate_limit_timeout_secs_or_default()),
            ))
        }
        RateLimitBackend::InMemory => {
            info!(
                max_requests,
                window_secs = window.as_secs(),
                %prefix,
                "rate limiter: in-memory (single instance)"
            );
            Arc::new(InMemoryRateLimiter::new(max_requests, window, prefix))
        }
    };
    let fail_open = cfg.rate_limit_fail_open();
    if fail_open {
        warn!("rate limiter is fail-open: backend errors admit requests");
    }
    let guard = Arc::new(RequestGuard::new(
        limiter,
        cfg.default_identity_or_default(),
        fail_open,
    ));

    // --- AI boundary ---
    let ai: Arc<dyn AiPort> = if cfg.is_ai_configured() {
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "AI enabled with OpenAI adapter"
        );
        Arc::new(OpenAiAdapter::new(
            cfg.ai_api_url_or_default(),
            cfg.ai_api_key().unwrap_or_default(),
            cfg.ai_model_or_default(),
            Duration::from_secs(cfg.ai_timeout_secs_or_default()),
        ))
    } else {
        warn!("CRONSCRIBE_AI_API_KEY not set, using mock AI adapter");
        Arc::new(MockAiAdapter::new())
    };

    // --- Services ---
    let schedule_service = Arc::new(ScheduleTranslationService::new(
        Arc::clone(&ai),
        Arc::clone(&guard),
    ));
    let description_service = Arc::new(DescriptionTranslationService::new(ai, guard));

    cronscribe::adapters::ui::init_ui();

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        schedule_service,
        description_service,
        cfg.client_addr.clone(),
    ));

    // --- Run (main menu -> Generate / Describe / Help) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
