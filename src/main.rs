mod console;

use console::{Command, ConsoleRenderer};
use feed_service::{
    CommentTreeLoader, FeedRenderer, FreshnessCheck, FreshnessPoller, NavigationEvent, Navigator,
    PaginationController,
};
use heronews_core::{CoreError, ErrorExt, FeedCategory, FeedConfig};
use hn_client::{HackerNewsApi, HackerNewsClient, StoryListFetcher};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heronews=info,hn_client=info,feed_service=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => FeedConfig::load(&path).map_err(|e| {
            e.log_error();
            CoreError::from(e)
        })?,
        None => FeedConfig::default(),
    };

    tracing::info!("Starting HeroNews against {}", config.api_base());

    let client = Arc::new(HackerNewsClient::new(&config)?);
    let api: Arc<dyn HackerNewsApi> = client.clone();
    let renderer = build_renderer();

    let pagination = Arc::new(PaginationController::new(
        StoryListFetcher::with_page_size(Arc::clone(&api), config.page_size),
        Arc::clone(&renderer),
        config.fetch_throttle(),
    ));

    let poller = FreshnessPoller::spawn(
        FreshnessCheck::new(Arc::clone(&api), pagination.last_seen()),
        Arc::clone(&renderer),
        config.poll_interval(),
    );

    let navigator = Arc::new(Navigator::new(
        Arc::clone(&pagination),
        CommentTreeLoader::new(api),
        renderer,
    ));

    let (events, receiver) = mpsc::channel(16);
    let navigation = tokio::spawn(navigator.run(receiver));

    console::print_help();
    let _ = events
        .send(NavigationEvent::CategoryChanged(FeedCategory::default()))
        .await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match console::parse_command(&line) {
            Ok(Command::Navigate(event)) => {
                if events.send(event).await.is_err() {
                    tracing::warn!("Navigation stopped, exiting");
                    break;
                }
            }
            Ok(Command::Help) => console::print_help(),
            Ok(Command::Quit) => break,
            Err(e) => println!("{}", e.user_friendly_message()),
        }
    }

    drop(events);
    if let Err(e) = navigation.await {
        tracing::error!("Navigation task failed: {}", e);
    }
    poller.shutdown().await;

    let metrics = client.get_metrics().await;
    tracing::info!(
        "Shutting down after {} requests ({} failed, avg {:?})",
        metrics.total_requests,
        metrics.failed_requests,
        metrics.average_response_time()
    );
    for (endpoint, stats) in metrics.endpoints() {
        tracing::info!(
            "  {}: {} requests, {:.0}% ok, avg {:?}",
            endpoint,
            stats.request_count,
            stats.success_rate() * 100.0,
            stats.average_response_time()
        );
    }

    Ok(())
}

#[cfg(feature = "desktop")]
fn build_renderer() -> Arc<dyn FeedRenderer> {
    Arc::new(feed_service::DesktopNotifier::new(ConsoleRenderer::new()))
}

#[cfg(not(feature = "desktop"))]
fn build_renderer() -> Arc<dyn FeedRenderer> {
    Arc::new(ConsoleRenderer::new())
}
