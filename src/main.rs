use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use fundboard::config::load_config;
use fundboard::infrastructure::logger::Logger;
use fundboard::infrastructure::storage::FileStorage;
use fundboard::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    let _log_guard = Logger::init(&config.logging)?;

    info!("看板服务启动");

    let storage = Arc::new(FileStorage::open(&config.storage.path)?);
    info!(path = %storage.path().display(), "本地存储已就绪");

    let state = AppState::new(&config, storage);
    let app = router(state, Duration::from_secs(config.http.timeout_seconds));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 服务运行在 http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已安全关闭");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "无法监听停止信号");
    }
    info!("收到停止信号，正在关闭服务...");
}
