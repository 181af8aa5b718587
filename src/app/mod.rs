use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{config::AppConfig, database::DbManager, model::SubscriberStore, Result};

// ###################################
// ->  Structs
// ###################################
/// The server: owns the listener and everything the routes need.
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Startup sequence: pool, migrations, state, listener.
    ///
    /// A failed migration is logged and startup goes on, `/health` has to be served even
    /// while the database is down. Subscribing answers `500` until storage is back and migrated.
    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let dm = DbManager::init(config);
        if let Err(er) = dm.migrate().await {
            error!("{:<20} - {er}", "Migrations FAILED");
        }

        let app_state = AppState::new(dm);
        let listener = bind(config).await?;

        Ok(App::new(app_state, listener))
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Binds the address from `net_config`. Port `0` lets the OS pick a free port.
pub async fn bind(config: &AppConfig) -> Result<TcpListener> {
    let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    info!("{:<20} - {}", "Listening on:", addr);

    Ok(listener)
}

pub struct InternalState {
    pub subscriber_store: SubscriberStore,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(database_mgr: DbManager) -> Self {
        let subscriber_store = SubscriberStore::new(&database_mgr);

        AppState(Arc::new(InternalState { subscriber_store }))
    }
}
