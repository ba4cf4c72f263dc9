//! Service lifecycle as seen by the host player: login, browse-source registration, and the
//! browse/playback entry points bound to the current session.
use crate::api::{Catalog, Session};
use crate::config::Config;
use crate::error::{AdapterError, AdapterResult};
use crate::models::{BrowseSource, PlayableTrack, SearchSection, TreeNode};
use crate::playback::{Playback, PlaybackBackend, PlayerState};
use crate::router::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// What the service needs from the host player.
pub trait Host: Send + Sync {
    fn add_browse_source(&self, source: BrowseSource);
    fn remove_browse_source(&self, name: &str);
    fn push_toast(&self, level: ToastLevel, title: &str, message: &str);
}

/// A host that only logs; used by the command line.
pub struct LoggingHost;

impl Host for LoggingHost {
    fn add_browse_source(&self, source: BrowseSource) {
        info!(name = %source.name, uri = %source.uri, "browse source registered");
    }

    fn remove_browse_source(&self, name: &str) {
        info!(name, "browse source removed");
    }

    fn push_toast(&self, level: ToastLevel, title: &str, message: &str) {
        match level {
            ToastLevel::Success => info!("{}: {}", title, message),
            ToastLevel::Error => warn!("{}: {}", title, message),
        }
    }
}

pub struct TidalService<B> {
    config: RwLock<Config>,
    catalog: Arc<dyn Catalog>,
    router: Router,
    playback: Playback<B>,
    host: Arc<dyn Host>,
    session: RwLock<Option<Session>>,
}

impl<B: PlaybackBackend> TidalService<B> {
    pub fn new(config: Config, catalog: Arc<dyn Catalog>, backend: B, host: Arc<dyn Host>) -> Self {
        let router = Router::new(catalog.clone(), &config.service_prefix, &config.service_name)
            .with_search_limit(config.search_limit);
        Self {
            config: RwLock::new(config),
            catalog,
            router,
            playback: Playback::new(backend),
            host,
            session: RwLock::new(None),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn playback(&self) -> &Playback<B> {
        &self.playback
    }

    pub async fn is_logged_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    pub async fn browse_source(&self) -> BrowseSource {
        let cfg = self.config.read().await;
        BrowseSource {
            name: cfg.service_name.clone(),
            uri: cfg.service_prefix.clone(),
            plugin_type: "music_service".into(),
            plugin_name: cfg.service_prefix.clone(),
            albumart: format!(
                "/albumart?sourceicon=music_service/{0}/{0}.svg",
                cfg.service_prefix
            ),
        }
    }

    /// Log in with the configured account, if any. Without credentials the service stays
    /// unregistered; a rejected login is reported to the user, not returned.
    pub async fn on_start(&self) -> AdapterResult<()> {
        info!("on_start");
        let creds = {
            let cfg = self.config.read().await;
            cfg.credentials().map(|(u, p)| (u.to_string(), p.to_string()))
        };
        match creds {
            Some((u, p)) => {
                if let Err(e) = self.login(&u, &p).await {
                    let title = self.login_toast_title().await;
                    warn!("login on start failed: {}", e);
                    self.host.push_toast(ToastLevel::Error, &title, "Account login failed.");
                }
            }
            None => info!("no credentials configured; service stays disabled"),
        }
        Ok(())
    }

    pub async fn on_stop(&self) -> AdapterResult<()> {
        info!("on_stop");
        let name = self.config.read().await.service_name.clone();
        self.host.remove_browse_source(&name);
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> AdapterResult<()> {
        let session = self
            .catalog
            .login(username, password)
            .await
            .map_err(|e| AdapterError::Authentication {
                reason: format!("{:#}", e),
            })?;
        let was_registered = self.session.write().await.replace(session).is_some();
        if !was_registered {
            let source = self.browse_source().await;
            self.host.add_browse_source(source);
        }
        Ok(())
    }

    async fn login_toast_title(&self) -> String {
        format!("{} Account Login", self.config.read().await.service_name)
    }

    /// Store new credentials and log in with them, replacing any previous session.
    pub async fn save_account(&self, username: &str, password: &str) -> AdapterResult<()> {
        info!(username, "save_account");
        {
            let mut cfg = self.config.write().await;
            cfg.username = Some(username.to_string());
            cfg.password = Some(password.to_string());
        }
        if username.is_empty() || password.is_empty() {
            return Ok(());
        }

        let title = self.login_toast_title().await;
        match self.login(username, password).await {
            Ok(()) => {
                let name = self.config.read().await.service_name.clone();
                self.host.push_toast(
                    ToastLevel::Success,
                    &title,
                    &format!("You have been successfully logged in to your {} account", name),
                );
            }
            Err(e) => {
                warn!("save_account login failed: {}", e);
                if self.session.write().await.take().is_some() {
                    let name = self.config.read().await.service_name.clone();
                    self.host.remove_browse_source(&name);
                }
                self.host.push_toast(ToastLevel::Error, &title, "Account login failed.");
            }
        }
        Ok(())
    }

    pub async fn logout(&self) -> AdapterResult<()> {
        info!("logout");
        let name = {
            let mut cfg = self.config.write().await;
            cfg.password = Some(String::new());
            cfg.service_name.clone()
        };
        *self.session.write().await = None;
        self.host.remove_browse_source(&name);
        self.host.push_toast(
            ToastLevel::Success,
            &format!("{} Account Log out", name),
            &format!("You have been successfully logged out of your {} account", name),
        );
        Ok(())
    }

    async fn current_session(&self) -> AdapterResult<Session> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(AdapterError::NotLoggedIn)
    }

    pub async fn browse(&self, uri: &str) -> AdapterResult<TreeNode> {
        let session = self.current_session().await?;
        self.router.resolve(&session, uri).await
    }

    pub async fn search(&self, query: &str) -> AdapterResult<Vec<SearchSection>> {
        let session = self.current_session().await?;
        self.router.search(&session, query).await
    }

    pub async fn explode_uri(&self, uri: &str) -> AdapterResult<PlayableTrack> {
        let session = self.current_session().await?;
        self.router.explode_uri(&session, uri).await
    }

    pub async fn clear_add_play_track(&self, track: &PlayableTrack) -> AdapterResult<()> {
        self.playback.clear_add_play_track(track).await
    }

    pub async fn seek(&self, position_ms: u64) -> AdapterResult<()> {
        self.playback.seek(position_ms).await
    }

    pub async fn stop(&self) -> AdapterResult<()> {
        self.playback.stop().await
    }

    pub async fn pause(&self) -> AdapterResult<()> {
        self.playback.pause().await
    }

    pub async fn resume(&self) -> AdapterResult<()> {
        self.playback.resume().await
    }

    pub async fn get_state(&self) -> AdapterResult<PlayerState> {
        self.playback.get_state().await
    }
}
