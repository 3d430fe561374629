//! Config file watcher for route hot reload.
//!
//! # Responsibilities
//! - Notice writes to the config file
//! - Reload and validate it
//! - Hand the new route list to the server
//!
//! # Design Decisions
//! - Watches the parent directory: editors often replace the file by rename
//! - Events for other files in that directory are ignored
//! - Only the routes are sent, and only when they differ from the last set;
//!   listener, timeout and logging changes still need a restart
//! - An invalid file is logged and skipped; the server keeps its table

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouteConfig;

/// Watches one config file and streams its route list on change.
pub struct ConfigWatcher {
    path: PathBuf,
    current: Vec<RouteConfig>,
    update_tx: mpsc::UnboundedSender<Vec<RouteConfig>>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, whose routes are currently `current`.
    ///
    /// Returns the watcher and the receiver the server reloads from.
    pub fn new(
        path: &Path,
        current: Vec<RouteConfig>,
    ) -> (Self, mpsc::UnboundedReceiver<Vec<RouteConfig>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            current,
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Updates stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let ConfigWatcher {
            path,
            current,
            update_tx,
        } = self;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name: Option<OsString> = path.file_name().map(ToOwned::to_owned);
        let last = Mutex::new(current);
        let config_path = path.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = %e, "Config watch error");
                    return;
                }
            };
            if !(event.kind.is_modify() || event.kind.is_create()) {
                return;
            }
            let touches_config = event
                .paths
                .iter()
                .any(|p| p.file_name().is_some() && p.file_name() == file_name.as_deref());
            if touches_config {
                reload_routes(&config_path, &last, &update_tx);
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

fn reload_routes(
    path: &Path,
    last: &Mutex<Vec<RouteConfig>>,
    update_tx: &mpsc::UnboundedSender<Vec<RouteConfig>>,
) {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Ignoring invalid config change");
            return;
        }
    };

    let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
    if *last == config.routes {
        tracing::debug!(path = ?path, "Config changed, routes unchanged");
        return;
    }

    if update_tx.send(config.routes.clone()).is_err() {
        tracing::debug!("Route receiver dropped, skipping reload");
        return;
    }

    tracing::info!(path = ?path, routes = config.routes.len(), "Config routes changed");
    *last = config.routes;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    const ONE_ROUTE: &str = r#"
        [[routes]]
        name = "one"
        method = "GET"
        pattern = "/one"
    "#;

    const TWO_ROUTES: &str = r#"
        [[routes]]
        name = "one"
        method = "GET"
        pattern = "/one"

        [[routes]]
        name = "two"
        method = "POST"
        pattern = "/two/:id"
    "#;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dispatch-router-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_sends_changed_routes() {
        let dir = temp_dir();
        let path = dir.join("routes.toml");
        fs::write(&path, ONE_ROUTE).unwrap();

        let initial = load_config(&path).unwrap().routes;
        let (watcher, mut updates) = ConfigWatcher::new(&path, initial);
        let _handle = watcher.run().unwrap();

        // Skipped: does not parse.
        fs::write(&path, "[[routes]]\nname = 1").unwrap();
        fs::write(&path, TWO_ROUTES).unwrap();

        let routes = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                let routes = updates.recv().await.expect("watcher closed");
                if routes.len() == 2 {
                    return routes;
                }
            }
        })
        .await
        .expect("no route update received");

        assert_eq!(routes[1].name, "two");
        assert_eq!(routes[1].pattern, "/two/:id");

        let _ = fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_ignores_other_files() {
        let dir = temp_dir();
        let path = dir.join("routes.toml");
        fs::write(&path, ONE_ROUTE).unwrap();

        let initial = load_config(&path).unwrap().routes;
        let (watcher, mut updates) = ConfigWatcher::new(&path, initial);
        let _handle = watcher.run().unwrap();

        fs::write(dir.join("other.toml"), TWO_ROUTES).unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(updates.try_recv().is_err());

        let _ = fs::remove_dir_all(dir);
    }
}
