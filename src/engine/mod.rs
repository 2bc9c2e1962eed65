mod helpers;
mod listing_api;
mod offer_api;
mod profile_api;
mod rating_api;

use std::sync::Arc;

use chrono::Duration;
use oso::Oso;

use crate::{
    api::API,
    auth::authorizor,
    cache::ViewCache,
    config::{Config, StoreMode},
    error::Error,
    retry::RetryPolicy,
    store::{MemoryStore, PgStore, Store},
};

/// How long an offer created with the expiry flag stays open.
pub const OFFER_EXPIRY_HOURS: i64 = 24;

pub struct Engine {
    store: Arc<dyn Store>,
    authorizor: Oso,
    retry: RetryPolicy,
    cache: ViewCache,
}

impl Engine {
    pub fn new(store: Arc<dyn Store>, retry: RetryPolicy, cache: ViewCache) -> Result<Self, Error> {
        Ok(Self {
            store,
            authorizor: authorizor::new()?,
            retry,
            cache,
        })
    }

    /// Builds the store the configuration asks for. There is no fallback between modes.
    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let store: Arc<dyn Store> = match &config.store {
            StoreMode::Memory { seed } => {
                tracing::warn!(seed, "no database configured, serving offers from memory");

                if *seed {
                    Arc::new(MemoryStore::with_mock_data())
                } else {
                    Arc::new(MemoryStore::new())
                }
            }
            StoreMode::Postgres {
                url,
                max_connections,
            } => {
                tracing::info!(max_connections, "connecting to postgres");
                Arc::new(PgStore::new(url, *max_connections).await?)
            }
        };

        Self::new(
            store,
            config.retry.clone(),
            ViewCache::new(config.view_cache_ttl),
        )
    }

    pub fn offer_expiry() -> Duration {
        Duration::hours(OFFER_EXPIRY_HOURS)
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(Error::unauthorized_error())
    }
}

impl API for Engine {}

#[test]
fn new_engine() {
    use tokio_test::block_on;

    let config = Config {
        store: StoreMode::Memory { seed: true },
        ..Config::default()
    };

    block_on(Engine::from_config(&config)).unwrap();
}
