use std::time::Duration;

use moka::future::Cache;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::OfferView;

const MAX_ENTRIES: u64 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Made,
    Received,
}

/// Taken before reading the store. A list assembled from that read is only cached if no
/// invalidation happened in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Short-lived per-user copies of the assembled offer lists. Mutations drop the entries of
/// everyone involved so the next read reassembles them.
pub struct ViewCache {
    views: Option<Cache<(Uuid, ViewKind), Vec<OfferView>>>,
    // bumped by every invalidation, held for reading while a list is stored
    epoch: RwLock<u64>,
}

impl ViewCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        let views = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build()
        });

        Self {
            views,
            epoch: RwLock::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.views.is_some()
    }

    pub async fn ticket(&self) -> Ticket {
        Ticket(*self.epoch.read().await)
    }

    pub async fn get(&self, user_id: Uuid, kind: ViewKind) -> Option<Vec<OfferView>> {
        self.views.as_ref()?.get(&(user_id, kind)).await
    }

    pub async fn put(&self, ticket: Ticket, user_id: Uuid, kind: ViewKind, views: Vec<OfferView>) {
        let cache = match &self.views {
            Some(cache) => cache,
            None => return,
        };

        let epoch = self.epoch.read().await;

        if *epoch != ticket.0 {
            tracing::debug!(%user_id, ?kind, "offers changed while listing, not caching");
            return;
        }

        cache.insert((user_id, kind), views).await;
    }

    #[tracing::instrument(skip(self))]
    pub async fn invalidate(&self, user_ids: &[Uuid]) {
        let mut epoch = self.epoch.write().await;
        *epoch += 1;

        if let Some(cache) = &self.views {
            for user_id in user_ids {
                cache.invalidate(&(*user_id, ViewKind::Made)).await;
                cache.invalidate(&(*user_id, ViewKind::Received)).await;
            }
        }
    }

    pub async fn invalidate_all(&self) {
        let mut epoch = self.epoch.write().await;
        *epoch += 1;

        if let Some(cache) = &self.views {
            cache.invalidate_all();
        }
    }
}
