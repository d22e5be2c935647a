//! Live, read-only view of the three backend collections.
//!
//! [`LiveStore`] owns one subscription per collection. Every snapshot it
//! hands out is decoded from the latest full collection contents; nothing is
//! patched incrementally, so repeated or reordered deliveries cannot leave
//! stale records behind.

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::warn;
use venus_gecko_core::{Gecko, Morph, SiteSettings};

use crate::backend::{BackendError, Collection, RecordStore, SETTINGS_DOCUMENT, Snapshot};

/// Decoded contents of all collections at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub geckos: Vec<Gecko>,
    pub morphs: Vec<Morph>,
    pub settings: SiteSettings,
    /// The gecko collection has delivered at least one snapshot.
    pub loaded: bool,
}

impl StoreSnapshot {
    #[must_use]
    pub fn gecko(&self, id: &str) -> Option<&Gecko> {
        self.geckos.iter().find(|g| g.id.as_str() == id)
    }

    #[must_use]
    pub fn morph(&self, id: &str) -> Option<&Morph> {
        self.morphs.iter().find(|m| m.id.as_str() == id)
    }
}

/// Subscriptions to the gecko, morph and settings collections.
#[derive(Debug)]
pub struct LiveStore {
    geckos: watch::Receiver<Option<Snapshot>>,
    morphs: watch::Receiver<Option<Snapshot>>,
    settings: watch::Receiver<Option<Snapshot>>,
}

impl LiveStore {
    /// Subscribe to every collection of `store`.
    pub fn subscribe<S: RecordStore + ?Sized>(store: &S) -> Self {
        Self {
            geckos: store.subscribe(Collection::Geckos),
            morphs: store.subscribe(Collection::Morphs),
            settings: store.subscribe(Collection::Settings),
        }
    }

    /// Decode the latest snapshots.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let geckos = self.geckos.borrow();
        let morphs = self.morphs.borrow();
        let settings = self.settings.borrow();

        StoreSnapshot {
            loaded: geckos.is_some(),
            geckos: decode_all(Collection::Geckos, geckos.as_ref()),
            morphs: decode_all(Collection::Morphs, morphs.as_ref()),
            settings: decode_settings(settings.as_ref()),
        }
    }

    /// Wait until any collection publishes a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] once the backend has dropped
    /// its side of a subscription.
    pub async fn changed(&mut self) -> Result<(), BackendError> {
        let result = tokio::select! {
            r = self.geckos.changed() => r,
            r = self.morphs.changed() => r,
            r = self.settings.changed() => r,
        };
        result.map_err(|_| BackendError::Unavailable("record store subscription closed".to_string()))
    }

    /// Wait until the gecko collection has been delivered once.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] if the subscription closes first.
    pub async fn loaded(&mut self) -> Result<(), BackendError> {
        self.geckos
            .wait_for(Option::is_some)
            .await
            .map(|_| ())
            .map_err(|_| BackendError::Unavailable("record store subscription closed".to_string()))
    }

    /// Wait until every collection has been delivered once.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] if a subscription closes first.
    pub async fn synced(&mut self) -> Result<(), BackendError> {
        for receiver in [&mut self.geckos, &mut self.morphs, &mut self.settings] {
            receiver
                .wait_for(Option::is_some)
                .await
                .map_err(|_| BackendError::Unavailable("record store subscription closed".to_string()))?;
        }
        Ok(())
    }
}

/// Decode every document, skipping the ones that do not fit.
fn decode_all<T: DeserializeOwned>(collection: Collection, snapshot: Option<&Snapshot>) -> Vec<T> {
    let Some(snapshot) = snapshot else {
        return Vec::new();
    };
    snapshot
        .documents
        .iter()
        .filter_map(|doc| match doc.decode() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(%collection, id = %doc.id, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect()
}

fn decode_settings(snapshot: Option<&Snapshot>) -> SiteSettings {
    let Some(doc) = snapshot.and_then(|s| s.get(SETTINGS_DOCUMENT)) else {
        return SiteSettings::default();
    };
    doc.decode().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring undecodable site settings");
        SiteSettings::default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::Fields;
    use crate::backend::memory::MemoryBackend;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[test]
    fn test_snapshot_decodes_and_skips_bad_records() {
        let backend = MemoryBackend::new();
        backend.insert(Collection::Geckos, "g1", fields(json!({"name": "Luna", "price": 1000})));
        backend.insert(Collection::Geckos, "g2", fields(json!({"name": ["not", "a", "string"]})));
        backend.insert(Collection::Morphs, "m1", fields(json!({"ko": "릴리", "en": "Lilly", "order": 1})));
        backend.insert(
            Collection::Settings,
            "site",
            fields(json!({"landingImageUrl": "https://img/main.jpg"})),
        );

        let store = LiveStore::subscribe(&backend);
        let snapshot = store.snapshot();
        assert!(snapshot.loaded);
        assert_eq!(snapshot.geckos.len(), 1);
        assert_eq!(snapshot.gecko("g1").unwrap().name, "Luna");
        assert_eq!(snapshot.morph("m1").unwrap().en, "Lilly");
        assert_eq!(
            snapshot.settings.landing_image_url.as_deref(),
            Some("https://img/main.jpg")
        );
    }

    #[test]
    fn test_fractional_morph_order_keeps_morph() {
        let backend = MemoryBackend::new();
        backend.insert(Collection::Morphs, "m1", fields(json!({"ko": "릴리", "en": "Lilly", "order": 1.5})));
        backend.insert(Collection::Morphs, "m2", fields(json!({"ko": "하이포", "en": "Hypo", "order": 2.0})));

        let snapshot = LiveStore::subscribe(&backend).snapshot();
        assert_eq!(snapshot.morphs.len(), 2);
        assert_eq!(snapshot.morph("m1").unwrap().order, 2);
        assert_eq!(snapshot.morph("m2").unwrap().order, 2);
    }

    #[test]
    fn test_not_loaded_before_first_snapshot() {
        let (_tx, rx) = watch::channel(None);
        let store = LiveStore {
            geckos: rx.clone(),
            morphs: rx.clone(),
            settings: rx,
        };
        let snapshot = store.snapshot();
        assert!(!snapshot.loaded);
        assert!(snapshot.geckos.is_empty());
        assert_eq!(snapshot.settings, SiteSettings::default());
    }

    #[tokio::test]
    async fn test_changed_fires_on_publish() {
        let backend = MemoryBackend::new();
        let mut store = LiveStore::subscribe(&backend);
        backend.insert(Collection::Morphs, "m1", fields(json!({"ko": "a", "en": "a", "order": 1})));
        store.changed().await.unwrap();
        assert_eq!(store.snapshot().morphs.len(), 1);
    }

    #[tokio::test]
    async fn test_synced_waits_for_every_collection() {
        let (geckos_tx, geckos) = watch::channel(None);
        let (morphs_tx, morphs) = watch::channel(None);
        let (settings_tx, settings) = watch::channel(None);
        let mut store = LiveStore {
            geckos,
            morphs,
            settings,
        };

        geckos_tx.send_replace(Some(Snapshot::default()));
        let pending = tokio::time::timeout(std::time::Duration::from_millis(20), store.synced()).await;
        assert!(pending.is_err());

        morphs_tx.send_replace(Some(Snapshot::default()));
        settings_tx.send_replace(Some(Snapshot::default()));
        store.synced().await.unwrap();

        drop(geckos_tx);
        assert!(store.loaded().await.is_ok());
    }
}
