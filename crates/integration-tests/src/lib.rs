//! Integration tests for Venus Gecko.
//!
//! Black-box scenarios over the public storefront API, backed by the
//! in-memory backend so no test touches the network.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p venus-gecko-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Catalog derivation through the application context
//! - `lineage` - Details view navigation over parent references
//! - `admin_gateway` - Admin mutations and their loop-back into the catalog

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value, json};
use venus_gecko_core::{Email, Language};
use venus_gecko_storefront::Storefront;
use venus_gecko_storefront::backend::memory::MemoryBackend;
use venus_gecko_storefront::backend::{Collection, Fields};

/// Admin account registered on every fixture backend.
pub const ADMIN_EMAIL: &str = "admin@venusgecko.kr";
/// Password of [`ADMIN_EMAIL`].
pub const ADMIN_PASSWORD: &str = "correct horse";

/// Backend plus an application context subscribed to it.
pub struct TestContext {
    pub backend: Arc<MemoryBackend>,
    pub app: Storefront<MemoryBackend>,
}

impl TestContext {
    /// Context over the breeding fixture, starting in `language`.
    ///
    /// # Panics
    ///
    /// Panics if the fixture email fails to parse.
    #[must_use]
    pub fn new(language: Language) -> Self {
        let backend = Arc::new(seeded_backend());
        let app = Storefront::new(Arc::clone(&backend), language);
        Self { backend, app }
    }

    /// Sign in as the fixture admin.
    ///
    /// # Panics
    ///
    /// Panics if the fixture credentials are rejected.
    pub async fn sign_in(&self) {
        self.app
            .gateway()
            .sign_in(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD))
            .await
            .expect("Fixture admin sign-in failed");
    }
}

/// Convert a JSON object literal into document fields.
#[must_use]
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// A small breeding program:
///
/// - morphs `lilly` (order 1) and `hypo` (order 2)
/// - breeders `zeus` (male) and `hera` (female), both Lilly White
/// - `grandpa`, sire of `zeus`
/// - offspring `luna` and `sol` (available) and `nova` (sold)
/// - `stray`, available, with a deleted morph and a deleted dam
///
/// # Panics
///
/// Panics if the fixture email fails to parse.
#[must_use]
pub fn seeded_backend() -> MemoryBackend {
    let backend = MemoryBackend::new().with_admin(
        Email::parse(ADMIN_EMAIL).expect("Fixture email is valid"),
        ADMIN_PASSWORD,
    );

    backend.insert(Collection::Morphs, "lilly", fields(json!({"ko": "릴리 화이트", "en": "Lilly White", "order": 1})));
    backend.insert(Collection::Morphs, "hypo", fields(json!({"ko": "하이포", "en": "Hypo", "order": 2})));

    let geckos = [
        ("grandpa", json!({"name": "Grandpa", "gender": "Male", "status": "Breeder", "morphId": "hypo",
                           "hatchDate": "2018-04-01", "photos": ["grandpa.jpg"]})),
        ("zeus", json!({"name": "Zeus", "gender": "Male", "status": "Breeder", "morphId": "lilly",
                        "hatchDate": "2021-05-01", "sireId": "grandpa", "photos": ["zeus-1.jpg", "zeus-2.jpg"]})),
        ("hera", json!({"name": "Hera", "gender": "Female", "status": "Breeder", "morphId": "lilly",
                        "hatchDate": "2021-07-01", "photos": ["hera.jpg"]})),
        ("luna", json!({"name": "Luna", "gender": "Female", "status": "Available", "morphId": "lilly",
                        "hatchDate": "2024-06-01", "price": 450_000, "sireId": "zeus", "damId": "hera",
                        "photos": ["luna.jpg"]})),
        ("sol", json!({"name": "Sol", "gender": "Male", "status": "Available", "morphId": "hypo",
                       "hatchDate": "2024-03-01", "price": 250_000, "sireId": "zeus", "damId": "hera"})),
        ("nova", json!({"name": "Nova", "gender": "Unknown", "status": "Sold", "morphId": "lilly",
                        "hatchDate": "2023-09-01", "price": 300_000, "sireId": "zeus"})),
        ("stray", json!({"name": "Stray", "status": "Available", "morphId": "deleted-morph",
                         "morphName": "Old Morph", "hatchDate": "2024-08-01", "price": 100_000,
                         "damId": "deleted-dam"})),
    ];
    for (id, record) in geckos {
        backend.insert(Collection::Geckos, id, fields(record));
    }

    backend
}
