//! WooCommerce REST API catalog store.
//!
//! Writes generated products into a live WooCommerce site.
//!
//! # API Reference
//!
//! - Base URL: `{site}/wp-json/wc/v3`
//! - Authentication: HTTP basic auth with a REST API consumer key/secret
//!   (requires HTTPS on the site)
//!
//! # Images
//!
//! The REST API sideloads product images from a `src` URL. Generated
//! [`ImageSpec`]s are therefore registered locally and resolved to
//! placeholder URLs when the product or variation referencing them is sent.
//! Each registered image is sent once and then forgotten.

mod types;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use smoothgen_core::{ImageId, Product, ProductId, Taxonomy, TermId, Variation, VariationId};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use url::Url;

use self::types::{
    CreatedResource, ErrorBody, ImageRef, MenuOrderUpdate, NewTerm, ProductPayload,
    TermResource, VariationBatch, VariationPayload,
};
use super::{CatalogStore, StoreError};
use crate::image::ImageSpec;

/// REST namespace appended to the site URL.
const API_PATH: &str = "/wp-json/wc/v3";

/// Largest page the REST API serves.
const MAX_PER_PAGE: usize = 100;

/// Request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a WooCommerce site.
///
/// Implements `Debug` manually to redact the consumer secret.
#[derive(Clone)]
pub struct WooCommerceConfig {
    /// Site root (e.g., `https://shop.example.com`).
    pub base_url: Url,
    /// REST API consumer key (`ck_...`).
    pub consumer_key: String,
    /// REST API consumer secret (`cs_...`).
    pub consumer_secret: SecretString,
    /// Placeholder image service images are sideloaded from.
    pub image_base_url: Url,
}

impl std::fmt::Debug for WooCommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceConfig")
            .field("base_url", &self.base_url.as_str())
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("image_base_url", &self.image_base_url.as_str())
            .finish()
    }
}

/// Catalog store backed by the WooCommerce REST API.
#[derive(Clone)]
pub struct WooCommerceStore {
    inner: Arc<WooCommerceStoreInner>,
}

struct WooCommerceStoreInner {
    client: reqwest::Client,
    api_root: String,
    consumer_key: String,
    consumer_secret: SecretString,
    image_base_url: Url,
    images: Mutex<ImageRegistry>,
    /// Variations created through this store, per parent, in creation order.
    variations: Mutex<HashMap<ProductId, Vec<VariationId>>>,
}

/// Images registered but not sent yet.
#[derive(Debug, Default)]
struct ImageRegistry {
    last_id: i32,
    pending: HashMap<ImageId, ImageRef>,
}

impl WooCommerceStore {
    /// Create a new WooCommerce store client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &WooCommerceConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("smoothgen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let api_root = format!(
            "{}{API_PATH}",
            config.base_url.as_str().trim_end_matches('/')
        );

        Ok(Self {
            inner: Arc::new(WooCommerceStoreInner {
                client,
                api_root,
                consumer_key: config.consumer_key.clone(),
                consumer_secret: config.consumer_secret.clone(),
                image_base_url: config.image_base_url.clone(),
                images: Mutex::new(ImageRegistry::default()),
                variations: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// Build an endpoint URL with query parameters.
    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&format!("{}{path}", self.inner.api_root))
            .map_err(|e| StoreError::Parse(format!("Invalid endpoint URL: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(
            &self.inner.consumer_key,
            Some(self.inner.consumer_secret.expose_secret()),
        )
    }

    /// Execute a GET request to the REST API.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StoreError> {
        let url = self.url(path, query)?;
        let response = self.authorize(self.inner.client.get(url)).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request to the REST API.
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.url(path, &[])?;
        let response = self
            .authorize(self.inner.client.post(url))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a PUT request to the REST API.
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.url(path, &[])?;
        let response = self
            .authorize(self.inner.client.put(url))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| StoreError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(status, response).await)
    }

    /// Map an error response to a `StoreError`.
    async fn parse_error(status: StatusCode, response: reqwest::Response) -> StoreError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error_for_status(status, &body)
    }

    /// Remove a registered image, returning its sideload reference.
    async fn take_image(&self, id: ImageId) -> Result<ImageRef, StoreError> {
        self.inner
            .images
            .lock()
            .await
            .pending
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("image {id}")))
    }

    /// Main image first, then the gallery.
    async fn product_images(&self, product: &Product) -> Result<Vec<ImageRef>, StoreError> {
        let mut images = Vec::with_capacity(1 + product.gallery_image_ids.len());
        for id in product.image_id.iter().chain(&product.gallery_image_ids) {
            images.push(self.take_image(*id).await?);
        }
        Ok(images)
    }

    /// Create a term.
    ///
    /// The search page can miss an existing term; the API then answers
    /// `term_exists` with the existing ID, which is returned instead.
    async fn create_term(&self, endpoint: &str, name: &str) -> Result<TermId, StoreError> {
        let url = self.url(endpoint, &[])?;
        let response = self
            .authorize(self.inner.client.post(url))
            .json(&NewTerm { name })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let created: TermResource = response
                .json()
                .await
                .map_err(|e| StoreError::Parse(format!("Failed to parse response: {e}")))?;
            debug!(id = created.id, "Created term");
            return Ok(TermId::new(created.id));
        }

        let body = response.text().await.unwrap_or_default();
        let existing = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|error| error.existing_term_id());
        match existing {
            Some(id) => {
                debug!(id, "Term already exists");
                Ok(TermId::new(id))
            }
            None => Err(error_for_status(status, &body)),
        }
    }
}

/// Endpoint collection for a taxonomy.
const fn term_endpoint(taxonomy: Taxonomy) -> &'static str {
    match taxonomy {
        Taxonomy::ProductCategory => "/products/categories",
        Taxonomy::ProductTag => "/products/tags",
    }
}

/// Map a non-success status and body to a `StoreError`.
fn error_for_status(status: StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| body.to_string(),
        |error| {
            if error.code.is_empty() {
                error.message
            } else {
                format!("{} ({})", error.message, error.code)
            }
        },
    );

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized,
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        _ => StoreError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

fn to_product_id(resource: &CreatedResource) -> ProductId {
    ProductId::new(resource.id)
}

impl CatalogStore for WooCommerceStore {
    #[instrument(skip_all, fields(name = %product.name, kind = %product.kind))]
    async fn insert_product(&self, product: &Product) -> Result<ProductId, StoreError> {
        if let Some(id) = product.id {
            return Err(StoreError::Conflict(format!("product already has ID {id}")));
        }

        let images = self.product_images(product).await?;
        let payload = ProductPayload::new(product, images);
        let created: CreatedResource = self.post("/products", &payload).await?;

        let id = to_product_id(&created);
        info!(%id, "Created product");
        Ok(id)
    }

    #[instrument(skip_all, fields(id = ?product.id))]
    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let id = product
            .id
            .ok_or_else(|| StoreError::NotFound("product has no ID".to_string()))?;

        // Images were sideloaded on create; sending them again would duplicate
        // the attachments.
        let payload = ProductPayload::new(product, Vec::new());
        let _: CreatedResource = self.put(&format!("/products/{id}"), &payload).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(parent = %variation.parent_id))]
    async fn insert_variation(&self, variation: &Variation) -> Result<VariationId, StoreError> {
        if let Some(id) = variation.id {
            return Err(StoreError::Conflict(format!(
                "variation already has ID {id}"
            )));
        }

        let image = match variation.image_id {
            Some(id) => Some(self.take_image(id).await?),
            None => None,
        };
        let payload = VariationPayload::new(variation, image);
        let created: CreatedResource = self
            .post(
                &format!("/products/{}/variations", variation.parent_id),
                &payload,
            )
            .await?;

        let id = VariationId::new(created.id);
        self.inner
            .variations
            .lock()
            .await
            .entry(variation.parent_id)
            .or_default()
            .push(id);
        debug!(%id, "Created variation");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn sort_variations(&self, parent: ProductId) -> Result<(), StoreError> {
        let created = self
            .inner
            .variations
            .lock()
            .await
            .remove(&parent)
            .unwrap_or_default();
        if created.is_empty() {
            return Ok(());
        }

        let update: Vec<MenuOrderUpdate> = created
            .into_iter()
            .zip(0_u32..)
            .map(|(id, menu_order)| MenuOrderUpdate { id, menu_order })
            .collect();

        for chunk in update.chunks(MAX_PER_PAGE) {
            let batch = VariationBatch {
                update: chunk.to_vec(),
            };
            let _: serde_json::Value = self
                .post(&format!("/products/{parent}/variations/batch"), &batch)
                .await?;
        }
        Ok(())
    }

    async fn insert_image(&self, image: &ImageSpec) -> Result<ImageId, StoreError> {
        let src = image
            .placeholder_url(&self.inner.image_base_url)
            .map_err(|e| StoreError::Parse(format!("Invalid image URL: {e}")))?;

        let mut images = self.inner.images.lock().await;
        images.last_id = images
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Conflict("ID space exhausted".to_string()))?;
        let id = ImageId::new(images.last_id);
        images.pending.insert(
            id,
            ImageRef {
                src: src.into(),
                name: image.title.clone(),
                alt: image.title.clone(),
            },
        );
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_or_create_term(
        &self,
        taxonomy: Taxonomy,
        name: &str,
    ) -> Result<TermId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Conflict("term name cannot be empty".to_string()));
        }

        let endpoint = term_endpoint(taxonomy);
        let per_page = MAX_PER_PAGE.to_string();
        let existing: Vec<TermResource> = self
            .get(endpoint, &[("search", name), ("per_page", per_page.as_str())])
            .await?;
        if let Some(term) = existing
            .iter()
            .find(|term| term.name.eq_ignore_ascii_case(name))
        {
            return Ok(TermId::new(term.id));
        }

        self.create_term(endpoint, name).await
    }

    async fn recent_product_ids(&self, limit: usize) -> Result<Vec<ProductId>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let per_page = limit.min(MAX_PER_PAGE).to_string();
        let products: Vec<CreatedResource> = self
            .get(
                "/products",
                &[
                    ("per_page", per_page.as_str()),
                    ("orderby", "date"),
                    ("order", "desc"),
                    ("_fields", "id"),
                ],
            )
            .await?;
        Ok(products.iter().map(to_product_id).collect())
    }

    async fn release_product(&self, parent: ProductId) {
        if self.inner.variations.lock().await.remove(&parent).is_some() {
            debug!(%parent, "Dropped unsorted variations");
        }
    }
}

impl std::fmt::Debug for WooCommerceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceStore")
            .field("api_root", &self.inner.api_root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI32, Ordering};

    use axum::Json;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, Method, Uri, header};
    use serde_json::{Value, json};
    use smoothgen_core::{CurrencyCode, Price, ProductKind, VariationAttributes};

    use super::*;

    fn config() -> WooCommerceConfig {
        WooCommerceConfig {
            base_url: Url::parse("https://shop.example.test/").expect("url"),
            consumer_key: "ck_test".to_string(),
            consumer_secret: SecretString::from("cs_test"),
            image_base_url: Url::parse("https://placehold.co").expect("url"),
        }
    }

    fn image(title: &str) -> ImageSpec {
        ImageSpec {
            width: 300,
            height: 200,
            background: "abcdef".to_string(),
            foreground: "000000".to_string(),
            title: title.to_string(),
        }
    }

    fn variation(parent: ProductId) -> Variation {
        Variation::new(
            parent,
            VariationAttributes::default(),
            Price::from_cents(1999, CurrencyCode::USD),
        )
    }

    // =========================================================================
    // Mock site
    // =========================================================================

    /// A request received by [`MockSite`]. `path` is relative to the REST root.
    #[derive(Debug, Clone)]
    struct Recorded {
        method: Method,
        path: String,
        query: String,
        body: Value,
        authorized: bool,
    }

    type Responder = dyn Fn(&Method, &str) -> (u16, Value) + Send + Sync;

    #[derive(Clone)]
    struct MockState {
        requests: Arc<std::sync::Mutex<Vec<Recorded>>>,
        respond: Arc<Responder>,
    }

    /// Local HTTP server answering like a WooCommerce site, with a store
    /// pointed at it.
    struct MockSite {
        store: WooCommerceStore,
        state: MockState,
        handle: tokio::task::JoinHandle<()>,
    }

    impl MockSite {
        async fn spawn(
            respond: impl Fn(&Method, &str) -> (u16, Value) + Send + Sync + 'static,
        ) -> Self {
            let state = MockState {
                requests: Arc::default(),
                respond: Arc::new(respond),
            };
            let app = axum::Router::new()
                .fallback(record)
                .with_state(state.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind ephemeral port");
            let addr = listener.local_addr().expect("local addr");
            let handle = tokio::spawn(async move {
                axum::serve(listener, app).await.expect("mock site");
            });

            let config = WooCommerceConfig {
                base_url: Url::parse(&format!("http://{addr}")).expect("url"),
                ..config()
            };
            let store = WooCommerceStore::new(&config).expect("client");
            Self {
                store,
                state,
                handle,
            }
        }

        fn requests(&self) -> Vec<Recorded> {
            self.state.requests.lock().expect("requests lock").clone()
        }
    }

    impl Drop for MockSite {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }

    async fn record(
        State(state): State<MockState>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, Json<Value>) {
        let path = uri
            .path()
            .strip_prefix(API_PATH)
            .unwrap_or_else(|| uri.path())
            .to_string();
        let (status, response) = (state.respond)(&method, &path);

        state.requests.lock().expect("requests lock").push(Recorded {
            method,
            path,
            query: uri.query().unwrap_or_default().to_string(),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
            authorized: headers.contains_key(header::AUTHORIZATION),
        });

        let status = StatusCode::from_u16(status).expect("valid status");
        (status, Json(response))
    }

    // =========================================================================
    // Configuration and mapping
    // =========================================================================

    #[test]
    fn test_config_debug_redacts_secret() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("cs_test"));
        assert!(debug.contains("ck_test"));
    }

    #[test]
    fn test_endpoint_urls() {
        let store = WooCommerceStore::new(&config()).expect("client");
        let url = store
            .url("/products", &[("per_page", "10"), ("order", "desc")])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://shop.example.test/wp-json/wc/v3/products?per_page=10&order=desc"
        );
        assert_eq!(term_endpoint(Taxonomy::ProductTag), "/products/tags");
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, ""),
            StoreError::Unauthorized
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, "{}"),
            StoreError::Unauthorized
        ));

        let err = error_for_status(
            StatusCode::NOT_FOUND,
            r#"{"code":"rest_no_route","message":"No route was found."}"#,
        );
        assert!(
            matches!(err, StoreError::NotFound(ref m) if m == "No route was found. (rest_no_route)")
        );

        let err = error_for_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(
            err,
            StoreError::Api { status: 502, ref message } if message == "upstream down"
        ));
    }

    // =========================================================================
    // Images
    // =========================================================================

    #[tokio::test]
    async fn test_images_resolve_in_registration_order() {
        let store = WooCommerceStore::new(&config()).expect("client");
        let first = store.insert_image(&image("Front")).await.expect("image");
        let second = store.insert_image(&image("Back")).await.expect("image");
        assert_eq!(first, ImageId::new(1));
        assert_eq!(second, ImageId::new(2));

        let mut product = Product::new(ProductKind::Simple, "Lorem");
        product.image_id = Some(second);
        product.gallery_image_ids = vec![first];

        let images = store.product_images(&product).await.expect("images");
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Back", "Front"]);
        assert!(
            images[0]
                .src
                .starts_with("https://placehold.co/300x200/abcdef/000000.png")
        );
    }

    #[tokio::test]
    async fn test_images_are_released_once_sent() {
        let store = WooCommerceStore::new(&config()).expect("client");
        let id = store.insert_image(&image("Front")).await.expect("image");

        store.take_image(id).await.expect("registered image");
        let again = store.take_image(id).await;
        assert!(matches!(again, Err(StoreError::NotFound(_))));
        assert!(store.inner.images.lock().await.pending.is_empty());

        let next = store.insert_image(&image("Back")).await.expect("image");
        assert_eq!(next, ImageId::new(2));
    }

    #[tokio::test]
    async fn test_unknown_image_is_not_found() {
        let store = WooCommerceStore::new(&config()).expect("client");
        let result = store.take_image(ImageId::new(3)).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_insert_product_sideloads_images() {
        let site = MockSite::spawn(|_, _| (201, json!({ "id": 31 }))).await;
        let image_id = site.store.insert_image(&image("Front")).await.expect("image");

        let mut product = Product::new(ProductKind::Simple, "Lorem");
        product.image_id = Some(image_id);
        let id = site.store.insert_product(&product).await.expect("insert");
        assert_eq!(id, ProductId::new(31));

        let requests = site.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/products");
        assert!(requests[0].authorized);
        assert_eq!(requests[0].body["images"][0]["name"], "Front");
        assert!(site.store.inner.images.lock().await.pending.is_empty());
    }

    // =========================================================================
    // Terms
    // =========================================================================

    #[tokio::test]
    async fn test_term_search_without_exact_match_creates_term() {
        let site = MockSite::spawn(|method, _| {
            if method == Method::GET {
                (200, json!([{ "id": 7, "name": "Etiam" }]))
            } else {
                (201, json!({ "id": 12, "name": "et" }))
            }
        })
        .await;

        let id = site
            .store
            .find_or_create_term(Taxonomy::ProductTag, "et")
            .await
            .expect("term");
        assert_eq!(id, TermId::new(12));

        let requests = site.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].path, "/products/tags");
        assert_eq!(requests[0].query, "search=et&per_page=100");
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].path, "/products/tags");
        assert_eq!(requests[1].body, json!({ "name": "et" }));
    }

    #[tokio::test]
    async fn test_term_search_exact_match_skips_create() {
        let site = MockSite::spawn(|_, _| {
            (
                200,
                json!([{ "id": 3, "name": "Etiam" }, { "id": 9, "name": "ET" }]),
            )
        })
        .await;

        let id = site
            .store
            .find_or_create_term(Taxonomy::ProductCategory, "et")
            .await
            .expect("term");
        assert_eq!(id, TermId::new(9));

        let requests = site.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/products/categories");
    }

    #[tokio::test]
    async fn test_existing_term_reported_by_create() {
        let site = MockSite::spawn(|method, _| {
            if method == Method::GET {
                (200, json!([]))
            } else {
                (
                    400,
                    json!({
                        "code": "term_exists",
                        "message": "A term with the name provided already exists.",
                        "data": { "status": 400, "resource_id": 42 }
                    }),
                )
            }
        })
        .await;

        let id = site
            .store
            .find_or_create_term(Taxonomy::ProductTag, "Lorem")
            .await
            .expect("existing term");
        assert_eq!(id, TermId::new(42));
    }

    #[tokio::test]
    async fn test_other_create_errors_propagate() {
        let site = MockSite::spawn(|method, _| {
            if method == Method::GET {
                (200, json!([]))
            } else {
                (
                    400,
                    json!({ "code": "rest_invalid_param", "message": "Invalid parameter(s): name" }),
                )
            }
        })
        .await;

        let result = site
            .store
            .find_or_create_term(Taxonomy::ProductTag, "Lorem")
            .await;
        assert!(matches!(result, Err(StoreError::Api { status: 400, .. })));
    }

    // =========================================================================
    // Variations
    // =========================================================================

    #[tokio::test]
    async fn test_sort_variations_sends_creation_order() {
        let next_id = AtomicI32::new(100);
        let site = MockSite::spawn(move |_, path| {
            if path.ends_with("/batch") {
                (200, json!({ "update": [] }))
            } else {
                (201, json!({ "id": next_id.fetch_add(1, Ordering::SeqCst) }))
            }
        })
        .await;

        let parent = ProductId::new(5);
        for _ in 0..3 {
            site.store
                .insert_variation(&variation(parent))
                .await
                .expect("variation");
        }
        site.store.sort_variations(parent).await.expect("sort");

        let requests = site.requests();
        assert_eq!(requests.len(), 4);
        assert!(requests[..3].iter().all(|r| r.path == "/products/5/variations"));
        let batch = &requests[3];
        assert_eq!(batch.method, Method::POST);
        assert_eq!(batch.path, "/products/5/variations/batch");
        assert_eq!(
            batch.body,
            json!({ "update": [
                { "id": 100, "menu_order": 0 },
                { "id": 101, "menu_order": 1 },
                { "id": 102, "menu_order": 2 }
            ]})
        );

        site.store.sort_variations(parent).await.expect("second sort");
        assert_eq!(site.requests().len(), 4);
        assert!(site.store.inner.variations.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_sort_variations_chunks_batches() {
        let site = MockSite::spawn(|_, _| (200, json!({ "update": [] }))).await;
        let parent = ProductId::new(8);
        site.store
            .inner
            .variations
            .lock()
            .await
            .insert(parent, (1..=150).map(VariationId::new).collect());

        site.store.sort_variations(parent).await.expect("sort");

        let requests = site.requests();
        assert_eq!(requests.len(), 2);
        let first = requests[0].body["update"].as_array().expect("update list");
        let second = requests[1].body["update"].as_array().expect("update list");
        assert_eq!(first.len(), 100);
        assert_eq!(second.len(), 50);
        assert_eq!(first[99], json!({ "id": 100, "menu_order": 99 }));
        assert_eq!(second[0], json!({ "id": 101, "menu_order": 100 }));
        assert!(site.store.inner.variations.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_release_product_drops_unsorted_variations() {
        let site = MockSite::spawn(|_, _| (201, json!({ "id": 60 }))).await;
        let parent = ProductId::new(5);
        site.store
            .insert_variation(&variation(parent))
            .await
            .expect("variation");

        site.store.release_product(parent).await;
        assert!(site.store.inner.variations.lock().await.is_empty());

        site.store.sort_variations(parent).await.expect("sort");
        assert_eq!(site.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_sort_without_variations_is_noop() {
        let store = WooCommerceStore::new(&config()).expect("client");
        store
            .sort_variations(ProductId::new(1))
            .await
            .expect("nothing to send");
    }

    // =========================================================================
    // Errors and listing
    // =========================================================================

    #[tokio::test]
    async fn test_insert_product_unauthorized() {
        let site = MockSite::spawn(|_, _| {
            (
                401,
                json!({
                    "code": "woocommerce_rest_cannot_create",
                    "message": "Sorry, you are not allowed to create resources.",
                    "data": { "status": 401 }
                }),
            )
        })
        .await;

        let product = Product::new(ProductKind::Simple, "Lorem");
        let result = site.store.insert_product(&product).await;
        assert!(matches!(result, Err(StoreError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_update_unknown_product_not_found() {
        let site = MockSite::spawn(|_, _| {
            (
                404,
                json!({ "code": "woocommerce_rest_product_invalid_id", "message": "Invalid ID." }),
            )
        })
        .await;

        let mut product = Product::new(ProductKind::Simple, "Lorem");
        product.id = Some(ProductId::new(77));
        let result = site.store.update_product(&product).await;
        assert!(
            matches!(result, Err(StoreError::NotFound(ref m)) if m.starts_with("Invalid ID."))
        );

        let requests = site.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].path, "/products/77");
        assert!(requests[0].body.get("images").is_none());
    }

    #[tokio::test]
    async fn test_recent_product_ids_query() {
        let site = MockSite::spawn(|_, _| (200, json!([{ "id": 9 }, { "id": 8 }]))).await;

        let ids = site.store.recent_product_ids(3).await.expect("ids");
        assert_eq!(ids, vec![ProductId::new(9), ProductId::new(8)]);

        let requests = site.requests();
        assert_eq!(requests[0].path, "/products");
        assert_eq!(
            requests[0].query,
            "per_page=3&orderby=date&order=desc&_fields=id"
        );
    }

    #[tokio::test]
    async fn test_zero_recent_ids_skips_request() {
        let store = WooCommerceStore::new(&config()).expect("client");
        let ids = store.recent_product_ids(0).await.expect("ids");
        assert!(ids.is_empty());
    }
}
