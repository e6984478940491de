//! Generic CMDB endpoint types.
//!
//! Every generated endpoint is one of three shapes: a table of entries keyed
//! by an mkey ([`CmdbEndpoint`]), a single settings object ([`CmdbSingleton`])
//! or a read-only reference table ([`ReferenceEndpoint`]). The shapes differ
//! only in which operations they expose; all of them funnel requests through
//! the injected [`ApiTransport`].

use crate::Result;
use fortios_core::cache::{CacheStats, TtlCache};
use fortios_core::metadata::{Category, EndpointSchema};
use fortios_core::payload::{
    build_payload, check_deprecated_fields, extract_mkey, merge_payload, normalize_tables,
};
use fortios_core::query::QueryParams;
use fortios_core::{ApiFamily, ApiRequest, ApiResponse, ApiTransport, Error};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Shared state handed to every endpoint: the transport and the reference cache.
#[derive(Clone)]
pub struct CmdbContext {
    transport: Arc<dyn ApiTransport>,
    reference_cache: Arc<TtlCache<ApiResponse>>,
}

impl CmdbContext {
    /// Create a context with a fresh reference cache.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>, reference_ttl: Duration) -> Self {
        Self {
            transport,
            reference_cache: Arc::new(TtlCache::new(reference_ttl)),
        }
    }

    /// The injected transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn ApiTransport> {
        &self.transport
    }

    /// The cache shared by all reference endpoints.
    #[must_use]
    pub fn reference_cache(&self) -> &Arc<TtlCache<ApiResponse>> {
        &self.reference_cache
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.transport.send(request).await
    }
}

/// Query modifiers for CMDB GET requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// VDOM to query instead of the client default
    pub vdom: Option<String>,
    /// Filter expressions (`name=@web`, `type==fqdn`); each becomes one `filter=`
    pub filters: Vec<String>,
    /// Restrict returned attributes
    pub format: Vec<String>,
    /// Index of the first entry to return
    pub start: Option<u32>,
    /// Maximum number of entries to return
    pub count: Option<u32>,
    /// Include `q_ref`/`q_static` metadata
    pub with_meta: bool,
    /// Include datasource details for referenced objects
    pub datasource: bool,
    /// Skip entries the administrator may not see instead of failing
    pub skip: bool,
    /// Special action (`schema`, `default`)
    pub action: Option<String>,
}

impl GetOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Query a specific VDOM.
    #[must_use]
    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    /// Add a filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Restrict returned attributes.
    #[must_use]
    pub fn with_format<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.format.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Page through results.
    #[must_use]
    pub const fn with_page(mut self, start: u32, count: u32) -> Self {
        self.start = Some(start);
        self.count = Some(count);
        self
    }

    /// Request metadata.
    #[must_use]
    pub const fn with_meta(mut self) -> Self {
        self.with_meta = true;
        self
    }

    /// Request datasource details.
    #[must_use]
    pub const fn with_datasource(mut self) -> Self {
        self.datasource = true;
        self
    }

    /// Skip entries hidden from the administrator.
    #[must_use]
    pub const fn skipping_hidden(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Request a special action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Convert into query pairs.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("vdom", self.vdom.as_deref());
        params.push_each("filter", &self.filters);
        params.push_joined("format", &self.format, "|");
        params.push_opt("start", self.start);
        params.push_opt("count", self.count);
        params.push_flag("with_meta", self.with_meta);
        params.push_flag("datasource", self.datasource);
        params.push_flag("skip", self.skip);
        params.push_opt("action", self.action.as_deref());
        params.into_pairs()
    }
}

/// Options for create/update/delete requests.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// VDOM to modify instead of the client default
    pub vdom: Option<String>,
    /// Validate the payload against the endpoint schema before sending
    pub validate: bool,
    /// Raw attributes merged over the typed body
    pub extra: Map<String, Value>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            vdom: None,
            validate: true,
            extra: Map::new(),
        }
    }
}

impl WriteOptions {
    /// Default options: client VDOM, validation on.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Modify a specific VDOM.
    #[must_use]
    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    /// Send the payload without schema validation.
    #[must_use]
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Merge an extra raw attribute into the body. snake_case keys are converted.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra
            .insert(fortios_core::payload::to_api_key(key), value.into());
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("vdom", self.vdom.as_deref());
        params.into_pairs()
    }
}

/// Target position for [`CmdbEndpoint::move_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePosition {
    /// Place the entry before the referenced entry
    Before(String),
    /// Place the entry after the referenced entry
    After(String),
}

impl MovePosition {
    fn as_param(&self) -> (&'static str, String) {
        match self {
            Self::Before(reference) => ("before", reference.clone()),
            Self::After(reference) => ("after", reference.clone()),
        }
    }
}

/// Payload pipeline shared by every write: normalise, merge extras, expand
/// name lists, warn about deprecated attributes.
fn prepare_payload(
    schema: &EndpointSchema,
    body: Value,
    options: &WriteOptions,
) -> Result<Map<String, Value>> {
    let payload = build_payload(body)?;
    let mut payload = merge_payload(payload, build_payload(Value::Object(options.extra.clone()))?);
    normalize_tables(&mut payload, schema);
    check_deprecated_fields(&payload, schema.deprecated, &schema.api_path());
    Ok(payload)
}

fn to_body<T: Serialize>(entry: &T) -> Result<Value> {
    serde_json::to_value(entry)
        .map_err(|err| Error::ValidationError(format!("Failed to serialize payload: {err}")))
}

/// A CMDB table endpoint addressed by mkey.
pub struct CmdbEndpoint<T> {
    ctx: CmdbContext,
    schema: &'static EndpointSchema,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for CmdbEndpoint<T> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            schema: self.schema,
            _model: PhantomData,
        }
    }
}

impl<T> CmdbEndpoint<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a schema to a context.
    #[must_use]
    pub fn new(ctx: CmdbContext, schema: &'static EndpointSchema) -> Self {
        debug_assert_eq!(schema.category, Category::Table);
        Self {
            ctx,
            schema,
            _model: PhantomData,
        }
    }

    /// Static schema of this endpoint.
    #[must_use]
    pub const fn schema(&self) -> &'static EndpointSchema {
        self.schema
    }

    fn mkey_field(&self) -> Result<&'static str> {
        self.schema.mkey.ok_or_else(|| {
            Error::InvalidEndpoint(format!("{} has no primary key", self.schema.api_path()))
        })
    }

    fn request(&self, method: Method) -> ApiRequest {
        ApiRequest::new(method, ApiFamily::Cmdb, self.schema.api_path())
    }

    /// Fetch the whole table, or one entry when `mkey` is given.
    ///
    /// # Errors
    ///
    /// Returns transport errors; a missing entry yields [`Error::NotFound`].
    pub async fn get(&self, mkey: Option<&str>, options: &GetOptions) -> Result<ApiResponse> {
        let mut request = self.request(Method::GET).with_params(options.to_params());
        if let Some(mkey) = mkey {
            request = request.with_mkey(mkey);
        }
        self.ctx.send(request).await
    }

    /// Fetch the table as typed entries.
    ///
    /// # Errors
    ///
    /// Returns transport errors or [`Error::ResponseParseError`].
    pub async fn list(&self, options: &GetOptions) -> Result<Vec<T>> {
        self.get(None, options).await?.results_as()
    }

    /// Fetch one typed entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the entry does not exist.
    pub async fn get_entry(&self, mkey: &str) -> Result<T> {
        self.get(Some(mkey), &GetOptions::default())
            .await?
            .first_result()
    }

    /// Create an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for schema violations, [`Error::Conflict`]
    /// if the entry exists, and transport errors.
    pub async fn post(&self, entry: &T, options: &WriteOptions) -> Result<ApiResponse> {
        self.post_raw(to_body(entry)?, options).await
    }

    /// Create an entry from a raw JSON body.
    ///
    /// # Errors
    ///
    /// See [`CmdbEndpoint::post`].
    pub async fn post_raw(&self, body: Value, options: &WriteOptions) -> Result<ApiResponse> {
        let payload = prepare_payload(self.schema, body, options)?;
        self.write(Method::POST, None, payload, options, true).await
    }

    /// Replace attributes of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the entry does not exist.
    pub async fn put(&self, mkey: &str, entry: &T, options: &WriteOptions) -> Result<ApiResponse> {
        self.put_raw(mkey, to_body(entry)?, options).await
    }

    /// Update an entry from a raw JSON body.
    ///
    /// # Errors
    ///
    /// See [`CmdbEndpoint::put`].
    pub async fn put_raw(
        &self,
        mkey: &str,
        body: Value,
        options: &WriteOptions,
    ) -> Result<ApiResponse> {
        let payload = prepare_payload(self.schema, body, options)?;
        self.write(Method::PUT, Some(mkey), payload, options, false)
            .await
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the entry does not exist, or
    /// [`Error::ApiError`] when it is still referenced.
    pub async fn delete(&self, mkey: &str, options: &WriteOptions) -> Result<ApiResponse> {
        info!(endpoint = %self.schema.api_path(), mkey, "deleting CMDB entry");
        let request = self
            .request(Method::DELETE)
            .with_mkey(mkey)
            .with_params(options.params());
        self.ctx.send(request).await
    }

    /// Check whether an entry exists.
    ///
    /// # Errors
    ///
    /// Only [`Error::NotFound`] is turned into `false`; every other error is
    /// returned.
    pub async fn exists(&self, mkey: &str, vdom: Option<&str>) -> Result<bool> {
        let options = GetOptions {
            vdom: vdom.map(str::to_string),
            ..GetOptions::default()
        };
        match self.get(Some(mkey), &options).await {
            Ok(response) => Ok(response.result_count() > 0),
            Err(Error::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create or update an entry depending on whether its mkey exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the payload carries no mkey.
    pub async fn set(&self, entry: &T, options: &WriteOptions) -> Result<ApiResponse> {
        self.set_raw(to_body(entry)?, options).await
    }

    /// Raw-body variant of [`CmdbEndpoint::set`].
    ///
    /// # Errors
    ///
    /// See [`CmdbEndpoint::set`].
    pub async fn set_raw(&self, body: Value, options: &WriteOptions) -> Result<ApiResponse> {
        let payload = prepare_payload(self.schema, body, options)?;
        let mkey = extract_mkey(&payload, self.mkey_field()?)?;

        if self.exists(&mkey, options.vdom.as_deref()).await? {
            debug!(endpoint = %self.schema.api_path(), mkey = %mkey, "entry exists, updating");
            self.write(Method::PUT, Some(&mkey), payload, options, false)
                .await
        } else {
            debug!(endpoint = %self.schema.api_path(), mkey = %mkey, "entry missing, creating");
            self.write(Method::POST, None, payload, options, true).await
        }
    }

    /// Reorder an entry relative to another one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if either entry does not exist.
    pub async fn move_entry(
        &self,
        mkey: &str,
        position: MovePosition,
        vdom: Option<&str>,
    ) -> Result<ApiResponse> {
        let (key, reference) = position.as_param();
        let mut params = QueryParams::new();
        params.push("action", "move");
        params.push(key, reference);
        params.push_opt("vdom", vdom);

        let request = self
            .request(Method::PUT)
            .with_mkey(mkey)
            .with_params(params.into_pairs());
        self.ctx.send(request).await
    }

    /// Copy an entry under a new mkey.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if `new_mkey` already exists.
    pub async fn clone_entry(
        &self,
        mkey: &str,
        new_mkey: &str,
        vdom: Option<&str>,
    ) -> Result<ApiResponse> {
        let mut params = QueryParams::new();
        params.push("action", "clone");
        params.push("nkey", new_mkey);
        params.push_opt("vdom", vdom);

        let request = self
            .request(Method::POST)
            .with_mkey(mkey)
            .with_params(params.into_pairs());
        self.ctx.send(request).await
    }

    /// Fetch the live schema from the device.
    ///
    /// # Errors
    ///
    /// Returns transport errors.
    pub async fn fetch_schema(&self, vdom: Option<&str>) -> Result<ApiResponse> {
        let options = GetOptions {
            vdom: vdom.map(str::to_string),
            action: Some("schema".to_string()),
            ..GetOptions::default()
        };
        self.get(None, &options).await
    }

    async fn write(
        &self,
        method: Method,
        mkey: Option<&str>,
        payload: Map<String, Value>,
        options: &WriteOptions,
        for_create: bool,
    ) -> Result<ApiResponse> {
        if options.validate {
            self.schema.validate_payload(&payload, for_create)?;
        }

        let mut request = self
            .request(method)
            .with_params(options.params())
            .with_body(Value::Object(payload));
        if let Some(mkey) = mkey {
            request = request.with_mkey(mkey);
        }
        self.ctx.send(request).await
    }
}

/// A CMDB settings object without mkey (e.g. `system/global`).
pub struct CmdbSingleton<T> {
    ctx: CmdbContext,
    schema: &'static EndpointSchema,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for CmdbSingleton<T> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            schema: self.schema,
            _model: PhantomData,
        }
    }
}

impl<T> CmdbSingleton<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a schema to a context.
    #[must_use]
    pub fn new(ctx: CmdbContext, schema: &'static EndpointSchema) -> Self {
        debug_assert_eq!(schema.category, Category::Singleton);
        Self {
            ctx,
            schema,
            _model: PhantomData,
        }
    }

    /// Static schema of this endpoint.
    #[must_use]
    pub const fn schema(&self) -> &'static EndpointSchema {
        self.schema
    }

    /// Fetch the settings object.
    ///
    /// # Errors
    ///
    /// Returns transport errors.
    pub async fn get(&self, options: &GetOptions) -> Result<ApiResponse> {
        let request = ApiRequest::get(ApiFamily::Cmdb, self.schema.api_path())
            .with_params(options.to_params());
        self.ctx.send(request).await
    }

    /// Fetch the settings as a typed object.
    ///
    /// # Errors
    ///
    /// Returns transport errors or [`Error::ResponseParseError`].
    pub async fn get_entry(&self) -> Result<T> {
        self.get(&GetOptions::default()).await?.first_result()
    }

    /// Update settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for schema violations and transport errors.
    pub async fn put(&self, settings: &T, options: &WriteOptions) -> Result<ApiResponse> {
        self.put_raw(to_body(settings)?, options).await
    }

    /// Update settings from a raw JSON body.
    ///
    /// # Errors
    ///
    /// See [`CmdbSingleton::put`].
    pub async fn put_raw(&self, body: Value, options: &WriteOptions) -> Result<ApiResponse> {
        let payload = prepare_payload(self.schema, body, options)?;
        if options.validate {
            self.schema.validate_payload(&payload, false)?;
        }
        let request = ApiRequest::put(ApiFamily::Cmdb, self.schema.api_path())
            .with_params(options.params())
            .with_body(Value::Object(payload));
        self.ctx.send(request).await
    }
}

/// A read-only reference table whose GETs are memoized.
pub struct ReferenceEndpoint<T> {
    ctx: CmdbContext,
    schema: &'static EndpointSchema,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for ReferenceEndpoint<T> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            schema: self.schema,
            _model: PhantomData,
        }
    }
}

impl<T> ReferenceEndpoint<T>
where
    T: DeserializeOwned,
{
    /// Bind a schema to a context.
    #[must_use]
    pub fn new(ctx: CmdbContext, schema: &'static EndpointSchema) -> Self {
        debug_assert_eq!(schema.category, Category::Reference);
        Self {
            ctx,
            schema,
            _model: PhantomData,
        }
    }

    /// Static schema of this endpoint.
    #[must_use]
    pub const fn schema(&self) -> &'static EndpointSchema {
        self.schema
    }

    fn cache_prefix(&self) -> String {
        format!("cmdb/{}/", self.schema.api_path())
    }

    fn cache_key(&self, mkey: Option<&str>, params: &[(&'static str, String)]) -> String {
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{}?{query}", self.cache_prefix(), mkey.unwrap_or(""))
    }

    /// Fetch the table or one entry, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns transport errors; errors are never cached.
    pub async fn get(&self, mkey: Option<&str>, options: &GetOptions) -> Result<ApiResponse> {
        let params = options.to_params();
        let key = self.cache_key(mkey, &params);

        self.ctx
            .reference_cache
            .get_or_try_insert_with(&key, || async {
                let mut request =
                    ApiRequest::get(ApiFamily::Cmdb, self.schema.api_path()).with_params(params);
                if let Some(mkey) = mkey {
                    request = request.with_mkey(mkey);
                }
                self.ctx.send(request).await
            })
            .await
    }

    /// Fetch the table as typed entries.
    ///
    /// # Errors
    ///
    /// Returns transport errors or [`Error::ResponseParseError`].
    pub async fn list(&self, options: &GetOptions) -> Result<Vec<T>> {
        self.get(None, options).await?.results_as()
    }

    /// Fetch one typed entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the entry does not exist.
    pub async fn get_entry(&self, mkey: &str) -> Result<T> {
        self.get(Some(mkey), &GetOptions::default())
            .await?
            .first_result()
    }

    /// Check whether an entry exists.
    ///
    /// # Errors
    ///
    /// Only [`Error::NotFound`] is turned into `false`.
    pub async fn exists(&self, mkey: &str, vdom: Option<&str>) -> Result<bool> {
        let options = GetOptions {
            vdom: vdom.map(str::to_string),
            ..GetOptions::default()
        };
        match self.get(Some(mkey), &options).await {
            Ok(response) => Ok(response.result_count() > 0),
            Err(Error::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Drop every cached response of this endpoint.
    pub fn invalidate_cache(&self) {
        self.ctx.reference_cache.invalidate_prefix(&self.cache_prefix());
    }

    /// Statistics of the shared reference cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.ctx.reference_cache.stats()
    }
}
