//! WebAssembly bindings for SearchTerm

use std::sync::OnceLock;

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use st_core::{
    DomainResolver,
    HeuristicResolver,
    NavigationUri,
    ProviderTable,
    PslResolver,
    SearchTermResolver,
};

type SharedResolver = SearchTermResolver<Box<dyn DomainResolver + Send + Sync>>;

static RESOLVER: OnceLock<SharedResolver> = OnceLock::new();

/// Serves lookups made before `init`; never blocks a later `init`.
static FALLBACK: OnceLock<SharedResolver> = OnceLock::new();

// =============================================================================
// Console Logging
// =============================================================================

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

fn parse_log_level(level: Option<&str>) -> LevelFilter {
    match level {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// Route `log` records to the browser console.
#[wasm_bindgen]
pub fn init_logging(level: Option<String>) {
    // A second call only adjusts the level
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(parse_log_level(level.as_deref()));
}

// =============================================================================
// Initialization
// =============================================================================

#[wasm_bindgen]
pub fn init(psl_text: Option<String>, providers_json: Option<String>) -> Result<(), JsValue> {
    if RESOLVER.get().is_some() {
        return Err(JsValue::from_str("Already initialized. Reload the page to reinitialize."));
    }

    let domains: Box<dyn DomainResolver + Send + Sync> = match psl_text {
        Some(text) => Box::new(
            PslResolver::from_list_text(&text)
                .map_err(|e| JsValue::from_str(&format!("Failed to load suffix list: {}", e)))?,
        ),
        None => Box::new(HeuristicResolver),
    };

    let providers = match providers_json {
        Some(json) => ProviderTable::from_json(&json)
            .map_err(|e| JsValue::from_str(&format!("Failed to load providers: {}", e)))?,
        None => ProviderTable::builtin(),
    };

    RESOLVER
        .set(SearchTermResolver::new(domains).with_providers(providers))
        .map_err(|_| JsValue::from_str("Failed to set resolver state"))?;

    Ok(())
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    RESOLVER.get().is_some()
}

/// Resolver set by `init`, or a heuristic one with built-in providers.
fn resolver() -> &'static SharedResolver {
    if let Some(resolver) = RESOLVER.get() {
        return resolver;
    }
    FALLBACK.get_or_init(|| {
        let domains: Box<dyn DomainResolver + Send + Sync> = Box::new(HeuristicResolver);
        SearchTermResolver::new(domains)
    })
}

fn parse_uri(url: &str) -> Option<NavigationUri> {
    match NavigationUri::parse(url) {
        Ok(uri) => Some(uri),
        Err(e) => {
            log::warn!("ignoring unparseable URL: {}", e);
            None
        }
    }
}

// =============================================================================
// Lookups
// =============================================================================

#[wasm_bindgen]
pub fn search_term(url: &str) -> String {
    parse_uri(url)
        .map(|uri| resolver().search_term(&uri))
        .unwrap_or_default()
}

#[wasm_bindgen]
pub fn base_domain(host: &str) -> String {
    resolver().base_domain(host)
}

#[wasm_bindgen]
pub fn public_suffix(url: &str) -> String {
    parse_uri(url)
        .map(|uri| resolver().public_suffix(&uri))
        .unwrap_or_default()
}

#[wasm_bindgen]
pub fn key_for_host(host: &str) -> String {
    resolver().key_for_host(host)
}

#[wasm_bindgen]
pub fn key_for_query(query: &str) -> String {
    resolver().key_for_query(query)
}

#[wasm_bindgen]
pub fn describe(url: &str) -> JsValue {
    let result = js_sys::Object::new();
    let Some(uri) = parse_uri(url) else {
        let _ = js_sys::Reflect::set(&result, &"valid".into(), &JsValue::from(false));
        return result.into();
    };

    let resolver = resolver();
    let summary = resolver.summarize(&uri);
    let host_key = resolver.key_for(&summary.base_domain);
    let _ = js_sys::Reflect::set(&result, &"valid".into(), &JsValue::from(true));
    let _ = js_sys::Reflect::set(&result, &"host".into(), &JsValue::from_str(&uri.host));
    let _ = js_sys::Reflect::set(&result, &"baseDomain".into(), &JsValue::from_str(&summary.base_domain));
    let _ = js_sys::Reflect::set(&result, &"suffix".into(), &JsValue::from_str(&summary.suffix));
    let _ = js_sys::Reflect::set(&result, &"term".into(), &JsValue::from_str(&summary.term));
    let _ = js_sys::Reflect::set(&result, &"hostKey".into(), &JsValue::from_str(&host_key));
    result.into()
}

#[wasm_bindgen]
pub fn get_providers() -> JsValue {
    let entries = resolver().providers().entries();
    let providers = js_sys::Array::new_with_length(entries.len() as u32);
    for (i, entry) in entries.into_iter().enumerate() {
        let obj = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&obj, &"name".into(), &JsValue::from_str(&entry.name));
        let _ = js_sys::Reflect::set(&obj, &"pathPrefix".into(), &JsValue::from_str(&entry.path_prefix));
        let _ = js_sys::Reflect::set(&obj, &"queryParam".into(), &JsValue::from_str(&entry.query_param));
        providers.set(i as u32, obj.into());
    }
    providers.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level(None), LevelFilter::Warn);
        assert_eq!(parse_log_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(parse_log_level(Some("bogus")), LevelFilter::Warn);
        assert_eq!(parse_log_level(Some("off")), LevelFilter::Off);
    }

    #[test]
    fn test_lookups_before_init_leave_state_unset() {
        assert!(!is_initialized());
        assert_eq!(base_domain("www.google.com"), "google.com");
        assert_eq!(key_for_query("rust").len(), 48);
        assert!(!is_initialized());
        assert!(RESOLVER.get().is_none());
        assert!(FALLBACK.get().is_some());
    }

    #[test]
    fn test_parse_uri_rejects_garbage() {
        assert!(parse_uri("https://www.google.com/search?q=x").is_some());
        // No logger installed, so the warning goes nowhere
        assert!(parse_uri("::not a url::").is_none());
    }
}
