use crate::config::Config;
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

fn set_var(key: &str, value: &str) {
    // SAFETY: callers hold ENV_LOCK, so no other test thread touches the environment
    unsafe { env::set_var(key, value) }
}

fn remove_var(key: &str) {
    // SAFETY: see set_var
    unsafe { env::remove_var(key) }
}

const TOUCHED: [&str; 10] = [
    "PORT",
    "LIVE_DATA_ENABLED",
    "FALLBACK_SEED",
    "BINANCE_BASE_URL",
    "TICKER_SYMBOL",
    "DOMINANCE_ASSET",
    "REQUIRE_LICENSE",
    "CALLS_LIMIT_PRO",
    "LEMON_SQUEEZY_WEBHOOK_SECRET",
    "DATABASE_URL",
];

fn clear_env() {
    for key in TOUCHED {
        remove_var(key);
    }
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.server.port, 3000);
    assert!(config.server.live_data_enabled);
    assert_eq!(config.server.fallback_seed, None);
    assert_eq!(config.upstream.binance_base_url, "https://api.binance.com");
    assert_eq!(config.upstream.ticker_symbol, "BTCUSDT");
    assert_eq!(config.upstream.dominance_asset, "btc");
    assert!(config.license.require_license);
    assert_eq!(config.license.call_limits.basic, 100);
    assert!(config.license.webhook_secret.is_none());
    assert!(config.license.database_url.is_none());
}

#[test]
fn test_config_overrides() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    set_var("PORT", "8088");
    set_var("LIVE_DATA_ENABLED", "false");
    set_var("FALLBACK_SEED", "42");
    set_var("BINANCE_BASE_URL", "http://localhost:9000/");
    set_var("TICKER_SYMBOL", "ethusdt");
    set_var("DOMINANCE_ASSET", "ETH");
    set_var("REQUIRE_LICENSE", "false");
    set_var("CALLS_LIMIT_PRO", "250");
    set_var("LEMON_SQUEEZY_WEBHOOK_SECRET", "whsec");

    let config = Config::from_env().unwrap();

    assert_eq!(config.server.port, 8088);
    assert!(!config.server.live_data_enabled);
    assert_eq!(config.server.fallback_seed, Some(42));
    assert_eq!(config.upstream.binance_base_url, "http://localhost:9000");
    assert_eq!(config.upstream.ticker_symbol, "ETHUSDT");
    assert_eq!(config.upstream.dominance_asset, "eth");
    assert!(!config.license.require_license);
    assert_eq!(config.license.call_limits.pro, 250);
    assert_eq!(config.license.webhook_secret.as_deref(), Some("whsec"));

    clear_env();
}

#[test]
fn test_config_rejects_bad_values() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    set_var("BINANCE_BASE_URL", "ftp://example.com");
    assert!(Config::from_env().is_err());
    remove_var("BINANCE_BASE_URL");

    set_var("PORT", "not-a-port");
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_blank_secret_is_treated_as_unset() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    set_var("LEMON_SQUEEZY_WEBHOOK_SECRET", "   ");
    let config = Config::from_env().unwrap();
    assert!(config.license.webhook_secret.is_none());

    clear_env();
}
