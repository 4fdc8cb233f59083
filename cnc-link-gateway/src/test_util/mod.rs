pub mod fake_driver;

pub use fake_driver::{Call, FakeDriver};

use std::sync::Arc;

use crate::config::{ApiConfig, Config, FocasConfig, LoggingConfig};
use crate::link::{CncLink, ConnectParams};
use crate::state::AppState;

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 5999,
        },
        focas: FocasConfig {
            library_path: "libfwlib32-test.so".to_string(),
            default_port: 8193,
            connect_timeout_secs: 10,
            axis_count: 3,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

/// Application state wired to a fake driver that the caller keeps a handle on.
pub fn create_test_state(driver: Arc<FakeDriver>) -> Arc<AppState> {
    let config = test_config();
    let link = CncLink::new(driver, config.focas.link_settings());
    Arc::new(AppState::new(config, link))
}

/// Same as `create_test_state`, with a networked connection already open.
pub fn create_connected_state(driver: Arc<FakeDriver>) -> Arc<AppState> {
    let config = test_config();
    let mut link = CncLink::new(driver.clone(), config.focas.link_settings());
    link.connect(ConnectParams::network("10.0.0.1", 8193, 10))
        .expect("fake connect");
    driver.clear_calls();
    Arc::new(AppState::new(config, link))
}
