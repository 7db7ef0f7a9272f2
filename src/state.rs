use std::sync::Arc;

use boscocare_auth::{AuthFacade, TabRegistry};
use boscocare_backend::{AuthProvider, BackendError, DataStore, GoTrueClient, PostgrestClient};
use boscocare_config::{BackendConfig, CorsConfig, DevConfig, ServerConfig, TabConfig};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthFacade>,
    pub data: Arc<dyn DataStore>,
    pub tabs: Arc<TabRegistry>,
    pub tab_config: TabConfig,
    pub cors_config: CorsConfig,
    pub dev_config: DevConfig,
}

impl AppState {
    /// Wires the state around the given backend seams. Tabs live as long as
    /// the tokens issued for them.
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        data: Arc<dyn DataStore>,
        server_config: &ServerConfig,
        tab_config: TabConfig,
        cors_config: CorsConfig,
        dev_config: DevConfig,
    ) -> Self {
        let auth = AuthFacade::new(
            provider.clone(),
            data.clone(),
            server_config.email_redirect_url(),
        );
        let tabs = TabRegistry::new(provider, tab_config.expiry_secs);

        Self {
            auth: Arc::new(auth),
            data,
            tabs: Arc::new(tabs),
            tab_config,
            cors_config,
            dev_config,
        }
    }
}

pub fn init_app_state(server_config: &ServerConfig) -> Result<AppState, BackendError> {
    let backend_config = BackendConfig::from_env();
    let provider = Arc::new(GoTrueClient::new(&backend_config)?);
    let data = Arc::new(PostgrestClient::new(&backend_config)?);

    Ok(AppState::new(
        provider,
        data,
        server_config,
        TabConfig::from_env(),
        CorsConfig::from_env(),
        DevConfig::from_env(),
    ))
}
