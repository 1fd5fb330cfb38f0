use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::connection::{build_http_client, get_store_client};
use crate::database::DataStore;
use crate::errors::Result;
use crate::services::announcements::DismissedAnnouncements;
use crate::services::auth_service::{AuthProvider, GoTrueClient};
use crate::session::{AuthEvent, SessionHolder, Subscription};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DataStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub session: SessionHolder,
    pub dismissed: DismissedAnnouncements,
    _sign_out_hook: Arc<Subscription>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DataStore>,
        auth: Arc<dyn AuthProvider>,
        session: SessionHolder,
    ) -> Self {
        let dismissed = DismissedAnnouncements::new();

        // Dismissals only last for the session they were made in.
        let on_sign_out = dismissed.clone();
        let hook = session.subscribe(move |event, _| {
            if event == AuthEvent::SignedOut {
                on_sign_out.clear();
            }
        });

        AppState {
            config: Arc::new(config),
            store,
            auth,
            session,
            dismissed,
            _sign_out_hook: Arc::new(hook),
        }
    }

    /// Wire up the hosted store and auth service.
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let session = SessionHolder::new();
        let store = get_store_client(&config, session.clone()).await?;
        let auth = GoTrueClient::new(config.clone(), build_http_client(&config)?);

        Ok(AppState::new(config, Arc::new(store), Arc::new(auth), session))
    }
}
