use axum::{
    Router,
    routing::{get, post},
};
use boscocare_config::DevConfig;

use super::controller::{auth_screen, current_session, sign_in, sign_out, sign_up};
use crate::state::AppState;

pub fn init_auth_router(dev_config: &DevConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/", get(auth_screen))
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/session", get(current_session));

    #[cfg(feature = "dev-role-override")]
    let router = if dev_config.role_override_enabled {
        use super::controller::{clear_role_override, set_role_override};
        router.route(
            "/dev-role-override",
            axum::routing::put(set_role_override).delete(clear_role_override),
        )
    } else {
        router
    };

    #[cfg(not(feature = "dev-role-override"))]
    let _ = dev_config;

    router
}
