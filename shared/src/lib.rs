pub mod auth;
pub mod types;

use weekdo_atoms::store::Store;

/// Shared application state, built once in main and handed to every
/// request as `Arc<AppState>`. Handlers never reach for globals; the
/// store client and token secret both arrive through here.
pub struct AppState {
    pub store: Store,
    pub token_secret: String,
}

impl AppState {
    pub fn new(store: Store, token_secret: String) -> Self {
        Self {
            store,
            token_secret,
        }
    }
}
