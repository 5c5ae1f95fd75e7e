use std::sync::Arc;

use acciofocus_services::identity::IdentityVerifier;
use acciofocus_services::store::UserStore;
use acciofocus_services::sync::RoomSyncService;

#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomSyncService>,
    pub users: Arc<dyn UserStore>,
    pub identity: Arc<IdentityVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, identity: IdentityVerifier) -> Self {
        Self {
            rooms: Arc::new(RoomSyncService::new(store.clone())),
            users: store,
            identity: Arc::new(identity),
        }
    }
}
