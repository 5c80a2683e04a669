use std::sync::Arc;

use crate::{admin::AdminSite, db::DbPool, services::store::ItineraryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: ItineraryStore,
    pub admin: Arc<AdminSite>,
}

impl AppState {
    pub fn new(db: DbPool) -> Self {
        Self {
            store: ItineraryStore::new(db),
            admin: Arc::new(AdminSite::itineraries()),
        }
    }
}
