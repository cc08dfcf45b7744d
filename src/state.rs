use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: Arc<SessionStore>,
}
