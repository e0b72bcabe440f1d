use crate::db::{DbPool, OrmConn};
use crate::images::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub images: ImageStore,
}
