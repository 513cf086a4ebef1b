use crate::{
    config::SessionSettings,
    db::{DbPool, OrmConn, create_orm_conn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub session: SessionSettings,
}

impl AppState {
    pub fn new(pool: DbPool, session: SessionSettings) -> Self {
        let orm = create_orm_conn(&pool);
        Self { pool, orm, session }
    }
}
