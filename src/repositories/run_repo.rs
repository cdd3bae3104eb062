use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::Run;

#[derive(Clone)]
pub struct RunRepository {
    pool: AsyncDbPool,
}

impl RunRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Run history of one process, most recent start first. Runs sharing a
    /// start time keep insertion order; runs that never started come last.
    pub async fn list_for_process(&self, owner: i32) -> AppResult<Vec<Run>> {
        use crate::schema::batch_runs::dsl::*;
        let mut conn = self.pool.get().await?;

        batch_runs
            .filter(process_id.eq(owner))
            .select(Run::as_select())
            .order((started.desc(), id.asc()))
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list runs"))
    }
}
