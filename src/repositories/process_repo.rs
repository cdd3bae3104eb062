use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::Process;

const LIKE_ESCAPE: char = '\\';

/// Wraps user text as a `LIKE` substring pattern, escaping `%`, `_` and the
/// escape character itself so they match literally.
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct ProcessRepository {
    pool: AsyncDbPool,
}

impl ProcessRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// All processes in insertion order.
    pub async fn list(&self) -> AppResult<Vec<Process>> {
        use crate::schema::batch_processes::dsl::*;
        let mut conn = self.pool.get().await?;

        batch_processes
            .select(Process::as_select())
            .order(id.asc())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list processes"))
    }

    /// Processes whose name or description contains `text`. SQLite's `LIKE`
    /// folds ASCII case only.
    pub async fn search(&self, text: &str) -> AppResult<Vec<Process>> {
        use crate::schema::batch_processes::dsl::*;
        let mut conn = self.pool.get().await?;
        let pattern = like_pattern(text);

        batch_processes
            .filter(
                name.like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(description.like(pattern).escape(LIKE_ESCAPE)),
            )
            .select(Process::as_select())
            .order(id.asc())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "search processes"))
    }
}
