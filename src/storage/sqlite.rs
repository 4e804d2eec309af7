//! SQLite sink implementation
//!
//! Each upsert runs in its own transaction: the problem row is inserted or
//! updated in place, then both child lists are deleted and re-inserted with
//! explicit order keys. A failure rolls the whole record back.

use crate::output::{CrawlOutcome, RunReport};
use crate::problem::{Difficulty, ProblemRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{validate_record, RecordSink, SinkResult};
use crate::storage::RunRecord;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;

/// SQLite sink backend
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file; missing parent
    ///   directories are created
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(SinkError)` - Failed to open database
    pub fn new(path: &Path) -> SinkResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Loads a full record, child lists included
    pub fn get_problem(&self, id: u32) -> SinkResult<Option<ProblemRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, slug, difficulty, description, url, scraped_at
                 FROM problems WHERE id = ?1",
                params![id],
                |row| {
                    let difficulty: String = row.get(3)?;
                    let scraped_at: String = row.get(6)?;
                    Ok(ProblemRecord {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        slug: row.get(2)?,
                        difficulty: Difficulty::parse_loose(&difficulty).ok_or_else(|| {
                            rusqlite::Error::FromSqlConversionFailure(
                                3,
                                Type::Text,
                                format!("unknown difficulty '{}'", difficulty).into(),
                            )
                        })?,
                        description: row.get(4)?,
                        url: row.get(5)?,
                        fetched_at: parse_timestamp(6, &scraped_at)?,
                        examples: Vec::new(),
                        constraints: Vec::new(),
                    })
                },
            )
            .optional()?;

        let Some(mut record) = row else {
            return Ok(None);
        };

        record.examples = self.load_children(
            "SELECT content FROM examples WHERE problem_id = ?1 ORDER BY example_order",
            id,
        )?;
        record.constraints = self.load_children(
            "SELECT content FROM constraints WHERE problem_id = ?1 ORDER BY constraint_order",
            id,
        )?;

        Ok(Some(record))
    }

    /// Loads a full record by slug
    pub fn get_problem_by_slug(&self, slug: &str) -> SinkResult<Option<ProblemRecord>> {
        let id: Option<u32> = self
            .conn
            .query_row(
                "SELECT id FROM problems WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            Some(id) => self.get_problem(id),
            None => Ok(None),
        }
    }

    pub fn count_problems(&self) -> SinkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM problems", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Problem counts for every difficulty, zero included
    pub fn count_by_difficulty(&self) -> SinkResult<Vec<(Difficulty, u64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM problems WHERE difficulty = ?1")?;

        let mut counts = Vec::new();
        for difficulty in Difficulty::all() {
            let count: i64 =
                stmt.query_row(params![difficulty.to_db_string()], |row| row.get(0))?;
            counts.push((difficulty, count as u64));
        }
        Ok(counts)
    }

    /// Most recent runs, newest first
    pub fn recent_runs(&self, limit: usize) -> SinkResult<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status,
                    listed, attempted, succeeded, failed
             FROM runs ORDER BY id DESC LIMIT ?1",
        )?;

        let runs = stmt
            .query_map(params![limit as i64], |row| {
                let status: String = row.get(4)?;
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    outcome: CrawlOutcome::from_db_string(&status),
                    listed: row.get(5)?,
                    attempted: row.get(6)?,
                    succeeded: row.get(7)?,
                    failed: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }

    fn load_children(&self, sql: &str, id: u32) -> SinkResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let items = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(items)
    }
}

fn parse_timestamp(idx: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn replace_children(
    tx: &Transaction<'_>,
    table: &str,
    order_column: &str,
    problem_id: u32,
    items: &[String],
) -> Result<(), rusqlite::Error> {
    tx.execute(
        &format!("DELETE FROM {} WHERE problem_id = ?1", table),
        params![problem_id],
    )?;

    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {} (problem_id, {}, content) VALUES (?1, ?2, ?3)",
        table, order_column
    ))?;
    for (order, content) in items.iter().enumerate() {
        stmt.execute(params![problem_id, order as i64, content])?;
    }
    Ok(())
}

impl RecordSink for SqliteSink {
    fn upsert(&mut self, record: &ProblemRecord) -> SinkResult<()> {
        validate_record(record)?;

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        // A slug held by a different id is replaced; its children cascade
        let moved = tx.execute(
            "DELETE FROM problems WHERE slug = ?1 AND id != ?2",
            params![record.slug, record.id],
        )?;
        if moved > 0 {
            tracing::warn!(
                "Slug '{}' moved to problem {}, replacing the previous row",
                record.slug,
                record.id
            );
        }

        tx.execute(
            "INSERT INTO problems (id, title, slug, difficulty, description, url, scraped_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                slug = excluded.slug,
                difficulty = excluded.difficulty,
                description = excluded.description,
                url = excluded.url,
                scraped_at = excluded.scraped_at,
                updated_at = excluded.updated_at",
            params![
                record.id,
                record.title,
                record.slug,
                record.difficulty.to_db_string(),
                record.description,
                record.url,
                record.fetched_at.to_rfc3339(),
                now,
            ],
        )?;

        replace_children(&tx, "examples", "example_order", record.id, &record.examples)?;
        replace_children(
            &tx,
            "constraints",
            "constraint_order",
            record.id,
            &record.constraints,
        )?;

        tx.commit()?;
        tracing::debug!("Stored problem {} ({})", record.id, record.slug);
        Ok(())
    }

    fn record_run(&mut self, report: &RunReport) -> SinkResult<()> {
        self.conn.execute(
            "INSERT INTO runs (started_at, finished_at, config_hash, status, listed, attempted, succeeded, failed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                report.started_at.to_rfc3339(),
                report.finished_at.to_rfc3339(),
                report.config_hash,
                report.outcome.to_db_string(),
                report.listed as i64,
                report.attempted as i64,
                report.succeeded as i64,
                report.failed as i64,
            ],
        )?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
