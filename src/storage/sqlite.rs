//! SQLite-backed job store

use crate::job::JobRecord;
use crate::storage::{JobSink, StorageResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id TEXT NOT NULL,
    job_title TEXT,
    company_name TEXT,
    company_url TEXT,
    location TEXT,
    salary_min REAL,
    salary_max REAL,
    salary_currency TEXT,
    salary_period TEXT,
    employment_type TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    posted_at TEXT,
    job_url TEXT NOT NULL,
    description TEXT
);
";

/// Job record store backed by a SQLite database file
pub struct SqliteJobStore {
    conn: Mutex<Connection>,
}

impl SqliteJobStore {
    /// Opens (or creates) the database at the given path and ensures the
    /// schema exists
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used by tests
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Removes all stored jobs, keeping the schema
    pub fn clear(&self) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM jobs", [])?;
        Ok(())
    }
}

impl JobSink for SqliteJobStore {
    fn push(&self, record: &JobRecord) -> StorageResult<()> {
        let tags = serde_json::to_string(&record.tags)?;
        let posted_at = record.posted_at.map(|d| d.to_string());

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO jobs (
                job_id, job_title, company_name, company_url, location,
                salary_min, salary_max, salary_currency, salary_period,
                employment_type, tags, posted_at, job_url, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                record.job_id,
                record.job_title,
                record.company_name,
                record.company_url,
                record.location,
                record.salary_min,
                record.salary_max,
                record.salary_currency,
                record.salary_period,
                record.employment_type,
                tags,
                posted_at,
                record.job_url,
                record.description,
            ],
        )?;
        Ok(())
    }

    fn load_all(&self) -> StorageResult<Vec<JobRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT job_id, job_title, company_name, company_url, location,
                    salary_min, salary_max, salary_currency, salary_period,
                    employment_type, tags, posted_at, job_url, description
             FROM jobs ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            let tags_json: String = row.get(10)?;
            let posted_at: Option<String> = row.get(11)?;
            Ok(JobRecord {
                job_id: row.get(0)?,
                job_title: row.get(1)?,
                company_name: row.get(2)?,
                company_url: row.get(3)?,
                location: row.get(4)?,
                salary_min: row.get(5)?,
                salary_max: row.get(6)?,
                salary_currency: row.get(7)?,
                salary_period: row.get(8)?,
                employment_type: row.get(9)?,
                tags: serde_json::from_str(&tags_json).unwrap_or_default(),
                posted_at: posted_at.and_then(|d| d.parse::<NaiveDate>().ok()),
                job_url: row.get(12)?,
                description: row.get(13)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
