use crate::store::KeyValueStore;
use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub const DB_FILE_NAME: &str = "gpa.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace.to_string_lossy()
        )
    })?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.to_string_lossy()))?;
    init_schema(&conn)?;
    Ok(conn)
}

#[cfg(test)]
pub fn open_in_memory() -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;
    Ok(())
}

pub fn kv_get(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let v = conn
        .query_row("SELECT value FROM kv WHERE key = ?", [key], |r| r.get(0))
        .optional()?;
    Ok(v)
}

pub fn kv_set(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO kv(key, value, updated_at) VALUES(?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        (key, value, &now),
    )?;
    Ok(())
}

pub fn kv_updated_at(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let v: Option<Option<String>> = conn
        .query_row("SELECT updated_at FROM kv WHERE key = ?", [key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v.flatten())
}

/// [`KeyValueStore`] over the workspace `kv` table.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(open_db(workspace)?))
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        kv_get(&self.conn, key).with_context(|| format!("failed to read {}", key))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        kv_set(&self.conn, key, value).with_context(|| format!("failed to write {}", key))
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> anyhow::Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("failed to begin kv transaction")?;
        // Dropping `tx` on the error path rolls the whole batch back.
        for (key, value) in entries {
            kv_set(&tx, key, value).with_context(|| format!("failed to write {}", key))?;
        }
        tx.commit().context("failed to commit kv transaction")?;
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM kv", [])
            .context("failed to clear kv")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;
    use crate::store::{StudentRecordStore, SEMESTERS_KEY};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    #[test]
    fn kv_set_overwrites_and_stamps() {
        let conn = open_in_memory().expect("open");
        assert_eq!(kv_get(&conn, "student").expect("get"), None);
        kv_set(&conn, "student", "{}").expect("set");
        kv_set(&conn, "student", "{\"cgpa\":1.0}").expect("set");
        assert_eq!(
            kv_get(&conn, "student").expect("get").as_deref(),
            Some("{\"cgpa\":1.0}")
        );
        assert!(kv_updated_at(&conn, "student").expect("stamp").is_some());
    }

    #[test]
    fn sqlite_store_clear_drops_every_key() {
        let mut kv = SqliteStore::new(open_in_memory().expect("open"));
        kv.set("a", "1").expect("set");
        kv.set("b", "2").expect("set");
        kv.clear().expect("clear");
        assert_eq!(kv.get("a").expect("get"), None);
        assert_eq!(kv.get("b").expect("get"), None);
    }

    #[test]
    fn set_many_rolls_back_every_key_on_failure() {
        let mut kv = SqliteStore::new(open_in_memory().expect("open"));
        kv.set("semesters", "[]").expect("seed");
        kv.conn()
            .execute_batch(
                "CREATE TRIGGER reject_student_insert BEFORE INSERT ON kv
                 WHEN NEW.key = 'student'
                 BEGIN SELECT RAISE(ABORT, 'student write rejected'); END;",
            )
            .expect("create trigger");

        let res = kv.set_many(&[("semesters", "[1]"), ("student", "{}")]);
        assert!(res.is_err());
        assert_eq!(kv.get("semesters").expect("get").as_deref(), Some("[]"));
        assert_eq!(kv.get("student").expect("get"), None);
    }

    #[test]
    fn failed_submit_keeps_sqlite_records_consistent() {
        let conn = open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TRIGGER reject_student_insert BEFORE INSERT ON kv
             WHEN NEW.key = 'student'
             BEGIN SELECT RAISE(ABORT, 'student write rejected'); END;",
        )
        .expect("create trigger");
        let mut rs = StudentRecordStore::new(SqliteStore::new(conn));

        let err = rs
            .submit_semester("I", Term::First, &[])
            .expect_err("summary write rejected");
        assert_eq!(err.code(), "store_failed");
        assert!(rs.list_semesters().expect("list").is_empty());
        assert_eq!(rs.backend().get(SEMESTERS_KEY).expect("get"), None);
    }

    #[test]
    fn records_persist_across_reopen() {
        let workspace = temp_dir("gpad-db-reopen");
        {
            let mut rs = StudentRecordStore::new(SqliteStore::open(&workspace).expect("open"));
            rs.submit_semester("I", Term::First, &[])
                .expect("submit");
        }
        let rs = StudentRecordStore::new(SqliteStore::open(&workspace).expect("reopen"));
        let listed = rs.list_semesters().expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].part(), "I");
        assert!(rs.backend().get(SEMESTERS_KEY).expect("get").is_some());
        let _ = std::fs::remove_dir_all(&workspace);
    }
}
