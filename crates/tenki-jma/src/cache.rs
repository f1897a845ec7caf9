//! SQLite store for areas and fetched forecasts.
//!
//! The store holds only a path. Each operation opens its own connection and
//! drops it before returning, so nothing is held between user actions.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::error::JmaError;
use crate::types::{Area, AreaDirectory, ForecastEntry, StoredForecast};

#[derive(Debug, Clone)]
pub struct ForecastStore {
    path: PathBuf,
}

impl ForecastStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<Connection, JmaError> {
        let conn = Connection::open(&self.path)?;
        // The bundled SQLite enforces foreign keys by default. Forecasts may
        // reference areas that were never stored, so enforcement stays off.
        conn.pragma_update(None, "foreign_keys", false)?;
        Self::init_schema(&conn)?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<(), JmaError> {
        // forecasts.area_code declares a reference to areas(code) but is not
        // enforced; see open().
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS areas (
                code TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS forecasts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                area_code TEXT NOT NULL REFERENCES areas(code),
                date TEXT NOT NULL,
                weather TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_forecasts_area_date ON forecasts(area_code, date);
            "#,
        )?;
        Ok(())
    }

    /// Insert areas that are not stored yet. Existing rows are left as they are.
    ///
    /// Returns the number of newly inserted rows.
    pub fn upsert_areas(&self, areas: &AreaDirectory) -> Result<usize, JmaError> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO areas (code, name) VALUES (?1, ?2)")?;
            for (code, name) in areas {
                inserted += stmt.execute(params![code, name])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Upserted areas: {} new of {}", inserted, areas.len());
        Ok(inserted)
    }

    /// Append one row per entry, all stamped with the current time.
    ///
    /// No uniqueness is enforced; repeated fetches accumulate history.
    pub fn append_forecasts(
        &self,
        area_code: &str,
        entries: &[ForecastEntry],
    ) -> Result<usize, JmaError> {
        let fetched_at = Utc::now().timestamp_millis();
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO forecasts (area_code, date, weather, fetched_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in entries {
                stmt.execute(params![area_code, entry.date, entry.weather, fetched_at])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Appended {} forecasts for {}", entries.len(), area_code);
        Ok(entries.len())
    }

    /// All stored forecasts for an area, optionally restricted to one date,
    /// in insertion order. Returns an empty list when nothing matches.
    pub fn query_forecasts(
        &self,
        area_code: &str,
        date: Option<&str>,
    ) -> Result<Vec<StoredForecast>, JmaError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT area_code, date, weather, fetched_at
            FROM forecasts
            WHERE area_code = ?1 AND (?2 IS NULL OR date = ?2)
            ORDER BY id ASC
            "#,
        )?;

        let rows = stmt.query_map(params![area_code, date], Self::row_to_forecast)?;
        let forecasts = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(forecasts)
    }

    /// Areas known to the store, ordered by code.
    pub fn list_areas(&self) -> Result<Vec<Area>, JmaError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT code, name FROM areas ORDER BY code ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Area {
                code: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Name of a stored area.
    pub fn area_name(&self, code: &str) -> Result<Option<String>, JmaError> {
        let conn = self.open()?;
        let name = conn
            .query_row(
                "SELECT name FROM areas WHERE code = ?1",
                params![code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    /// Distinct dates with stored forecasts for an area, ascending.
    pub fn stored_dates(&self, area_code: &str) -> Result<Vec<String>, JmaError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT date FROM forecasts WHERE area_code = ?1 ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(params![area_code], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Number of stored forecast rows for an area.
    pub fn forecast_count(&self, area_code: &str) -> Result<u32, JmaError> {
        let conn = self.open()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM forecasts WHERE area_code = ?1",
            params![area_code],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn row_to_forecast(row: &rusqlite::Row) -> rusqlite::Result<StoredForecast> {
        let fetched_ms: i64 = row.get(3)?;
        let fetched_at = DateTime::from_timestamp_millis(fetched_ms).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Integer,
                format!("fetched_at out of range: {}", fetched_ms).into(),
            )
        })?;

        Ok(StoredForecast {
            area_code: row.get(0)?,
            date: row.get(1)?,
            weather: row.get(2)?,
            fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn temp_store() -> (tempfile::TempDir, ForecastStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ForecastStore::new(dir.path().join("forecasts.db"));
        (dir, store)
    }

    fn directory(pairs: &[(&str, &str)]) -> AreaDirectory {
        pairs
            .iter()
            .map(|(c, n)| (c.to_string(), n.to_string()))
            .collect()
    }

    fn entry(date: &str, weather: &str) -> ForecastEntry {
        ForecastEntry {
            date: date.to_string(),
            weather: weather.to_string(),
        }
    }

    #[test]
    fn test_upsert_areas_is_idempotent() {
        let (_dir, store) = temp_store();
        let areas = directory(&[("130000", "東京都"), ("270000", "大阪府")]);

        assert_eq!(store.upsert_areas(&areas).unwrap(), 2);
        assert_eq!(store.upsert_areas(&areas).unwrap(), 0);

        let stored = store.list_areas().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].code, "130000");
        assert_eq!(stored[1].name, "大阪府");
    }

    #[test]
    fn test_upsert_does_not_update_existing_name() {
        let (_dir, store) = temp_store();
        store.upsert_areas(&directory(&[("130000", "東京都")])).unwrap();
        store.upsert_areas(&directory(&[("130000", "Tokyo")])).unwrap();

        assert_eq!(store.area_name("130000").unwrap().as_deref(), Some("東京都"));
        assert!(store.area_name("999999").unwrap().is_none());
    }

    #[test]
    fn test_append_forecasts_accumulates_duplicates() {
        let (_dir, store) = temp_store();
        let entries = vec![entry("2024-01-01", "晴れ"), entry("2024-01-02", "くもり")];

        store.append_forecasts("130000", &entries).unwrap();
        store.append_forecasts("130000", &entries).unwrap();

        assert_eq!(store.forecast_count("130000").unwrap(), 4);
        let same_day = store.query_forecasts("130000", Some("2024-01-01")).unwrap();
        assert_eq!(same_day.len(), 2);
        assert!(same_day.iter().all(|r| r.weather == "晴れ"));
    }

    #[test]
    fn test_query_filters_by_area_and_date() {
        let (_dir, store) = temp_store();
        store
            .append_forecasts(
                "130000",
                &[entry("2024-01-01", "晴れ"), entry("2024-01-02", "雨")],
            )
            .unwrap();
        store
            .append_forecasts("270000", &[entry("2024-01-01", "雪")])
            .unwrap();

        let tokyo_all = store.query_forecasts("130000", None).unwrap();
        assert_eq!(tokyo_all.len(), 2);
        assert!(tokyo_all.iter().all(|r| r.area_code == "130000"));

        let tokyo_day2 = store.query_forecasts("130000", Some("2024-01-02")).unwrap();
        assert_eq!(tokyo_day2.len(), 1);
        assert_eq!(tokyo_day2[0].weather, "雨");
    }

    #[test]
    fn test_query_preserves_insertion_order() {
        let (_dir, store) = temp_store();
        store
            .append_forecasts(
                "130000",
                &[
                    entry("2024-01-03", "雨"),
                    entry("2024-01-01", "晴れ"),
                    entry("2024-01-02", "くもり"),
                ],
            )
            .unwrap();

        let dates: Vec<_> = store
            .query_forecasts("130000", None)
            .unwrap()
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn test_query_no_match_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.query_forecasts("130000", None).unwrap().is_empty());
        assert!(store
            .query_forecasts("130000", Some("2024-01-01"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_fetched_at_is_recent() {
        let (_dir, store) = temp_store();
        let before = Utc::now() - chrono::Duration::seconds(1);
        store
            .append_forecasts("130000", &[entry("2024-01-01", "晴れ")])
            .unwrap();

        let rows = store.query_forecasts("130000", None).unwrap();
        assert!(rows[0].fetched_at >= before);
    }

    #[test]
    fn test_foreign_key_is_not_enforced() {
        let (_dir, store) = temp_store();
        store
            .append_forecasts("999999", &[entry("2024-01-01", "晴れ")])
            .unwrap();
        assert_eq!(store.forecast_count("999999").unwrap(), 1);
    }

    #[test]
    fn test_foreign_keys_stay_off_across_connections() {
        let (dir, store) = temp_store();
        store
            .append_forecasts("130000", &[entry("2024-01-01", "晴れ")])
            .unwrap();
        store
            .append_forecasts("130000", &[entry("2024-01-02", "雨")])
            .unwrap();
        assert_eq!(store.forecast_count("130000").unwrap(), 2);
        assert!(store.list_areas().unwrap().is_empty());

        // A later directory load still succeeds alongside the orphaned rows
        store.upsert_areas(&directory(&[("130000", "東京都")])).unwrap();
        let conn = Connection::open(dir.path().join("forecasts.db")).unwrap();
        let orphans: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM forecasts WHERE area_code NOT IN (SELECT code FROM areas)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_out_of_range_fetched_at_is_storage_error() {
        let (dir, store) = temp_store();
        store
            .append_forecasts("130000", &[entry("2024-01-01", "晴れ")])
            .unwrap();

        let conn = Connection::open(dir.path().join("forecasts.db")).unwrap();
        conn.execute("UPDATE forecasts SET fetched_at = ?1", params![i64::MAX])
            .unwrap();
        drop(conn);

        let err = store.query_forecasts("130000", None).unwrap_err();
        assert!(matches!(
            err,
            JmaError::Storage(rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, _))
        ));
    }

    #[test]
    fn test_stored_dates_are_distinct_and_sorted() {
        let (_dir, store) = temp_store();
        let entries = vec![entry("2024-01-02", "雨"), entry("2024-01-01", "晴れ")];
        store.append_forecasts("130000", &entries).unwrap();
        store.append_forecasts("130000", &entries).unwrap();

        assert_eq!(
            store.stored_dates("130000").unwrap(),
            vec!["2024-01-01", "2024-01-02"]
        );
    }

    #[test]
    fn test_data_survives_reopen() {
        let (dir, store) = temp_store();
        store.upsert_areas(&directory(&[("130000", "東京都")])).unwrap();
        drop(store);

        let reopened = ForecastStore::new(dir.path().join("forecasts.db"));
        assert_eq!(reopened.list_areas().unwrap().len(), 1);
    }

    #[test]
    fn test_unopenable_path_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ForecastStore::new(dir.path().join("missing").join("forecasts.db"));
        let err = store.query_forecasts("130000", None).unwrap_err();
        assert!(matches!(err, JmaError::Storage(_)));
    }
}
