use crate::config::Config;
use crate::model::{NewSong, Song, SongFilter, SongUpdate};
use crate::store::SongStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::collections::HashSet;
use std::path::Path;

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

const MIGRATIONS: &[(&str, &str)] = &[("001_songs.sql", include_str!("migrations/001_songs.sql"))];

const IN_MEMORY: &str = ":memory:";

const SONG_COLUMNS: &str =
    "id, group_name, name, release_date, text, link, created_at, updated_at, deleted_at";

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct Database {
    _db: LibsqlDatabase,
    conn: Connection,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Names already recorded in `_migrations`. A fresh database has no
    /// table yet, which reads as nothing applied.
    async fn applied_migrations(conn: &Connection) -> Result<HashSet<String>> {
        let mut rows = match conn.query("SELECT name FROM _migrations", ()).await {
            Ok(rows) => rows,
            Err(e) if e.to_string().contains("no such table") => return Ok(HashSet::new()),
            Err(e) => return Err(e.into()),
        };

        let mut applied = HashSet::new();
        while let Some(row) = rows.next().await? {
            applied.insert(row.get::<String>(0)?);
        }
        Ok(applied)
    }

    async fn migrate(conn: &Connection) -> Result<usize> {
        let mut applied = Self::applied_migrations(conn).await?;
        let mut ran = 0;

        for (name, sql) in SYSTEM_MIGRATIONS.iter().chain(MIGRATIONS) {
            if applied.contains(*name) {
                tracing::debug!(migration = name, "[db] migration already applied");
                continue;
            }

            tracing::info!(migration = name, "[db] applying migration");
            conn.execute_batch(sql)
                .await
                .with_context(|| format!("migration {name} failed"))?;
            conn.execute(
                "INSERT INTO _migrations (name, applied_at) VALUES (?, ?)",
                libsql::params![*name, now()],
            )
            .await?;

            applied.insert(name.to_string());
            ran += 1;
        }

        Ok(ran)
    }

    /// Opens the configured database; relative paths resolve against `data_dir`.
    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let db = cfg.app.get_db();
        if db == IN_MEMORY {
            return Self::open(IN_MEMORY).await;
        }

        let path = data_dir.join(db);
        Self::open(&path.to_string_lossy()).await
    }

    pub async fn in_memory() -> Result<Self> {
        Self::open(IN_MEMORY).await
    }

    pub async fn open(path: &str) -> Result<Self> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        let ran = Self::migrate(&conn).await?;

        tracing::info!(path, migrations = ran, "[db] songs database ready");
        Ok(Database { _db: db, conn })
    }

    fn row_to_song(row: &libsql::Row) -> Result<Song> {
        Ok(Song {
            id: row.get(0)?,
            group: row.get(1)?,
            name: row.get(2)?,
            release_date: row.get(3)?,
            text: row.get(4)?,
            link: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            deleted_at: row.get(8)?,
        })
    }
}

#[async_trait]
impl SongStore for Database {
    async fn find(&self, filter: &SongFilter, limit: u32, offset: u32) -> Result<Vec<Song>> {
        let mut clauses = vec!["deleted_at IS NULL"];
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(group) = &filter.group {
            clauses.push("group_name = ?");
            params.push(group.clone().into());
        }
        if let Some(name) = &filter.name {
            clauses.push("name = ?");
            params.push(name.clone().into());
        }

        params.push(libsql::Value::Integer(i64::from(limit)));
        params.push(libsql::Value::Integer(i64::from(offset)));

        let query = format!(
            "SELECT {SONG_COLUMNS} FROM songs WHERE {} ORDER BY id ASC LIMIT ? OFFSET ?",
            clauses.join(" AND ")
        );

        let mut rows = self.conn.query(&query, params).await?;
        let mut songs = Vec::new();

        while let Some(row) = rows.next().await? {
            songs.push(Self::row_to_song(&row)?);
        }

        Ok(songs)
    }

    async fn get(&self, id: i64) -> Result<Option<Song>> {
        let query = format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ? AND deleted_at IS NULL");

        let mut rows = self.conn.query(&query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_song(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn create(&self, song: NewSong) -> Result<Song> {
        let query = format!(
            r#"
            INSERT INTO songs (group_name, name, release_date, text, link, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {SONG_COLUMNS}
        "#
        );

        let timestamp = now();
        let mut rows = self
            .conn
            .query(
                &query,
                libsql::params![
                    song.group,
                    song.name,
                    song.release_date,
                    song.text,
                    song.link,
                    timestamp.clone(),
                    timestamp
                ],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Self::row_to_song(&row)?)
        } else {
            anyhow::bail!("Failed to create song")
        }
    }

    async fn update_partial(&self, id: i64, update: &SongUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(self.get(id).await?.is_some());
        }

        let mut updates = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        let fields = [
            ("group_name = ?", &update.group),
            ("name = ?", &update.name),
            ("release_date = ?", &update.release_date),
            ("text = ?", &update.text),
            ("link = ?", &update.link),
        ];
        for (clause, value) in fields {
            if let Some(value) = value {
                updates.push(clause);
                params.push(value.clone().into());
            }
        }

        updates.push("updated_at = ?");
        params.push(now().into());
        params.push(id.into());

        let query = format!(
            "UPDATE songs SET {} WHERE id = ? AND deleted_at IS NULL",
            updates.join(", ")
        );

        let affected = self.conn.execute(&query, params).await?;
        Ok(affected > 0)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let timestamp = now();
        let affected = self
            .conn
            .execute(
                "UPDATE songs SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
                libsql::params![timestamp.clone(), timestamp, id],
            )
            .await?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_song(group: &str, name: &str, text: &str) -> NewSong {
        NewSong {
            group: group.to_string(),
            name: name.to_string(),
            release_date: Some("2006-07-16".to_string()),
            text: Some(text.to_string()),
            link: Some("https://example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_timestamps() {
        let db = Database::in_memory().await.unwrap();

        let song = db
            .create(new_song("Muse", "Supermassive Black Hole", "Ooh baby"))
            .await
            .unwrap();

        assert!(song.id > 0);
        assert_eq!(song.group, "Muse");
        assert_eq!(song.text.as_deref(), Some("Ooh baby"));
        assert!(!song.created_at.is_empty());
        assert_eq!(song.created_at, song.updated_at);
        assert!(song.deleted_at.is_none());

        assert_eq!(db.get(song.id).await.unwrap(), Some(song));
    }

    #[tokio::test]
    async fn find_filters_and_pages_in_id_order() {
        let db = Database::in_memory().await.unwrap();
        let a = db.create(new_song("Muse", "Uprising", "")).await.unwrap();
        let b = db.create(new_song("Muse", "Hysteria", "")).await.unwrap();
        let c = db.create(new_song("Queen", "Bohemian Rhapsody", "")).await.unwrap();

        let all = db.find(&SongFilter::default(), 10, 0).await.unwrap();
        assert_eq!(
            all.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![a.id, b.id, c.id]
        );

        let muse = db
            .find(&SongFilter::new(Some("Muse".to_string()), None), 10, 0)
            .await
            .unwrap();
        assert_eq!(muse.len(), 2);

        let by_name = db
            .find(
                &SongFilter::new(Some("Muse".to_string()), Some("Hysteria".to_string())),
                10,
                0,
            )
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, b.id);

        let page = db.find(&SongFilter::default(), 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, b.id);
    }

    #[tokio::test]
    async fn update_partial_touches_only_present_fields() {
        let db = Database::in_memory().await.unwrap();
        let song = db.create(new_song("Muse", "Uprising", "verse")).await.unwrap();

        let update = SongUpdate {
            name: Some("New Title".to_string()),
            ..Default::default()
        };
        assert!(db.update_partial(song.id, &update).await.unwrap());

        let updated = db.get(song.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "New Title");
        assert_eq!(updated.group, song.group);
        assert_eq!(updated.text, song.text);
        assert_eq!(updated.link, song.link);
        assert_eq!(updated.release_date, song.release_date);
        assert_eq!(updated.created_at, song.created_at);
    }

    #[tokio::test]
    async fn update_of_missing_row_reports_false() {
        let db = Database::in_memory().await.unwrap();
        let update = SongUpdate {
            group: Some("Nobody".to_string()),
            ..Default::default()
        };

        assert!(!db.update_partial(42, &update).await.unwrap());
        assert!(!db.update_partial(42, &SongUpdate::default()).await.unwrap());
    }

    #[tokio::test]
    async fn soft_deleted_rows_are_hidden() {
        let db = Database::in_memory().await.unwrap();
        let song = db.create(new_song("Muse", "Uprising", "")).await.unwrap();

        assert!(db.soft_delete(song.id).await.unwrap());
        assert!(db.get(song.id).await.unwrap().is_none());
        assert!(db.find(&SongFilter::default(), 10, 0).await.unwrap().is_empty());

        assert!(!db.soft_delete(song.id).await.unwrap());
        let update = SongUpdate {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert!(!db.update_partial(song.id, &update).await.unwrap());

        let mut rows = db
            .connection()
            .query("SELECT deleted_at FROM songs WHERE id = ?", libsql::params![song.id])
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert!(row.get::<Option<String>>(0).unwrap().is_some());
    }

    #[tokio::test]
    async fn migrations_are_recorded_once() {
        let db = Database::in_memory().await.unwrap();

        assert_eq!(Database::migrate(db.connection()).await.unwrap(), 0);

        let mut rows = db
            .connection()
            .query("SELECT COUNT(*) FROM _migrations", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        let count: i64 = row.get(0).unwrap();
        assert_eq!(count as usize, SYSTEM_MIGRATIONS.len() + MIGRATIONS.len());
    }
}
