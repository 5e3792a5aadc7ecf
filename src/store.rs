use crate::config::TrackerConfig;
use crate::errors::AppError;
use crate::models::{Entry, EntryTable};
use chrono::NaiveDate;
use std::{env, path::PathBuf, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::error;

/// Durable entry table keyed by (member, date). Holds nothing in memory
/// between calls: every operation re-reads the data file before acting, so
/// several stores can share one file with last-write-wins per key. In-process
/// access is serialized by `file_lock`; across processes nothing is locked.
#[derive(Debug)]
pub struct EntryStore {
    path: PathBuf,
    config: Arc<TrackerConfig>,
    file_lock: Mutex<()>,
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/entries.json"))
}

impl EntryStore {
    pub async fn open(path: PathBuf, config: Arc<TrackerConfig>) -> Result<Self, AppError> {
        let store = Self {
            path,
            config,
            file_lock: Mutex::new(()),
        };

        match fs::try_exists(&store.path).await {
            Ok(true) => {
                store.load().await?;
            }
            Ok(false) => {
                store.persist(&EntryTable::default()).await?;
            }
            Err(err) => return Err(err.into()),
        }

        Ok(store)
    }

    pub async fn upsert(
        &self,
        member: &str,
        status: &str,
        date: NaiveDate,
    ) -> Result<Entry, AppError> {
        if !self.config.is_member(member) {
            return Err(AppError::bad_request(format!("unknown member: {member}")));
        }
        let Some(points) = self.config.points_for(status) else {
            return Err(AppError::bad_request(format!("unknown status: {status}")));
        };

        let _guard = self.file_lock.lock().await;
        let mut table = self.load().await?;
        table
            .entries
            .retain(|entry| !(entry.member == member && entry.date == date));

        let entry = Entry {
            date,
            member: member.to_string(),
            status: status.to_string(),
            points,
        };
        table.entries.push(entry.clone());
        self.persist(&table).await?;

        Ok(entry)
    }

    pub async fn delete(&self, member: &str, date: NaiveDate) -> Result<(), AppError> {
        let _guard = self.file_lock.lock().await;
        let mut table = self.load().await?;
        let before = table.entries.len();
        table
            .entries
            .retain(|entry| !(entry.member == member && entry.date == date));
        if table.entries.len() != before {
            self.persist(&table).await?;
        }

        Ok(())
    }

    pub async fn find(&self, member: &str, date: NaiveDate) -> Result<Option<Entry>, AppError> {
        let _guard = self.file_lock.lock().await;
        let table = self.load().await?;
        Ok(table
            .entries
            .into_iter()
            .find(|entry| entry.member == member && entry.date == date))
    }

    pub async fn all(&self) -> Result<Vec<Entry>, AppError> {
        let _guard = self.file_lock.lock().await;
        Ok(self.load().await?.entries)
    }

    async fn load(&self) -> Result<EntryTable, AppError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                error!("failed to parse data file: {err}");
                AppError::corrupt_data(&self.path, err)
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(EntryTable::default()),
            Err(err) => {
                error!("failed to read data file: {err}");
                Err(err.into())
            }
        }
    }

    async fn persist(&self, table: &EntryTable) -> Result<(), AppError> {
        let payload = serde_json::to_vec_pretty(table).map_err(AppError::internal)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}
