use super::sheet::SheetData;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Where the authoritative sheet lives
#[serenity::async_trait]
pub trait SheetStore: Sync + Send {
    async fn load(&self) -> Result<SheetData>;
    async fn save(&self, data: &SheetData) -> Result<()>;
}

/// Sheet persisted as JSON on disk
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[serenity::async_trait]
impl SheetStore for FileStore {
    async fn load(&self) -> Result<SheetData> {
        let path = &self.path;
        let contents = match tokio::fs::read(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SheetData::default())
            }
            Err(e) => {
                return Err(anyhow!(
                    "Could not read sheet at `{}`: {}",
                    path.to_string_lossy(),
                    e
                ))
            }
        };

        serde_json::from_slice(&contents).map_err(|e| {
            anyhow!(
                "Could not parse sheet at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    async fn save(&self, data: &SheetData) -> Result<()> {
        let path = &self.path;
        let serialized = serde_json::to_string_pretty(data)
            .map_err(|e| anyhow!("Could not serialize sheet: {}", e))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow!(
                    "Could not create directory `{}`: {}",
                    parent.to_string_lossy(),
                    e
                )
            })?;
        }

        // Create a temporary file in the same directory.
        let tmp_path = path.with_extension("json.new");

        tokio::fs::write(&tmp_path, serialized).await.map_err(|e| {
            anyhow!(
                "Could not write sheet to temporary file `{}`: {}",
                tmp_path.to_string_lossy(),
                e
            )
        })?;

        // Atomically rename the temporary file over the target file.
        tokio::fs::rename(&tmp_path, path).await.map_err(|e| {
            anyhow!(
                "Could not rename temporary file `{}` to `{}`: {}",
                tmp_path.to_string_lossy(),
                path.to_string_lossy(),
                e
            )
        })?;

        Ok(())
    }
}

/// Sheet held in memory only.  Clones of the backing data let tests play the part of a second
/// writer.
#[derive(Default)]
pub struct MemoryStore {
    data: std::sync::Arc<Mutex<SheetData>>,
}

impl MemoryStore {
    pub fn new(data: SheetData) -> Self {
        Self {
            data: std::sync::Arc::new(Mutex::new(data)),
        }
    }

    pub fn shared(&self) -> std::sync::Arc<Mutex<SheetData>> {
        self.data.clone()
    }
}

#[serenity::async_trait]
impl SheetStore for MemoryStore {
    async fn load(&self) -> Result<SheetData> {
        Ok(self.data.lock().await.clone())
    }

    async fn save(&self, data: &SheetData) -> Result<()> {
        *self.data.lock().await = data.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::afd::row::ClaimRow;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("afdbot-test-{}-{}", name, std::process::id()))
            .join("sheet.json")
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_sheet() {
        let store = FileStore::new(scratch_path("missing"));
        let data = store.load().await.unwrap();
        assert!(data.rows.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_through_disk() {
        let path = scratch_path("save");
        let store = FileStore::new(path.clone());

        let mut data = SheetData::default();
        data.event.topic = "Pokemon but they are bread".to_owned();
        data.rows.push(ClaimRow::new(133, "Eevee"));
        store.save(&data).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.new").exists());
        assert_eq!(store.load().await.unwrap(), data);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let path = scratch_path("corrupt");
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let err = FileStore::new(path.clone()).load().await.unwrap_err();
        assert!(err.to_string().contains("Could not parse sheet"));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
