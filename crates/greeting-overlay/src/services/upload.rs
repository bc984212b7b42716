//! Persisting uploaded originals.

use sandboxed_file_manager::{SandboxedManager, file_types};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ProcessingError};
use crate::models::UploadRecord;
use crate::services::ImageRegistry;

#[derive(Debug, Clone)]
pub struct UploadService {
    storage: SandboxedManager,
    registry: ImageRegistry,
}

impl UploadService {
    pub fn new(storage: SandboxedManager, registry: ImageRegistry) -> Self {
        Self { storage, registry }
    }

    /// Store an uploaded payload under a fresh identifier and register it.
    ///
    /// The stored name is `<uuid>.<ext>`, with the extension taken from the
    /// client file name or sniffed from the payload. Payload contents are
    /// not validated as an image here.
    pub async fn store(&self, file_name: Option<&str>, data: &[u8]) -> AppResult<UploadRecord> {
        if data.is_empty() {
            return Err(AppError::invalid_request("No file uploaded"));
        }

        let id = Uuid::new_v4().to_string();
        let stored_name = match file_types::resolve_extension(file_name, data) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.clone(),
        };

        let path = self
            .storage
            .write_new(&stored_name, data)
            .await
            .map_err(ProcessingError::Store)?;

        info!(image_id = %id, bytes = data.len(), "Stored upload as {}", stored_name);

        let record = UploadRecord { id, path };
        self.registry.put(record.clone()).await;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    async fn service() -> (TempDir, UploadService, ImageRegistry) {
        let dir = TempDir::new().unwrap();
        let storage = SandboxedManager::builder()
            .base_directory(dir.path())
            .build()
            .await
            .unwrap();
        let registry = ImageRegistry::new();
        (dir, UploadService::new(storage, registry.clone()), registry)
    }

    #[tokio::test]
    async fn test_store_registers_upload() {
        let (_dir, service, registry) = service().await;

        let record = service.store(Some("holiday.PNG"), PNG_MAGIC).await.unwrap();
        assert!(Uuid::parse_str(&record.id).is_ok());
        assert_eq!(
            record.path.file_name().unwrap().to_str().unwrap(),
            format!("{}.png", record.id)
        );
        assert_eq!(tokio::fs::read(&record.path).await.unwrap(), PNG_MAGIC);
        assert_eq!(registry.get(&record.id).await, Some(record.path));
    }

    #[tokio::test]
    async fn test_extension_is_sniffed_when_name_has_none() {
        let (_dir, service, _registry) = service().await;

        let record = service.store(Some("blob"), PNG_MAGIC).await.unwrap();
        assert_eq!(record.path.extension().unwrap(), "png");

        let record = service.store(None, b"plain bytes").await.unwrap();
        assert_eq!(record.path.file_name().unwrap().to_str().unwrap(), record.id);
    }

    #[tokio::test]
    async fn test_hostile_file_name_cannot_escape_storage() {
        let (dir, service, _registry) = service().await;

        let record = service
            .store(Some("../../etc/passwd.sh/../x.p/ng"), PNG_MAGIC)
            .await
            .unwrap();
        assert_eq!(record.path.parent().unwrap(), dir.path());
    }

    #[tokio::test]
    async fn test_empty_payload_is_rejected() {
        let (_dir, service, registry) = service().await;

        let result = service.store(Some("empty.png"), &[]).await;
        assert!(matches!(result, Err(AppError::InvalidRequest { .. })));
        assert!(registry.is_empty().await);
    }
}
