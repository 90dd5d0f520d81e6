use crate::domain::model::CartSnapshot;
use crate::domain::ports::CartStore;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// Cart persistence over a single JSON file: the between-visits storage
/// for a command-line session.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStore for FileCartStore {
    async fn load(&self) -> Result<Option<CartSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &CartSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CartLine, Coupon, CouponKind};
    use crate::domain::money::Money;
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn sample_snapshot() -> CartSnapshot {
        CartSnapshot {
            lines: vec![CartLine {
                id: Uuid::new_v4(),
                product_id: "home-regular".to_string(),
                unit_price: Money::new(10_000),
                quantity: 2,
                variant_key: None,
                vendor_id: "sparkle-co".to_string(),
                stock: 10,
            }],
            coupon: Some(Coupon {
                code: "SAVE10".to_string(),
                kind: CouponKind::Percentage,
                value: 10,
            }),
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileCartStore::new(dir.path().join("cart.json"));
        let snapshot = sample_snapshot();

        tokio_test::block_on(store.save(&snapshot)).unwrap();
        let loaded = tokio_test::block_on(store.load()).unwrap().unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileCartStore::new(dir.path().join("never-saved.json"));

        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let store = FileCartStore::new(dir.path().join("nested/dir/cart.json"));

        store.save(&sample_snapshot()).await.unwrap();
        assert!(store.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error_not_a_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileCartStore::new(path);
        assert!(store.load().await.is_err());
    }
}
