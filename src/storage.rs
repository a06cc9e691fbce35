use crate::errors::DatasetError;
use crate::models::Dataset;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::info;

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/data.json")
}

/// Reads and validates the dataset. Every failure here is fatal.
pub async fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let bytes = fs::read(path).await.map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset: Dataset =
        serde_json::from_slice(&bytes).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&dataset)?;

    info!(
        variations = dataset.variations.len(),
        days = dataset.data.len(),
        "loaded dataset from {}",
        path.display()
    );
    Ok(dataset)
}

pub fn validate(dataset: &Dataset) -> Result<(), DatasetError> {
    if dataset.variations.is_empty() {
        return Err(DatasetError::NoVariations);
    }
    if dataset.data.is_empty() {
        return Err(DatasetError::NoData);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("conversion_dashboard_{}_{name}.json", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn loads_valid_dataset() {
        let path = temp_file(
            "valid",
            r#"{"variations":[{"id":1,"name":"A"}],"data":[{"date":"2024-01-01","visits":{"1":3},"conversions":{"1":1}}]}"#,
        );
        let dataset = load_dataset(&path).await.unwrap();
        assert_eq!(dataset.variations.len(), 1);
        assert_eq!(dataset.data.len(), 1);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn empty_variations_are_fatal() {
        let path = temp_file(
            "no_variations",
            r#"{"variations":[],"data":[{"date":"2024-01-01"}]}"#,
        );
        let err = load_dataset(&path).await.unwrap_err();
        assert!(matches!(err, DatasetError::NoVariations));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn missing_data_field_is_fatal() {
        let path = temp_file("no_data", r#"{"variations":[{"name":"A"}]}"#);
        let err = load_dataset(&path).await.unwrap_err();
        assert!(matches!(err, DatasetError::NoData));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn unreadable_and_malformed_files_are_fatal() {
        let missing = env::temp_dir().join("conversion_dashboard_does_not_exist.json");
        assert!(matches!(
            load_dataset(&missing).await.unwrap_err(),
            DatasetError::Read { .. }
        ));

        let path = temp_file("malformed", "{ not json");
        assert!(matches!(
            load_dataset(&path).await.unwrap_err(),
            DatasetError::Parse { .. }
        ));
        let _ = std::fs::remove_file(path);
    }
}
