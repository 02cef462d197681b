//! Inspect generation profiles.

use std::path::Path;

use smoothgen_generator::GeneratorProfile;
use tracing::{error, info};

/// Load a profile file and report every validation problem.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if it fails
/// validation.
pub async fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let profile = GeneratorProfile::load(path).await?;

    let errors = profile.validate();
    if !errors.is_empty() {
        error!("Profile validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!(path = %path.display(), "Profile is valid");
    info!("  Variable chance: {}", profile.variable_chance);
    info!("  Sale chance: {}", profile.sale_chance);
    info!("  Gallery chance: {}", profile.gallery_chance);
    info!("  Currency: {}", profile.currency.code());
    info!("  Overrides: {:?}", profile.overrides);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    async fn write_profile(name: &str, yaml: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "smoothgen-profile-{name}-{}.yaml",
            std::process::id()
        ));
        tokio::fs::write(&path, yaml).await.expect("write profile");
        path
    }

    #[tokio::test]
    async fn test_check_rejects_invalid_profile() {
        let path = write_profile("invalid", "variable_chance: 3\n").await;
        let result = check(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        let err = result.expect_err("chance above 1");
        assert!(err.to_string().contains("1 validation errors found"));
    }

    #[tokio::test]
    async fn test_check_rejects_malformed_yaml() {
        let path = write_profile("malformed", "variable_chance: [0.5\n").await;
        let result = check(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_check_accepts_valid_profile() {
        let path = write_profile("valid", "variable_chance: 0.5\nsale_chance: 0.2\n").await;
        let result = check(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        result.expect("valid profile");
    }

    #[tokio::test]
    async fn test_check_missing_file() {
        let path = std::env::temp_dir().join("smoothgen-profile-does-not-exist.yaml");
        assert!(check(&path).await.is_err());
    }
}
