//! Sigmac converter invocation

use crate::{ConvertError, ConvertResult};
use async_trait::async_trait;
use sigmapipe_core::{SigmacConfig, TargetMode};
use std::path::Path;
use tokio::process::Command;

/// A converted rule ready to be written to the alert directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedRule {
    /// Filename the rule should be stored under
    pub filename: String,

    /// Rule document as produced on the converter's stdout
    pub content: String,
}

/// Converts a stored Sigma signature into a target-specific rule.
#[async_trait]
pub trait RuleConverter: Send + Sync {
    async fn convert(
        &self,
        target: TargetMode,
        signature_path: &Path,
    ) -> ConvertResult<ConvertedRule>;
}

/// Runs the external sigmac binary.
pub struct SigmacConverter {
    config: SigmacConfig,
}

impl SigmacConverter {
    pub fn new(config: SigmacConfig) -> Self {
        Self { config }
    }

    /// Command-line arguments for one conversion. Pure so the
    /// per-target contracts are testable without the binary.
    fn build_args(&self, target: TargetMode, signature_path: &Path) -> Vec<String> {
        let mut args = vec![
            "-t".to_string(),
            target.as_str().to_string(),
            "-c".to_string(),
            self.config.config_file.display().to_string(),
        ];
        match target {
            TargetMode::EsRule => {
                // es-rule needs the keyword_field backend option
                // cleared for the detection-engine import format
                args.push("--backend-option".to_string());
                args.push("keyword_field=".to_string());
            }
            TargetMode::Elastalert => {
                args.push("--backend-config".to_string());
                args.push(self.config.backend_config_file.display().to_string());
            }
        }
        args.push(signature_path.display().to_string());
        args
    }
}

#[async_trait]
impl RuleConverter for SigmacConverter {
    async fn convert(
        &self,
        target: TargetMode,
        signature_path: &Path,
    ) -> ConvertResult<ConvertedRule> {
        let args = self.build_args(target, signature_path);
        let output = Command::new(&self.config.binary).args(&args).output().await?;

        if !output.status.success() {
            return Err(ConvertError::ConverterFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let signature_filename = signature_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(ConvertedRule {
            filename: target.rule_filename(&signature_filename),
            content: String::from_utf8(output.stdout)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_converter() -> SigmacConverter {
        SigmacConverter::new(SigmacConfig {
            binary: PathBuf::from("sigmac"),
            config_file: PathBuf::from("./sigma_configs/winlogbeat.yml"),
            backend_config_file: PathBuf::from("./sigma_configs/elastalert_backend.yml"),
        })
    }

    #[test]
    fn test_es_rule_args() {
        let converter = test_converter();
        let args = converter.build_args(
            TargetMode::EsRule,
            Path::new("./sigma_signatures/Sigma_42.yml"),
        );
        assert_eq!(
            args,
            vec![
                "-t",
                "es-rule",
                "-c",
                "./sigma_configs/winlogbeat.yml",
                "--backend-option",
                "keyword_field=",
                "./sigma_signatures/Sigma_42.yml",
            ]
        );
    }

    #[test]
    fn test_elastalert_args() {
        let converter = test_converter();
        let args = converter.build_args(
            TargetMode::Elastalert,
            Path::new("./sigma_signatures/Sigma_42.yml"),
        );
        assert_eq!(
            args,
            vec![
                "-t",
                "elastalert",
                "-c",
                "./sigma_configs/winlogbeat.yml",
                "--backend-config",
                "./sigma_configs/elastalert_backend.yml",
                "./sigma_signatures/Sigma_42.yml",
            ]
        );
        assert!(!args.contains(&"--backend-option".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let converter = SigmacConverter::new(SigmacConfig {
            binary: PathBuf::from("/nonexistent/sigmac"),
            ..SigmacConfig::default()
        });
        let result = converter
            .convert(TargetMode::EsRule, Path::new("Sigma_1.yml"))
            .await;
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_convert_captures_stdout() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake-sigmac");
        std::fs::write(&fake, "#!/bin/sh\necho '{\"rule\":\"converted\"}'\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let converter = SigmacConverter::new(SigmacConfig {
            binary: fake,
            ..SigmacConfig::default()
        });
        let rule = converter
            .convert(TargetMode::EsRule, Path::new("Sigma_7.yml"))
            .await
            .unwrap();

        assert_eq!(rule.filename, "Sigma_7.yml.ndjson");
        assert_eq!(rule.content, "{\"rule\":\"converted\"}\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake-sigmac");
        std::fs::write(&fake, "#!/bin/sh\necho 'bad signature' >&2\nexit 2\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let converter = SigmacConverter::new(SigmacConfig {
            binary: fake,
            ..SigmacConfig::default()
        });
        let error = converter
            .convert(TargetMode::Elastalert, Path::new("Sigma_7.yml"))
            .await
            .unwrap_err();

        match error {
            ConvertError::ConverterFailed { stderr, .. } => {
                assert!(stderr.contains("bad signature"));
            }
            other => panic!("expected ConverterFailed, got {:?}", other),
        }
    }
}
