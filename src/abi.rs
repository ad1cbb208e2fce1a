// src/abi.rs
use crate::error::ConfigError;
use alloy::json_abi::JsonAbi;
use std::{fs, io, path::Path};
use tracing::info;

/// Token contract methods the balance reader calls.
pub const REQUIRED_METHODS: [&str; 3] = ["symbol", "decimals", "balanceOf"];

/// Load the token contract schema from disk.
pub fn load_schema(path: &Path) -> Result<JsonAbi, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::SchemaMissing {
            path: path.to_path_buf(),
        },
        _ => ConfigError::SchemaRead {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let schema: JsonAbi = serde_json::from_str(&text).map_err(|source| ConfigError::SchemaInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    check_schema(&schema)?;

    info!("Loaded contract schema from {} ({} functions)", path.display(), schema.functions.len());
    Ok(schema)
}

pub fn check_schema(schema: &JsonAbi) -> Result<(), ConfigError> {
    for method in REQUIRED_METHODS {
        if schema.function(method).map_or(true, |overloads| overloads.is_empty()) {
            return Err(ConfigError::SchemaIncomplete { method });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) const ERC20_ABI: &str = r#"[
    {"type":"function","name":"symbol","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
    {"type":"function","name":"decimals","inputs":[],"outputs":[{"name":"","type":"uint8"}],"stateMutability":"view"},
    {"type":"function","name":"balanceOf","inputs":[{"name":"owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}
]"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("polygon-quotes-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_erc20_schema() {
        let path = scratch_file("erc20.json", ERC20_ABI);
        let schema = load_schema(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(schema.function("balanceOf").is_some());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_schema(Path::new("/definitely/not/here/eth_abi.json")).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaMissing { .. }));
    }

    #[test]
    fn rejects_non_abi_json() {
        let path = scratch_file("garbage.json", "{ not json");
        let err = load_schema(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(matches!(err, ConfigError::SchemaInvalid { .. }));
    }

    #[test]
    fn rejects_schema_without_balance_of() {
        let schema: JsonAbi = serde_json::from_str(
            r#"[
                {"type":"function","name":"symbol","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
                {"type":"function","name":"decimals","inputs":[],"outputs":[{"name":"","type":"uint8"}],"stateMutability":"view"}
            ]"#,
        )
        .unwrap();

        let err = check_schema(&schema).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaIncomplete { method: "balanceOf" }));
    }
}
