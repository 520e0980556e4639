use anyhow::{Context, Result, bail};
use flagfold_argparse::{AliasTarget, Defaults, Options, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCHEMA_NAME: &str = "flagfold.json";

/// A `flagfold.json` file: typed defaults plus the parse options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    /// Program the schema describes; only used for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(flatten)]
    pub options: Options,
}

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: PathBuf,
    pub schema: Schema,
}

impl LoadedSchema {
    pub fn display_name(&self) -> String {
        self.schema
            .name
            .clone()
            .or_else(|| self.path.parent().and_then(schema_dir_name))
            .unwrap_or_else(|| DEFAULT_SCHEMA_NAME.to_string())
    }
}

/// Load `schema_path`, or `flagfold.json` in the current directory.
///
/// An explicit path must exist; the implicit one may be absent.
pub fn load_schema(schema_path: Option<&Path>) -> Result<Option<LoadedSchema>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match schema_path {
        // `join` keeps an absolute path as is.
        Some(p) => (cwd.join(p), true),
        None => (cwd.join(DEFAULT_SCHEMA_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("schema not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read schema: {}", path.display()))?;
    let schema: Schema = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse schema JSON: {}", path.display()))?;

    Ok(Some(LoadedSchema { path, schema }))
}

/// Write a starter schema into `project_dir`.
///
/// An existing file is left untouched unless `overwrite` is set.
pub fn write_default_schema(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_SCHEMA_NAME);
    if dest.exists() && !overwrite {
        return Ok(dest);
    }

    let defaults: Defaults = [
        ("dryRun", Value::Bool(false)),
        ("verbose", Value::Bool(false)),
        ("count", Value::Number(1.0)),
        ("output", Value::Text(String::new())),
        ("tag", Value::List(Vec::new())),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let schema = Schema {
        schema_version: Some(1),
        name: schema_dir_name(project_dir),
        defaults,
        options: Options::new()
            .alias("d", "dryRun")
            .alias("v", "verbose")
            .alias("q", AliasTarget::negated("verbose"))
            .alias("o", "output")
            .exclusive(["dryRun", "output"]),
    };

    let bytes = serde_json::to_vec_pretty(&schema).context("failed to serialize schema")?;
    let mut out = String::from_utf8(bytes).context("schema is not valid UTF-8")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

/// Name a schema after the directory holding it.
///
/// `.`, `..` and empty components say nothing, so the working directory's
/// own name stands in for them.
fn schema_dir_name(dir: &Path) -> Option<String> {
    fn usable(path: &Path) -> Option<&str> {
        match path.file_name()?.to_str()? {
            "" | "." | ".." => None,
            name => Some(name),
        }
    }

    if let Some(name) = usable(dir) {
        return Some(name.to_owned());
    }
    let cwd = std::env::current_dir().ok()?;
    usable(&cwd).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("flagfold-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn schema_deserializes_camel_case() {
        let json = r#"{
  "schemaVersion": 1,
  "name": "demo",
  "defaults": { "dryRun": false, "count": 2, "input": "n/a", "tag": [] },
  "aliases": { "d": "dryRun", "wet": "!dryRun" },
  "exclusives": [["dryRun", "count"]]
}"#;
        let s: Schema = serde_json::from_str(json).unwrap();
        assert_eq!(s.schema_version, Some(1));
        assert_eq!(s.name.as_deref(), Some("demo"));
        let fields: Vec<&str> = s.defaults.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["dryRun", "count", "input", "tag"]);
        assert_eq!(s.defaults["count"], Value::Number(2.0));
        assert_eq!(s.options.aliases["wet"], AliasTarget::negated("dryRun"));
        assert_eq!(s.options.exclusives.len(), 1);
    }

    #[test]
    fn everything_is_optional() {
        let s: Schema = serde_json::from_str("{}").unwrap();
        assert!(s.defaults.is_empty());
        assert!(s.options.aliases.is_empty());
        assert!(s.options.exclusives.is_empty());
    }

    #[test]
    fn write_default_schema_round_trips() {
        let dir = make_temp_dir("schema-defaults");
        let dest = write_default_schema(&dir, false).unwrap();
        let contents = fs::read_to_string(&dest).unwrap();
        let s: Schema = serde_json::from_str(&contents).unwrap();

        let project_name = dir.file_name().unwrap().to_string_lossy();
        assert_eq!(s.schema_version, Some(1));
        assert_eq!(s.name.as_deref(), Some(&*project_name));
        assert_eq!(s.defaults["dryRun"], Value::Bool(false));
        assert_eq!(s.options.aliases["q"], AliasTarget::negated("verbose"));
        flagfold_argparse::Parser::new(&s.defaults, &s.options).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_default_schema_keeps_existing_file() {
        let dir = make_temp_dir("schema-keep");
        let dest = dir.join(DEFAULT_SCHEMA_NAME);
        fs::write(&dest, "{}").unwrap();

        write_default_schema(&dir, false).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");

        write_default_schema(&dir, true).unwrap();
        assert_ne!(fs::read_to_string(&dest).unwrap(), "{}");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn dir_name_falls_back_to_working_directory() {
        assert_eq!(schema_dir_name(Path::new("/tmp/demo")).as_deref(), Some("demo"));

        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.file_name().and_then(|s| s.to_str()).map(str::to_owned);
        assert_eq!(schema_dir_name(Path::new(".")), expected);
        assert_eq!(schema_dir_name(Path::new("a/..")), expected);
    }

    #[test]
    fn explicit_missing_schema_fails() {
        let dir = make_temp_dir("schema-missing");
        let err = load_schema(Some(&dir.join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("schema not found"));

        let _ = fs::remove_dir_all(&dir);
    }
}
