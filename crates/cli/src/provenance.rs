use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What went into an artifact: command parameters plus an optional run label.
pub struct Payload {
    pub params: Value,
    pub label: Option<String>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self { params, label: None }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }
}

/// The JSON block shared by sidecars and `report`.
pub fn document(payload: &Payload, outputs: &[String]) -> Value {
    json!({
        "code_rev": current_git_rev(),
        "engine_version": normalsurf::VERSION,
        "label": payload.label,
        "params": payload.params,
        "outputs": outputs
    })
}

/// Write `<stem>.provenance.json` next to `artifact` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = sidecar_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let mut doc = document(&payload, &[artifact.to_string_lossy().into_owned()]);
    doc["callsite"] = json!({ "file": callsite.file(), "line": callsite.line() });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(baked) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return baked.to_string();
    }
    if let Ok(from_env) = std::env::var("GIT_COMMIT") {
        if !from_env.is_empty() {
            return from_env;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_replaces_the_extension() {
        let derived = sidecar_path(Path::new("/tmp/runs/fig8.parquet"));
        assert_eq!(derived, Path::new("/tmp/runs/fig8.provenance.json"));
        let bare = sidecar_path(Path::new("counts"));
        assert_eq!(bare, Path::new("counts.provenance.json"));
    }

    #[test]
    fn sidecar_records_params_and_output() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("surfaces.csv");
        fs::write(&artifact, "index\n").unwrap();
        let payload = Payload::new(json!({"coords": "quad"})).with_label(Some("smoke".into()));
        let path = write_sidecar(&artifact, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["params"]["coords"], "quad");
        assert_eq!(parsed["label"], "smoke");
        assert_eq!(parsed["engine_version"], normalsurf::VERSION);
        assert!(parsed["callsite"]["line"].is_u64());
    }
}
