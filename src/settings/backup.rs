use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::{SettingsRecord, NONE_SENTINEL};
use crate::error::{Error, Result};
use crate::utils::is_plain_file_name;

/// `"1024×1024 <span>(1:1)</span>"` -> `"1024*1024"`. Empty input gives `None`.
pub fn normalize_aspect_ratio(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let raw = value.split(' ').next().unwrap_or("");
    Some(raw.replace('×', "*"))
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

// Values a backup never records.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s == NONE_SENTINEL,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Flat `default_*` document for `record`, with unset fields dropped.
pub fn serialize(record: &SettingsRecord) -> Value {
    let mut doc = Map::new();
    doc.insert("default_prompt".into(), text(&record.prompt));
    doc.insert("default_prompt_negative".into(), text(&record.negative_prompt));
    doc.insert(
        "default_aspect_ratio".into(),
        normalize_aspect_ratio(&record.aspect_ratio).map_or(Value::Null, Value::String),
    );
    doc.insert("default_performance".into(), text(&record.performance));
    doc.insert(
        "default_styles".into(),
        Value::Array(record.styles.iter().map(|s| text(s)).collect()),
    );
    doc.insert("default_model".into(), text(&record.base_model));
    doc.insert("default_refiner".into(), text(&record.refiner_model));
    doc.insert(
        "default_refiner_switch".into(),
        record.refiner_switch.map_or(Value::Null, Value::from),
    );
    doc.insert(
        "default_image_number".into(),
        record.image_number.map_or(Value::Null, Value::from),
    );

    let loras: Vec<Value> = record
        .loras
        .iter()
        .filter(|lora| lora.has_model())
        .map(|lora| {
            Value::Array(vec![
                Value::Bool(lora.enabled),
                text(lora.model_name.as_deref().unwrap_or_default()),
                Value::from(lora.weight),
            ])
        })
        .collect();
    if !loras.is_empty() {
        doc.insert("default_loras".into(), Value::Array(loras));
    }

    doc.retain(|_, value| !is_unset(value));
    Value::Object(doc)
}

/// Indented (2 spaces) JSON text of the backup document.
pub fn to_pretty_json(record: &SettingsRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(&serialize(record))?)
}

/// Write `<dir>/<name>.json` and return its path.
pub fn write_backup(dir: &Path, name: &str, record: &SettingsRecord) -> Result<PathBuf> {
    let name = name.trim();
    let stem = name
        .strip_suffix(".json")
        .or_else(|| name.strip_suffix(".JSON"))
        .unwrap_or(name);
    if stem.is_empty() {
        return Err(Error::Validation("backup filename is empty".into()));
    }
    if !is_plain_file_name(stem) {
        return Err(Error::Validation(format!("invalid backup filename '{name}'")));
    }

    let body = to_pretty_json(record)?;
    std::fs::create_dir_all(dir).map_err(|e| Error::fs(dir, e))?;
    let path = dir.join(format!("{stem}.json"));
    std::fs::write(&path, body).map_err(|e| Error::fs(&path, e))?;
    tracing::info!("settings backup written to {}", path.display());
    Ok(path)
}
