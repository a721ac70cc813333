use serde_json::Value;
use std::str::FromStr;

use crate::error::{Error, Result};

mod backup;
mod restore;

pub use backup::{normalize_aspect_ratio, serialize, to_pretty_json, write_backup};
pub use restore::restore_file;

/// Literal the UI uses for "no model selected".
pub const NONE_SENTINEL: &str = "None";

/// Live generation settings as read from the UI at backup time.
///
/// Empty text, empty lists and `None` mean "not set" and are left out of backups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsRecord {
    pub prompt: String,
    pub negative_prompt: String,
    // "1024*1024" or "1024×1024 <span>..."
    pub aspect_ratio: String,
    pub performance: String,
    pub styles: Vec<String>,
    pub base_model: String,
    pub refiner_model: String,
    pub refiner_switch: Option<f64>,
    pub image_number: Option<u32>,
    pub loras: Vec<LoraEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoraEntry {
    pub enabled: bool,
    pub model_name: Option<String>,
    pub weight: f64,
}

impl LoraEntry {
    /// Whether this slot names a real model.
    pub fn has_model(&self) -> bool {
        matches!(self.model_name.as_deref(), Some(name) if !name.is_empty() && name != NONE_SENTINEL)
    }
}

/// Parses `enabled,model,weight`. The model name may itself contain commas.
impl FromStr for LoraEntry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("invalid lora '{s}', expected enabled,model,weight"));
        let (enabled, rest) = s.split_once(',').ok_or_else(invalid)?;
        let (model, weight) = rest.rsplit_once(',').ok_or_else(invalid)?;

        let enabled = match enabled.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => true,
            "false" | "0" | "off" | "no" => false,
            _ => return Err(invalid()),
        };
        let weight: f64 = weight.trim().parse().map_err(|_| invalid())?;
        let model = model.trim();
        Ok(LoraEntry {
            enabled,
            model_name: (!model.is_empty()).then(|| model.to_string()),
            weight,
        })
    }
}

/// Build lora entries from the UI's flat control values (`enabled, model, weight, ...`).
///
/// A trailing incomplete triple is ignored, as is a triple whose weight is not numeric.
pub fn loras_from_flat(values: &[Value]) -> Vec<LoraEntry> {
    values
        .chunks_exact(3)
        .filter_map(|triple| {
            let Some(weight) = triple[2].as_f64() else {
                tracing::debug!("skipping lora control values with weight {}", triple[2]);
                return None;
            };
            Some(LoraEntry {
                enabled: triple[0].as_bool().unwrap_or(false),
                model_name: triple[1].as_str().map(str::to_string),
                weight,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lora_from_cli_triple() {
        let lora: LoraEntry = "true,styleA.safetensors,0.6".parse().unwrap();
        assert_eq!(
            lora,
            LoraEntry {
                enabled: true,
                model_name: Some("styleA.safetensors".into()),
                weight: 0.6
            }
        );

        let commas: LoraEntry = "off, a,b.safetensors ,-1.5".parse().unwrap();
        assert!(!commas.enabled);
        assert_eq!(commas.model_name.as_deref(), Some("a,b.safetensors"));
        assert_eq!(commas.weight, -1.5);
    }

    #[test]
    fn lora_parse_errors() {
        assert!("true,model".parse::<LoraEntry>().is_err());
        assert!("maybe,model,0.5".parse::<LoraEntry>().is_err());
        assert!("true,model,heavy".parse::<LoraEntry>().is_err());
    }

    #[test]
    fn sentinel_and_blank_models_have_no_model() {
        let mut lora: LoraEntry = "true,None,0.8".parse().unwrap();
        assert!(!lora.has_model());
        lora.model_name = None;
        assert!(!lora.has_model());
        lora.model_name = Some(String::new());
        assert!(!lora.has_model());
        lora.model_name = Some("detail.safetensors".into());
        assert!(lora.has_model());
    }

    #[test]
    fn flat_values_chunk_in_threes() {
        let values = vec![
            json!(true),
            json!("None"),
            json!(0.8),
            json!(false),
            json!("styleA"),
            json!(0.6),
            json!(true),
        ];
        let loras = loras_from_flat(&values);
        assert_eq!(loras.len(), 2);
        assert_eq!(loras[1].model_name.as_deref(), Some("styleA"));
        assert!(!loras[1].enabled);
    }
}
