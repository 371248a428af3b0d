use crate::commands::db::ledger_dir;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_SCHEMA_VERSION: i64 = 2;

#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    pub currency_symbol: String,
    pub admin_code: String,
    pub export_directory: String,
    pub live_update_debounce: Duration,
    pub default_report_status: String,
}

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn get_settings(data_dir: String) -> Result<Value, String> {
    load_settings_from_disk(&data_dir)
}

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn save_settings(data_dir: String, settings: Value) -> Result<Value, String> {
    save_settings_to_disk(&data_dir, settings)
}

pub fn load_effective_settings(data_dir: &str) -> Result<EffectiveSettings, String> {
    let settings = load_settings_from_disk(data_dir)?;
    Ok(effective_from_value(&settings))
}

fn effective_from_value(settings: &Value) -> EffectiveSettings {
    let text = |key: &str, default: &str| {
        settings
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    let debounce_ms = settings
        .get("liveUpdateDebounceMs")
        .and_then(Value::as_u64)
        .unwrap_or(250)
        .clamp(50, 5000);

    EffectiveSettings {
        currency_symbol: text("currencySymbol", "₱"),
        admin_code: text("adminCode", "SECRET123"),
        export_directory: text("exportDirectory", "exports"),
        live_update_debounce: Duration::from_millis(debounce_ms),
        default_report_status: text("defaultReportStatus", "all"),
    }
}

pub fn load_settings_from_disk(data_dir: &str) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_ledger_dir(data_dir)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
            log::warn!("settings.json is not valid JSON, falling back to defaults: {e}");
            json!({})
        })
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(data_dir: &str, settings: Value) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_ledger_dir(data_dir)?;

    let mut merged = load_settings_from_disk(data_dir).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    log::info!("saved settings to {}", path.display());
    Ok(migrated)
}

fn settings_path(data_dir: &str) -> PathBuf {
    ledger_dir(data_dir).join("settings.json")
}

fn ensure_ledger_dir(data_dir: &str) -> Result<(), String> {
    fs::create_dir_all(ledger_dir(data_dir))
        .map_err(|e| format!("Failed to create ledger directory: {e}"))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write settings.json: {e}"))
}

fn migrate_settings(input: Value) -> Value {
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        rename_legacy_key(&mut out, "admin_code", "adminCode");
        rename_legacy_key(&mut out, "currency", "currencySymbol");
    }

    if version < 2 {
        // V2 introduces debounced live updates.
        ensure_key(&mut out, "liveUpdateDebounceMs", json!(250));
    }

    deep_merge_defaults(&mut out, &default_settings());
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "currencySymbol": "₱",
        "adminCode": "SECRET123",
        "exportDirectory": "exports",
        "liveUpdateDebounceMs": 250,
        "defaultReportStatus": "all"
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn ensure_key(target: &mut Value, key: &str, value: Value) {
    if let Some(obj) = target.as_object_mut() {
        obj.entry(key.to_string()).or_insert(value);
    }
}

fn rename_legacy_key(target: &mut Value, from: &str, to: &str) {
    let Some(obj) = target.as_object_mut() else {
        return;
    };
    if let Some(value) = obj.remove(from) {
        obj.entry(to.to_string()).or_insert(value);
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "liveUpdateDebounceMs", 50, 5000, 250);

    sanitize_enum(
        obj,
        "defaultReportStatus",
        &["all", "pending", "approved", "rejected"],
        "all",
    );

    ensure_non_empty_str(obj, "currencySymbol", "₱");
    ensure_non_empty_str(obj, "adminCode", "SECRET123");
    ensure_non_empty_str(obj, "exportDirectory", "exports");

    // Export directory must stay inside the data directory.
    let escapes = obj
        .get("exportDirectory")
        .and_then(Value::as_str)
        .is_some_and(|dir| Path::new(dir).is_absolute() || dir.split(['/', '\\']).any(|part| part == ".."));
    if escapes {
        obj.insert("exportDirectory".to_string(), json!("exports"));
    }
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| allowed.contains(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(valid));
}

fn ensure_non_empty_str(map: &mut Map<String, Value>, key: &str, default: &str) {
    let value = map
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string();
    map.insert(key.to_string(), json!(value));
}
