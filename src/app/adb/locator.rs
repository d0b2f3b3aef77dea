pub fn normalize_command_path(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|candidate| candidate.strip_suffix(quote))
        {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Falls back to `adb` on `PATH` when nothing usable is configured.
pub fn resolve_adb_program(configured: &str) -> String {
    let normalized = normalize_command_path(configured);
    if normalized.is_empty() {
        "adb".to_string()
    } else {
        normalized
    }
}

/// Leading arguments shared by every adb call: `-s <serial>` when a device is pinned.
pub fn device_selector_args(serial: &str) -> Vec<String> {
    let serial = serial.trim();
    if serial.is_empty() {
        Vec::new()
    } else {
        vec!["-s".to_string(), serial.to_string()]
    }
}
