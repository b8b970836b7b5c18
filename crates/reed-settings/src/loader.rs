//! Environment variable overrides.
//!
//! `REED_*` variables take priority over compiled defaults. Unparseable
//! values are logged and ignored rather than failing startup.

use crate::types::ReedSettings;

/// Load settings: compiled defaults with `REED_*` env overrides applied.
pub fn load_settings() -> ReedSettings {
    let mut settings = ReedSettings::default();
    apply_overrides(&mut settings, |var| std::env::var(var).ok());
    settings
}

/// Apply overrides from an arbitrary lookup (the process environment in
/// production; a map in tests).
pub fn apply_overrides(settings: &mut ReedSettings, lookup: impl Fn(&str) -> Option<String>) {
    override_parsed(&lookup, "REED_VIDEO_FPS", &mut settings.video.fps);
    override_parsed(&lookup, "REED_VIDEO_WIDTH", &mut settings.video.width);
    override_parsed(&lookup, "REED_VIDEO_HEIGHT", &mut settings.video.height);
    override_parsed(
        &lookup,
        "REED_CAPTURE_TIMEOUT_MS",
        &mut settings.capture.timeout_ms,
    );
    override_parsed(
        &lookup,
        "REED_RECONNECT_BACKOFF_MS",
        &mut settings.session.reconnect_backoff_ms,
    );
    override_parsed(
        &lookup,
        "REED_RECONNECT_MAX_RETRIES",
        &mut settings.session.reconnect_max_retries,
    );
    if let Some(v) = lookup("REED_DB_PATH") {
        settings.storage.db_path = v;
    }
    if let Some(v) = lookup("REED_IMAGE_DIR") {
        settings.storage.image_dir = v;
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    var: &str,
    slot: &mut T,
) {
    if let Some(raw) = lookup(var) {
        match raw.parse() {
            Ok(v) => *slot = v,
            Err(_) => tracing::warn!(var, raw, "ignoring unparseable env override"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn empty_lookup_keeps_defaults() {
        let mut s = ReedSettings::default();
        apply_overrides(&mut s, |_| None);
        assert_eq!(s.video.fps, 1);
        assert_eq!(s.capture.timeout_ms, 3_000);
    }

    #[test]
    fn overrides_apply() {
        let mut s = ReedSettings::default();
        apply_overrides(
            &mut s,
            lookup(&[
                ("REED_CAPTURE_TIMEOUT_MS", "5000"),
                ("REED_DB_PATH", "/tmp/reed-test.db"),
                ("REED_RECONNECT_MAX_RETRIES", "3"),
            ]),
        );
        assert_eq!(s.capture.timeout_ms, 5_000);
        assert_eq!(s.storage.db_path, "/tmp/reed-test.db");
        assert_eq!(s.session.reconnect_max_retries, 3);
    }

    #[test]
    fn unparseable_override_is_ignored() {
        let mut s = ReedSettings::default();
        apply_overrides(&mut s, lookup(&[("REED_VIDEO_FPS", "fast")]));
        assert_eq!(s.video.fps, 1);
    }

    #[test]
    fn unknown_vars_are_not_consulted() {
        let mut s = ReedSettings::default();
        apply_overrides(&mut s, lookup(&[("REED_UNKNOWN", "x")]));
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            serde_json::to_value(ReedSettings::default()).unwrap()
        );
    }
}
