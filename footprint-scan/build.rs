// footprint-scan build identification
//
// Exposes GIT_HASH, BUILD_TIMESTAMP, BUILD_PROFILE and BUILD_FEATURES to the
// binary, which logs them at startup.

use std::process::Command;

const UNKNOWN: &str = "unknown";

/// Optional features worth reporting, as (cargo env var, feature name)
const REPORTED_FEATURES: &[(&str, &str)] = &[("CARGO_FEATURE_SENTENCE_MODEL", "sentence-model")];

fn git_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
}

fn enabled_features() -> String {
    let enabled: Vec<&str> = REPORTED_FEATURES
        .iter()
        .filter(|(var, _)| std::env::var_os(var).is_some())
        .map(|(_, name)| *name)
        .collect();

    if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled.join(",")
    }
}

fn main() {
    let env = [
        ("GIT_HASH", git_hash().unwrap_or_else(|| UNKNOWN.to_string())),
        (
            "BUILD_TIMESTAMP",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        ),
        (
            "BUILD_PROFILE",
            std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()),
        ),
        ("BUILD_FEATURES", enabled_features()),
    ];

    for (key, value) in env {
        println!("cargo:rustc-env={}={}", key, value);
    }
}
