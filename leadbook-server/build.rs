//! Exposes GIT_HASH, BUILD_TIMESTAMP and BUILD_PROFILE to the crate

use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string()).filter(|h| !h.is_empty())
}

fn main() {
    let vars = [
        ("GIT_HASH", git_short_hash().unwrap_or_else(|| "unknown".into())),
        (
            "BUILD_TIMESTAMP",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        ),
        (
            "BUILD_PROFILE",
            std::env::var("PROFILE").unwrap_or_else(|_| "unknown".into()),
        ),
    ];
    for (key, value) in vars {
        println!("cargo:rustc-env={key}={value}");
    }
}
