// Build script to capture Git commit hash and build timestamp
// Sets environment variables for use in the binary at compile time
// Falls back to version.toml if git is not available (e.g., packaged builds)

use std::fs;
use std::process::Command;

fn main() {
    let fallback = read_version_toml("../version.toml");

    let commit_hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| fallback.0.clone());
    let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or_else(|| fallback.1.clone());

    let build_date = if fallback.2 != "unknown" {
        fallback.2.clone()
    } else {
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
    };

    println!("cargo:rustc-env=GIT_COMMIT_HASH={}", commit_hash);
    println!("cargo:rustc-env=GIT_BRANCH={}", branch);
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/heads/");
    println!("cargo:rerun-if-changed=../version.toml");
}

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Fallback (commit, branch, build_date) from version.toml, "unknown" when absent
fn read_version_toml(path: &str) -> (String, String, String) {
    let mut values = (
        "unknown".to_string(),
        "unknown".to_string(),
        "unknown".to_string(),
    );

    let Ok(content) = fs::read_to_string(path) else {
        return values;
    };

    for line in content.lines().map(str::trim) {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        if value.is_empty() || value == "unknown" {
            continue;
        }
        match key.trim() {
            "git_commit_hash" => values.0 = value.to_string(),
            "git_branch" => values.1 = value.to_string(),
            "build_date" => values.2 = value.to_string(),
            _ => {}
        }
    }

    values
}
