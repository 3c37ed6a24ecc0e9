use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn release_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("secretshare_release").unwrap();
    cmd.current_dir(dir)
        .env_remove("GITHUB_TOKEN")
        .env_remove("SECRETSHARE_GITHUB_API_URL")
        .env_remove("RUST_LOG");
    for proxy in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(proxy);
    }
    cmd
}

fn write_artifact_map(dir: &Path) -> std::path::PathBuf {
    let mut toml = String::from("body_text = \"Test release\"\n");
    for platform in ["linux", "osx", "windows"] {
        toml.push_str(&format!("\n[{platform}]\n"));
        for kind in ["binary_cli", "binary_gui", "binary_server"] {
            let path = dir.join(format!("{platform}-{kind}.bin"));
            std::fs::write(&path, format!("{platform} {kind}")).unwrap();
            toml.push_str(&format!("{kind} = {:?}\n", path.display().to_string()));
        }
    }
    let map = dir.join("artifacts.toml");
    std::fs::write(&map, toml).unwrap();
    map
}

#[test]
fn test_missing_token_exits_1() {
    let dir = TempDir::new().unwrap();
    let map = write_artifact_map(dir.path());

    release_cmd(dir.path())
        .arg(&map)
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));

    // Nothing happens before the credential check
    assert!(!dir.path().join("SHA256SUMS.linux").exists());
}

#[test]
fn test_empty_token_exits_1() {
    let dir = TempDir::new().unwrap();
    let map = write_artifact_map(dir.path());

    release_cmd(dir.path())
        .env("GITHUB_TOKEN", "")
        .arg(&map)
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_unreadable_artifact_map_exits_1() {
    let dir = TempDir::new().unwrap();

    release_cmd(dir.path())
        .env("GITHUB_TOKEN", "test-token")
        .arg(dir.path().join("missing.toml"))
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load artifact map"));
}

#[test]
fn test_malformed_artifact_map_exits_1() {
    let dir = TempDir::new().unwrap();
    let map = dir.path().join("artifacts.toml");
    std::fs::write(&map, "body_text = [unterminated").unwrap();

    release_cmd(dir.path())
        .env("GITHUB_TOKEN", "test-token")
        .arg(&map)
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse artifact map"));
}

#[test]
fn test_incomplete_artifact_map_exits_1_without_manifests() {
    let dir = TempDir::new().unwrap();
    let map = dir.path().join("artifacts.toml");
    std::fs::write(&map, "body_text = \"notes\"\n[linux]\nbinary_cli = \"/nonexistent\"\n").unwrap();

    release_cmd(dir.path())
        .env("GITHUB_TOKEN", "test-token")
        // Unroutable API: validation must fail first
        .args(["--api-url", "http://127.0.0.1:9"])
        .arg(&map)
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to complete release"));

    assert!(!dir.path().join("SHA256SUMS.linux").exists());
}

#[test]
fn test_unreachable_api_exits_nonzero_after_writing_manifests() {
    let dir = TempDir::new().unwrap();
    let map = write_artifact_map(dir.path());

    release_cmd(dir.path())
        .env("GITHUB_TOKEN", "test-token")
        .args(["--api-url", "http://127.0.0.1:9", "--quiet"])
        .arg(&map)
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("creating release 1.0.0"));

    for platform in ["linux", "osx", "windows"] {
        let manifest = dir.path().join(format!("SHA256SUMS.{platform}"));
        let content = std::fs::read_to_string(&manifest).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}

#[test]
fn test_invalid_repo_exits_1() {
    let dir = TempDir::new().unwrap();
    let map = write_artifact_map(dir.path());

    release_cmd(dir.path())
        .env("GITHUB_TOKEN", "test-token")
        .args(["--repo", "not-a-repo"])
        .arg(&map)
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("owner/repo"));
}

#[test]
fn test_missing_required_flags_is_usage_error() {
    let dir = TempDir::new().unwrap();

    release_cmd(dir.path())
        .arg("artifacts.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--commit-id"));
}

#[test]
fn test_existing_manifest_is_overwritten_with_warning() {
    let dir = TempDir::new().unwrap();
    let map = write_artifact_map(dir.path());
    let stale = dir.path().join("SHA256SUMS.linux");
    std::fs::write(&stale, "stale\n").unwrap();

    release_cmd(dir.path())
        .env("GITHUB_TOKEN", "test-token")
        .args(["--api-url", "http://127.0.0.1:9"])
        .arg(&map)
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Overwriting existing"))
        .stdout(predicate::str::contains("SHA256SUMS.linux"));

    let content = std::fs::read_to_string(&stale).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_yaml_artifact_map_is_accepted() {
    let dir = TempDir::new().unwrap();
    let mut yaml = String::from("body_text: Test release\n");
    for platform in ["linux", "osx", "windows"] {
        yaml.push_str(&format!("{platform}:\n"));
        for kind in ["binary_cli", "binary_gui", "binary_server"] {
            let path = dir.path().join(format!("{platform}-{kind}.bin"));
            std::fs::write(&path, format!("{platform} {kind}")).unwrap();
            yaml.push_str(&format!("  {kind}: {:?}\n", path.display().to_string()));
        }
    }
    let map = dir.path().join("artifacts.yml");
    std::fs::write(&map, yaml).unwrap();

    // Parsing and validation succeed; the run stops at the unreachable API
    release_cmd(dir.path())
        .env("GITHUB_TOKEN", "test-token")
        .args(["--api-url", "http://127.0.0.1:9", "--quiet"])
        .arg(&map)
        .args(["--commit-id", "abc123", "--version-string", "1.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("creating release 1.0.0"));

    assert!(dir.path().join("SHA256SUMS.windows").exists());
}
