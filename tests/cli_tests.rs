use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_VARS: [&str; 12] = [
    "GH_TOKEN",
    "GITHUB_TOKEN",
    "RELEASE_REPO",
    "RELEASE_VERSION",
    "CHANNEL",
    "TARGET_ARCH",
    "ARTIFACTS_DIR",
    "GITHUB_API_URL",
    "GITHUB_UPLOADS_URL",
    "RELEASE_RETRY_API",
    "RELEASE_RETRY_UPLOADS",
    "RELEASE_RETRY_DELAY_MS",
];

fn publisher_cmd() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_release_publisher").expect("binary builds");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    publisher_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_missing_token_fails_before_any_request() {
    publisher_cmd()
        .args([
            "--repo",
            "cyrup-ai/desktop",
            "--version-string",
            "1.0.0",
            "--channel",
            "dev",
            "publish",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Fatal error"))
        .stderr(predicate::str::contains("token"));
}

#[test]
fn test_unknown_channel_is_rejected() {
    publisher_cmd()
        .env("GH_TOKEN", "ghp_test")
        .args([
            "--repo",
            "cyrup-ai/desktop",
            "--version-string",
            "1.0.0",
            "--channel",
            "stable",
            "publish",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("channel"));
}

#[test]
fn test_malformed_version_is_rejected() {
    publisher_cmd()
        .env("GH_TOKEN", "ghp_test")
        .env("RELEASE_VERSION", "1.2")
        .args(["--repo", "cyrup-ai/desktop", "--channel", "beta", "publish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version '1.2'"));
}

#[test]
fn test_upload_requires_existing_artifact_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("dist");

    publisher_cmd()
        .env("GITHUB_TOKEN", "ghp_test")
        .args([
            "--repo",
            "cyrup-ai/desktop",
            "--version-string",
            "1.0.0",
            "--channel",
            "nightly",
            "upload",
            "--artifacts-dir",
        ])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_upload_rejects_empty_artifact_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    publisher_cmd()
        .env("GH_TOKEN", "ghp_test")
        .env("ARTIFACTS_DIR", temp_dir.path())
        .args([
            "--repo",
            "cyrup-ai/desktop",
            "--version-string",
            "1.0.0",
            "--channel",
            "dev",
            "upload",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no artifacts found"));
}

#[test]
fn test_upload_rejects_colliding_artifact_names() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for arch in ["ia32", "x64"] {
        let dir = temp_dir.path().join(arch);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Setup.exe"), arch).unwrap();
    }

    publisher_cmd()
        .env("GH_TOKEN", "ghp_test")
        .env("ARTIFACTS_DIR", temp_dir.path())
        .env("GITHUB_API_URL", "http://127.0.0.1:9/")
        .args([
            "--repo",
            "cyrup-ai/desktop",
            "--version-string",
            "1.0.0",
            "--channel",
            "dev",
            "upload",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("asset name is shared by"))
        .stdout(predicate::str::contains("Draft release").not());
}
