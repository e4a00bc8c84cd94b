//! Integration tests for pypi-refresh
//!
//! These tests verify:
//! - Local inventory scanning of a packages directory
//! - The full pipeline against a mock index
//! - Download execution through an external program

use pypi_refresh::cancel::CancellationToken;
use pypi_refresh::config::Settings;
use pypi_refresh::domain::{PackageName, SkipReason};
use pypi_refresh::downloader::DownloadStatus;
use pypi_refresh::inventory::LocalInventory;
use pypi_refresh::orchestrator::{Orchestrator, RunOutcome};
use std::fs;
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_packages_dir(files: &[&str]) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    for file in files {
        fs::write(temp_dir.path().join(file), "").unwrap();
    }
    temp_dir
}

fn metadata(name: &str, versions: &[&str]) -> String {
    let releases: Vec<String> = versions
        .iter()
        .map(|v| {
            format!(
                r#""{v}": [
                    {{"filename": "{name}-{v}-py3-none-any.whl", "url": "https://files/{name}-{v}-py3-none-any.whl"}},
                    {{"filename": "{name}-{v}.tar.gz", "url": "https://files/{name}-{v}.tar.gz"}}
                ]"#
            )
        })
        .collect();
    format!(
        r#"{{"info": {{"name": "{}"}}, "releases": {{{}}}}}"#,
        name,
        releases.join(", ")
    )
}

fn quiet_settings(dir: &TempDir, index_url: &str) -> Settings {
    let mut settings = Settings::new(dir.path());
    settings.index_url = index_url.to_string();
    settings.quiet = true;
    settings
}

mod inventory_scanning {
    use super::*;

    /// Test that wheels and sdists of one package share a slot
    #[test]
    fn test_scan_mixed_archives() {
        let dir = create_packages_dir(&[
            "Flask-2.0.0.tar.gz",
            "flask-2.1.0-py3-none-any.whl",
            "typing-extensions-4.0.0.tar.gz",
            "typing_extensions-4.1.0-py3-none-any.whl",
            "README.md",
            "not-a-version.tar.gz",
        ]);

        let inventory = LocalInventory::scan(dir.path()).unwrap();

        let typing = inventory
            .versions(&PackageName::new("typing_extensions"))
            .unwrap();
        assert_eq!(typing.len(), 2);
        assert!(inventory.versions(&PackageName::new("Flask")).is_some());
        assert!(inventory.versions(&PackageName::new("flask")).is_some());
        assert!(inventory.versions(&PackageName::new("README")).is_none());
        assert!(inventory.contains_file("not-a-version.tar.gz"));
        assert!(!inventory.contains_file("README.md"));
    }

    /// Test that subdirectories are not descended into
    #[test]
    fn test_scan_is_not_recursive() {
        let dir = create_packages_dir(&["pkg-1.0.tar.gz"]);
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("other-1.0.tar.gz"), "").unwrap();

        let inventory = LocalInventory::scan(dir.path()).unwrap();
        assert_eq!(inventory.package_count(), 1);
        assert!(inventory.versions(&PackageName::new("other")).is_none());
    }

    /// Test non-existent directory
    #[test]
    fn test_scan_nonexistent_directory() {
        let result = LocalInventory::scan(std::path::Path::new("/nonexistent/packages"));
        assert!(result.is_err());
    }
}

mod pipeline {
    use super::*;

    /// Test a dry run against a mock index
    #[tokio::test]
    async fn test_dry_run_pipeline() {
        let mut server = mockito::Server::new_async().await;
        let requests = server
            .mock("GET", "/requests/json")
            .with_status(200)
            .with_body(metadata("requests", &["2.30.0", "2.31.0"]))
            .create_async()
            .await;
        let flask = server
            .mock("GET", "/flask/json")
            .with_status(200)
            .with_body(metadata("flask", &["2.0.0"]))
            .create_async()
            .await;

        let dir = create_packages_dir(&["requests-2.30.0.tar.gz", "flask-2.0.0.tar.gz"]);
        let settings = quiet_settings(&dir, &server.url());

        let orchestrator = Orchestrator::new(settings, CancellationToken::new()).unwrap();
        let report = orchestrator.run().await.unwrap();

        requests.assert_async().await;
        flask.assert_async().await;

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert!(report.dry_run);
        assert_eq!(report.actions.len(), 1);
        assert_eq!(report.actions[0].package.as_str(), "requests");
        assert_eq!(report.actions[0].latest.as_str(), "2.31.0");
        // wheel and sdist collapse into one download
        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(report.downloads.len(), 1);
        assert_eq!(report.downloads[0].status, DownloadStatus::Planned);
        assert!(report.downloads[0]
            .command
            .contains("download --no-deps -i https://pypi.org/simple/"));
    }

    /// Test that per-package failures stay per-package
    #[tokio::test]
    async fn test_pipeline_isolates_failures() {
        let mut server = mockito::Server::new_async().await;
        let _good = server
            .mock("GET", "/good/json")
            .with_status(200)
            .with_body(metadata("good", &["1.1"]))
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/missing/json")
            .with_status(404)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/broken/json")
            .with_status(200)
            .with_body("{\"info\": ")
            .create_async()
            .await;
        let _weird = server
            .mock("GET", "/weird/json")
            .with_status(200)
            .with_body(r#"{"info": {"name": "weird"}, "releases": {"latest": []}}"#)
            .create_async()
            .await;

        let dir = create_packages_dir(&[
            "good-1.0.tar.gz",
            "missing-1.0.tar.gz",
            "broken-1.0.tar.gz",
            "weird-1.0.tar.gz",
        ]);
        let settings = quiet_settings(&dir, &server.url());

        let report = Orchestrator::new(settings, CancellationToken::new())
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.actions.len(), 1);
        assert_eq!(report.actions[0].package.as_str(), "good");

        let reason = |name: &str| {
            report
                .skips
                .iter()
                .find(|s| s.package.as_str() == name)
                .map(|s| s.reason.clone())
                .unwrap()
        };
        assert!(matches!(reason("missing"), SkipReason::FetchFailed(_)));
        assert!(matches!(reason("broken"), SkipReason::MalformedMetadata(_)));
        assert_eq!(reason("weird"), SkipReason::NoCompliantRemoteVersion);
    }

    /// Test that nothing is queried once cancellation is requested
    #[tokio::test]
    async fn test_pipeline_cancelled_up_front() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pkg/json")
            .expect(0)
            .create_async()
            .await;

        let dir = create_packages_dir(&["pkg-1.0.tar.gz"]);
        let token = CancellationToken::new();
        token.cancel();

        let report = Orchestrator::new(quiet_settings(&dir, &server.url()), token)
            .unwrap()
            .run()
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(report.outcome.is_interrupted());
        assert_eq!(report.outcome.exit_code(), 130);
    }
}

#[cfg(unix)]
mod execution {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// Write an executable stand-in for pip
    fn fake_pip(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-pip");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Test that downloads run the program with the pinned requirement
    #[tokio::test]
    async fn test_execute_runs_downloader() {
        let mut server = mockito::Server::new_async().await;
        let _pkg = server
            .mock("GET", "/pkg/json")
            .with_status(200)
            .with_body(metadata("pkg", &["1.0", "2.0"]))
            .create_async()
            .await;

        let tools = tempfile::tempdir().unwrap();
        // $7 is the destination directory, $8 the requirement
        let pip = fake_pip(&tools, "touch \"$7/fetched-$8\"");

        let dir = create_packages_dir(&["pkg-1.0.tar.gz"]);
        let mut settings = quiet_settings(&dir, &server.url());
        settings.execute = true;
        settings.pip = pip.to_string_lossy().to_string();

        let report = Orchestrator::new(settings, CancellationToken::new())
            .unwrap()
            .run()
            .await
            .unwrap();

        assert!(!report.dry_run);
        assert_eq!(report.downloads[0].status, DownloadStatus::Succeeded);
        assert!(dir.path().join("fetched-pkg==2.0").exists());
    }

    /// Test that a failing download is recorded and the batch continues
    #[tokio::test]
    async fn test_execute_failure_is_soft() {
        let mut server = mockito::Server::new_async().await;
        let _a = server
            .mock("GET", "/a/json")
            .with_status(200)
            .with_body(metadata("a", &["2.0"]))
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/b/json")
            .with_status(200)
            .with_body(metadata("b", &["2.0"]))
            .create_async()
            .await;

        let tools = tempfile::tempdir().unwrap();
        let pip = fake_pip(
            &tools,
            "case \"$8\" in a==*) echo 'no matching distribution' >&2; exit 1;; esac",
        );

        let dir = create_packages_dir(&["a-1.0.tar.gz", "b-1.0.tar.gz"]);
        let mut settings = quiet_settings(&dir, &server.url());
        settings.execute = true;
        settings.pip = pip.to_string_lossy().to_string();

        let report = Orchestrator::new(settings, CancellationToken::new())
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.downloads.len(), 2);
        assert_eq!(report.failed_downloads(), 1);
        let failed = &report.downloads[0];
        assert_eq!(failed.package.as_str(), "a");
        assert!(failed.stderr.contains("no matching distribution"));
        assert_eq!(report.downloads[1].status, DownloadStatus::Succeeded);
    }
}
