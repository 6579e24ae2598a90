use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn vendor_fixture(root: &Path) {
    write(
        root,
        "vendor-prefixed/acme/http/src/Client.php",
        "<?php\nnamespace Acme\\Http;\n\nclass Client {}\n",
    );
    write(
        root,
        "vendor-prefixed/acme/http/src/Psr7/Request.php",
        "<?php\nnamespace Acme\\Http\\Psr7;\nfinal class Request {}\n",
    );
    write(
        root,
        "vendor-prefixed/acme/http/src/constants.php",
        "<?php\ndefine('ACME_HTTP_VERSION', '2.1');\nclass Vendor_Done {}\n",
    );
    write(
        root,
        "vendor-prefixed/psr/log/src/LoggerInterface.php",
        "<?php\nnamespace Psr\\Log;\ninterface LoggerInterface {}\n",
    );
    write(
        root,
        "prefix.toml",
        "namespace_prefix = \"Vendor\"\nclassmap_prefix = \"Vendor_\"\nexcluded_package_names = [\"psr/log\"]\n",
    );
}

#[allow(deprecated)]
fn nsprefix() -> Command {
    Command::cargo_bin("nsprefix").expect("binary")
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn discover_with_walk_prints_maps() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    vendor_fixture(root);

    let value = run_json(nsprefix().current_dir(root).args([
        "discover",
        "--config",
        "prefix.toml",
        "--target-dir",
        "vendor-prefixed",
        "--walk",
        "--quiet",
    ]));

    assert_eq!(
        value,
        json!({
            "namespaces": [
                ["Acme\\Http", "Vendor\\Acme\\Http"],
                ["Acme\\Http\\Psr7", "Vendor\\Acme\\Http\\Psr7"]
            ],
            "classes": ["Client", "Request"],
            "constants": ["ACME_HTTP_VERSION"]
        })
    );
}

#[test]
fn discover_with_manifest_and_filters() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    vendor_fixture(root);
    write(
        root,
        "files.json",
        r#"{
            "acme/http/src/constants.php": {
                "package_name": "acme/http",
                "source_absolute_path": "/project/vendor/acme/http/src/constants.php",
                "target_relative_path": "acme/http/src/constants.php"
            }
        }"#,
    );

    let value = run_json(nsprefix().current_dir(root).args([
        "discover",
        "--config",
        "prefix.toml",
        "--target-dir",
        "vendor-prefixed",
        "--manifest",
        "files.json",
        "--class-prefix-filter",
        "",
        "--constant-prefix-filter",
        "ACME_",
        "-q",
    ]));

    assert_eq!(value["namespaces"], json!([]));
    assert_eq!(value["classes"], json!(["Vendor_Done"]));
    assert_eq!(value["constants"], json!([]));
}

#[test]
fn discover_fails_on_missing_manifest_file() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    vendor_fixture(root);
    write(
        root,
        "files.json",
        r#"{
            "acme/http/src/Gone.php": {
                "package_name": "acme/http",
                "source_absolute_path": "/project/vendor/acme/http/src/Gone.php",
                "target_relative_path": "acme/http/src/Gone.php"
            }
        }"#,
    );

    nsprefix()
        .current_dir(root)
        .args([
            "discover",
            "--config",
            "prefix.toml",
            "--target-dir",
            "vendor-prefixed",
            "--manifest",
            "files.json",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Gone.php"));
}

#[test]
fn discover_rejects_invalid_pattern() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    vendor_fixture(root);
    write(
        root,
        "bad.toml",
        "namespace_prefix = \"Vendor\"\nexcluded_file_path_patterns = [\"/[unclosed/\"]\n",
    );

    nsprefix()
        .current_dir(root)
        .args([
            "discover",
            "--config",
            "bad.toml",
            "--target-dir",
            "vendor-prefixed",
            "--walk",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("[unclosed"));
}

#[test]
fn discover_requires_manifest_or_walk() {
    let temp = tempdir().unwrap();
    vendor_fixture(temp.path());

    nsprefix()
        .current_dir(temp.path())
        .args(["discover", "--config", "prefix.toml", "--target-dir", "vendor-prefixed"])
        .assert()
        .failure();
}
