//! End-to-end tests driving the `turbobuilder` binary inside temporary project folders

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn turbobuilder(dir: &Path, args: &[&str]) -> Output {
    turbobuilder_with_env(dir, args, &[])
}

fn turbobuilder_with_env(dir: &Path, args: &[&str], envs: &[(&str, &Path)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_turbobuilder"));
    command
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("TURBOBUILDER_TEMPLATE_URL")
        .env_remove("RUST_LOG");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("failed to run turbobuilder")
}

/// Executable shell script standing in for an external tool
#[cfg(unix)]
fn fake_tool(dir: &Path, name: &str, script: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Generate a project and give it a name, so target folders are predictable
fn generated_project(project_type: &str, name: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let output = turbobuilder(dir.path(), &["-g", project_type]);
    assert!(output.status.success(), "{}", stderr(&output));

    let setup_path = dir.path().join("turbobuilder.json");
    let mut setup: Value =
        serde_json::from_str(&std::fs::read_to_string(&setup_path).unwrap()).unwrap();
    setup["metadata"]["name"] = Value::String(name.to_string());
    std::fs::write(&setup_path, serde_json::to_string_pretty(&setup).unwrap()).unwrap();
    dir
}

#[test]
fn no_arguments_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = turbobuilder(dir.path(), &[]);

    assert!(!output.status.success());
    let text = format!("{}{}", stdout(&output), stderr(&output));
    assert!(text.contains("Usage: turbobuilder"));
}

#[test]
fn version_flag_prints_builder_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = turbobuilder(dir.path(), &["-v"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn generate_needs_a_type() {
    let dir = tempfile::tempdir().unwrap();
    let output = turbobuilder(dir.path(), &["-g"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("a value is required"));
}

#[test]
fn generate_rejects_unknown_type() {
    let dir = tempfile::tempdir().unwrap();
    let output = turbobuilder(dir.path(), &["-g", "lib_cobol"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid project type"));
}

#[test]
fn generate_is_exclusive_with_phases() {
    let dir = tempfile::tempdir().unwrap();
    let output = turbobuilder(dir.path(), &["-g", "lib_js", "-b"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot be used with"));
}

#[test]
fn generate_twice_fails() {
    let dir = generated_project("lib_js", "demo");
    let output = turbobuilder(dir.path(), &["-g", "lib_js"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("File turbobuilder.json already exists"));
}

#[test]
fn generated_projects_pass_validation() {
    for project_type in ["lib_php", "lib_js", "lib_ts", "site_php", "server_php", "app_node_cmd"] {
        let dir = tempfile::tempdir().unwrap();
        let generated = turbobuilder(dir.path(), &["-g", project_type]);
        assert!(generated.status.success(), "{}", stderr(&generated));
        assert!(stdout(&generated).contains("Generated project structure ok"));

        let output = turbobuilder(dir.path(), &["-l"]);
        assert!(
            output.status.success(),
            "{} validation failed:\n{}",
            project_type,
            stderr(&output)
        );
        assert!(stdout(&output).contains("validate ok"));
    }
}

#[test]
fn build_lib_js_then_clean() {
    let dir = generated_project("lib_js", "demo");

    let output = turbobuilder(dir.path(), &["-b"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("build ok"));

    let merged = std::fs::read_to_string(dir.path().join("target/demo/dist/demo.js")).unwrap();
    assert!(merged.starts_with("\"use strict\";"));
    assert!(merged.contains("StringUtils"));
    assert!(!dir.path().join("target/demo/main").exists());

    let output = turbobuilder(dir.path(), &["-c"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("clean ok"));
    assert!(!dir.path().join("target").exists());
}

#[test]
fn app_node_cmd_build_creates_nothing() {
    let dir = generated_project("app_node_cmd", "");

    let output = turbobuilder(dir.path(), &["-b"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("build ok (no files affected or created)"));
    assert!(!dir.path().join("target").exists());
}

#[test]
fn missing_setup_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = turbobuilder(dir.path(), &["-b"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("turbobuilder.json setup file not found"));
}

#[test]
fn nothing_to_test_or_sync() {
    let dir = generated_project("app_node_cmd", "");

    let output = turbobuilder(dir.path(), &["-t"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Nothing to test"));

    let output = turbobuilder(dir.path(), &["-s"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Nothing to sync"));
}

#[test]
fn clean_sync_requires_clean() {
    let dir = tempfile::tempdir().unwrap();
    let output = turbobuilder(dir.path(), &["--clean-sync"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("--clean"));
}

#[test]
fn local_template_dir_is_used_for_generate() {
    let templates = tempfile::tempdir().unwrap();
    std::fs::write(
        templates.path().join("template.yaml"),
        "templates: [lib_js]\nshared_files:\n  - source: README.md\n",
    )
    .unwrap();
    std::fs::write(templates.path().join("README.md"), "# local\n").unwrap();
    std::fs::create_dir_all(templates.path().join("lib_js/src/main/js")).unwrap();
    std::fs::write(
        templates.path().join("lib_js/template.yaml"),
        "name: lib_js\ndescription: local\nversion: 0.0.1\nfiles:\n  - src/main/js/index.js\n",
    )
    .unwrap();
    std::fs::write(
        templates.path().join("lib_js/src/main/js/index.js"),
        "\"use strict\";\n",
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let template_dir = templates.path().to_string_lossy().into_owned();
    let output = turbobuilder(dir.path(), &["-g", "lib_js", "--template-dir", &template_dir]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "# local\n"
    );
    assert!(dir.path().join("src/main/js/index.js").is_file());
    assert!(dir.path().join("extras").is_dir());
}

#[cfg(unix)]
#[test]
fn lib_angular_validates_the_workspace_library_package() {
    let tools = tempfile::tempdir().unwrap();
    let ng = fake_tool(tools.path(), "ng", "exit 0\n");
    let dir = generated_project("lib_angular", "widgets");

    let output = turbobuilder_with_env(dir.path(), &["-l"], &[("TURBOBUILDER_NG_BIN", &ng)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Name and description must match"));
    assert!(stderr(&output).contains("projects/library/package.json"));

    let package_path = dir.path().join("projects/library/package.json");
    let mut package: Value =
        serde_json::from_str(&std::fs::read_to_string(&package_path).unwrap()).unwrap();
    package["name"] = Value::String("widgets".to_string());
    std::fs::write(&package_path, serde_json::to_string_pretty(&package).unwrap()).unwrap();

    let output = turbobuilder_with_env(dir.path(), &["-l"], &[("TURBOBUILDER_NG_BIN", &ng)]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("validate ok"));
}

#[test]
fn release_then_sync_copies_the_release_folder() {
    let dir = generated_project("lib_js", "demo");
    let dest = tempfile::tempdir().unwrap();

    let setup_path = dir.path().join("turbobuilder.json");
    let mut setup: Value =
        serde_json::from_str(&std::fs::read_to_string(&setup_path).unwrap()).unwrap();
    setup["sync"] = serde_json::json!({
        "type": "fileSystem",
        "sourcePath": "dist",
        "destPath": dest.path().to_string_lossy(),
        "deleteDestPathContents": true
    });
    std::fs::write(&setup_path, serde_json::to_string_pretty(&setup).unwrap()).unwrap();
    std::fs::write(dest.path().join("stale.js"), "old").unwrap();

    let output = turbobuilder(dir.path(), &["-r", "-s"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("release ok"));
    assert!(stdout(&output).contains("sync ok to fs"));

    let release_folder = std::fs::read_dir(dir.path().join("target"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .find(|name| name.starts_with("demo-"))
        .expect("release folder");
    assert!(dir
        .path()
        .join("target")
        .join(&release_folder)
        .join("dist/demo.js")
        .is_file());
    assert!(!dir.path().join("target/demo").exists());

    assert!(dest.path().join("demo.js").is_file());
    assert!(!dest.path().join("stale.js").exists());
}
