mod utils;

use clap::Parser;
use modelctx::backends::BackendRegistry;
use modelctx::cli::{run, Cli, Commands, Runner};
use modelctx::error::Error;
use std::fs;
use std::path::Path;
use test_log::test;
use utils::{assert_same_tree, copy_tree, generate_into, read};

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("modelctx").chain(args.iter().copied()))
}

fn create(args: &[&str]) -> Result<std::path::PathBuf, Error> {
    let Commands::Create(create) = cli(args).command else {
        panic!("Expected create command");
    };
    Runner::new(BackendRegistry::builtin(), 0).create(create)
}

fn output_dir(tmp: &Path) -> &str {
    tmp.to_str().unwrap()
}

#[test]
fn create_writes_project_under_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let root =
        create(&["create", "notes", "-b", "filesystem", "-o", output_dir(tmp.path())]).unwrap();

    assert_eq!(root, tmp.path().join("notes"));
    assert!(root.join("server.py").is_file());
    assert!(root.join("tests/test_server.py").is_file());
}

#[test]
fn create_matches_library_generation() {
    let tmp = tempfile::tempdir().unwrap();
    let snapshot = tempfile::tempdir().unwrap();
    let expected = generate_into(tmp.path(), "same", "filesystem", &[]);
    copy_tree(&expected, snapshot.path());

    let root = create(&[
        "create",
        "same",
        "--backend",
        "filesystem",
        "--output-dir",
        output_dir(tmp.path()),
        "--description",
        "Test filesystem server",
    ])
    .unwrap();

    assert_eq!(root, expected);
    assert_same_tree(&root, snapshot.path());
}

#[test]
fn params_are_parsed_as_yaml() {
    let tmp = tempfile::tempdir().unwrap();
    let root = create(&[
        "create",
        "readonly",
        "-b",
        "filesystem",
        "-o",
        output_dir(tmp.path()),
        "-p",
        "read_only=true",
        "-p",
        "allowed_paths=[/srv/docs, /srv/notes]",
    ])
    .unwrap();

    let server = read(&root, "server.py");
    assert!(!server.contains("name=\"write_file\""));
    assert!(server.contains("\"/srv/docs\""));
    let config = read(&root, "config/config.yaml");
    assert!(config.contains("read_only: true"));
}

#[test]
fn project_file_supplies_defaults_and_flags_override() {
    let tmp = tempfile::tempdir().unwrap();
    let project_file = tmp.path().join("project.yaml");
    fs::write(
        &project_file,
        r#"schemaVersion: v1
project_name: from-file
backend_type: api
description: Weather API
dependencies:
  - tenacity>=8.0.0
parameters:
  base_url: https://weather.example.com
  auth_type: api_key
settings:
  transport: sse
  port: 9000
"#,
    )
    .unwrap();

    let root = create(&[
        "create",
        "-c",
        project_file.to_str().unwrap(),
        "-o",
        output_dir(tmp.path()),
        "--port",
        "9100",
    ])
    .unwrap();

    assert_eq!(root, tmp.path().join("from-file"));
    let server = read(&root, "server.py");
    assert!(server.contains("https://weather.example.com"));
    assert!(server.contains("uvicorn.run("));
    assert!(server.contains("9100"));
    assert!(!server.contains("9000"));

    let requirements = read(&root, "requirements.txt");
    assert!(requirements.contains("tenacity>=8.0.0"));
    assert!(read(&root, ".env.example").contains("API_KEY="));
}

#[test]
fn unknown_backend_lists_available_backends() {
    let tmp = tempfile::tempdir().unwrap();
    let err = create(&["create", "mail", "-b", "email", "-o", output_dir(tmp.path())]).unwrap_err();
    match err {
        Error::UnknownBackend { backend, available } => {
            assert_eq!(backend, "email");
            assert_eq!(available, "filesystem, api, database");
        }
        other => panic!("Expected UnknownBackend, got {other:?}"),
    }
}

#[test]
fn invalid_project_name_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let err = create(&["create", "-b", "api", "-o", output_dir(tmp.path()), "--", "bad name"])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidProjectName { .. }));
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
}

#[test]
fn missing_project_name_has_its_own_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = create(&["create", "-b", "api", "-o", output_dir(tmp.path())]).unwrap_err();
    assert!(matches!(err, Error::MissingProjectName));
    assert!(err.to_string().contains("No project name given"));
    assert!(!err.to_string().contains("''"));
}

#[test]
fn dry_run_leaves_output_dir_empty() {
    let tmp = tempfile::tempdir().unwrap();
    create(&["create", "preview", "-b", "database", "-o", output_dir(tmp.path()), "--dry-run"])
        .unwrap();
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
}

#[test]
fn list_and_render_succeed() {
    run(cli(&["list"])).unwrap();
    run(cli(&["render", "api", "--part", "init", "-p", "auth_type=basic"])).unwrap();
    run(cli(&["render", "database", "--part", "tests"])).unwrap();
}

#[test]
fn render_rejects_invalid_parameters() {
    let err = run(cli(&["render", "api", "-p", "base_url=ftp://files.example.com"])).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { .. }));
}
