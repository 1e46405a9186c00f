#![allow(dead_code)]

use modelctx::backends::BackendRegistry;
use modelctx::config::{BackendConfig, ProjectConfig};
use modelctx::generator::ProjectGenerator;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Files every generated project contains, none of them empty.
pub const REQUIRED_FILES: &[&str] = &[
    "server.py",
    "requirements.txt",
    "config/config.yaml",
    "tests/test_server.py",
    "README.md",
];

/// Generates `name` with `backend` and `parameters` under a fresh temporary directory.
pub fn generate(
    name: &str,
    backend: &str,
    parameters: &[(&str, Value)],
) -> (tempfile::TempDir, PathBuf) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let root = generate_into(tmp_dir.path(), name, backend, parameters);
    (tmp_dir, root)
}

pub fn generate_into(
    output_dir: &Path,
    name: &str,
    backend: &str,
    parameters: &[(&str, Value)],
) -> PathBuf {
    let registry = BackendRegistry::builtin();
    let mut generator = ProjectGenerator::new(&registry, name, backend, output_dir, true).unwrap();
    let backend_type = generator.backend_type();
    let backend_config = parameters.iter().fold(
        BackendConfig::new(backend_type, name, format!("Test {backend} server")),
        |config, (key, value)| config.with_parameter(*key, value.clone()),
    );
    generator
        .set_config(ProjectConfig::new(name, format!("Test {backend} server"), backend_config))
        .unwrap();
    generator.generate().unwrap()
}

pub fn read(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join(file)).unwrap()
}

/// Copies every file under `from` into `to`, keeping relative paths.
pub fn copy_tree(from: &Path, to: &Path) {
    for entry in WalkDir::new(from).into_iter().filter_map(Result::ok) {
        let rel = entry.path().strip_prefix(from).unwrap();
        let target = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Prints a diff of files and their contents between two directories.
pub fn print_dir_diff(actual: &Path, expected: &Path) {
    let files = |root: &Path| -> std::collections::BTreeSet<PathBuf> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
            .collect()
    };
    let (actual_files, expected_files) = (files(actual), files(expected));

    println!("\n=== Directory Comparison ===");
    for file in actual_files.difference(&expected_files) {
        println!("  + {file:?}");
    }
    for file in expected_files.difference(&actual_files) {
        println!("  - {file:?}");
    }
    for file in actual_files.intersection(&expected_files) {
        let left = fs::read(actual.join(file)).unwrap();
        let right = fs::read(expected.join(file)).unwrap();
        if left != right {
            println!("\n  File: {file:?}");
            println!("  --- Actual content:\n{}", String::from_utf8_lossy(&left));
            println!("  --- Expected content:\n{}", String::from_utf8_lossy(&right));
        }
    }
    println!("=== End of Comparison ===\n");
}

pub fn assert_same_tree(actual: &Path, expected: &Path) {
    if dir_diff::is_different(actual, expected).unwrap() {
        print_dir_diff(actual, expected);
        panic!("Directories differ. See above for details.");
    }
}

/// Runs `ast.parse` on `file` when a Python interpreter is available.
///
/// Returns `None` when there is no interpreter to ask.
pub fn python_parses(file: &Path) -> Option<Result<(), String>> {
    let probe = Command::new("python3").arg("--version").output().ok()?;
    if !probe.status.success() {
        return None;
    }
    let output = Command::new("python3")
        .args(["-c", "import ast, sys; ast.parse(open(sys.argv[1]).read(), sys.argv[1])"])
        .arg(file)
        .output()
        .ok()?;
    Some(if output.status.success() {
        Ok(())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).into_owned())
    })
}
