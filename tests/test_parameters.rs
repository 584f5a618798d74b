use std::fs;

use camino::Utf8Path;
use dmdist::{
    constants::PARAMETER_FILE, dmdist_errors::DmDistError, parameters::ModelParameters,
};
use tempfile::tempdir;

const BUILTIN: &str = include_str!("../src/parameters/data/ymw16par.txt");

fn utf8(path: &std::path::Path) -> &Utf8Path {
    Utf8Path::from_path(path).unwrap()
}

#[test]
fn test_load_from_directory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(PARAMETER_FILE), BUILTIN).unwrap();

    let loaded = ModelParameters::from_dir(utf8(dir.path())).unwrap();
    assert_eq!(loaded, ModelParameters::builtin().unwrap());
}

#[test]
fn test_modified_value_is_picked_up() {
    let dir = tempdir().unwrap();
    let text = BUILTIN.replace("J_LB", "J_LB 0.25 #");
    fs::write(dir.path().join(PARAMETER_FILE), text).unwrap();

    let loaded = ModelParameters::from_dir(utf8(dir.path())).unwrap();
    assert_eq!(loaded.local_bubble.j_lb, 0.25);
}

#[test]
fn test_missing_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nowhere");
    let err = ModelParameters::from_dir(utf8(&missing)).unwrap_err();
    assert_eq!(
        err,
        DmDistError::ParameterDirNotFound(utf8(&missing).to_string())
    );
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = ModelParameters::from_dir(utf8(dir.path())).unwrap_err();
    assert!(matches!(err, DmDistError::IoError(_)));
}

#[test]
fn test_missing_key_is_named() {
    let dir = tempdir().unwrap();
    let text: String = BUILTIN
        .lines()
        .filter(|line| !line.trim_start().starts_with("nsmc"))
        .map(|line| format!("{line}\n"))
        .collect();
    fs::write(dir.path().join(PARAMETER_FILE), text).unwrap();

    let err = ModelParameters::from_dir(utf8(dir.path())).unwrap_err();
    assert_eq!(err, DmDistError::MissingParameter("nsmc".into()));
}
