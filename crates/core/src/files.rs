use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};

/// Recursively copy `source` into `destination`, merging with whatever is already there.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination).at_path(destination)?;
    for entry in fs::read_dir(source).at_path(source)? {
        let entry = entry.at_path(source)?;
        let from = entry.path();
        let to = destination.join(entry.file_name());
        let file_type = entry.file_type().at_path(&from)?;
        if file_type.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).at_path(&from)?;
        }
    }
    Ok(())
}

/// Copy a single file into `directory`, keeping its name.
pub fn copy_into(file: &Path, directory: &Path) -> Result<()> {
    fs::create_dir_all(directory).at_path(directory)?;
    let name = file.file_name().unwrap_or(file.as_os_str());
    fs::copy(file, directory.join(name)).at_path(file)?;
    Ok(())
}

pub fn remove_dir_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path).at_path(path)?;
    }
    Ok(())
}

/// File names directly inside `directory`, sorted. A missing directory yields nothing.
pub fn sorted_entries(directory: &Path) -> Result<Vec<String>> {
    if !directory.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(directory).at_path(directory)? {
        let entry = entry.at_path(directory)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
