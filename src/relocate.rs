use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use crate::normalize::normalize;
use crate::{path_to_file_stem_string, path_to_filename_string};

/// Create a directory and all of its parents.
///
/// "Already exists" counts as success: two relocations racing on the same
/// category directory must both succeed.
fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(error) => Err(error).with_context(|| format!("Failed to create directory '{}'", dir.display())),
    }
}

/// Move a file into the target directory under its normalized name,
/// creating the directory if needed.
///
/// An existing file with the same normalized name is overwritten.
/// Returns the new path of the file.
pub fn relocate_file(file: &Path, target_dir: &Path) -> Result<PathBuf> {
    ensure_dir(target_dir)?;
    let new_path = target_dir.join(normalize(&path_to_filename_string(file)));
    fs::rename(file, &new_path)
        .with_context(|| format!("Failed to move '{}' to '{}'", file.display(), new_path.display()))?;
    Ok(new_path)
}

/// Extract an archive into `<target_dir>/<normalized stem>` and delete the original file.
///
/// On extraction failure the original archive is left untouched at its
/// original path. Partial extraction output is not cleaned up.
/// Returns the directory the archive was extracted into.
pub fn extract_archive(file: &Path, target_dir: &Path) -> Result<PathBuf> {
    let destination = target_dir.join(normalize(&path_to_file_stem_string(file)));
    ensure_dir(&destination)?;
    unpack(file, &destination).with_context(|| format!("Failed to unpack archive '{}'", file.display()))?;
    fs::remove_file(file).with_context(|| format!("Failed to remove extracted archive '{}'", file.display()))?;
    Ok(destination)
}

/// Unpack a single archive into the destination directory.
///
/// The format is picked from the filename suffix. Archive extensions without
/// a supported decompressor are an error and leave the file for the caller.
fn unpack(archive: &Path, destination: &Path) -> Result<()> {
    let name = path_to_filename_string(archive).to_lowercase();
    if name.ends_with(".zip") {
        let file = File::open(archive)?;
        zip::ZipArchive::new(file)?.extract(destination)?;
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let file = File::open(archive)?;
        tar::Archive::new(GzDecoder::new(file)).unpack(destination)?;
    } else if name.ends_with(".tar") {
        let file = File::open(archive)?;
        tar::Archive::new(file).unpack(destination)?;
    } else {
        anyhow::bail!("Unsupported archive format: '{name}'");
    }
    Ok(())
}
