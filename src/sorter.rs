use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::Scope;

use crate::category::{Category, RESERVED_CATEGORY_DIRS};
use crate::{get_relative_path_or_filename, path_to_filename_string, print_error, print_warning, relocate};

/// Runtime options for one sorting run.
#[derive(Debug, Default)]
pub struct Config {
    /// Only print planned moves without touching the filesystem.
    pub dryrun: bool,
    /// Print each relocation as it happens.
    pub verbose: bool,
}

/// Sorts every file under a source root into category directories.
///
/// Directories are scanned concurrently on a thread pool sized to the
/// available hardware parallelism. Each discovered file becomes one
/// relocation task and each discovered subdirectory one recursive scan task.
/// Once all tasks have drained, the directories the files came from are
/// removed in reverse discovery order if they ended up empty.
#[derive(Debug)]
pub struct Sorter {
    root: PathBuf,
    config: Config,
    /// Non-category directories in discovery order, parents before children.
    visited_dirs: Mutex<Vec<PathBuf>>,
    files_sorted: AtomicUsize,
    files_failed: AtomicUsize,
}

/// Sort the given directory with default options.
///
/// Convenience wrapper around [`Sorter`]. The caller is responsible for
/// passing a path that exists and is a directory.
pub fn sort(source_root: &Path) -> Result<()> {
    Sorter::new(source_root.to_path_buf(), Config::default()).sort()
}

impl Sorter {
    #[must_use]
    pub fn new(root: PathBuf, config: Config) -> Self {
        Self {
            root,
            config,
            visited_dirs: Mutex::new(Vec::new()),
            files_sorted: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
        }
    }

    /// Run the full sort: concurrent scan and relocation, then cleanup.
    ///
    /// Individual task failures are reported to stderr and do not fail the
    /// run. Returns an error only if the thread pool cannot be created.
    pub fn sort(&self) -> Result<()> {
        if self.config.verbose {
            println!("{}", format!("Sorting files under {}", self.root.display()).bold());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .build()
            .context("Failed to create thread pool")?;
        // The scope returns only once every spawned task has finished,
        // including tasks spawned from other tasks. Cleanup must not start
        // while any scan or relocation is still pending.
        pool.scope(|scope| self.scan_folder(self.root.clone(), scope));

        self.remove_emptied_dirs();
        self.print_summary();
        Ok(())
    }

    /// List one directory, spawning a scan task per subdirectory and a
    /// relocation task per file.
    ///
    /// Subdirectories named after a category are skipped entirely, at every
    /// depth, so the sorter never descends into its own output.
    fn scan_folder<'scope>(&'scope self, folder: PathBuf, scope: &Scope<'scope>) {
        let entries = match fs::read_dir(&folder) {
            Ok(entries) => entries,
            Err(error) => {
                print_error!("Failed to read directory '{}': {error}", folder.display());
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    print_error!("Failed to read entry in '{}': {error}", folder.display());
                    continue;
                }
            };
            let path = entry.path();
            if path.is_dir() {
                let name = path_to_filename_string(&path);
                if !RESERVED_CATEGORY_DIRS.contains(&name.as_str()) {
                    // Record before descending so parents always precede
                    // their children in the cleanup list.
                    if let Ok(mut visited) = self.visited_dirs.lock() {
                        visited.push(path.clone());
                    }
                    scope.spawn(move |scope| self.scan_folder(path, scope));
                }
            } else {
                let category = Category::for_path(&path);
                let target_dir = self.root.join(category.dir_name());
                scope.spawn(move |_| self.relocate(&path, &target_dir, &category));
            }
        }
    }

    /// Relocate one file into its category directory, extracting archives
    /// instead of moving them. Failures are reported and contained here.
    fn relocate(&self, file: &Path, target_dir: &Path, category: &Category) {
        if self.config.dryrun {
            println!(
                "Dryrun: {} -> {}",
                get_relative_path_or_filename(file, &self.root),
                get_relative_path_or_filename(target_dir, &self.root)
            );
            self.files_sorted.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let result = if category.is_archive() {
            relocate::extract_archive(file, target_dir)
        } else {
            relocate::relocate_file(file, target_dir)
        };

        match result {
            Ok(new_path) => {
                if self.config.verbose {
                    println!(
                        "{} -> {}",
                        get_relative_path_or_filename(file, &self.root),
                        get_relative_path_or_filename(&new_path, &self.root)
                    );
                }
                self.files_sorted.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                print_error!("{error:#}");
                self.files_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Remove every visited directory that ended up empty, children first.
    ///
    /// Runs single-threaded after the task drain. Directories that are still
    /// non-empty or cannot be removed are reported and left in place.
    fn remove_emptied_dirs(&self) {
        let visited = match self.visited_dirs.lock() {
            Ok(visited) => visited,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.config.dryrun {
            if self.config.verbose {
                println!("Dryrun: would clean up {} directories", visited.len());
            }
            return;
        }
        for dir in visited.iter().rev() {
            if let Err(error) = fs::remove_dir(dir) {
                print_warning!("Leaving directory '{}': {error}", dir.display());
            }
        }
    }

    fn print_summary(&self) {
        let sorted = self.files_sorted.load(Ordering::Relaxed);
        let failed = self.files_failed.load(Ordering::Relaxed);
        let message = format!("Sorted {sorted} file{}", if sorted == 1 { "" } else { "s" });
        if self.config.dryrun {
            println!("Dryrun: would have {}", message.to_lowercase());
        } else {
            println!("{}", message.green());
        }
        if failed > 0 {
            print_warning!("{failed} file{} could not be sorted", if failed == 1 { "" } else { "s" });
        }
    }
}

#[cfg(test)]
mod sorter_tests {
    use super::*;

    use tempfile::tempdir;

    fn create_file(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    #[test]
    fn records_parents_before_children() {
        let dir = tempdir().unwrap();
        let outer = dir.path().join("outer");
        let inner = outer.join("inner");
        fs::create_dir_all(&inner).unwrap();
        create_file(&inner.join("deep.txt"), "x");

        let sorter = Sorter::new(dir.path().to_path_buf(), Config { dryrun: true, ..Config::default() });
        sorter.sort().unwrap();

        let visited = sorter.visited_dirs.lock().unwrap();
        let outer_index = visited.iter().position(|p| p == &outer).unwrap();
        let inner_index = visited.iter().position(|p| p == &inner).unwrap();
        assert!(outer_index < inner_index);
    }

    #[test]
    fn dryrun_moves_nothing() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        create_file(&dir.path().join("song.mp3"), "audio");
        create_file(&sub.join("note.txt"), "text");

        let sorter = Sorter::new(dir.path().to_path_buf(), Config { dryrun: true, ..Config::default() });
        sorter.sort().unwrap();

        assert!(dir.path().join("song.mp3").is_file());
        assert!(sub.join("note.txt").is_file());
        assert!(!dir.path().join("audio").exists());
        assert_eq!(sorter.files_sorted.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn reserved_dirs_are_not_recorded() {
        let dir = tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();
        create_file(&images.join("sorted.jpg"), "x");
        let other = dir.path().join("other");
        fs::create_dir(&other).unwrap();

        let sorter = Sorter::new(dir.path().to_path_buf(), Config::default());
        sorter.sort().unwrap();

        assert!(images.join("sorted.jpg").is_file(), "category contents must not move");
        let visited = sorter.visited_dirs.lock().unwrap();
        assert!(!visited.iter().any(|p| p == &images));
    }

    #[test]
    fn failed_relocation_does_not_fail_run() {
        let dir = tempdir().unwrap();
        create_file(&dir.path().join("broken.zip"), "not really a zip");
        create_file(&dir.path().join("fine.txt"), "x");

        let sorter = Sorter::new(dir.path().to_path_buf(), Config::default());
        assert!(sorter.sort().is_ok());

        assert!(dir.path().join("broken.zip").is_file());
        assert!(dir.path().join("txt").join("fine.txt").is_file());
        assert_eq!(sorter.files_failed.load(Ordering::Relaxed), 1);
        assert_eq!(sorter.files_sorted.load(Ordering::Relaxed), 1);
    }
}
