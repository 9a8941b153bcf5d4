//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

/// Create a temporary vault from `(relative path, contents)` pairs
pub fn create_test_vault(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, contents) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }
    dir
}

/// A small vault with tasks spread over nested folders
pub fn sample_vault() -> TempDir {
    create_test_vault(&[
        (
            "daily/2025-11-12.md",
            "# Wednesday\n\
             - [ ] High priority task ⏫ 📅 2025-11-13\n\
             - [x] Low priority done 🔽 ✅ 2025-11-10\n\
             Notes about the day.\n",
        ),
        (
            "projects/garden.md",
            "## Garden\n\
             \n\
             - [ ] Order seeds 📅 2025-11-20\n\
             - [/] Build raised bed ⏳ 2025-11-15 🛫 2025-11-14\n\
             - [ ] Compost 📅 2025-12-01\n\
             - [ ] \n\
             - [-] Buy greenhouse ❌ 2025-11-01\n",
        ),
        (
            ".claude/scratch.md",
            "- [ ] Internal note 🔺\n",
        ),
        ("readme.txt", "- [ ] Not markdown\n"),
    ])
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
