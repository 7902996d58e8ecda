//! Property-based tests for extraction safety and round-trip identity.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::io::Write;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;
use ziptree_core::compress_dir;
use ziptree_core::extract_dir;
use ziptree_core::paths::clean_path;
use ziptree_core::paths::is_strictly_within;

fn files_under(dir: &Path) -> Vec<std::path::PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Cleaning never leaves `.` components or a `..` after a normal one.
    #[test]
    fn prop_clean_path_is_normalized(
        parts in prop::collection::vec(prop_oneof!["[a-z]{1,4}", Just("..".to_string()), Just(".".to_string())], 0..8)
    ) {
        let cleaned = clean_path(Path::new(&parts.join("/")));
        let mut seen_normal = false;
        for component in cleaned.components() {
            match component {
                std::path::Component::Normal(_) => seen_normal = true,
                std::path::Component::ParentDir => prop_assert!(!seen_normal),
                std::path::Component::CurDir => prop_assert_eq!(cleaned.as_os_str(), "."),
                _ => {}
            }
        }
    }

    /// Whatever names an archive contains, extraction stays inside the target.
    #[test]
    fn prop_extract_dir_never_escapes(
        names in prop::collection::vec(
            prop::collection::vec(prop_oneof!["[a-z]{1,6}", Just("..".to_string())], 1..5),
            1..6
        ),
        rooted in any::<bool>()
    ) {
        let temp = TempDir::new().expect("temp dir");
        let archive = temp.path().join("fuzz.zip");
        let out = temp.path().join("a/b/out");

        let mut zip = ZipWriter::new(fs::File::create(&archive).expect("create"));
        let mut used = std::collections::HashSet::new();
        for parts in &names {
            let mut name = parts.join("/");
            if rooted {
                name.insert(0, '/');
            }
            if !used.insert(name.clone()) {
                continue;
            }
            zip.start_file(name, SimpleFileOptions::default()).expect("start");
            zip.write_all(b"x").expect("write");
        }
        zip.finish().expect("finish");

        // A later entry may collide with an earlier file's directory; only
        // successful runs are checked.
        if let Ok(paths) = extract_dir(&archive, &out) {
            for path in &paths {
                prop_assert!(is_strictly_within(path, &out), "{} escaped", path.display());
            }
        }
        for file in files_under(temp.path()) {
            prop_assert!(
                file == archive || file.starts_with(&out),
                "{} written outside the target", file.display()
            );
        }
    }

    /// Bytes extracted equal the bytes compressed.
    #[test]
    fn prop_roundtrip_identity(
        files in prop::collection::btree_map("[a-z]{1,8}", prop::collection::vec(any::<u8>(), 0..5000), 1..6)
    ) {
        let temp = TempDir::new().expect("temp dir");
        let src = temp.path().join("src");
        fs::create_dir(&src).expect("mkdir");
        for (name, data) in &files {
            fs::write(src.join(format!("{name}.bin")), data).expect("write");
        }

        let archive = temp.path().join("rt.zip");
        let report = compress_dir(&archive, &src, true).expect("compress");
        prop_assert_eq!(report.files_added, files.len());

        let out = temp.path().join("out");
        extract_dir(&archive, &out).expect("extract");
        for (name, data) in &files {
            let restored = fs::read(out.join("src").join(format!("{name}.bin"))).expect("read");
            prop_assert_eq!(&restored, data);
        }
    }
}
