//! Render a directory tree as one text document for snapshotting.
//!
//! Files are listed in path order as `=== <path>` headers followed by their
//! contents. `.gitignore`d paths and non UTF-8 files are left out, and CRLF is
//! normalized so snapshots compare the same on every platform.

use ignore::WalkBuilder;
use std::fs;
use std::path::Path;

/// The manifest of every file under `root`.
pub fn manifest(root: impl AsRef<Path>) -> String {
    let base = fs::canonicalize(root.as_ref()).expect("failed to canonicalize root path");

    let mut wb = WalkBuilder::new(&base);
    wb.hidden(true)
        .git_ignore(true)
        .ignore(true)
        .git_exclude(true)
        .git_global(false)
        .require_git(false)
        .parents(false);

    let mut entries: Vec<(String, String)> = wb
        .build()
        .filter_map(Result::ok)
        .filter(|dent| dent.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|dent| {
            let rel = dent
                .path()
                .strip_prefix(&base)
                .ok()?
                .to_string_lossy()
                .replace('\\', "/");
            let bytes = fs::read(dent.path()).ok()?;
            let mut body = String::from_utf8(bytes).ok()?.replace("\r\n", "\n");
            if !body.ends_with('\n') {
                body.push('\n');
            }
            Some((rel, body))
        })
        .collect();
    entries.sort();

    entries
        .into_iter()
        .map(|(rel, body)| format!("=== {rel}\n{body}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_is_sorted_and_skips_ignored() {
        let dir = assert_fs::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/b.js"), "b").unwrap();
        fs::write(dir.path().join("src/nested/a.js"), "a\r\n").unwrap();
        fs::write(dir.path().join(".gitignore"), "out/\n").unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("out/skip.js"), "skip").unwrap();
        fs::write(dir.path().join("image.bin"), [0xff, 0xfe, 0x00]).unwrap();

        insta::assert_snapshot!(manifest(dir.path()), @r"
        === src/b.js
        b
        === src/nested/a.js
        a
        ");
    }
}
