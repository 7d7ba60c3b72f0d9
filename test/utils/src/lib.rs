use std::env;
use std::path::PathBuf;

/// Path to a small PDF checked in for upload tests.
pub fn pdf_fixture_path() -> PathBuf {
    return env::current_dir()
        .unwrap()
        .join("./test/fixtures/sample.pdf");
}

pub fn markdown_fixture() -> &'static str {
    return r#"
# Summary

The uploaded document covers **three** quarters, ~~four~~ were planned.

| Quarter | Revenue |
| ------- | ------- |
| Q1 | 10 |
| Q2 | 12 |

- first point
- second point

Call `report()` for details.
"#
    .trim();
}
