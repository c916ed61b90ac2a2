//! Integration tests for the `slideme-gutenberg` command-line interface.
//!
//! Covers reading from standard input and files, table handling flags,
//! writing output files and reporting inputs without shortcodes.

use std::fs;

use tempfile::tempdir;

#[macro_use]
mod prelude;
use prelude::*;

fn cli() -> Command {
    Command::cargo_bin("slideme-gutenberg").expect("failed to create cargo command")
}

#[fixture]
fn table_document() -> String {
    slideme!("Books", "<table><tr><th>Title</th></tr><tr><td>Dune</td></tr></table>")
}

#[test]
fn test_cli_version_flag() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("slideme-gutenberg {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_converts_stdin() {
    cli()
        .write_stdin(slideme!("FAQ", "Hello world"))
        .assert()
        .success()
        .stdout(concat!(
            "<!-- wp:cu-block/description-custom {\"title\":\"FAQ\",\"layout\":\"accordion\"} -->\n",
            "<!-- wp:paragraph -->\n<p>Hello world</p>\n<!-- /wp:paragraph -->\n",
            "<!-- /wp:cu-block/description-custom -->\n",
        ));
}

#[rstest]
fn test_cli_flattens_tables_by_default(table_document: String) {
    cli()
        .write_stdin(table_document)
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>Dune</p>"))
        .stdout(predicate::str::contains("wp:table").not());
}

#[rstest]
fn test_cli_preserve_tables(table_document: String) {
    cli()
        .arg("--preserve-tables")
        .write_stdin(table_document)
        .assert()
        .success()
        .stdout(predicate::str::contains("<!-- wp:table {\"hasFixedLayout\":true} -->"))
        .stdout(predicate::str::contains("<td>Dune</td>"));
}

#[rstest]
fn test_cli_count_tables_stdin(table_document: String) {
    cli()
        .arg("--count-tables")
        .write_stdin(format!("{table_document}\n<table></table>"))
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_cli_count_tables_conflicts_with_output() {
    cli()
        .args(["--count-tables", "--output=out.html"])
        .write_stdin("")
        .assert()
        .failure();
}

#[test]
fn test_cli_warns_when_nothing_found() {
    cli()
        .env("RUST_LOG", "warn")
        .write_stdin("plain text only\n")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No [slideme] shortcodes found in <stdin>"));
}

#[test]
fn test_cli_multiple_files_in_order() {
    let dir = tempdir().expect("failed to create temporary directory");
    let mut paths = Vec::new();
    for (i, title) in ["One", "Two", "Three"].iter().enumerate() {
        let path = dir.path().join(format!("file{i}.txt"));
        fs::write(&path, slideme!(title, "body")).expect("failed to write input");
        paths.push(path);
    }
    let output = cli().args(&paths).output().expect("failed to run command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(outer_titles(&stdout), vec!["One", "Two", "Three"]);
    assert_eq!(count(&stdout, "-->\n\n<!-- wp:cu-block"), 2);
}

#[test]
fn test_cli_missing_file_fails() {
    let dir = tempdir().expect("failed to create temporary directory");
    cli()
        .arg(dir.path().join("absent.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.txt"));
}

#[test]
fn test_cli_output_file() {
    let dir = tempdir().expect("failed to create temporary directory");
    let target = dir.path().join("blocks.html");
    cli()
        .arg(format!("--output={}", target.display()))
        .write_stdin(slideme!("A", "- x"))
        .assert()
        .success()
        .stdout("");
    let written = fs::read_to_string(&target).expect("failed to read output");
    assert!(written.contains("  <li>x</li>"));
}

#[test]
fn test_cli_default_output_name() {
    let dir = tempdir().expect("failed to create temporary directory");
    cli()
        .current_dir(dir.path())
        .arg("--output")
        .write_stdin(slideme!("A", "text"))
        .assert()
        .success();
    let written = fs::read_to_string(dir.path().join("converted-gutenberg-blocks.html"))
        .expect("failed to read default output");
    assert!(written.contains("<p>text</p>"));
}

#[test]
fn test_cli_bare_output_flag_keeps_positional_input() {
    let dir = tempdir().expect("failed to create temporary directory");
    let input = dir.path().join("post.html");
    let document = slideme!("A", "text");
    fs::write(&input, &document).expect("failed to write input");
    cli()
        .current_dir(dir.path())
        .args(["--output", "post.html"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&input).expect("failed to read input"), document);
    let written = fs::read_to_string(dir.path().join("converted-gutenberg-blocks.html"))
        .expect("failed to read default output");
    assert!(written.contains("<p>text</p>"));
}

#[test]
fn test_cli_rejects_oversized_input() {
    cli()
        .args(["--max-input-bytes", "8"])
        .write_stdin(slideme!("A", "longer than eight bytes"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeding the limit of 8 bytes"));
}
