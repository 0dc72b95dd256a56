use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;

fn bin_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("locmerge").expect("binary built");
    // keep log output and locmerge.toml lookup inside the sandbox
    cmd.current_dir(dir);
    cmd.arg("--no-color");
    cmd
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

const TARGET: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<resources>\n\
    <string name=\"app_name\">Foo</string>\n\
    <string name=\"greeting\">Hi</string>\n\
</resources>\n";

const SOURCE: &str = "<resources>\n\
    <string name=\"app_name\">Foo</string>\n\
    <string name=\"greeting\">Hello</string>\n\
    <string name=\"farewell\">Bye</string>\n\
</resources>\n";

/// Standard fixture: one `app` module plus a source dir for the default locale.
fn project_fixture(root: &Path) {
    write(&root.join("project/app/src/main/res/values/strings.xml"), TARGET);
    write(&root.join("incoming/strings.xml"), SOURCE);
}

#[test]
fn help_works() {
    let tmp = tempfile::tempdir().unwrap();
    bin_cmd(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Merge translated strings.xml files",
        ));
}

#[test]
fn scan_lists_modules_and_locales() {
    let tmp = tempfile::tempdir().unwrap();
    project_fixture(tmp.path());

    bin_cmd(tmp.path())
        .args(["scan", "--root"])
        .arg(tmp.path().join("project"))
        .assert()
        .success()
        .stdout(predicate::str::contains("app"))
        .stdout(predicate::str::contains("values"));
}

#[test]
fn scan_fails_without_res_dir() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("empty")).unwrap();

    bin_cmd(tmp.path())
        .args(["scan", "--root"])
        .arg(tmp.path().join("empty"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Android resource directory"));
}

#[test]
fn sources_suggests_locale_folders() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        &tmp.path().join("incoming/strings_fr.xml"),
        "<resources>\n    <string name=\"a\">Un</string>\n</resources>\n",
    );

    bin_cmd(tmp.path())
        .args(["sources", "--dir"])
        .arg(tmp.path().join("incoming"))
        .assert()
        .success()
        .stdout(predicate::str::contains("values-fr"));
}

#[test]
fn preview_reports_spec_example_counts() {
    let tmp = tempfile::tempdir().unwrap();
    project_fixture(tmp.path());

    let assert = bin_cmd(tmp.path())
        .args(["preview", "--root"])
        .arg(tmp.path().join("project"))
        .arg("--sources")
        .arg(tmp.path().join("incoming"))
        .args(["--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let previews: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let preview = &previews[0];
    assert_eq!(preview["folderName"], "values");
    assert_eq!(preview["addCount"], 1);
    assert_eq!(preview["overwriteCount"], 1);
    assert_eq!(preview["isNewFile"], false);
}

#[test]
fn preview_keep_existing_never_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    project_fixture(tmp.path());

    let assert = bin_cmd(tmp.path())
        .args(["preview", "--root"])
        .arg(tmp.path().join("project"))
        .arg("--sources")
        .arg(tmp.path().join("incoming"))
        .arg("--keep-existing")
        .args(["--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let previews: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(previews[0]["overwriteCount"], 0);
    assert_eq!(previews[0]["addCount"], 1);
}

#[test]
fn merge_writes_then_second_run_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    project_fixture(tmp.path());

    bin_cmd(tmp.path())
        .args(["merge", "--root"])
        .arg(tmp.path().join("project"))
        .arg("--sources")
        .arg(tmp.path().join("incoming"))
        .assert()
        .success()
        .stdout(predicate::str::contains("values: updated"));

    let merged = std::fs::read_to_string(
        tmp.path()
            .join("project/app/src/main/res/values/strings.xml"),
    )
    .unwrap();
    assert!(merged.contains("<string name=\"greeting\">Hello</string>"));
    assert!(merged.contains("<string name=\"farewell\">Bye</string>"));

    // merging the same sources again finds nothing to do
    bin_cmd(tmp.path())
        .args(["merge", "--root"])
        .arg(tmp.path().join("project"))
        .arg("--sources")
        .arg(tmp.path().join("incoming"))
        .assert()
        .success()
        .stdout(predicate::str::contains("values: skipped"));
}

#[test]
fn merge_dry_run_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    project_fixture(tmp.path());

    bin_cmd(tmp.path())
        .args(["merge", "--root"])
        .arg(tmp.path().join("project"))
        .arg("--sources")
        .arg(tmp.path().join("incoming"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY-RUN"));

    let target = std::fs::read_to_string(
        tmp.path()
            .join("project/app/src/main/res/values/strings.xml"),
    )
    .unwrap();
    assert_eq!(target, TARGET);
}

#[test]
fn export_then_import_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        &tmp.path().join("incoming/strings_de.xml"),
        "<resources>\n    <string name=\"a\">Eins</string>\n</resources>\n",
    );
    let out = tmp.path().join("mappings.json");

    bin_cmd(tmp.path())
        .args(["export-mappings", "--dir"])
        .arg(tmp.path().join("incoming"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    bin_cmd(tmp.path())
        .args(["import-mappings", "--file"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 mapping(s) valid"));
}

#[test]
fn import_mappings_rejects_corrupt_blob() {
    let tmp = tempfile::tempdir().unwrap();
    let bad = tmp.path().join("bad.json");
    std::fs::write(&bad, "{\"mappings\": 42}").unwrap();

    bin_cmd(tmp.path())
        .args(["import-mappings", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid mapping configuration"));
}
