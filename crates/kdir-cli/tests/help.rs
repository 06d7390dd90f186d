use assert_cmd::cargo::cargo_bin_cmd;

fn help_output(args: &[&str]) -> String {
    let assert = cargo_bin_cmd!("kubectl-directory")
        .args(args)
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 help")
}

#[test]
fn root_help_describes_layout() {
    let output = help_output(&["--help"]);
    assert!(
        output.contains("<basedir>/<configmaps|secrets>/<namespace>/<name>"),
        "root help missing layout: {output}"
    );
    assert!(output.contains(".metadata.yaml"), "root help: {output}");
}

#[test]
fn dump_help_lists_examples() {
    let output = help_output(&["dump", "--help"]);
    assert!(
        output.contains("Dump the contents of an object to a directory as separate files."),
        "dump about missing: {output}"
    );
    assert!(
        output.contains("kubectl directory dump secret test --outputdir testsecret"),
        "dump example missing outputdir: {output}"
    );
    assert!(output.contains("--basedir"), "dump help: {output}");
}

#[test]
fn load_help_mentions_dry_run() {
    let output = help_output(&["load", "--help"]);
    assert!(output.contains("--inputdir"), "load help: {output}");
    assert!(output.contains("--dry-run"), "load help: {output}");
}

#[test]
fn unknown_kind_is_rejected_by_parser() {
    cargo_bin_cmd!("kubectl-directory")
        .args(["dump", "deployment", "web"])
        .assert()
        .failure()
        .code(2);
}
