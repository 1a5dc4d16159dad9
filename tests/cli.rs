use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn demo_runs_to_completion() {
    Command::cargo_bin("tpool-demo")
        .unwrap()
        .args(["--threads", "2", "--jobs", "8", "--pause-ms", "10"])
        .assert()
        .success()
        .stdout(contains("completed 8 jobs"));
}

#[test]
fn demo_rejects_zero_threads() {
    Command::cargo_bin("tpool-demo")
        .unwrap()
        .args(["--threads", "0"])
        .assert()
        .failure();
}
