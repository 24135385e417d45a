use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use assert_cmd::Command;
use predicates::prelude::*;

static TEST_HOME_COUNTER: AtomicU64 = AtomicU64::new(0);

const BLOCK: &str = "# >>> jumpmark initialize >>>\n\
if [ -f \"$HOME/.local/bin/jumpmark.sh\" ]; then\n    . \"$HOME/.local/bin/jumpmark.sh\"\nfi\n\
# <<< jumpmark initialize <<<\n";

fn test_home() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "jumpmark-cli-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        TEST_HOME_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    fs::create_dir_all(&path).expect("must create test home");
    path
}

fn installer(home: &Path) -> Command {
    let mut command = Command::cargo_bin("jumpmark-install").expect("binary must build");
    command
        .env("HOME", home)
        .env("SHELL", "/bin/bash")
        .env("NO_COLOR", "1")
        .env_remove("JUMPMARK_SCRIPT_URL")
        .env_remove("JUMPMARK_BIN_DIR")
        .env_remove("JUMPMARK_RC_FILE")
        .env_remove("JUMPMARK_SHA256");
    command
}

fn seed_installation(home: &Path) -> PathBuf {
    let bin = home.join(".local").join("bin");
    fs::create_dir_all(&bin).expect("must create bin dir");
    fs::write(bin.join("jumpmark.sh"), "#!/bin/sh\n").expect("must seed script");
    let rc = home.join(".bashrc");
    fs::write(&rc, format!("export FOO=1\n\n{BLOCK}alias g=git\n")).expect("must seed rc");
    rc
}

#[test]
fn help_prints_usage_and_succeeds() {
    let home = test_home();
    for arg in ["help", "--help", "-h"] {
        installer(&home)
            .arg(arg)
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn unknown_command_prints_usage_and_fails() {
    let home = test_home();
    installer(&home)
        .arg("frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("frobnicate"))
        .stderr(predicate::str::contains("Usage:"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn declined_uninstall_exits_zero_without_changes() {
    let home = test_home();
    let rc = seed_installation(&home);
    let before = fs::read_to_string(&rc).expect("must read rc");

    installer(&home)
        .arg("uninstall")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("uninstall cancelled"));

    assert_eq!(fs::read_to_string(&rc).expect("must read rc"), before);
    assert!(home.join(".local/bin/jumpmark.sh").exists());
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn closed_stdin_counts_as_declining() {
    let home = test_home();
    let rc = seed_installation(&home);

    installer(&home)
        .arg("remove")
        .write_stdin("")
        .assert()
        .success();

    assert!(fs::read_to_string(&rc)
        .expect("must read rc")
        .contains("# >>> jumpmark initialize >>>"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn confirmed_uninstall_strips_block_and_script() {
    let home = test_home();
    let rc = seed_installation(&home);
    fs::create_dir_all(home.join(".jumpmark")).expect("must create data dir");

    installer(&home)
        .arg("remove")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("removed jumpmark block"))
        .stdout(predicate::str::contains("remove it manually"));

    assert_eq!(
        fs::read_to_string(&rc).expect("must read rc"),
        "export FOO=1\n\nalias g=git\n"
    );
    assert!(!home.join(".local/bin/jumpmark.sh").exists());
    assert!(home.join(".jumpmark").is_dir());
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn yes_flag_skips_prompt_and_honors_rc_override() {
    let home = test_home();
    seed_installation(&home);
    let profile = home.join(".profile");
    fs::write(&profile, format!("{BLOCK}export BAR=2\n")).expect("must seed profile");

    installer(&home)
        .args(["uninstall", "--yes", "--rc-file"])
        .arg(&profile)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&profile).expect("must read profile"),
        "export BAR=2\n"
    );
    assert!(fs::read_to_string(home.join(".bashrc"))
        .expect("must read rc")
        .contains("# >>> jumpmark initialize >>>"));
    let _ = fs::remove_dir_all(&home);
}

#[test]
fn install_without_curl_or_wget_exits_one() {
    let home = test_home();
    let empty_path = home.join("empty-path");
    fs::create_dir_all(&empty_path).expect("must create path dir");

    installer(&home)
        .arg("install")
        .env("PATH", &empty_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing dependency"));

    assert!(!home.join(".local/bin/jumpmark.sh").exists());
    assert!(!home.join(".bashrc").exists());
    let _ = fs::remove_dir_all(&home);
}

#[cfg(unix)]
#[test]
fn install_with_stub_curl_writes_script_and_block() {
    use std::os::unix::fs::PermissionsExt;

    let home = test_home();
    let tools = home.join("tools");
    fs::create_dir_all(&tools).expect("must create tools dir");
    let curl = tools.join("curl");
    fs::write(
        &curl,
        "#!/bin/sh\nwhile [ $# -gt 0 ]; do\n  if [ \"$1\" = \"-o\" ]; then out=\"$2\"; shift; fi\n  shift\ndone\nprintf '#!/bin/sh\\n' > \"$out\"\n",
    )
    .expect("must write stub curl");
    fs::set_permissions(&curl, fs::Permissions::from_mode(0o755)).expect("must chmod stub");
    let rc = home.join(".bashrc");
    fs::write(&rc, "export FOO=1\n").expect("must seed rc");

    installer(&home)
        .args(["install", "--yes"])
        .env("PATH", &tools)
        .assert()
        .success()
        .stdout(predicate::str::contains("using curl"));

    assert_eq!(
        fs::read_to_string(home.join(".local/bin/jumpmark.sh")).expect("must read script"),
        "#!/bin/sh\n"
    );
    assert_eq!(
        fs::read_to_string(&rc).expect("must read rc"),
        format!("export FOO=1\n\n{BLOCK}")
    );
    let _ = fs::remove_dir_all(&home);
}
