use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const REGISTRY: &str = "\
CONOPT 111 5 0001020304 1 0 2 NLP CNS DNLP
gmscoous.run optconopt.def
gmscooux.out
/opt/gams/libconopt.so coo 1 1
DEFAULTS
LP CONOPT
NLP CONOPT
";

struct SysDir {
    dir: TempDir,
}

impl SysDir {
    fn new() -> Self {
        Self::with_registry(REGISTRY)
    }

    fn with_registry(text: &str) -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("gmscmpun.txt"), text).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn registry(&self) -> PathBuf {
        self.path().join("gmscmpun.txt")
    }

    fn read(&self) -> String {
        fs::read_to_string(self.registry()).unwrap()
    }

    fn library(&self, name: &str) -> PathBuf {
        let lib = self.path().join("build").join(name);
        fs::create_dir_all(lib.parent().unwrap()).unwrap();
        fs::write(&lib, b"\x7fELF").unwrap();
        lib
    }
}

fn gamsreg() -> Command {
    let mut cmd = Command::cargo_bin("gamsreg").unwrap();
    cmd.args(["--platform", "unix", "--log-level", "warn"]);
    cmd
}

fn install(sys: &SysDir, lib: &Path, name: &str) -> assert_cmd::assert::Assert {
    gamsreg()
        .arg("install")
        .arg(sys.path())
        .arg(lib)
        .args([name, "foo", "LP MIP"])
        .assert()
}

#[test]
fn install_adds_section_before_defaults() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");

    install(&sys, &lib, "foo")
        .success()
        .stdout(predicate::str::contains("Adding section for solver FOO"))
        .stdout(predicate::str::contains("Creating backup"));

    let text = sys.read();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[3], "/opt/gams/libconopt.so coo 1 1");
    assert_eq!(lines[4], "FOO 111 5 0001020304 1 0 2 LP MIP");
    assert_eq!(lines[5], "gmsgenus.run");
    assert_eq!(lines[6], "gmsgenux.out");
    assert_eq!(lines[7], format!("{} foo 1 1", lib.display()));
    assert_eq!(lines[8], "");
    assert_eq!(lines[9], "DEFAULTS");

    assert_eq!(
        fs::read_to_string(sys.path().join("gmscmpun.txt.orig")).unwrap(),
        REGISTRY
    );
    assert_eq!(
        fs::read_to_string(sys.path().join("gmscmpun.txt.bak")).unwrap(),
        REGISTRY
    );
}

#[test]
fn relative_library_path_is_normalized() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");
    let build = lib.parent().unwrap();

    gamsreg()
        .current_dir(build)
        .arg("install")
        .arg(sys.path())
        .arg("../build/./libGamsFoo.so")
        .args(["foo", "foo", "LP"])
        .assert()
        .success();

    let expected = fs::canonicalize(build).unwrap().join("libGamsFoo.so");
    let text = sys.read();
    let line = text.lines().nth(7).unwrap();
    assert_eq!(line, format!("{} foo 1 1", expected.display()));
    assert!(!line.contains(".."));
}

#[test]
fn install_then_uninstall_restores_registry() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");

    install(&sys, &lib, "foo").success();
    assert_ne!(sys.read(), REGISTRY);

    gamsreg()
        .arg("uninstall")
        .arg(sys.path())
        .arg("FOO")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removing entry for FOO"));
    assert_eq!(sys.read(), REGISTRY);
}

#[test]
fn reinstall_keeps_single_entry_and_orig() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");

    install(&sys, &lib, "foo").success();
    let first = sys.read();
    install(&sys, &lib, "Foo")
        .success()
        .stdout(predicate::str::contains("Replacing previous section"));

    assert_eq!(sys.read(), first);
    assert_eq!(sys.read().matches("FOO 111").count(), 1);
    assert_eq!(
        fs::read_to_string(sys.path().join("gmscmpun.txt.orig")).unwrap(),
        REGISTRY
    );
    assert_eq!(
        fs::read_to_string(sys.path().join("gmscmpun.txt.bak")).unwrap(),
        first
    );
}

#[test]
fn uninstall_is_case_insensitive_and_idempotent() {
    let sys = SysDir::new();

    gamsreg()
        .arg("uninstall")
        .arg(sys.path())
        .arg("conopt")
        .assert()
        .success();
    let once = sys.read();
    assert_eq!(once, "DEFAULTS\nLP CONOPT\nNLP CONOPT\n");

    gamsreg()
        .arg("uninstall")
        .arg(sys.path())
        .arg("conopt")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removing entry").not());
    assert_eq!(sys.read(), once);
}

#[test]
fn malformed_entry_restores_registry() {
    let broken = "FOO 111 5 0001020304 1\ngmsgenus.run\nDEFAULTS\n";
    let sys = SysDir::with_registry(broken);
    let lib = sys.library("libGamsFoo.so");

    install(&sys, &lib, "foo")
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Expected at least 7 entries"))
        .stderr(predicate::str::contains("Restoring"));
    assert_eq!(fs::read(sys.registry()).unwrap(), broken.as_bytes());

    gamsreg()
        .arg("uninstall")
        .arg(sys.path())
        .arg("foo")
        .assert()
        .code(1);
    assert_eq!(fs::read(sys.registry()).unwrap(), broken.as_bytes());
}

#[test]
fn non_numeric_block_length_fails() {
    let broken = "FOO 111 5 0001020304 1 0 two LP\nDEFAULTS\n";
    let sys = SysDir::with_registry(broken);

    gamsreg()
        .arg("uninstall")
        .arg(sys.path())
        .arg("foo")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Expected integer at position 7"));
    assert_eq!(sys.read(), broken);
}

#[test]
fn invalid_solver_id_is_rejected_before_backup() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");

    gamsreg()
        .arg("install")
        .arg(sys.path())
        .arg(&lib)
        .args(["foo", "fo", "LP"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exactly 3 non-whitespace characters"))
        .stderr(predicate::str::contains("Usage:"));

    assert_eq!(sys.read(), REGISTRY);
    assert!(!sys.path().join("gmscmpun.txt.bak").exists());
}

#[test]
fn invalid_dict_type_is_rejected() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");

    gamsreg()
        .arg("install")
        .arg(sys.path())
        .arg(&lib)
        .args(["foo", "foo", "LP", "five"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Dictionary type five should be a number"));
    assert_eq!(sys.read(), REGISTRY);
}

#[test]
fn missing_library_and_registry_are_rejected() {
    let sys = SysDir::new();
    gamsreg()
        .arg("install")
        .arg(sys.path())
        .arg(sys.path().join("nope.so"))
        .args(["foo", "foo", "LP"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist or is not a file"));

    let empty = tempdir().unwrap();
    gamsreg()
        .arg("uninstall")
        .arg(empty.path())
        .arg("foo")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gmscmpun.txt does not exist"));

    gamsreg()
        .arg("uninstall")
        .arg(empty.path().join("missing"))
        .arg("foo")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn missing_arguments_exit_with_one() {
    gamsreg()
        .arg("install")
        .arg("/tmp")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_exits_cleanly() {
    gamsreg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"));
}

#[test]
fn optdef_is_installed_and_removed() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");
    let optdef = sys.path().join("build").join("optfoo.def");
    fs::write(&optdef, "* options\n").unwrap();

    gamsreg()
        .arg("install")
        .arg(sys.path())
        .arg(&lib)
        .args(["foo", "foo", "LP", "0"])
        .arg(&optdef)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installing"));

    assert!(sys.path().join("optfoo.def").is_file());
    let text = sys.read();
    assert!(text.contains("FOO 111 0 0001020304 1 0 2 LP\ngmsgenus.run optfoo.def\n"));

    gamsreg()
        .arg("uninstall")
        .arg(sys.path())
        .args(["foo", "optfoo.def"])
        .assert()
        .success();
    assert!(!sys.path().join("optfoo.def").exists());
    assert_eq!(sys.read(), REGISTRY);
}

#[test]
fn libtool_archive_is_resolved_on_install() {
    let sys = SysDir::new();
    let libdir = sys.path().join("prefix").join("lib");
    fs::create_dir_all(&libdir).unwrap();
    fs::write(libdir.join("libGamsFoo.so.0"), b"").unwrap();
    let la = sys.path().join("libGamsFoo.la");
    fs::write(
        &la,
        format!(
            "dlname='libGamsFoo.so.0'\nlibrary_names='libGamsFoo.so.0'\nlibdir='{}'\n",
            libdir.display()
        ),
    )
    .unwrap();

    install(&sys, &la, "foo").success();
    assert!(sys.read().contains(&format!(
        "{} foo 1 1\n",
        libdir.join("libGamsFoo.so.0").display()
    )));
}

#[test]
fn dry_run_leaves_disk_untouched() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");

    gamsreg()
        .arg("install")
        .arg(sys.path())
        .arg(&lib)
        .args(["foo", "foo", "LP", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FOO 111 5 0001020304 1 0 2 LP"))
        .stdout(predicate::str::contains("Creating backup").not());

    assert_eq!(sys.read(), REGISTRY);
    assert!(!sys.path().join("gmscmpun.txt.orig").exists());
    assert!(!sys.path().join("gmscmpun.txt.bak").exists());
}

#[test]
fn config_file_sets_install_defaults() {
    let sys = SysDir::new();
    let lib = sys.library("libGamsFoo.so");
    let config = sys.path().join("gamsreg.toml");
    fs::write(&config, "[install]\ndict_type = \"0\"\nthread_safe = false\n").unwrap();

    gamsreg()
        .arg("--config")
        .arg(&config)
        .arg("install")
        .arg(sys.path())
        .arg(&lib)
        .args(["foo", "foo", "LP"])
        .assert()
        .success();

    let text = sys.read();
    assert!(text.contains("FOO 111 0 0001020304 1 0 2 LP\n"));
    assert!(text.contains(&format!("{} foo 1 0\n", lib.display())));
}

#[test]
fn list_shows_entries() {
    let sys = SysDir::new();
    gamsreg()
        .arg("list")
        .arg(sys.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("CONOPT"))
        .stdout(predicate::str::contains("NLP CNS DNLP"));
}

#[test]
fn resolve_writes_manifest() {
    let work = tempdir().unwrap();
    let libdir = work.path().join("lib");
    fs::create_dir_all(&libdir).unwrap();
    fs::write(libdir.join("libGamsFoo.so.0"), b"").unwrap();
    let la = work.path().join("libGamsFoo.la");
    fs::write(
        &la,
        format!("dlname='libGamsFoo.so.0'\nlibdir='{}'\n", libdir.display()),
    )
    .unwrap();

    let manifest = work.path().join("gamsconfig.yaml.in");
    fs::write(
        &manifest,
        format!(
            "# generated\nsolverConfig:\n- FOO:\n    libName: {}\n    modelTypes: [LP]\n",
            la.display()
        ),
    )
    .unwrap();
    let install_dir = work.path().join("install");
    fs::create_dir(&install_dir).unwrap();

    gamsreg()
        .arg("resolve")
        .arg(&manifest)
        .arg(&install_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 1 library reference(s)"))
        .stdout(predicate::str::contains("Writing"));

    let written = fs::read_to_string(install_dir.join("gamsconfig.yaml")).unwrap();
    assert!(written.starts_with("# generated\nsolverConfig:\n"));
    assert!(written.contains(&format!(
        "    libName: {}\n",
        libdir.join("libGamsFoo.so.0").display()
    )));
    assert!(!written.contains("environmentVariables"));
}

#[test]
fn resolve_missing_manifest_fails() {
    let work = tempdir().unwrap();
    gamsreg()
        .arg("resolve")
        .arg(work.path().join("absent.yaml"))
        .arg(work.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
    assert!(!work.path().join("gamsconfig.yaml").exists());
}
