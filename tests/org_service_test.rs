//! OrgService: roster loading, script execution and the reference reorganization.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};
use tempfile::TempDir;

use orgtree::application::services::OrgService;
use orgtree::application::{ApplicationError, ReorgScript, Step};
use orgtree::config::Settings;
use orgtree::domain::{DomainError, FirstInLine, OrgTree, SuccessionPolicy};
use orgtree::infrastructure::di::ServiceContainer;
use orgtree::infrastructure::traits::{FileSystem, RealFileSystem};
use orgtree::util::testing;

const ROSTER: &str = "tests/resources/employees.json";
const SCRIPT: &str = "tests/resources/reorg.toml";

/// In-memory filesystem.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn service_with(settings: Settings) -> OrgService {
    OrgService::new(Arc::new(RealFileSystem), Arc::new(settings))
}

#[fixture]
fn service() -> OrgService {
    testing::init_test_setup();
    service_with(Settings::default())
}

fn subs(tree: &OrgTree, name: &str) -> Vec<String> {
    tree.subordinate_names(name)
        .unwrap()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ============================================================
// Roster loading
// ============================================================

#[rstest]
fn given_explicit_path_when_loading_tree_then_builds_hierarchy(service: OrgService) {
    let tree = service.load_tree(Some(Path::new(ROSTER))).unwrap();

    assert_eq!(tree.len(), 11);
    assert_eq!(tree.name(tree.root()), "Sarah");
}

#[test]
fn given_configured_roster_when_loading_without_override_then_uses_settings() {
    let settings = Settings {
        roster: Some(PathBuf::from(ROSTER)),
        ..Settings::default()
    };
    let service = service_with(settings);

    assert_eq!(service.roster_path(None).unwrap(), PathBuf::from(ROSTER));
    assert_eq!(
        service.roster_path(Some(Path::new("other.json"))).unwrap(),
        PathBuf::from("other.json")
    );
    assert_eq!(service.load_tree(None).unwrap().len(), 11);
}

#[rstest]
fn given_no_roster_anywhere_when_loading_then_config_error(service: OrgService) {
    let err = service.load_tree(None).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[rstest]
fn given_missing_file_when_loading_roster_then_roster_error(service: OrgService) {
    let err = service
        .load_roster(Path::new("tests/resources/missing.json"))
        .unwrap_err();

    assert!(
        matches!(&err, ApplicationError::Roster { message, .. } if message == "file not found"),
        "unexpected: {err}"
    );
}

#[rstest]
fn given_malformed_json_when_loading_roster_then_roster_error(service: OrgService) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("employees.json");
    fs::write(&path, r#"{ "employees": [ { "jobTitle": "CEO" } ] }"#).unwrap();

    let err = service.load_roster(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Roster { path: p, .. } if p == path));
}

#[rstest]
fn given_roster_with_unknown_boss_when_loading_tree_then_domain_error(service: OrgService) {
    let err = service
        .load_tree(Some(Path::new("tests/resources/broken_boss.json")))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NoSuchBoss(ref b)) if b == "Jared"
    ));
}

#[test]
fn given_in_memory_roster_when_loading_through_container_then_no_disk_access() {
    testing::init_test_setup();
    let memory = MemoryFileSystem::with_file(
        "/org/staff.json",
        r#"{ "employees": [
            { "name": "ann@corp.io", "jobTitle": "Founder" },
            { "name": "ben@corp.io", "boss": "ann" }
        ] }"#,
    );
    let container = ServiceContainer::with_deps(Settings::default(), Arc::new(memory));

    let tree = container
        .org_service
        .load_tree(Some(Path::new("/org/staff.json")))
        .unwrap();

    assert_eq!(tree.names(), vec!["Ann", "Ben"]);
    assert!(!container.fs.exists(Path::new(ROSTER)));
}

// ============================================================
// Scripts
// ============================================================

#[rstest]
fn given_reference_script_when_running_then_produces_expected_hierarchy(service: OrgService) {
    let mut tree = service.load_tree(Some(Path::new(ROSTER))).unwrap();
    let script = service.load_script(Path::new(SCRIPT)).unwrap();

    let report = service
        .run_script(&mut tree, &script, &mut FirstInLine)
        .unwrap();

    assert_eq!(
        report,
        vec![
            "Added new employee (Jeb) with Sarah as their boss",
            "Fired Alicia and replaced with Sal",
            "Promoted Jared and made Bill their subordinate",
            "Demoted employee (demoted Xavier and replaced with Maria)",
        ]
    );
    assert_eq!(subs(&tree, "Sarah"), vec!["Maria", "Jeb", "Sal"]);
    assert_eq!(subs(&tree, "Maria"), vec!["Morty", "Jared", "Xavier"]);
    assert_eq!(subs(&tree, "Xavier"), vec!["Zoe"]);
    assert_eq!(subs(&tree, "Jared"), vec!["Bill"]);
    assert_eq!(subs(&tree, "Bill"), vec!["Nick"]);
    assert_eq!(subs(&tree, "Sal"), vec!["Dana"]);
    assert!(tree.find_node("Alicia").is_none());
    assert_eq!(tree.len(), 11);
    assert!(tree.check_invariants().is_ok());
}

#[rstest]
fn given_random_policy_with_seed_when_running_twice_then_same_outcome(service: OrgService) {
    let script = ReorgScript {
        steps: vec![
            Step::Fire("Xavier".to_string()),
            Step::Fire("Bill".to_string()),
        ],
    };
    let seeded = service_with(Settings {
        succession: SuccessionPolicy::Random,
        succession_seed: Some(99),
        ..Settings::default()
    });

    let run = || {
        let mut tree = service.load_tree(Some(Path::new(ROSTER))).unwrap();
        let mut picker = seeded.succession();
        let report = seeded
            .run_script(&mut tree, &script, picker.as_mut())
            .unwrap();
        (report, tree.to_string())
    };

    assert_eq!(run(), run());
}

#[rstest]
fn given_failing_step_when_running_then_reports_index_and_keeps_earlier_steps(
    service: OrgService,
) {
    let mut tree = service.load_tree(Some(Path::new(ROSTER))).unwrap();
    let script = ReorgScript::parse(
        r#"
[[steps]]
fire = "Zoe"

[[steps]]
promote = "Sarah"

[[steps]]
fire = "Nick"
"#,
    )
    .unwrap();

    let err = service
        .run_script(&mut tree, &script, &mut FirstInLine)
        .unwrap_err();

    match err {
        ApplicationError::StepFailed {
            index,
            step,
            source,
        } => {
            assert_eq!(index, 2);
            assert_eq!(step, "promote Sarah");
            assert_eq!(source, DomainError::CannotPromoteRoot("Sarah".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(tree.find_node("Zoe").is_none());
    assert!(tree.find_node("Nick").is_some());
    assert_eq!(tree.len(), 10);
}

#[rstest]
fn given_blank_hire_in_script_when_running_then_step_fails(service: OrgService) {
    let mut tree = service.load_tree(Some(Path::new(ROSTER))).unwrap();
    let script =
        ReorgScript::parse("[[steps]]\nhire = { name = \" \", boss = \"Sarah\" }\n").unwrap();

    let err = service
        .run_script(&mut tree, &script, &mut FirstInLine)
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::StepFailed {
            index: 1,
            source: DomainError::InvalidRecord { .. },
            ..
        }
    ));
    assert_eq!(tree.len(), 11);
}

#[rstest]
fn given_unparsable_script_when_loading_then_script_error(service: OrgService) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reorg.toml");
    fs::write(&path, "[[steps]]\nretire = \"Bill\"\n").unwrap();

    let err = service.load_script(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Script { .. }));
}
