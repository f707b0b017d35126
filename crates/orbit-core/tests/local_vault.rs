//! End-to-end behavior of the facade over the local backend.

use orbit_core::{LogKind, ProjectDraft, ProjectPatch, Vault, VisualType};

const USER: &str = "local-commander";

fn vault() -> Vault {
    Vault::local_in_memory().expect("in-memory vault should open")
}

#[test]
fn test_folder_create_list_round_trip() {
    let vault = vault();

    let created = vault.create_folder(USER, "Airdrops", 0).unwrap();
    let listed = vault.folders(USER).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
}

#[test]
fn test_folders_sorted_by_order_index() {
    let vault = vault();

    vault.create_folder(USER, "Third", 2).unwrap();
    vault.create_folder(USER, "First", 0).unwrap();
    vault.create_folder(USER, "Second", 1).unwrap();

    let names: Vec<String> = vault
        .folders(USER)
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, ["First", "Second", "Third"]);
}

#[test]
fn test_project_round_trip_and_defaults() {
    let vault = vault();
    let folder = vault.create_folder(USER, "Airdrops", 0).unwrap();

    let created = vault
        .create_project(
            USER,
            &folder.id,
            ProjectDraft::new("Soccer", VisualType::Icon, "Box").with_link("https://example.com"),
        )
        .unwrap();

    assert_eq!(created.progress, 0);
    assert!(!created.is_pinned);
    assert_eq!(created.group_id, folder.id);

    let listed = vault.projects(USER).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
}

#[test]
fn test_update_project_is_a_partial_patch() {
    let vault = vault();
    let folder = vault.create_folder(USER, "Airdrops", 0).unwrap();
    let project = vault
        .create_project(USER, &folder.id, ProjectDraft::new("Soccer", VisualType::Icon, "Box"))
        .unwrap();

    vault
        .update_project(USER, &project.id, ProjectPatch::new().progress(60))
        .unwrap();

    let projects = vault.projects(USER).unwrap();
    let updated = &projects[0];
    assert_eq!(updated.progress, 60);
    // Everything not in the patch is untouched
    assert_eq!(updated.title, "Soccer");
    assert_eq!(updated.visual_data, "Box");
    assert_eq!(updated.created_at, project.created_at);
    assert!(updated.updated_at >= project.updated_at);
}

#[test]
fn test_bulk_delete_projects() {
    let vault = vault();
    let folder = vault.create_folder(USER, "Airdrops", 0).unwrap();

    let keep = vault
        .create_project(USER, &folder.id, ProjectDraft::new("Keep", VisualType::Icon, "Box"))
        .unwrap();
    let drop1 = vault
        .create_project(USER, &folder.id, ProjectDraft::new("Drop 1", VisualType::Icon, "Box"))
        .unwrap();
    let drop2 = vault
        .create_project(USER, &folder.id, ProjectDraft::new("Drop 2", VisualType::Icon, "Box"))
        .unwrap();

    vault
        .delete_projects(USER, &[drop1.id, drop2.id])
        .unwrap();

    let remaining = vault.projects(USER).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
}

#[test]
fn test_folder_delete_does_not_cascade() {
    let vault = vault();
    let folder = vault.create_folder(USER, "Airdrops", 0).unwrap();
    let project = vault
        .create_project(USER, &folder.id, ProjectDraft::new("Orphan", VisualType::Icon, "Box"))
        .unwrap();

    vault.delete_folder(USER, &folder.id).unwrap();

    // The orphaned project is still retrievable; cascading is the
    // caller's two-step job.
    assert!(vault.folders(USER).unwrap().is_empty());
    let projects = vault.projects(USER).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, project.id);
}

#[test]
fn test_pin_cap_is_not_enforced_here() {
    let vault = vault();
    let folder = vault.create_folder(USER, "Airdrops", 0).unwrap();

    for i in 0..4 {
        let project = vault
            .create_project(
                USER,
                &folder.id,
                ProjectDraft::new(format!("P{}", i), VisualType::Icon, "Box"),
            )
            .unwrap();
        vault
            .update_project(USER, &project.id, ProjectPatch::new().pinned(true))
            .unwrap();
    }

    // A fourth pin goes through: the <=3 cap lives in the caller.
    let pinned = vault
        .projects(USER)
        .unwrap()
        .iter()
        .filter(|p| p.is_pinned)
        .count();
    assert_eq!(pinned, 4);
}

#[test]
fn test_log_lifecycle_and_project_bump() {
    let vault = vault();

    let folder = vault.create_folder(USER, "Airdrops", 0).unwrap();
    let project = vault
        .create_project(USER, &folder.id, ProjectDraft::new("Soccer", VisualType::Icon, "Box"))
        .unwrap();

    let log = vault
        .create_log(USER, &project.id, "bridged funds", LogKind::Note)
        .unwrap();

    // Adding a log bumps the parent's updated_at
    let projects = vault.projects(USER).unwrap();
    assert_eq!(projects.len(), 1);
    assert!(projects[0].updated_at >= log.created_at);

    let bumped_at = projects[0].updated_at;

    // Editing content keeps created_at, deleting leaves the parent alone
    vault.update_log(USER, &log.id, "bridged more funds").unwrap();
    let logs = vault.logs(USER).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].content, "bridged more funds");
    assert_eq!(logs[0].created_at, log.created_at);

    vault.delete_log(USER, &log.id).unwrap();
    assert!(vault.logs(USER).unwrap().is_empty());
    assert_eq!(vault.projects(USER).unwrap()[0].updated_at, bumped_at);
}

#[test]
fn test_logs_listed_newest_first() {
    let vault = vault();
    let folder = vault.create_folder(USER, "Airdrops", 0).unwrap();
    let project = vault
        .create_project(USER, &folder.id, ProjectDraft::new("Soccer", VisualType::Icon, "Box"))
        .unwrap();

    for content in ["first", "second", "third"] {
        vault
            .create_log(USER, &project.id, content, LogKind::Seen)
            .unwrap();
    }

    let logs = vault.logs(USER).unwrap();
    assert_eq!(logs.len(), 3);
    for pair in logs.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[test]
fn test_export_import_fidelity() {
    let source = vault();
    let folder = source.create_folder(USER, "Airdrops", 0).unwrap();
    let project = source
        .create_project(USER, &folder.id, ProjectDraft::new("Soccer", VisualType::Icon, "Box"))
        .unwrap();
    source
        .create_log(USER, &project.id, "bridged funds", LogKind::Note)
        .unwrap();

    let document = source.export_vault(USER).unwrap();

    let target = vault();
    let summary = target.import_vault(USER, &document).unwrap();
    assert_eq!(summary.folders, 1);
    assert_eq!(summary.projects, 1);
    assert_eq!(summary.logs, 1);

    assert_eq!(target.folders(USER).unwrap(), source.folders(USER).unwrap());
    assert_eq!(target.projects(USER).unwrap(), source.projects(USER).unwrap());
    assert_eq!(target.logs(USER).unwrap(), source.logs(USER).unwrap());
}

#[test]
fn test_import_is_an_upsert() {
    let vault = vault();
    vault.create_folder(USER, "Airdrops", 0).unwrap();

    let document = vault.export_vault(USER).unwrap();
    vault.import_vault(USER, &document).unwrap();
    vault.import_vault(USER, &document).unwrap();

    // Re-importing the same snapshot does not duplicate records
    assert_eq!(vault.folders(USER).unwrap().len(), 1);
}

#[test]
fn test_import_tolerates_sparse_documents() {
    let vault = vault();

    let summary = vault.import_vault(USER, "{}").unwrap();
    assert_eq!(summary.total(), 0);

    let summary = vault
        .import_vault(
            USER,
            r#"{"folders": [{"id": "f1", "name": "Solo", "orderIndex": 0, "createdAt": 1}],
                "someFutureKey": true}"#,
        )
        .unwrap();
    assert_eq!(summary.folders, 1);
    assert_eq!(vault.folders(USER).unwrap()[0].name, "Solo");
}

#[test]
fn test_import_rejects_malformed_json() {
    let vault = vault();
    assert!(vault.import_vault(USER, "not a backup").is_err());
}
