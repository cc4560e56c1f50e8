use promptkit::domain::model::ModuleStatus;
use promptkit::{Assembler, LocalStorage, ProjectConfig, PromptError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn workspace() -> (TempDir, Assembler<LocalStorage, ProjectConfig>) {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("recipes")).unwrap();

    let config = ProjectConfig::default().with_root(temp_dir.path());
    let assembler = Assembler::new(LocalStorage::new(temp_dir.path()), config);
    (temp_dir, assembler)
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn test_hello_world_recipe() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "a.md", "Hello");
    write(root, "b.md", "World");
    write(root, "recipes/example.yaml", "modules: [a.md, b.md]\n");

    let outcome = assembler
        .build_recipe(Path::new("recipes/example.yaml"))
        .unwrap();

    assert_eq!(outcome.recipe, "example");
    assert_eq!(outcome.artifact_path, PathBuf::from("dist/example.md"));
    assert_eq!(outcome.included(), 2);
    assert!(outcome.written);
    assert_eq!(read(root, "dist/example.md"), "Hello\n\nWorld");
}

#[test]
fn test_missing_module_yields_empty_artifact() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "recipes/lonely.yaml", "modules: [missing.md]\n");

    let outcome = assembler
        .build_recipe(Path::new("recipes/lonely.yaml"))
        .unwrap();

    assert_eq!(outcome.missing().count(), 1);
    assert_eq!(fs::metadata(root.join("dist/lonely.md")).unwrap().len(), 0);
}

#[test]
fn test_missing_module_leaves_no_extra_separator() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "modules/a.md", "First");
    write(root, "modules/c.md", "Third");
    write(
        root,
        "recipes/gappy.yaml",
        "modules:\n  - modules/a.md\n  - modules/b.md\n  - modules/c.md\n",
    );

    assembler.build_recipe(Path::new("recipes/gappy.yaml")).unwrap();

    assert_eq!(read(root, "dist/gappy.md"), "First\n\nThird");
}

#[test]
fn test_empty_and_absent_module_lists() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "recipes/empty_list.yaml", "modules: []\n");
    write(root, "recipes/no_key.yaml", "description: nothing here\n");
    write(root, "recipes/blank.yaml", "");

    for name in ["empty_list", "no_key", "blank"] {
        let recipe = format!("recipes/{}.yaml", name);
        assembler.build_recipe(Path::new(&recipe)).unwrap();
        assert_eq!(read(root, &format!("dist/{}.md", name)), "", "{}", name);
    }
}

#[test]
fn test_modules_are_trimmed_and_empty_ones_skipped() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "intro.md", "\n\n# Intro\n\nBody text.\n\n");
    write(root, "blank.md", "   \n\t\n");
    write(root, "outro.md", "  Bye  ");
    write(
        root,
        "recipes/trim.yaml",
        "modules:\n  - intro.md\n  - blank.md\n  - outro.md\n",
    );

    let outcome = assembler.build_recipe(Path::new("recipes/trim.yaml")).unwrap();

    let statuses: Vec<ModuleStatus> = outcome.modules.iter().map(|m| m.status).collect();
    assert_eq!(
        statuses,
        vec![ModuleStatus::Included, ModuleStatus::Empty, ModuleStatus::Included]
    );
    assert_eq!(read(root, "dist/trim.md"), "# Intro\n\nBody text.\n\nBye");
}

#[test]
fn test_duplicate_modules_are_preserved() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "rule.md", "Be concise.");
    write(root, "recipes/dup.yaml", "modules: [rule.md, rule.md]\n");

    assembler.build_recipe(Path::new("recipes/dup.yaml")).unwrap();

    assert_eq!(read(root, "dist/dup.md"), "Be concise.\n\nBe concise.");
}

#[test]
fn test_rebuild_is_byte_identical_and_overwrites() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "a.md", "Alpha\n");
    write(root, "recipes/same.yaml", "modules: [a.md]\n");
    write(root, "dist/same.md", "stale content that is much longer than the new one");

    assembler.build_recipe(Path::new("recipes/same.yaml")).unwrap();
    let first = fs::read(root.join("dist/same.md")).unwrap();
    assembler.build_recipe(Path::new("recipes/same.yaml")).unwrap();
    let second = fs::read(root.join("dist/same.md")).unwrap();

    assert_eq!(first, b"Alpha");
    assert_eq!(first, second);
}

#[test]
fn test_dist_directory_is_created() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "recipes/x.yaml", "modules: []\n");
    assert!(!root.join("dist").exists());

    assembler.build_recipe(Path::new("recipes/x.yaml")).unwrap();

    assert!(root.join("dist").is_dir());
}

#[test]
fn test_malformed_recipe_does_not_stop_batch() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "a.md", "A");
    write(root, "recipes/alpha.yaml", "modules: [a.md]\n");
    write(root, "recipes/broken.yaml", "modules: [a.md\n");
    write(root, "recipes/zulu.yaml", "modules: [a.md, a.md]\n");
    write(root, "recipes/notes.txt", "modules: [a.md]\n");

    let summary = assembler.build_all().unwrap();

    let built: Vec<&str> = summary.outcomes.iter().map(|o| o.recipe.as_str()).collect();
    assert_eq!(built, vec!["alpha", "zulu"]);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].recipe, PathBuf::from("recipes/broken.yaml"));
    assert_eq!(read(root, "dist/zulu.md"), "A\n\nA");
    assert!(!root.join("dist/broken.md").exists());
    assert!(!root.join("dist/notes.md").exists());
}

#[cfg(unix)]
#[test]
fn test_build_all_includes_symlinked_recipe() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "a.md", "Linked");
    write(root, "shared/linked.yaml", "modules: [a.md]\n");
    std::os::unix::fs::symlink(
        root.join("shared/linked.yaml"),
        root.join("recipes/linked.yaml"),
    )
    .unwrap();

    let summary = assembler.build_all().unwrap();

    assert_eq!(summary.outcomes.len(), 1);
    assert_eq!(summary.outcomes[0].recipe, "linked");
    assert_eq!(read(root, "dist/linked.md"), "Linked");
}

#[test]
fn test_unreadable_module_is_skipped() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "a.md", "A");
    fs::write(root.join("b.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    fs::create_dir_all(root.join("folder.md")).unwrap();
    write(root, "c.md", "C");
    write(
        root,
        "recipes/mixed.yaml",
        "modules: [a.md, b.md, folder.md, c.md]\n",
    );

    let outcome = assembler.build_recipe(Path::new("recipes/mixed.yaml")).unwrap();

    let statuses: Vec<ModuleStatus> = outcome.modules.iter().map(|m| m.status).collect();
    assert_eq!(
        statuses,
        vec![
            ModuleStatus::Included,
            ModuleStatus::Unreadable,
            ModuleStatus::Unreadable,
            ModuleStatus::Included,
        ]
    );
    assert!(outcome.written);
    assert_eq!(read(root, "dist/mixed.md"), "A\n\nC");
}

#[test]
fn test_crlf_modules_produce_lf_artifact() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "a.md", "# Title\r\n\r\nLine one\r\nLine two\r\n");
    write(root, "b.md", "Tail\r\n");
    write(root, "recipes/crlf.yaml", "modules:\r\n  - a.md\r\n  - b.md\r\n");

    assembler.build_recipe(Path::new("recipes/crlf.yaml")).unwrap();

    assert_eq!(
        read(root, "dist/crlf.md"),
        "# Title\n\nLine one\nLine two\n\nTail"
    );
}

#[test]
fn test_build_all_without_recipes() {
    let (_temp_dir, assembler) = workspace();

    let summary = assembler.build_all().unwrap();

    assert!(summary.is_empty());
}

#[test]
fn test_dry_run_writes_nothing() {
    let (temp_dir, assembler) = workspace();
    let root = temp_dir.path();
    write(root, "a.md", "A");
    write(root, "recipes/plan.yaml", "modules: [a.md, gone.md]\n");

    let outcome = assembler.plan_recipe(Path::new("recipes/plan.yaml")).unwrap();

    assert!(!outcome.written);
    assert_eq!(outcome.bytes, 1);
    assert_eq!(outcome.missing().count(), 1);
    assert!(!root.join("dist").exists());
}

#[test]
fn test_locate_recipe_appends_extension() {
    let (temp_dir, assembler) = workspace();
    write(temp_dir.path(), "recipes/backend.yaml", "modules: []\n");

    assert_eq!(
        assembler.locate_recipe("backend").unwrap(),
        PathBuf::from("recipes/backend.yaml")
    );
    assert_eq!(
        assembler.locate_recipe("backend.yaml").unwrap(),
        PathBuf::from("recipes/backend.yaml")
    );

    let err = assembler.locate_recipe("frontend").unwrap_err();
    assert!(matches!(err, PromptError::NotFoundError { kind: "Recipe", .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_missing_recipe_directory_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config = ProjectConfig::default().with_root(temp_dir.path());
    let assembler = Assembler::new(LocalStorage::new(temp_dir.path()), config);

    let err = assembler.check_recipe_dir().unwrap_err();
    assert!(matches!(err, PromptError::MissingDirectoryError { kind: "Recipes", .. }));
    assert!(err.is_fatal());
}
