use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_component-relations")));
    cmd.env_remove("RUST_LOG")
        .env_remove("COMPONENT_RELATIONS_CONFIG");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// `src/components/{Btn,BtnWidget}` with stories, used from `src/App.vue`.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/components/Btn/Btn.vue", "<template><div/></template>\n");
    write(root, "src/components/Btn/Btn.stories.ts", "export default {}\n");
    write(root, "src/components/BtnWidget/BtnWidget.vue", "<template><div/></template>\n");
    write(root, "src/components/BtnWidget/BtnWidget.stories.ts", "export default {}\n");
    write(root, "src/components/Card/Card.vue", "<template><div/></template>\n");
    write(
        root,
        "src/App.vue",
        "<template>\n  <Btn label=\"ok\" />\n  <btn-widget />\n  <!-- <Card/> -->\n</template>\n",
    );
    dir
}

#[test]
fn run_annotates_stories_and_writes_map() {
    let dir = project();

    cmd()
        .args(["-C", dir.path().to_str().unwrap()])
        .args(["run", "--base-dir", "src", "--hide-commented"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Component relations updated"));

    let story = std::fs::read_to_string(dir.path().join("src/components/Btn/Btn.stories.ts"))
        .unwrap();
    assert!(story.starts_with("export default {}\n"));
    assert!(story.contains("// <component-relations>"));
    assert!(story.contains("- ./App.vue"));

    let json = std::fs::read_to_string(dir.path().join("component-usage.json")).unwrap();
    let map: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        map,
        serde_json::json!({ "Btn": ["./App.vue"], "BtnWidget": ["./App.vue"] })
    );
}

#[test]
fn second_run_leaves_stories_identical() {
    let dir = project();
    let story = dir.path().join("src/components/BtnWidget/BtnWidget.stories.ts");

    for _ in 0..2 {
        cmd()
            .args(["-C", dir.path().to_str().unwrap()])
            .args(["run", "--base-dir", "src", "--no-output"])
            .assert()
            .success();
    }
    let first = std::fs::read(&story).unwrap();

    cmd()
        .args(["-C", dir.path().to_str().unwrap()])
        .args(["run", "--base-dir", "src", "--no-output"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unchanged:  2"));

    assert_eq!(std::fs::read(&story).unwrap(), first);
    assert!(!dir.path().join("component-usage.json").exists());
}

#[test]
fn index_prints_json_without_writing() {
    let dir = project();

    cmd()
        .args(["-C", dir.path().to_str().unwrap()])
        .args(["index", "--base-dir", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Btn\": ["))
        .stdout(predicate::str::contains("\"Card\": ["))
        .stdout(predicate::str::contains("./App.vue"));

    let story = std::fs::read_to_string(dir.path().join("src/components/Btn/Btn.stories.ts"))
        .unwrap();
    assert_eq!(story, "export default {}\n");
    assert!(!dir.path().join("component-usage.json").exists());
}

#[test]
fn config_file_is_honoured() {
    let dir = project();
    write(
        dir.path(),
        "component-relations.toml",
        "baseDir = \"src\"\nshowHiddenComponents = false\n\n[output]\npath = \"reports\"\nfileName = \"usage.json\"\n",
    );

    cmd()
        .args(["-C", dir.path().to_str().unwrap()])
        .assert()
        .success();

    let json = std::fs::read_to_string(dir.path().join("reports/usage.json")).unwrap();
    assert!(!json.contains("Card"));
    assert!(json.contains("\"./App.vue\""));
}

#[test]
fn config_init_then_show() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-C", dir.path().to_str().unwrap()])
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("component-relations.toml"));

    cmd()
        .args(["-C", dir.path().to_str().unwrap()])
        .args(["config", "show", "--search-path", "app/src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("searchPath = \"app/src\""))
        .stdout(predicate::str::contains("componentsPaths"));

    cmd()
        .args(["-C", dir.path().to_str().unwrap()])
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn invalid_story_pattern_fails() {
    let dir = project();

    cmd()
        .args(["-C", dir.path().to_str().unwrap()])
        .args(["run", "--story-pattern", "(", "--no-output"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern"));
}
