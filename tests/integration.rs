use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn edugraph(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("edugraph").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_requires_init() {
    let temp_dir = TempDir::new().unwrap();

    edugraph(&temp_dir)
        .args(["domain", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not initialized"));
}

#[test]
fn test_init_twice_fails() {
    let temp_dir = TempDir::new().unwrap();

    edugraph(&temp_dir).arg("init").assert().success();
    edugraph(&temp_dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Already initialized"));
}

#[test]
fn test_domain_workflow() {
    let temp_dir = TempDir::new().unwrap();
    edugraph(&temp_dir).arg("init").assert().success();

    // Two domains, codes 1 and 2
    edugraph(&temp_dir)
        .args(["domain", "add", "Mathematics", "--desc", "Numbers and shapes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created domain 1: Mathematics"));
    edugraph(&temp_dir)
        .args(["domain", "add", "Physics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created domain 2: Physics"));

    // Duplicate domain name is rejected
    edugraph(&temp_dir)
        .args(["domain", "add", "Mathematics"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // First real skill gets code 1, after the placeholder
    edugraph(&temp_dir)
        .args(["skill", "add", "1", "Algebra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skill 1.1: Algebra"));

    // Skill numbering is per domain
    edugraph(&temp_dir)
        .args(["skill", "add", "2", "Optics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skill 2.1: Optics"));

    edugraph(&temp_dir)
        .args(["strategy", "add", "1", "1", "Factoring", "--problem", "Solve for x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created strategy 1.1.1: Factoring"));
    edugraph(&temp_dir)
        .args(["strategy", "add", "1", "1", "Graphing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created strategy 1.1.2: Graphing"));

    edugraph(&temp_dir)
        .args(["action", "add", "1", "1", "1", "Expand the product"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added action 1"));

    // Prerequisite on the action, then shown with the strategy
    edugraph(&temp_dir)
        .args(["action", "require", "1", "1", "1", "1", "1", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("now requires strategy 1.1.2"));

    edugraph(&temp_dir)
        .args(["strategy", "show", "1", "1", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expand the product"))
        .stdout(predicate::str::contains("requires 1.1.2 (Graphing)"));

    // Duplicate prerequisite is rejected
    edugraph(&temp_dir)
        .args(["action", "require", "1", "1", "1", "1", "1", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already requires"));

    edugraph(&temp_dir)
        .args(["action", "unrequire", "1", "1", "1", "1", "1", "2"])
        .assert()
        .success();

    // Placeholder skill is hidden from listings
    edugraph(&temp_dir)
        .args(["skill", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Algebra"))
        .stdout(predicate::str::contains("placeholder").not());
}

#[test]
fn test_graph_workflow() {
    let temp_dir = TempDir::new().unwrap();
    edugraph(&temp_dir).arg("init").assert().success();

    edugraph(&temp_dir)
        .args(["graph", "add", "pipeline", "--desc", "build steps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created graph 'pipeline'"));

    // Vertices get VIDs 1, 2, 3
    edugraph(&temp_dir)
        .args(["vertex", "add", "pipeline", "read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added vertex 1: read"));
    edugraph(&temp_dir)
        .args(["vertex", "add", "pipeline", "parse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added vertex 2: parse"));
    edugraph(&temp_dir)
        .args(["vertex", "add", "pipeline", "emit", "--from", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added vertex 3: emit"))
        .stdout(predicate::str::contains("with edge 2 -> 3"));

    edugraph(&temp_dir)
        .args(["edge", "add", "pipeline", "1", "2", "--desc", "tokens"])
        .assert()
        .success();

    // Every mutation rewrites the DOT render
    let dot_path = temp_dir.path().join(".edugraph/graphs/pipeline.dot");
    assert!(dot_path.exists());
    let dot = std::fs::read_to_string(&dot_path).unwrap();
    assert!(dot.contains("v1 -> v2"));
    assert!(dot.contains("v2 -> v3"));

    edugraph(&temp_dir)
        .args(["vertex", "show", "pipeline", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vertex 2: parse"))
        .stdout(predicate::str::contains("1 -> 2"))
        .stdout(predicate::str::contains("2 -> 3"));

    // Export carries the wire spellings
    edugraph(&temp_dir)
        .args(["graph", "export", "pipeline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"VID\": 1"))
        .stdout(predicate::str::contains("\"vertexes\""));

    edugraph(&temp_dir)
        .args(["graph", "export", "pipeline", "--file", "pipeline.json"])
        .assert()
        .success();

    // Re-import under the same name fails, under a new name works
    edugraph(&temp_dir)
        .args(["graph", "import", "--file", "pipeline.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let json = std::fs::read_to_string(temp_dir.path().join("pipeline.json")).unwrap();
    let renamed = json.replace("\"pipeline\"", "\"copy\"");
    std::fs::write(temp_dir.path().join("copy.json"), renamed).unwrap();

    edugraph(&temp_dir)
        .args(["graph", "import", "--file", "copy.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Imported graph 'copy' (3 vertices, 2 edges)",
        ));

    // Null point links the sole root (vertex 1)
    edugraph(&temp_dir)
        .args(["graph", "null-point", "pipeline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added null point 4: null-point"));

    edugraph(&temp_dir)
        .args(["vertex", "show", "pipeline", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 -> 1"));

    // Topsorted copy is renumbered 1..N and rendered
    edugraph(&temp_dir)
        .args(["graph", "topsort", "pipeline", "sorted"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created sorted graph 'sorted'"));

    edugraph(&temp_dir)
        .args(["graph", "show", "sorted"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1: null-point"));
    assert!(temp_dir.path().join(".edugraph/graphs/sorted.dot").exists());

    edugraph(&temp_dir)
        .args(["graph", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("pipeline"))
        .stdout(predicate::str::contains("sorted"));
}

#[test]
fn test_topsort_rejects_cycle() {
    let temp_dir = TempDir::new().unwrap();
    edugraph(&temp_dir).arg("init").assert().success();

    edugraph(&temp_dir)
        .args(["graph", "add", "loop"])
        .assert()
        .success();
    edugraph(&temp_dir)
        .args(["vertex", "add", "loop", "a"])
        .assert()
        .success();
    edugraph(&temp_dir)
        .args(["vertex", "add", "loop", "b"])
        .assert()
        .success();
    edugraph(&temp_dir)
        .args(["edge", "add", "loop", "1", "2"])
        .assert()
        .success();
    edugraph(&temp_dir)
        .args(["edge", "add", "loop", "2", "1"])
        .assert()
        .success();

    edugraph(&temp_dir)
        .args(["graph", "topsort", "loop", "sorted"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("contains a cycle"))
        .stderr(predicate::str::contains("1 -> 2 -> 1"));
}

#[test]
fn test_import_from_stdin() {
    let temp_dir = TempDir::new().unwrap();
    edugraph(&temp_dir).arg("init").assert().success();

    let doc = r#"{
        "name": "tiny",
        "vertexes": [
            {"VID": 1, "name": "only"}
        ],
        "edges": []
    }"#;

    edugraph(&temp_dir)
        .args(["graph", "import"])
        .write_stdin(doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported graph 'tiny'"));

    edugraph(&temp_dir)
        .args(["graph", "show", "tiny"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1: only"));
}
