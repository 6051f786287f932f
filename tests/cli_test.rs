use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::process::Command; // Run programs
use std::path::Path;

const WORLDSPAWN_ONLY: &str = r#"{ "classname" "worldspawn" }
"#;

fn write_map(dir: &Path, name: &str, text: &str) -> Result<String, Box<dyn std::error::Error>> {
    let path = dir.join(name);
    std::fs::write(&path,text)?;
    Ok(path.to_str().ok_or("bad path")?.to_string())
}

#[test]
fn merges_two_maps() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let first = write_map(dir.path(),"first.map",r#"
{
"classname" "worldspawn"
"message" "first"
{
( 0 0 0 ) ( 0 64 0 ) ( 64 0 0 ) common/caulk 0 0 0 0.5 0.5 0 0 0
}
}
{ "classname" "info_player_deathmatch" "origin" "0 0 24" }
"#)?;
    let second = write_map(dir.path(),"second.map",r#"
{
"classname" "worldspawn"
"message" "second"
{
( 0 0 8 ) ( 64 0 8 ) ( 0 64 8 ) common/caulk 0 0 0 0.5 0.5 0 0 0
}
}
{ "classname" "info_player_deathmatch" "origin" "8 8 24" }
{ "classname" "light" "origin" "16 16 16" }
"#)?;
    let out = dir.path().join("out.map");
    let out = out.to_str().ok_or("bad path")?;

    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.arg("-o").arg(out)
        .arg(&first).arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "{}: 2 entities (0 discarded), 1 brush (0 discarded), 0 patches (0 discarded)",first)))
        .stdout(predicate::str::contains(format!(
            "{}: 2 entities (1 discarded), 1 brush (0 discarded), 0 patches (0 discarded)",second)))
        .stdout(predicate::str::contains(format!(
            "{}: 3 entities (1 discarded), 2 brushes (0 discarded), 0 patches (0 discarded)",out)));

    let merged = std::fs::read_to_string(out)?;
    assert_eq!(merged.matches("// brush").count(),2);
    assert!(merged.contains("\"message\" \"first\""));
    assert!(!merged.contains("second"));
    assert!(merged.contains("( 0.000000 0.000000 8.000000 )"));
    assert!(merged.contains("\"classname\" \"light\""));
    // the spawn point of the second map was dropped
    assert_eq!(merged.matches("info_player_deathmatch").count(),1);
    Ok(())
}

#[test]
fn quiet_suppresses_statistics() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_map(dir.path(),"in.map",WORLDSPAWN_ONLY)?;
    let out = dir.path().join("out.map");

    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.arg("-q")
        .arg("-o").arg(out.to_str().ok_or("bad path")?)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn discards_never_reach_the_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_map(dir.path(),"in.map",r#"
{
"classname" "worldspawn"
{
( 0 0 0 ) ( 0 64 0 ) ( 64 0 0 ) common/caulk 0 0 0 0.5 0.5 0 0 0
}
{
( 0 0 8 ) ( 64 0 8 ) ( 0 64 8 ) common/discard 0 0 0 0.5 0.5 0 0 0
}
{
patchDef2
{
common/discard
( 2 2 0 0 0 )
(
( ( 0 0 0 0 0 ) ( 8 0 0 1 0 ) )
( ( 0 8 0 0 1 ) ( 8 8 0 1 1 ) )
)
}
}
}
"#)?;
    let out = dir.path().join("out.map");
    let out = out.to_str().ok_or("bad path")?;

    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.arg("-o").arg(out)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "{}: 1 entity (0 discarded), 1 brush (1 discarded), 0 patches (1 discarded)",out)));

    let merged = std::fs::read_to_string(out)?;
    assert!(!merged.contains("common/discard"));
    assert!(!merged.contains("patchDef2"));
    Ok(())
}

#[test]
fn prefix_rewrites_targets() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_map(dir.path(),"in.map",r#"
{
"classname" "worldspawn"
"mapcat_prefix" "lvl2_"
}
{ "classname" "func_door" "targetname" "door1" }
{ "classname" "trigger_multiple" "target" "door1" }
"#)?;
    let out = dir.path().join("out.map");
    let out = out.to_str().ok_or("bad path")?;

    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.arg("-o").arg(out)
        .arg(&input)
        .assert()
        .success();

    let merged = std::fs::read_to_string(out)?;
    assert_eq!(merged.matches("\"lvl2_door1\"").count(),2);
    assert!(!merged.contains("mapcat_prefix"));
    Ok(())
}

#[test]
fn version_flag() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("mapcat"));
    Ok(())
}

#[test]
fn missing_arguments_fail() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn repeated_output_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_map(dir.path(),"in.map",WORLDSPAWN_ONLY)?;

    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.arg("-o").arg("a.map")
        .arg("-o").arg("b.map")
        .arg(&input)
        .assert()
        .failure()
        .code(1);
    Ok(())
}

#[test]
fn missing_worldspawn_fails_without_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_map(dir.path(),"in.map",r#"{ "classname" "light" }
"#)?;
    let out = dir.path().join("out.map");

    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.arg("-o").arg(out.to_str().ok_or("bad path")?)
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("worldspawn is missing"));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn parse_errors_point_at_the_token() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_map(dir.path(),"in.map","garbage\n")?;
    let out = dir.path().join("out.map");

    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.arg("-o").arg(out.to_str().ok_or("bad path")?)
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(format!(
            "{}:1:1: expected the beginning of an entity \"{{\" or EOF, got \"garbage\"",input)));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn double_dash_allows_dashed_names() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    write_map(dir.path(),"-dashed.map",WORLDSPAWN_ONLY)?;

    let mut cmd = Command::cargo_bin("mapcat")?;
    cmd.current_dir(dir.path())
        .arg("-o").arg("out.map")
        .arg("--").arg("-dashed.map")
        .assert()
        .success();
    assert!(dir.path().join("out.map").exists());
    Ok(())
}
