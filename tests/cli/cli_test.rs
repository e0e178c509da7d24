//! CLI contract tests against the built binary.

use assert_cmd::Command;
use tempfile::TempDir;

fn workspace(config: &str) -> (TempDir, std::path::PathBuf) {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, config).expect("should write config");
    (tmp, path)
}

fn agencydesk(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("agencydesk").expect("binary should be built");
    cmd.env_remove("RUST_LOG")
        .env_remove("AGENCYDESK_FENCED_BLOCKS")
        .env_remove("AGENCYDESK_EMPTY_COPY_BLOCK")
        .arg("--config")
        .arg(config);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout should be utf-8")
}

#[test]
fn format_reads_stdin_as_text() {
    let (_tmp, config) = workspace("");
    let stdout = stdout_of(
        agencydesk(&config)
            .args(["format", "-"])
            .write_stdin("**Insight:** a\n**Data:** b\n**Action:** c\n"),
    );
    assert_eq!(stdout, "== Insight\n  a\n== Data\n  b\n== Action\n  c\n");
}

#[test]
fn format_reads_file_as_json() {
    let (tmp, config) = workspace("");
    let message = tmp.path().join("message.txt");
    std::fs::write(
        &message,
        "Vorschlag:\n<copy_block><item>Headline: Jetzt buchen</item></copy_block>",
    )
    .expect("should write message");
    let stdout = stdout_of(
        agencydesk(&config)
            .arg("format")
            .arg(&message)
            .args(["--output", "json", "--user"]),
    );
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("output should be json");
    assert_eq!(value["is_user"], true);
    assert_eq!(value["nodes"][0]["type"], "paragraph");
    assert_eq!(value["nodes"][1]["type"], "copy_tile");
    assert_eq!(value["nodes"][1]["label"], "Headline");
}

#[test]
fn format_html_escapes_input() {
    let (_tmp, config) = workspace("");
    let stdout = stdout_of(
        agencydesk(&config)
            .args(["format", "--output", "html"])
            .write_stdin("<b>hi</b>"),
    );
    assert_eq!(stdout, "<div class=\"message\"><p>&lt;b&gt;hi&lt;/b&gt;</p></div>\n");
}

#[test]
fn formatter_config_is_honoured() {
    let (_tmp, config) = workspace("[formatter]\nfenced_blocks = \"tiles\"\n");
    let stdout = stdout_of(
        agencydesk(&config)
            .args(["format"])
            .write_stdin("```\nJetzt buchen\n```"),
    );
    assert_eq!(stdout, "[copy] Jetzt buchen\n");
}

#[test]
fn missing_message_file_fails() {
    let (tmp, config) = workspace("");
    agencydesk(&config)
        .arg("format")
        .arg(tmp.path().join("absent.txt"))
        .assert()
        .failure();
}

#[test]
fn economics_json_uses_given_inputs() {
    let (_tmp, config) = workspace("");
    let stdout = stdout_of(agencydesk(&config).args([
        "economics",
        "--aov",
        "50",
        "--target-roas",
        "5",
        "--tax-rate",
        "0",
        "--return-rate",
        "0",
        "--cogs",
        "20",
        "--fulfillment-cost",
        "0",
        "--json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("output should be json");
    for (field, expected) in [("grossProfit", 40.0), ("adSpend", 10.0), ("breakEvenRoas", 1.25)] {
        let actual = value[field].as_f64().unwrap_or(f64::NAN);
        assert!((actual - expected).abs() < 1e-6, "{field}: {actual}");
    }
}

#[test]
fn economics_table_reports_missing_break_even() {
    let (_tmp, config) = workspace("");
    let stdout = stdout_of(agencydesk(&config).args(["economics", "--cogs", "100"]));
    assert!(stdout.contains("n/a (no gross profit)"));
}

#[test]
fn economics_rejects_invalid_percentages() {
    let (_tmp, config) = workspace("");
    agencydesk(&config)
        .args(["economics", "--tax-rate", "150"])
        .assert()
        .failure();
}

#[test]
fn roles_list_shows_overrides() {
    let (_tmp, config) = workspace(
        "[[roles]]\nname = \"assistant\"\nversion = 3\ninstructions = \"Kurz.\"\n",
    );
    let stdout = stdout_of(agencydesk(&config).args(["roles", "list"]));
    assert!(stdout.contains("ASSISTANT v3"));
    assert!(stdout.contains("CORE v1"));
}

#[test]
fn roles_show_prints_system_instruction() {
    let (_tmp, config) = workspace("");
    let stdout = stdout_of(agencydesk(&config).args(["roles", "show", "client-creator"]));
    assert!(stdout.contains("<copy_block>"));
}

#[test]
fn stale_role_override_fails() {
    let (_tmp, config) = workspace(
        "[[roles]]\nname = \"CORE\"\nversion = 0\ninstructions = \"alt\"\n",
    );
    agencydesk(&config).args(["roles", "list"]).assert().failure();
}
