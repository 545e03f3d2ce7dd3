use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

const FULL_FLOW: &str = r#"# build a complete listing
new
set title Casa Azul
set description "A restored Portuguese house with a shaded verandah, a large garden and a well."
set property_type homestay
next
set state Goa
set city Assagao
set postal_code 403507
set contact_phone "+91 98220 00000"
next
set rooms_count 3
set capacity_per_room 2
set bedrooms 3
set bathrooms 2
next
toggle amenities wifi
next
set cancellation_policy moderate
toggle payment_methods upi
next
set pricing.daily_rate 2500
next
toggle activities.nearby kayaking
next
set arrival_instructions "Call from the chapel."
next
preview
submit
list
exit
"#;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("listing_core_cli").unwrap();
    cmd.env("LISTING_CORE_CLI_SCRIPT", "1")
        .env("LISTING_CORE_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_builds_and_stores_a_listing() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin(FULL_FLOW)
        .assert()
        .success()
        .stdout(contains("Step 9 / 9 (Review)"))
        .stdout(contains("**Arrival Instructions:**"))
        .stdout(contains("created."))
        .stdout(contains("Casa Azul  Assagao"));

    let listings: Vec<_> = std::fs::read_dir(home.path().join("listings"))
        .unwrap()
        .collect();
    assert_eq!(listings.len(), 1);
}

#[test]
fn incomplete_step_blocks_next() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("new\nset title Casa Azul\nnext\nstep\nexit\n")
        .assert()
        .success()
        .stdout(contains("Cannot continue. Step 1 (Basics)"))
        .stdout(contains("Step 1 / 9 (Basics)"));
}

#[test]
fn commands_without_a_draft_point_to_new() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("show\nsubmitt\nexit\n")
        .assert()
        .success()
        .stdout(contains("No listing draft is open."))
        .stdout(contains("Suggestion: `submit`?"));
}

#[test]
fn config_defaults_flow_into_new_drafts() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("config set currency usd\nnew\nget pricing.currency\nexit\n")
        .assert()
        .success()
        .stdout(contains("pricing.currency = USD"));

    let config = std::fs::read_to_string(home.path().join("config/config.json")).unwrap();
    assert!(config.contains("\"default_currency\": \"USD\""));
}
