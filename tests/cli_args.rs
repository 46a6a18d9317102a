//! CLI argument parsing tests.

use clap::Parser;
use sambasafety::cli::{Cli, Command, Entity};

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["sambasafety", "get", "driver", "drv_123"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get { entity, id } => {
            assert!(matches!(entity, Entity::Driver));
            assert_eq!(id, "drv_123");
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from(["sambasafety", "list", "fleets"]);

    assert!(!cli.json);
    match cli.command {
        Command::List {
            entity,
            page,
            per_page,
            status,
        } => {
            assert!(matches!(entity, Entity::Fleet));
            assert!(page.is_none());
            assert!(per_page.is_none());
            assert!(status.is_none());
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_list_options() {
    let cli = Cli::parse_from([
        "sambasafety",
        "list",
        "mvrs",
        "--page",
        "2",
        "--per-page",
        "50",
        "--status",
        "pending",
    ]);

    match cli.command {
        Command::List {
            entity,
            page,
            per_page,
            status,
        } => {
            assert!(matches!(entity, Entity::Mvr));
            assert_eq!(page, Some(2));
            assert_eq!(per_page, Some(50));
            assert_eq!(status.as_deref(), Some("pending"));
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_validate_license() {
    let cli = Cli::parse_from(["sambasafety", "validate-license", "D1234567", "CA"]);

    match cli.command {
        Command::ValidateLicense { number, state } => {
            assert_eq!(number, "D1234567");
            assert_eq!(state, "CA");
        }
        _ => panic!("Expected ValidateLicense command"),
    }
}

#[test]
fn test_cli_json_flag_is_global() {
    let before = Cli::parse_from(["sambasafety", "--json", "get", "mvr", "m1"]);
    assert!(before.json);

    let after = Cli::parse_from(["sambasafety", "get", "mvr", "m1", "--json"]);
    assert!(after.json);
}

#[test]
fn test_cli_entity_aliases() {
    for (arg, expected) in [
        ("driver", Entity::Driver),
        ("drivers", Entity::Driver),
        ("fleet", Entity::Fleet),
        ("mvr", Entity::Mvr),
        ("mvrs", Entity::Mvr),
    ] {
        let cli = Cli::parse_from(["sambasafety", "get", arg, "x"]);
        match cli.command {
            Command::Get { entity, .. } => assert_eq!(entity, expected),
            _ => panic!("Expected Get command"),
        }
    }
}

#[test]
fn test_cli_rejects_unknown_entity() {
    assert!(Cli::try_parse_from(["sambasafety", "get", "vehicle", "v1"]).is_err());
}

#[test]
fn test_cli_get_requires_id() {
    assert!(Cli::try_parse_from(["sambasafety", "get", "driver"]).is_err());
}
