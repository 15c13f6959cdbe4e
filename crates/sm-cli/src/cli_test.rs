use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_apply_target_conflicts_with_all() {
    let result = Cli::try_parse_from(["sm", "apply", "--target", "catalog", "--all"]);
    assert!(result.is_err());
}

#[test]
fn test_apply_parses_up_to() {
    let cli = Cli::try_parse_from([
        "sm", "apply", "--target", "catalog", "--up-to", "20250908190749",
    ])
    .unwrap();
    match cli.command {
        Commands::Apply(args) => {
            assert_eq!(args.target.as_deref(), Some("catalog"));
            assert_eq!(args.up_to.as_deref(), Some("20250908190749"));
        }
        _ => panic!("expected apply"),
    }
}

#[test]
fn test_apply_up_to_conflicts_with_all() {
    // Ordering keys are per-registry; a catalog key would be unknown to
    // every tenant registry, so the combination is rejected up front.
    let result = Cli::try_parse_from(["sm", "apply", "--all", "--up-to", "20250908190749"]);
    assert!(result.is_err());
}

#[test]
fn test_revert_requires_target() {
    assert!(Cli::try_parse_from(["sm", "revert"]).is_err());
    let cli = Cli::try_parse_from(["sm", "revert", "--target", "acme", "--force"]).unwrap();
    match cli.command {
        Commands::Revert(args) => {
            assert_eq!(args.target, "acme");
            assert!(args.force);
            assert!(args.down_to.is_none());
        }
        _ => panic!("expected revert"),
    }
}

#[test]
fn test_global_config_default() {
    let cli = Cli::try_parse_from(["sm", "status"]).unwrap();
    assert_eq!(cli.global.config, "stratum.yml");
    assert!(!cli.global.verbose);
}

#[test]
fn test_status_output_format() {
    let cli = Cli::try_parse_from(["sm", "status", "--output", "json"]).unwrap();
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, OutputFormat::Json),
        _ => panic!("expected status"),
    }
}
