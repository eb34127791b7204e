use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "campaign-report")]
#[command(about = "Prints campaign dashboard views as JSON")]
pub struct Cli {
    /// Restrict every view to one constituency.
    #[arg(long, global = true)]
    pub constituency: Option<String>,
    /// Reference date for ages and the contact heatmap (defaults to today).
    #[arg(long, global = true)]
    pub on: Option<NaiveDate>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Demographics, contact activity, party scores and turnout in one document.
    Summary,
    /// Trailing 30-day contact calendar with streak and trend.
    Heatmap,
    /// Weighted support score per party.
    PartyScores,
    Turnout {
        #[arg(long, value_enum, default_value_t = TurnoutGrouping::Constituency)]
        by: TurnoutGrouping,
    },
    /// Decorated hex-map GeoJSON.
    Hexmap {
        #[arg(long, value_enum, default_value_t = MapKind::Support)]
        kind: MapKind,
        #[arg(long)]
        candidate: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TurnoutGrouping {
    Constituency,
    BallotBox,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MapKind {
    Support,
    Parties,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands_with_global_filters() {
        let cli = Cli::try_parse_from([
            "campaign-report",
            "turnout",
            "--by",
            "ballot-box",
            "--constituency",
            "South Reef",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Turnout {
                by: TurnoutGrouping::BallotBox
            }
        );
        assert_eq!(cli.constituency.as_deref(), Some("South Reef"));
    }

    #[test]
    fn hexmap_defaults_to_support() {
        let cli = Cli::try_parse_from(["campaign-report", "hexmap", "--candidate", "k-1"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Hexmap {
                kind: MapKind::Support,
                candidate: Some("k-1".into())
            }
        );
    }

    #[test]
    fn reference_date_must_be_iso() {
        let cli = Cli::try_parse_from(["campaign-report", "--on", "2024-06-30", "heatmap"]).unwrap();
        assert_eq!(cli.on, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert!(Cli::try_parse_from(["campaign-report", "--on", "30/06/2024", "heatmap"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["campaign-report"]).is_err());
        assert!(Cli::try_parse_from(["campaign-report", "party-scores"]).is_ok());
    }
}
