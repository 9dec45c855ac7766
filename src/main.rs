use anyhow::Result;
use clap::Parser;

use release_gate::config::{self, CiContext};
use release_gate::gate::ReleaseGate;
use release_gate::git::Git2Repository;
use release_gate::{report, ui};

#[derive(clap::Parser)]
#[command(
    name = "release-gate",
    about = "Validate a version-bump pull request and publish its release tag"
)]
struct Args {
    #[arg(help = "Pull request number to gate")]
    pr_number: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Print the most recent tags and exit")]
    recent: bool,

    #[arg(short = 'n', long, help = "Number of tags shown with --recent")]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let kind = e.kind();
            let _ = e.print();
            if kind == clap::error::ErrorKind::DisplayHelp
                || kind == clap::error::ErrorKind::DisplayVersion
            {
                return Ok(());
            }
            // Wrong argument shape is a usage error: exit 1, not clap's 2.
            std::process::exit(1);
        }
    };

    if !args.recent && args.pr_number.is_none() {
        ui::display_error("usage: release-gate <pr-number>");
        std::process::exit(1);
    }

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("not in a git repository: {}", e));
            std::process::exit(1);
        }
    };

    if args.recent {
        let limit = args.limit.unwrap_or(config.report_limit);
        match report::recent_tags(&repo, limit) {
            Ok(tags) => {
                for tag in &tags {
                    println!("{}", report::format_tag_line(tag));
                }
            }
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let Some(pr_number) = args.pr_number else {
        ui::display_error("usage: release-gate <pr-number>");
        std::process::exit(1);
    };

    let ctx = match CiContext::from_env(pr_number) {
        Ok(ctx) => ctx,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let gate = ReleaseGate::new(config, ctx, &repo);
    match gate.run() {
        Ok(outcome) => {
            ui::display_success(&format!(
                "Created and pushed tag {} at {}",
                outcome.tag, outcome.target
            ));
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
