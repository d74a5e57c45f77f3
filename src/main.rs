use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rollcall::{
    config::DEFAULT_SHEET_URL, Config, Report, ResolverPolicy, Roster, SheetFetcher, SheetLayout,
    TieBreak,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rollcall", about = "Attendance from the published cohort sheet")]
struct Cli {
    /// CSV export URL of the roster sheet
    #[arg(long, env = "ROLLCALL_SHEET_URL", default_value = DEFAULT_SHEET_URL, global = true)]
    url: String,

    /// Seconds a downloaded sheet is reused before fetching again
    #[arg(long, env = "ROLLCALL_CACHE_TTL_SECS", default_value_t = 60, global = true)]
    cache_ttl_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// Row that wins when the header row and the row above it carry equally many dates
    #[arg(long, value_enum, default_value_t = TieBreakArg::Header, global = true)]
    tie_break: TieBreakArg,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List date labels in sheet order
    Dates,
    /// Show who attended on one date (defaults to the first date)
    Show {
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Read date labels from stdin, one per line
    Interactive,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TieBreakArg {
    Header,
    Prior,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Clipboard,
    Json,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::Header => TieBreak::PreferHeaderRow,
            TieBreakArg::Prior => TieBreak::PreferPriorRow,
        }
    }
}

/// Everything one interaction needs; the fetcher carries the cache between interactions.
struct Session {
    fetcher: SheetFetcher,
    layout: SheetLayout,
    policy: ResolverPolicy,
}

impl Session {
    async fn dates(&mut self, force_refresh: bool) -> rollcall::Result<Vec<String>> {
        let snapshot = self.fetcher.fetch(force_refresh).await?;
        let roster = Roster::analyze(&snapshot.table, &self.layout, self.policy)?;
        Ok(roster.dates().map(str::to_string).collect())
    }

    async fn report(&mut self, date: Option<&str>) -> rollcall::Result<Report> {
        let snapshot = self.fetcher.fetch(false).await?;
        let roster = Roster::analyze(&snapshot.table, &self.layout, self.policy)?;
        let date = date
            .map(str::trim)
            .or_else(|| roster.default_date())
            .unwrap_or_default()
            .to_string();
        let result = roster.attendance(&date)?;
        info!(
            date = %date,
            attended = result.attended_count(),
            absent = result.absent_count(),
            "attendance split"
        );
        Ok(Report::new(date, result).with_fetched_at(snapshot.fetched_at_utc))
    }
}

fn print_report(report: &Report, format: Format) -> Result<()> {
    match format {
        Format::Text => println!("{report}"),
        Format::Clipboard => println!("{}", report.to_clipboard_text()),
        Format::Json => println!("{}", report.to_json().context("serializing report")?),
    }
    Ok(())
}

async fn interactive(session: &mut Session) -> Result<()> {
    match session.dates(false).await {
        Ok(dates) => println!("dates: {}", dates.join(", ")),
        Err(e) => eprintln!("{e}"),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            cmd @ ("dates" | "refresh") => match session.dates(cmd == "refresh").await {
                Ok(dates) => println!("dates: {}", dates.join(", ")),
                Err(e) => {
                    warn!(error = %e, "listing dates failed");
                    eprintln!("{e}");
                }
            },
            date => match session.report(Some(date)).await {
                Ok(report) => {
                    println!("{report}\n");
                    println!("{}\n", report.to_clipboard_text());
                }
                Err(e) => {
                    warn!(error = %e, "lookup failed");
                    eprintln!("{e}");
                }
            },
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rollcall=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configure ────────────────────────────────────────────────
    let cli = Cli::parse();
    let config = Config {
        sheet_url: cli.url,
        cache_ttl: Duration::from_secs(cli.cache_ttl_secs),
        request_timeout: Duration::from_secs(cli.timeout_secs),
    };
    let policy = ResolverPolicy {
        tie_break: cli.tie_break.into(),
        ..ResolverPolicy::default()
    };
    info!(url = %config.sheet_url, ttl = ?config.cache_ttl, "startup");

    let mut session = Session {
        fetcher: SheetFetcher::new(&config).context("building sheet fetcher")?,
        layout: SheetLayout::default(),
        policy,
    };

    // ─── 3) run ──────────────────────────────────────────────────────
    match cli.command.unwrap_or(Command::Show {
        date: None,
        format: Format::Text,
    }) {
        Command::Dates => {
            let dates = session.dates(false).await.context("loading date labels")?;
            for date in dates {
                println!("{date}");
            }
        }
        Command::Show { date, format } => {
            let report = session
                .report(date.as_deref())
                .await
                .context("loading attendance")?;
            print_report(&report, format)?;
        }
        Command::Interactive => interactive(&mut session).await?,
    }

    Ok(())
}
