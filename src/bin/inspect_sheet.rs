use anyhow::{Context, Result};
use rollcall::{
    config::{Config, ResolverPolicy, SheetLayout, TieBreak},
    process::{columns, locate_header, resolve_date_columns, RawTable},
    SheetFetcher,
};
use std::{env, fs::File, path::Path, process::exit};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Expect a CSV file path or an export URL, plus an optional row count.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <CSV_FILE|URL> [ROWS]", args[0]);
        exit(1);
    }
    let max_rows = match args.get(2).map(|s| s.parse::<usize>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Error: bad row count: {}", e);
            exit(1);
        }
        None => 10,
    };
    if let Err(e) = inspect(&args[1], max_rows).await {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

async fn load(source: &str) -> Result<RawTable> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let config = Config {
            sheet_url: source.to_string(),
            ..Config::default()
        };
        let mut fetcher = SheetFetcher::new(&config)?;
        let snapshot = fetcher.fetch(true).await?;
        Ok((*snapshot.table).clone())
    } else {
        let file = File::open(Path::new(source)).with_context(|| format!("opening {}", source))?;
        RawTable::from_csv_reader(file).with_context(|| format!("parsing {}", source))
    }
}

/// Print the first rows and every step of the header/date detection.
async fn inspect(source: &str, max_rows: usize) -> Result<()> {
    let table = load(source).await?;
    let layout = SheetLayout::default();
    let policy = ResolverPolicy::default();

    println!("=== Sheet: {} ===", source);
    println!("Rows:                 {}", table.len());
    println!(
        "Widest row:           {} cells",
        table.rows().iter().map(Vec::len).max().unwrap_or(0)
    );
    println!();

    println!("=== First {} rows ===", max_rows.min(table.len()));
    for (idx, row) in table.rows().iter().take(max_rows).enumerate() {
        println!("{:>4} | {}", idx, row.join(" | "));
    }
    println!();

    let Some(header_index) = locate_header(&table, &layout) else {
        println!("Header:               not found (markers: {})", layout.name_markers.join(", "));
        return Ok(());
    };
    println!("Header row:           {}", header_index);

    println!("=== Date candidates ===");
    let header_labels = table
        .row(header_index)
        .map(|row| columns::date_labels_in_row(row, policy.first_date_column))
        .unwrap_or_default();
    print_candidate("header row", header_index, &header_labels);
    if let Some(prior) = header_index.checked_sub(1) {
        let prior_labels = table
            .row(prior)
            .map(|row| columns::date_labels_in_row(row, policy.first_date_column))
            .unwrap_or_default();
        print_candidate("row above", prior, &prior_labels);
    }
    println!();

    for tie_break in [TieBreak::PreferHeaderRow, TieBreak::PreferPriorRow] {
        let chosen = resolve_date_columns(&table, header_index, ResolverPolicy { tie_break, ..policy });
        match chosen {
            Some(map) => println!(
                "{:<17} -> {:?} (row {}, {} dates)",
                format!("{:?}", tie_break),
                map.source(),
                map.row_index(),
                map.len()
            ),
            None => println!("{:<17} -> no date columns", format!("{:?}", tie_break)),
        }
    }

    Ok(())
}

fn print_candidate(label: &str, row: usize, labels: &indexmap::IndexMap<String, usize>) {
    println!("- {:<10} (row {:>3}): {} labels", label, row, labels.len());
    for (text, col) in labels {
        println!("    col {:>3}  {}", col, text);
    }
}
