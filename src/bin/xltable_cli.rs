//! CLI tool for xltable - loads a spreadsheet, applies table operations and
//! prints the resulting view
//!
//! Usage:
//!   xltable_cli trades.xlsx                               # CSV of the first sheet
//!   xltable_cli trades.xlsx --search aapl --sort Qty:desc # filtered and sorted
//!   xltable_cli trades.csv --filter Sym=AAPL,MSFT --json  # render snapshot JSON
//!   xltable_cli book.xlsx --sheet Positions -o out.csv    # write to a file

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use xltable::engine::{SortDirection, SortKey, SummaryMode, TableStateEngine};
use xltable::{TableConfig, TableView};

#[derive(Parser)]
#[command(name = "xltable_cli")]
#[command(about = "Search, filter, sort and export spreadsheet tables")]
#[command(version)]
struct Cli {
    /// Spreadsheet to load (.xlsx, .xls or .csv)
    input: PathBuf,

    /// Sheet name or 0-based index (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Case-insensitive substring search across all cells
    #[arg(long)]
    search: Option<String>,

    /// Keep rows whose column value is listed: COL=v1,v2 (repeatable)
    #[arg(long, value_name = "COL=VALUES")]
    filter: Vec<String>,

    /// Sort by a column: COL or COL:desc
    #[arg(long, value_name = "COL[:DIR]")]
    sort: Option<String>,

    /// Sort rows by background colour (asc or desc)
    #[arg(long, value_name = "DIR")]
    color_sort: Option<SortDirection>,

    /// Hide a column (repeatable)
    #[arg(long, value_name = "COL")]
    hide: Vec<String>,

    /// Number of leading visible columns to pin
    #[arg(long, default_value_t = 0)]
    pin: usize,

    /// Footer aggregate: sum, avg, count, min or max
    #[arg(long)]
    summary: Option<SummaryMode>,

    /// JSON file with a (partial) table configuration
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the render snapshot as JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// List sheet names and exit
    #[arg(long)]
    list_sheets: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {e}", path.display()))?;
            serde_json::from_str::<TableConfig>(&text)
                .map_err(|e| format!("parsing {}: {e}", path.display()))?
        }
        None => TableConfig::default(),
    };

    let mut view =
        load(&cli.input, config).map_err(|e| format!("{}: {e}", cli.input.display()))?;

    if cli.list_sheets {
        let names = view.sheet_names().join("\n");
        return write_output(cli.output.as_ref(), &names);
    }

    if let Some(sheet) = &cli.sheet {
        let names = view.sheet_names();
        let index = names
            .iter()
            .position(|n| n == sheet)
            .or_else(|| sheet.parse().ok().filter(|i: &usize| *i < names.len()))
            .ok_or_else(|| format!("no sheet named {sheet:?}; sheets are {names:?}"))?;
        view.set_active_sheet(index);
    }

    let engine = view
        .engine_mut()
        .ok_or_else(|| "no sheet loaded".to_string())?;
    apply_flags(engine, cli)?;

    let out = if cli.json {
        serde_json::to_string_pretty(&engine.snapshot()).map_err(|e| e.to_string())?
    } else {
        engine.export_csv()
    };
    write_output(cli.output.as_ref(), &out)
}

fn load(path: &Path, config: TableConfig) -> xltable::Result<TableView> {
    let data = fs::read(path)?;
    let mut view = TableView::with_config(config);
    view.load(&path.to_string_lossy(), &data)?;
    Ok(view)
}

fn apply_flags(engine: &mut TableStateEngine, cli: &Cli) -> Result<(), String> {
    for spec in &cli.filter {
        let (col, values) = spec
            .split_once('=')
            .ok_or_else(|| format!("filter {spec:?} is not COL=VALUES"))?;
        let col = resolve_column(engine, col)?;
        let values: Vec<String> = values.split(',').map(str::to_string).collect();
        engine.apply_filter(col, Some(values));
    }

    if let Some(text) = &cli.search {
        engine.set_search(text);
    }

    if let Some(spec) = &cli.sort {
        let (col, direction) = match spec.rsplit_once(':') {
            Some((col, dir)) => (col, dir.parse::<SortDirection>()?),
            None => (spec.as_str(), SortDirection::Asc),
        };
        let column = resolve_column(engine, col)?;
        engine.set_sort(Some(SortKey { column, direction }));
    }

    if cli.color_sort.is_some() {
        engine.set_color_sort(cli.color_sort);
    }

    for col in &cli.hide {
        let col = resolve_column(engine, col)?;
        if !engine.is_hidden(col) {
            engine.toggle_column(col);
        }
    }

    for _ in 0..cli.pin {
        engine.add_pin();
    }

    if let Some(mode) = cli.summary {
        engine.set_summary_mode(mode);
    }
    Ok(())
}

/// A column by exact header text, falling back to a 0-based index.
fn resolve_column(engine: &TableStateEngine, name: &str) -> Result<usize, String> {
    let dataset = engine.dataset();
    (0..dataset.column_count())
        .find(|&c| dataset.header(c).to_string() == name)
        .or_else(|| name.parse().ok().filter(|&c| c < dataset.column_count()))
        .ok_or_else(|| format!("unknown column {name:?}"))
}

fn write_output(path: Option<&PathBuf>, text: &str) -> Result<(), String> {
    match path {
        Some(path) => {
            fs::write(path, text).map_err(|e| format!("writing {}: {e}", path.display()))?;
            eprintln!("Written: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| writeln!(stdout))
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}
