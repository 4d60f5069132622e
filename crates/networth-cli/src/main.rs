// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod render;
mod snapshot;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use networth_app::{
    EntityKind, FinancialSummary, Grid, GridCommand, GridRow, GridState, SortDirection,
    asset_grid, build_form_structure, compute_view, liability_grid, resolve_fields,
};
use snapshot::Snapshot;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `networth --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    init_logging(&config)?;

    let command = options
        .command
        .clone()
        .ok_or_else(|| anyhow!("no command given; run with --help to see supported commands"))?;
    let snapshot = load_snapshot(&options, &config)?;
    let symbol = config.currency_symbol();

    let output = match command {
        Command::Assets => {
            let grid = asset_grid(symbol);
            grid_page(&snapshot.assets, &grid, &options.grid, &config)?
        }
        Command::Liabilities => {
            let grid = liability_grid(symbol);
            grid_page(&snapshot.liabilities, &grid, &options.grid, &config)?
        }
        Command::Fields { kind, category } => {
            let resolved = resolve_fields(kind, &category, &snapshot.templates).with_context(|| {
                format!("resolve {kind} fields for {category:?}; run `networth templates` to list custom ids")
            })?;
            render::form_structure(&build_form_structure(kind, resolved))
        }
        Command::Summary => {
            let summary = FinancialSummary::compute(&snapshot.assets, &snapshot.liabilities);
            render::summary_report(&summary, symbol)
        }
        Command::Templates => render::templates_table(&snapshot.templates),
        Command::Export => snapshot.to_json()? + "\n",
    };
    print!("{output}");
    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = match env::var("NETWORTH_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("NETWORTH_LOG={directives:?} is not a valid log filter"))?,
        _ => EnvFilter::try_new(config.log_level())
            .with_context(|| format!("log.level {:?} is not a valid filter", config.log_level()))?,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|error| anyhow!("initialize logging: {error}"))
}

fn load_snapshot(options: &CliOptions, config: &Config) -> Result<Snapshot> {
    if options.demo {
        debug!("using seeded demo snapshot");
        return Ok(Snapshot::demo());
    }
    let path = options
        .snapshot_path
        .clone()
        .or_else(|| config.snapshot_path())
        .ok_or_else(|| {
            anyhow!("no snapshot configured -- pass --snapshot <path>, set [data].snapshot_path, or use --demo")
        })?;
    Snapshot::load(&path)
}

/// Drives the grid through the same commands an interactive table issues,
/// then renders the resulting page.
fn grid_page<T: GridRow>(
    rows: &[T],
    grid: &Grid<T>,
    args: &GridArgs,
    config: &Config,
) -> Result<String> {
    let mut state = GridState::default();
    let page_size = args.page_size.unwrap_or(config.page_size().get());
    let mut commands = vec![GridCommand::SetPageSize(page_size)];
    if let Some(query) = &args.search {
        commands.push(GridCommand::SetSearch(query.clone()));
    }
    if let Some(category) = &args.category {
        commands.push(GridCommand::SetCategoryFilter(Some(category.clone())));
    }
    for (column, value) in &args.filters {
        if grid.column(column).is_none() {
            bail!(
                "unknown column {column:?} in --filter; expected one of {}",
                column_ids(grid)
            );
        }
        commands.push(GridCommand::SetColumnFilter {
            column: column.clone(),
            value: value.clone(),
        });
    }
    if let Some((column, direction)) = &args.sort {
        if grid.column(column).is_none() {
            bail!(
                "unknown column {column:?} in --sort; expected one of {}",
                column_ids(grid)
            );
        }
        commands.push(GridCommand::RequestSort(column.clone()));
        if *direction == SortDirection::Desc {
            commands.push(GridCommand::RequestSort(column.clone()));
        }
    }
    commands.push(GridCommand::SetPage(args.page));

    for command in commands {
        state.dispatch(grid, command);
        if let Some(status) = state.status_line.take() {
            bail!("{status}");
        }
    }

    let view = compute_view(rows, grid, &state.view);
    if !state
        .dispatch(grid, GridCommand::Reconcile { total: view.total() })
        .is_empty()
    {
        warn!(
            requested = args.page + 1,
            "page is past the end of the results; showing page 1"
        );
    }
    Ok(render::grid_table(grid, &view))
}

fn column_ids<T>(grid: &Grid<T>) -> String {
    grid.columns
        .iter()
        .map(|column| column.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Assets,
    Liabilities,
    Fields { kind: EntityKind, category: String },
    Summary,
    Templates,
    Export,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct GridArgs {
    search: Option<String>,
    category: Option<String>,
    filters: Vec<(String, String)>,
    sort: Option<(String, SortDirection)>,
    /// Zero-based; the flag is one-based.
    page: usize,
    page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    snapshot_path: Option<PathBuf>,
    demo: bool,
    command: Option<Command>,
    grid: GridArgs,
    print_config_path: bool,
    print_example: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        snapshot_path: None,
        demo: false,
        command: None,
        grid: GridArgs::default(),
        print_config_path: false,
        print_example: false,
        show_help: false,
    };
    let mut positional = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str, what: &str| -> Result<String> {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{flag} requires {what}"))
        };
        match arg.as_ref() {
            "--config" => {
                options.config_path = PathBuf::from(value_for("--config", "a file path")?);
            }
            "--snapshot" => {
                options.snapshot_path = Some(PathBuf::from(value_for("--snapshot", "a file path")?));
            }
            "--demo" => {
                options.demo = true;
            }
            "--search" => {
                options.grid.search = Some(value_for("--search", "a query")?);
            }
            "--category" => {
                options.grid.category = Some(value_for("--category", "a category code")?);
            }
            "--filter" => {
                let raw = value_for("--filter", "a column=value pair")?;
                let (column, value) = raw.split_once('=').ok_or_else(|| {
                    anyhow!("--filter expects column=value, got {raw:?}")
                })?;
                options
                    .grid
                    .filters
                    .push((column.trim().to_owned(), value.to_owned()));
            }
            "--sort" => {
                let raw = value_for("--sort", "a column[:asc|desc]")?;
                options.grid.sort = Some(parse_sort(&raw)?);
            }
            "--page" => {
                let raw = value_for("--page", "a page number")?;
                let page = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|page| *page >= 1)
                    .ok_or_else(|| anyhow!("--page expects a number starting at 1, got {raw:?}"))?;
                options.grid.page = page - 1;
            }
            "--page-size" => {
                let raw = value_for("--page-size", "a row count")?;
                let size = raw
                    .parse::<usize>()
                    .with_context(|| format!("--page-size expects a number, got {raw:?}"))?;
                options.grid.page_size = Some(size);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            flag if flag.starts_with('-') => {
                return Err(anyhow!(
                    "unknown argument {flag:?}; run with --help to see supported options"
                ));
            }
            word => positional.push(word.to_owned()),
        }
    }

    options.command = parse_command(&positional)?;
    Ok(options)
}

fn parse_command(words: &[String]) -> Result<Option<Command>> {
    let Some((name, rest)) = words.split_first() else {
        return Ok(None);
    };
    let command = match (name.as_str(), rest) {
        ("assets", []) => Command::Assets,
        ("liabilities", []) => Command::Liabilities,
        ("summary", []) => Command::Summary,
        ("templates", []) => Command::Templates,
        ("export", []) => Command::Export,
        ("fields", [kind, category]) => Command::Fields {
            kind: EntityKind::parse(kind)
                .ok_or_else(|| anyhow!("fields expects asset or liability, got {kind:?}"))?,
            category: category.clone(),
        },
        ("fields", _) => bail!("fields expects <asset|liability> <category|template-id>"),
        (
            "assets" | "liabilities" | "summary" | "templates" | "export",
            [extra, ..],
        ) => bail!("unexpected argument {extra:?} after {name}"),
        (unknown, _) => {
            bail!("unknown command {unknown:?}; run with --help to see supported commands")
        }
    };
    Ok(Some(command))
}

fn parse_sort(raw: &str) -> Result<(String, SortDirection)> {
    let (column, direction) = match raw.split_once(':') {
        Some((column, direction)) => (
            column,
            SortDirection::parse(direction)
                .ok_or_else(|| anyhow!("--sort direction must be asc or desc, got {direction:?}"))?,
        ),
        None => (raw, SortDirection::Asc),
    };
    if column.trim().is_empty() {
        bail!("--sort requires a column name");
    }
    Ok((column.trim().to_owned(), direction))
}

fn print_help() {
    println!("networth <command> [options]");
    println!();
    println!("Commands:");
    println!("  assets                   List assets");
    println!("  liabilities              List liabilities");
    println!("  fields <kind> <category> Show form fields for a category or template id");
    println!("  summary                  Show totals, debt ratio and distribution");
    println!("  templates                List custom category templates");
    println!("  export                   Print the loaded snapshot as JSON");
    println!();
    println!("Options:");
    println!("  --config <path>          Use a specific config path");
    println!("  --snapshot <path>        Read records from a JSON snapshot");
    println!("  --demo                   Use seeded demo data");
    println!("  --search <query>         Keep rows where any column contains the query");
    println!("  --category <code>        Keep rows in one category");
    println!("  --filter <col=value>     Column filter; repeatable");
    println!("  --sort <col[:asc|desc]>  Sort by a column");
    println!("  --page <n>               Page to show, starting at 1");
    println!("  --page-size <n>          Rows per page: 5, 10, 25, 50 or 100");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, Command, GridArgs, grid_page, parse_cli_args};
    use crate::config::Config;
    use crate::snapshot::Snapshot;
    use anyhow::Result;
    use networth_app::{EntityKind, SortDirection, asset_grid, liability_grid};
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/networth-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                snapshot_path: None,
                demo: false,
                command: None,
                grid: GridArgs::default(),
                print_config_path: false,
                print_example: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_grid_options() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--demo",
                "assets",
                "--search",
                "gold",
                "--filter",
                "owner=Priya",
                "--filter",
                "value=1200",
                "--sort",
                "value:desc",
                "--page",
                "2",
                "--page-size",
                "25",
            ],
            default_options_path(),
        )?;
        assert!(options.demo);
        assert_eq!(options.command, Some(Command::Assets));
        assert_eq!(options.grid.search.as_deref(), Some("gold"));
        assert_eq!(
            options.grid.filters,
            vec![
                ("owner".to_owned(), "Priya".to_owned()),
                ("value".to_owned(), "1200".to_owned()),
            ]
        );
        assert_eq!(
            options.grid.sort,
            Some(("value".to_owned(), SortDirection::Desc))
        );
        assert_eq!(options.grid.page, 1);
        assert_eq!(options.grid.page_size, Some(25));
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_fields_command() -> Result<()> {
        let options = parse_cli_args(vec!["fields", "liability", "mortgage"], default_options_path())?;
        assert_eq!(
            options.command,
            Some(Command::Fields {
                kind: EntityKind::Liability,
                category: "mortgage".to_owned(),
            })
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_and_snapshot_paths() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml", "--snapshot", "/data/snap.json", "summary"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.snapshot_path, Some(PathBuf::from("/data/snap.json")));
        assert_eq!(options.command, Some(Command::Summary));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--filter", "owner"], default_options_path())
            .expect_err("filter without = should fail");
        assert!(error.to_string().contains("column=value"));

        let error = parse_cli_args(vec!["--page", "0"], default_options_path())
            .expect_err("page 0 should fail");
        assert!(error.to_string().contains("starting at 1"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument_and_command() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));

        let error = parse_cli_args(vec!["networth"], default_options_path())
            .expect_err("unknown command should fail");
        assert!(error.to_string().contains("unknown command"));

        let error = parse_cli_args(vec!["fields", "asset"], default_options_path())
            .expect_err("incomplete fields command should fail");
        assert!(error.to_string().contains("<asset|liability>"));
    }

    #[test]
    fn parse_cli_args_rejects_bad_sort_direction() {
        let error = parse_cli_args(vec!["--sort", "value:up"], default_options_path())
            .expect_err("bad direction should fail");
        assert!(error.to_string().contains("asc or desc"));
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn grid_page_applies_search_and_page_size() -> Result<()> {
        let snapshot = Snapshot::demo();
        let grid = asset_grid("₹");
        let args = GridArgs {
            search: Some("gold".to_owned()),
            page_size: Some(5),
            ..GridArgs::default()
        };
        let table = grid_page(&snapshot.assets, &grid, &args, &Config::default())?;
        for line in table.lines().skip(2).take_while(|line| !line.is_empty()) {
            assert!(line.to_lowercase().contains("gold"), "{line}");
        }
        Ok(())
    }

    #[test]
    fn grid_page_rejects_unknown_columns_and_sizes() {
        let snapshot = Snapshot::demo();
        let grid = liability_grid("₹");

        let args = GridArgs {
            filters: vec![("colour".to_owned(), "red".to_owned())],
            ..GridArgs::default()
        };
        let error = grid_page(&snapshot.liabilities, &grid, &args, &Config::default())
            .expect_err("unknown column should fail");
        assert!(error.to_string().contains("expected one of name"));

        let args = GridArgs {
            page_size: Some(7),
            ..GridArgs::default()
        };
        let error = grid_page(&snapshot.liabilities, &grid, &args, &Config::default())
            .expect_err("page size 7 should fail");
        assert!(error.to_string().contains("page size 7 not allowed"));
    }

    #[test]
    fn grid_page_past_the_end_shows_first_page() -> Result<()> {
        let snapshot = Snapshot::demo();
        let grid = liability_grid("₹");
        let args = GridArgs {
            page: 40,
            ..GridArgs::default()
        };
        let table = grid_page(&snapshot.liabilities, &grid, &args, &Config::default())?;
        assert!(table.trim_end().ends_with("(page 1/1)"));
        Ok(())
    }
}
