//! Matrix Tables CLI - build an HTML table from the command line

#[cfg(feature = "cli")]
mod app {
    use std::fs;
    use std::io;

    use clap::{ArgAction, Parser};
    use log::LevelFilter;
    use matrix_tables::{Mapping, RenderOptions, Scope, Section, Table, TableError, TableResult};
    use simplelog::{Config, WriteLogger};

    #[derive(Parser)]
    #[command(name = "mtab")]
    #[command(version)]
    #[command(about = "Matrix Tables - declarative HTML table builder", long_about = None)]
    pub struct Cli {
        /// Number of columns
        #[arg(short, long, default_value_t = 1)]
        columns: usize,

        /// Number of body rows
        #[arg(short, long, default_value_t = 1)]
        rows: usize,

        /// Number of header rows. With 0 a collapsed table is rendered,
        /// otherwise a full table with a header and a body section
        #[arg(long, default_value_t = 0)]
        header_rows: usize,

        /// Body content, e.g. `*,first=Total`
        #[arg(short, long = "map", value_name = "SEL=TEXT")]
        maps: Vec<String>,

        /// Header content, e.g. `*,0=Name`
        #[arg(long = "header-map", value_name = "SEL=TEXT")]
        header_maps: Vec<String>,

        /// Body attribute appended (space separated) at a scope,
        /// e.g. `column:odd,*:class=shaded`. Scopes: cell, row, column,
        /// section, table
        #[arg(short, long = "attr", value_name = "SCOPE:SEL:NAME=VALUE")]
        attrs: Vec<String>,

        /// Expand a body cell, e.g. `0,0=2x1`
        #[arg(short, long = "expand", value_name = "COL,ROW=CxR")]
        expands: Vec<String>,

        /// Write everything on one line
        #[arg(long)]
        compact: bool,

        /// Markup for cells without content
        #[arg(long)]
        placeholder: Option<String>,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,

        /// Log to stderr; repeat for more detail
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,
    }

    pub fn run() -> TableResult<()> {
        let cli = Cli::parse();
        init_logging(cli.verbose);

        let mut options = if cli.compact {
            RenderOptions::compact()
        } else {
            RenderOptions::pretty()
        };
        if let Some(placeholder) = cli.placeholder.clone() {
            options = options.with_placeholder(placeholder);
        }

        let mut table = build_table(&cli)?;

        match cli.output {
            Some(ref path) => {
                let file = fs::File::create(path)?;
                table.write_to(file, &options)?;
                eprintln!("✓ Output written to: {}", path);
            }
            None => table.write_to(io::stdout().lock(), &options)?,
        }

        Ok(())
    }

    fn init_logging(verbose: u8) {
        let level = match verbose {
            0 => return,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        let _ = WriteLogger::init(level, Config::default(), io::stderr());
    }

    fn build_table(cli: &Cli) -> TableResult<Table> {
        if cli.header_rows == 0 {
            let mut table = Table::collapsed(cli.columns, cli.rows);
            if let Some(section) = table.section() {
                configure_body(section, cli)?;
            }
            return Ok(table);
        }

        let mut table = Table::full();
        let header = table.set_header(cli.columns, cli.header_rows);
        for arg in &cli.header_maps {
            let (selector, text) = parse_map(arg)?;
            header.map(selector, Mapping::text(text));
        }
        configure_body(table.set_body(cli.columns, cli.rows), cli)?;
        Ok(table)
    }

    fn configure_body(section: &mut Section, cli: &Cli) -> TableResult<()> {
        for arg in &cli.maps {
            let (selector, text) = parse_map(arg)?;
            section.map(selector, Mapping::text(text));
        }

        for arg in &cli.attrs {
            let (scope, selector, name, value) = parse_attr(arg)?;
            let value = value.to_string();
            section.map(
                selector,
                Mapping::new().attribute(scope, name, move |_, prev| match prev {
                    Some(prev) if !prev.is_empty() => format!("{} {}", prev, value),
                    _ => value.clone(),
                }),
            );
        }

        for arg in &cli.expands {
            let (column, row, columns, rows) = parse_expand(arg)?;
            section.cell(column, row).expand(columns, rows);
        }

        Ok(())
    }

    /// `SEL=TEXT`
    pub fn parse_map(arg: &str) -> TableResult<(&str, &str)> {
        arg.split_once('=')
            .ok_or_else(|| TableError::invalid_argument(arg, "expected SEL=TEXT"))
    }

    /// `SCOPE:SEL:NAME=VALUE`
    pub fn parse_attr(arg: &str) -> TableResult<(Scope, &str, &str, &str)> {
        let invalid = || TableError::invalid_argument(arg, "expected SCOPE:SEL:NAME=VALUE");

        let (scope, rest) = arg.split_once(':').ok_or_else(invalid)?;
        let (selector, assignment) = rest.split_once(':').ok_or_else(invalid)?;
        let (name, value) = assignment.split_once('=').ok_or_else(invalid)?;

        let scope = match scope.trim() {
            "cell" => Scope::Cell,
            "row" => Scope::Row,
            "column" => Scope::Column,
            "section" => Scope::Section,
            "table" => Scope::Table,
            other => {
                return Err(TableError::invalid_argument(
                    arg,
                    format!("unknown scope '{}'", other),
                ))
            }
        };

        if name.is_empty() {
            return Err(invalid());
        }

        Ok((scope, selector, name, value))
    }

    /// `COL,ROW=CxR`
    pub fn parse_expand(arg: &str) -> TableResult<(usize, usize, usize, usize)> {
        let invalid = || TableError::invalid_argument(arg, "expected COL,ROW=COLSxROWS");
        let number = |s: &str| s.trim().parse::<usize>().map_err(|_| invalid());

        let (position, size) = arg.split_once('=').ok_or_else(invalid)?;
        let (column, row) = position.split_once(',').ok_or_else(invalid)?;
        let (columns, rows) = size.split_once('x').ok_or_else(invalid)?;

        Ok((number(column)?, number(row)?, number(columns)?, number(rows)?))
    }

}

#[cfg(feature = "cli")]
fn main() {
    if let Err(err) = app::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install matrix-tables --features cli");
    eprintln!("  mtab --columns 3 --rows 2 --map '*,first=Total'");
}
