//! Vetimport CLI - inspect and run Vetfield bulk imports
//!
//! # Main Commands
//!
//! ```bash
//! vetimport run vaccinations results.json --yes   # Full session with a replayed widget payload
//! vetimport errors result.json --table animals    # Export per-row errors as CSV
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! vetimport tables                      # Known tables and field counts
//! vetimport fields equine               # Canonical fields for a table
//! vetimport webhook clients --token t   # Resolved webhook URL and headers
//! vetimport normalize payload.json      # Widget payload to rows
//! vetimport preview payload.json        # Rows as a bounded text table
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use serde_json::Value;
use vetimport::normalize::normalize_detailed;
use vetimport::widget::scripted::ScriptedWidgetProvider;
use vetimport::{
    fields_for, render_with_fields, resolve_webhook, CompletionMode, ErrorReport, HttpImportClient, ImportConfig,
    ImportFailure, ImportResult, ImportState, RowRecord, SessionController, SessionDriver, SessionObserver,
    SessionSettings, SessionSnapshot, TableType, TokioTimer, WidgetEventKind, WidgetUser, ImportSession,
};

#[derive(Parser)]
#[command(name = "vetimport")]
#[command(about = "Inspect and run Vetfield bulk record imports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List importable tables
    Tables,

    /// Show the canonical fields of a table
    Fields {
        /// Table name (aliases like "farmers" or "horses" are accepted)
        table: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the webhook the import service calls for a table
    Webhook {
        table: String,

        /// Session token sent as the webhook bearer credential
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Extract rows from a saved widget payload
    Normalize {
        /// Widget results JSON
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a bounded preview of a widget payload
    Preview {
        /// Widget results JSON
        input: PathBuf,

        /// Order columns by this table's schema
        #[arg(short, long)]
        table: Option<String>,

        /// Maximum rows to show (default: IMPORT_PREVIEW_MAX_ROWS or 800)
        #[arg(long)]
        max_rows: Option<usize>,
    },

    /// Export per-row errors of an import result as CSV
    Errors {
        /// Import result JSON
        input: PathBuf,

        /// Table the result belongs to
        #[arg(short, long)]
        table: String,

        /// Directory to write the report into (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a full import session with a replayed widget payload
    Run {
        /// Table to import into
        table: String,

        /// Widget results JSON, replayed as onResults
        input: PathBuf,

        /// Widget onComplete event JSON, replayed after the results
        #[arg(short, long)]
        complete: Option<PathBuf>,

        /// Completion mode override (hybrid, webhook, direct)
        #[arg(short, long)]
        mode: Option<CompletionMode>,

        /// Session token for the import API and webhook
        #[arg(short, long)]
        token: Option<String>,

        /// Operator id passed to the widget
        #[arg(long, default_value = "cli")]
        user: String,

        /// Confirm the preview and submit rows
        #[arg(short, long)]
        yes: bool,

        /// Write the per-row error report into this directory
        #[arg(long)]
        errors_dir: Option<PathBuf>,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tables => cmd_tables(),
        Commands::Fields { table, json } => cmd_fields(&table, json),
        Commands::Webhook { table, token } => cmd_webhook(&table, token.as_deref()),
        Commands::Normalize { input, output } => cmd_normalize(&input, output.as_deref()),
        Commands::Preview {
            input,
            table,
            max_rows,
        } => cmd_preview(&input, table.as_deref(), max_rows),
        Commands::Errors { input, table, output } => cmd_errors(&input, &table, output.as_deref()),
        Commands::Run {
            table,
            input,
            complete,
            mode,
            token,
            user,
            yes,
            errors_dir,
        } => {
            cmd_run(RunArgs {
                table,
                input,
                complete,
                mode,
                token,
                user,
                yes,
                errors_dir,
            })
            .await
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))?)
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn cmd_tables() -> CliResult {
    for table in TableType::all() {
        println!("  {:<18} {:<20} {} fields", table.slug(), table.label(), fields_for(table).len());
    }
    Ok(())
}

fn cmd_fields(table: &str, json: bool) -> CliResult {
    let table = TableType::parse(table);
    let fields = fields_for(&table);

    if json {
        println!("{}", serde_json::to_string_pretty(fields)?);
        return Ok(());
    }

    if !table.is_known() {
        eprintln!("⚠️  Unknown table '{}', using default fields", table.slug());
    }
    println!("📋 {} ({} fields)\n", table.label(), fields.len());
    for field in fields {
        println!("  {:<20} {}", field.key, field.label);
    }
    Ok(())
}

fn cmd_webhook(table: &str, token: Option<&str>) -> CliResult {
    let config = ImportConfig::from_env()?;
    let table = TableType::parse(table);
    let target = resolve_webhook(&table, &config.webhook, token)?;

    println!("URL: {}", target.url);
    for (name, value) in &target.headers {
        println!("  {}: {}", name, value);
    }
    if !target.publicly_reachable {
        eprintln!("\n⚠️  The import service cannot reach this address. Set IMPORT_WEBHOOK_TUNNEL for local testing.");
    }
    Ok(())
}

fn cmd_normalize(input: &Path, output: Option<&Path>) -> CliResult {
    eprintln!("📄 Normalizing: {}", input.display());

    let payload = read_json(input)?;
    let normalized = normalize_detailed(&payload)?;
    eprintln!("   Shape: {}", normalized.shape.key().unwrap_or("bare array"));
    if normalized.skipped > 0 {
        eprintln!("   Skipped: {} non-row entries", normalized.skipped);
    }
    eprintln!("✅ {} rows", normalized.rows.len());

    write_output(&serde_json::to_string_pretty(&normalized.rows)?, output)
}

fn cmd_preview(input: &Path, table: Option<&str>, max_rows: Option<usize>) -> CliResult {
    let config = ImportConfig::from_env()?;
    let rows = normalize_detailed(&read_json(input)?)?.rows;
    let max_rows = max_rows.unwrap_or(config.preview_max_rows);

    let preview = match table.map(TableType::parse) {
        Some(table) => render_with_fields(&rows, fields_for(&table), max_rows),
        None => vetimport::render_preview(&rows, max_rows),
    };
    print!("{}", preview.to_text());
    Ok(())
}

fn cmd_errors(input: &Path, table: &str, output: Option<&Path>) -> CliResult {
    let result: ImportResult = serde_json::from_value(read_json(input)?)?;
    let table = TableType::parse(table);
    let report = ErrorReport::build_today(&table, result.row_errors())?;

    match output {
        Some(dir) => {
            let path = report.write_to(dir)?;
            eprintln!("💾 {} row errors written to: {}", report.error_count, path.display());
        }
        None => print!("{}", report.contents),
    }
    Ok(())
}

// =============================================================================
// run
// =============================================================================

struct RunArgs {
    table: String,
    input: PathBuf,
    complete: Option<PathBuf>,
    mode: Option<CompletionMode>,
    token: Option<String>,
    user: String,
    yes: bool,
    errors_dir: Option<PathBuf>,
}

/// Prints progress and plays the operator for a headless session.
struct CliOperator {
    controller: Rc<RefCell<Option<SessionController>>>,
    table: TableType,
    preview_max_rows: usize,
    confirm: bool,
    await_webhook: bool,
    last_state: Option<ImportState>,
}

impl CliOperator {
    fn release(&self) {
        self.controller.borrow_mut().take();
    }
}

impl SessionObserver for CliOperator {
    fn state_changed(&mut self, snapshot: &SessionSnapshot) {
        if self.last_state != Some(snapshot.state) {
            eprintln!("   → {}", snapshot.state);
            self.last_state = Some(snapshot.state);
        }
    }

    fn rows_ready(&mut self, rows: &[RowRecord]) {
        let preview = render_with_fields(rows, fields_for(&self.table), self.preview_max_rows);
        eprint!("\n{}\n", preview.to_text());

        if self.confirm {
            if let Some(controller) = self.controller.borrow().as_ref() {
                controller.confirm();
            }
        } else if !self.await_webhook {
            eprintln!("ℹ️  Preview only. Pass --yes to submit these rows.");
            self.release();
        }
    }

    fn finished(&mut self, result: &ImportResult) {
        eprintln!("✅ {}", result.summary());
        self.release();
    }

    fn failed(&mut self, failure: &ImportFailure) {
        eprintln!("❌ {}", failure);
        self.release();
    }
}

async fn cmd_run(args: RunArgs) -> CliResult {
    let mut config = ImportConfig::from_env()?;
    if let Some(mode) = args.mode {
        config.completion_mode = mode;
    }
    let table = TableType::parse(&args.table);

    let mut script = vec![WidgetEventKind::Results(read_json(&args.input)?)];
    if let Some(ref path) = args.complete {
        script.push(WidgetEventKind::Complete(read_json(path)?));
    }

    eprintln!("📄 Importing {} from {}", table.label(), args.input.display());
    eprintln!("   Mode: {}", config.completion_mode);

    let settings = SessionSettings::from_config(&config, table.clone(), args.token.as_deref());
    let submitter = HttpImportClient::new(&config.api_base_url).with_credential(args.token.clone());
    let slot = Rc::new(RefCell::new(None));
    let operator = CliOperator {
        controller: Rc::clone(&slot),
        table: table.clone(),
        preview_max_rows: config.preview_max_rows,
        confirm: args.yes && config.completion_mode.accepts_confirm(),
        await_webhook: args.complete.is_some() && config.completion_mode.accepts_webhook(),
        last_state: None,
    };

    let (driver, controller) = SessionDriver::new(
        ImportSession::new(settings),
        ScriptedWidgetProvider::new(script),
        submitter,
        TokioTimer,
        operator,
    );
    controller.launch(WidgetUser::new(args.user));
    *slot.borrow_mut() = Some(controller);

    let session = driver.run().await;

    if !session.errors().is_empty() {
        let report = ErrorReport::build_today(&table, session.errors())?;
        match args.errors_dir {
            Some(ref dir) => {
                let path = report.write_to(dir)?;
                eprintln!("💾 {} row errors written to: {}", report.error_count, path.display());
            }
            None => eprintln!("⚠️  {} rows had errors; pass --errors-dir to export them", report.error_count),
        }
    }

    match session.failure() {
        Some(failure) => Err(failure.to_string().into()),
        None => Ok(()),
    }
}
