use clap::{Args, Parser, Subcommand};
use proof_desk::core::session::{NoticeLevel, DEFAULT_FONT_SIZE};
use proof_desk::domain::catalog::{find_font, CATALOG};
use proof_desk::domain::model::{Font, FrameStyle, MonogramMode, SelectedFont};
use proof_desk::domain::ports::ObjectStore;
use proof_desk::utils::error::ErrorSeverity;
use proof_desk::utils::logger;
use proof_desk::{HttpObjectStore, ProofSession, Submitter};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "proof-submit")]
#[command(about = "Compose font previews and submit them to the proof-desk proxy")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog fonts and their styles
    Catalog {
        #[arg(long)]
        json: bool,
    },
    /// Render a preview without uploading it
    Compose {
        #[command(flatten)]
        form: FormArgs,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Render a preview and upload it for an order
    Submit {
        #[command(flatten)]
        form: FormArgs,
        #[command(flatten)]
        order: OrderArgs,
        #[command(flatten)]
        proxy: ProxyArgs,
    },
    /// List stored submissions
    List {
        #[command(flatten)]
        proxy: ProxyArgs,
    },
    /// Download a stored submission
    Fetch {
        key: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        proxy: ProxyArgs,
    },
}

#[derive(Args)]
struct ProxyArgs {
    #[arg(long, env = "PROOF_DESK_URL", default_value = "http://127.0.0.1:8787")]
    proxy: String,
}

#[derive(Args)]
struct FormArgs {
    /// Font as NAME or NAME:STYLE, repeat up to three times
    #[arg(short, long = "font")]
    fonts: Vec<String>,

    #[arg(short, long, default_value = "")]
    text: String,

    #[arg(long, default_value = "")]
    notes: String,

    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f32,

    /// Three initials, e.g. JDS
    #[arg(long)]
    monogram: Option<String>,

    /// Monogram font as NAME or NAME:STYLE; circular monogram when omitted
    #[arg(long)]
    monogram_font: Option<String>,

    #[arg(long)]
    monogram_size: Option<f32>,

    #[arg(long, value_enum)]
    frame: Option<FrameStyle>,

    /// Render all three initials at the same size
    #[arg(long)]
    uniform: bool,
}

#[derive(Args)]
struct OrderArgs {
    #[arg(long)]
    order: String,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    company: String,
}

fn split_font_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once(':') {
        Some((name, style)) => (name.trim(), Some(style.trim())),
        None => (spec.trim(), None),
    }
}

fn lookup_font(session: &mut ProofSession, name: &str) -> Option<&'static Font> {
    let font = find_font(name);
    if font.is_none() {
        session
            .notices
            .post(NoticeLevel::Warning, format!("Unknown font '{}'", name));
    }
    font
}

fn build_session(form: &FormArgs) -> ProofSession {
    let mut session = ProofSession::new();
    session.text = form.text.clone();
    session.notes = form.notes.clone();
    session.font_size = form.font_size;

    for spec in &form.fonts {
        let (name, style) = split_font_spec(spec);
        let Some(font) = lookup_font(&mut session, name) else {
            continue;
        };
        session.select_font(font, style);
    }

    if let Some(initials) = &form.monogram {
        if let Some(spec) = &form.monogram_font {
            let (name, style) = split_font_spec(spec);
            if let Some(font) = lookup_font(&mut session, name) {
                let style = style
                    .and_then(|label| font.style(label))
                    .unwrap_or_else(|| font.default_style());
                session.draft.mode = MonogramMode::Font(SelectedFont { font, style });
            }
        }
        if let Some(size) = form.monogram_size {
            session.draft.size = size;
        }
        session.draft.frame = form.frame;
        session.draft.uniform_scale = form.uniform;

        let mut chars = initials.chars().filter(|c| !c.is_whitespace());
        for slot in 0..3 {
            let input = chars.next().map(String::from).unwrap_or_default();
            session.set_initial(slot, &input);
        }
        session.insert_monogram();
    }

    session
}

fn print_notices(session: &mut ProofSession) {
    for notice in session.notices.drain() {
        let marker = match notice.level {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Warning => "⚠️",
            NoticeLevel::Error => "❌",
        };
        eprintln!("{} {}", marker, notice.message);
    }
}

fn write_output(out: Option<&PathBuf>, bytes: &[u8]) -> proof_desk::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, bytes)?;
            tracing::info!("📁 Written to {}", path.display());
        }
        None => std::io::stdout().write_all(bytes)?,
    }
    Ok(())
}

async fn run(command: Command) -> proof_desk::Result<()> {
    match command {
        Command::Catalog { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(CATALOG)?);
            } else {
                for font in CATALOG {
                    let styles: Vec<&str> = font.styles.iter().map(|s| s.label).collect();
                    println!(
                        "{:<22} {:<9} {}",
                        font.name,
                        format!("{:?}", font.category),
                        styles.join(", ")
                    );
                }
            }
        }
        Command::Compose { form, out } => {
            let mut session = build_session(&form);
            print_notices(&mut session);
            let document = session.compose()?;
            write_output(out.as_ref(), document.as_str().as_bytes())?;
        }
        Command::Submit { form, order, proxy } => {
            let mut session = build_session(&form);
            session.order.order_number = order.order;
            session.order.customer_name = order.name;
            session.order.company = order.company;
            print_notices(&mut session);

            let submitter = Submitter::new(HttpObjectStore::new(&proxy.proxy)?);
            let stored = submitter.submit_with_notice(&mut session).await;
            print_notices(&mut session);
            match stored {
                Some(key) => println!("{}", key),
                None => std::process::exit(2),
            }
        }
        Command::List { proxy } => {
            let store = HttpObjectStore::new(&proxy.proxy)?;
            for key in store.list().await? {
                println!("{}", key);
            }
        }
        Command::Fetch { key, out, proxy } => {
            let store = HttpObjectStore::new(&proxy.proxy)?;
            let object = store.get(&key).await?;
            tracing::info!(
                "Fetched '{}' ({}, {} bytes)",
                object.key,
                object.content_type_or_default(),
                object.bytes.len()
            );
            write_output(out.as_ref(), &object.bytes)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli.command).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}
