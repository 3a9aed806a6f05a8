use arbor::{
    ArborConfig, EditAction, EditRequest, MindMap, MindMapOptions, OrganizeMode, OutlineParser,
    organize,
};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Arbor(arbor::Error),
    Headless(arbor::HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Arbor(err) => write!(f, "{err}"),
            CliError::Headless(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<arbor::Error> for CliError {
    fn from(value: arbor::Error) -> Self {
        Self::Arbor(value)
    }
}

impl From<arbor::HeadlessError> for CliError {
    fn from(value: arbor::HeadlessError) -> Self {
        Self::Headless(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    Organize,
    Edit,
    Layout,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    mode: Option<OrganizeMode>,
    action: Option<EditAction>,
    line: Option<usize>,
    value: Option<String>,
    collapse: Vec<String>,
    config: Option<String>,
    background: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "arbor-cli\n\
\n\
USAGE:\n\
  arbor-cli [parse] [--pretty] [--config <file.json>] [<path>|-]\n\
  arbor-cli organize --mode smart|az|za [--out <path>] [<path>|-]\n\
  arbor-cli edit --action rename|add-child|delete --line <n> [--value <text>] [--out <path>] [<path>|-]\n\
  arbor-cli layout [--pretty] [--collapse <id>]... [--config <file.json>] [<path>|-]\n\
  arbor-cli render [--background <css-color>] [--collapse <id>]... [--config <file.json>] [--out <path>] [<path>|-]\n\
\n\
GLOBAL:\n\
  --verbose   log at debug level (otherwise ARBOR_LOG, default warn)\n\
  --help      show this message\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - parse prints the outline tree as JSON; layout prints the positioned frame.\n\
  - render prints a standalone SVG to stdout by default; use --out to write a file.\n\
  - --config is a JSON object merged onto the built-in defaults.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "organize" => args.command = Command::Organize,
            "edit" => args.command = Command::Edit,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--mode" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.mode = Some(mode.parse::<OrganizeMode>()?);
            }
            "--action" => {
                let Some(action) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.action = Some(action.parse::<EditAction>()?);
            }
            "--line" => {
                let Some(line) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.line = Some(line.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--value" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.value = Some(value.clone());
            }
            "--collapse" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.collapse.push(id.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("ARBOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(path: Option<&str>) -> Result<ArborConfig, CliError> {
    match path {
        None => Ok(ArborConfig::default()),
        Some(path) => Ok(ArborConfig::from_json_str(&std::fs::read_to_string(path)?)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            println!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn build_map(text: String, args: &Args) -> Result<MindMap, CliError> {
    let config = load_config(args.config.as_deref())?;
    let mut map = MindMap::new(text, MindMapOptions::from_config(&config)?);
    for id in &args.collapse {
        if map.toggle_collapse(id).is_none() {
            tracing::warn!(node = %id, "--collapse ignored: no such node with children");
        }
    }
    Ok(map)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Parse => {
            let config = load_config(args.config.as_deref())?;
            let outline = OutlineParser::from_config(&config)?.parse(&text);
            write_json(&outline, args.pretty)
        }
        Command::Organize => {
            let Some(mode) = args.mode else {
                return Err(CliError::Usage(usage()));
            };
            write_text(&organize(&text, mode), args.out.as_deref())
        }
        Command::Edit => {
            let (Some(action), Some(line)) = (args.action, args.line) else {
                return Err(CliError::Usage(usage()));
            };
            let request = EditRequest {
                action,
                line_index: line,
                value: args.value.clone(),
            };
            let edited = arbor::apply_edit(&text, &request)?;
            write_text(&edited, args.out.as_deref())
        }
        Command::Layout => {
            let map = build_map(text, &args)?;
            write_json(map.frame(), args.pretty)
        }
        Command::Render => {
            let map = build_map(text, &args)?;
            let background = args.background.as_deref().unwrap_or("#ffffff");
            match map.export_svg(background) {
                Some(svg) => write_text(&svg, args.out.as_deref()),
                // Already reported by the exporter.
                None => Ok(()),
            }
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
