//! Revision heat-map CLI
//!
//! Terminal front end for the attribution engine.
//!
//! # Usage
//!
//! ```bash
//! # Heat map of two snapshots (inserted text on red, carried-over text on green)
//! cargo run -p revision-cli -- diff before.txt after.txt
//!
//! # Spans as JSON (optionally in UTF-16 offsets for JavaScript clients) or an HTML fragment
//! cargo run -p revision-cli -- diff before.txt after.txt --json --utf16
//! cargo run -p revision-cli -- diff before.txt after.txt --html
//!
//! # Offline writing session (one response per line)
//! cargo run -p revision-cli -- compose --config compose.json
//! ```
//!
//! # Session commands
//!
//! - `:nudge <text>`: ask a Socratic question about a passage
//! - `:status`: show the preview status
//! - `:quit`: leave the session
//!
//! `-v` raises the log level to info, `-vv` to debug. Logs go to stderr.

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
};
use revision_core::{
    AttributionSummary, DiffOptions, DiffSpan, OffsetUnit, Origin, build_diff_spans_with,
    convert_spans,
};
use revision_core_compose::{
    CannedGenerator, ComposeConfig, ComposeService, MemoryRevisionStore, NudgeRequest,
    SaveRevisionRequest,
};
use revision_core_render::{
    HEAT_STYLE_AI, HeatMapStyles, HeatSegment, HtmlOptions, render_html, segments,
};
use std::{
    env, fs,
    io::{self, BufRead, IsTerminal, Write},
    path::{Path, PathBuf},
    process,
};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    HeatMap,
    Json,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliCommand {
    Diff {
        previous: PathBuf,
        next: PathBuf,
        format: OutputFormat,
        offsets: OffsetUnit,
        edit_budget: Option<usize>,
        max_chars: usize,
        color: bool,
    },
    Compose {
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    command: CliCommand,
    verbosity: u8,
}

const USAGE: &str = "Usage:
  revision-heatmap diff <previous> <next> [--json | --html] [--utf16 | --utf8] [--budget N | --exact] [--max-chars N] [--no-color] [-v]
  revision-heatmap compose [--config <path>] [-v]";

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut verbosity = 0u8;
    let mut positional: Vec<&str> = Vec::new();
    let mut format = OutputFormat::HeatMap;
    let mut offsets = OffsetUnit::Char;
    let mut edit_budget = DiffOptions::default().edit_budget;
    let mut max_chars = ComposeConfig::default().max_document_chars;
    let mut color = true;
    let mut config = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            "--json" => format = OutputFormat::Json,
            "--html" => format = OutputFormat::Html,
            "--utf16" => offsets = OffsetUnit::Utf16,
            "--utf8" => offsets = OffsetUnit::Utf8,
            "--no-color" => color = false,
            "--budget" => {
                let value = iter.next().ok_or("--budget needs a value")?;
                let budget = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid --budget value: {value}"))?;
                edit_budget = Some(budget);
            }
            "--exact" => edit_budget = None,
            "--max-chars" => {
                let value = iter.next().ok_or("--max-chars needs a value")?;
                max_chars = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid --max-chars value: {value}"))?;
            }
            "--config" => {
                let value = iter.next().ok_or("--config needs a path")?;
                config = Some(PathBuf::from(value));
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option: {flag}")),
            value => positional.push(value),
        }
    }

    let command = match positional.as_slice() {
        ["diff", previous, next] => CliCommand::Diff {
            previous: PathBuf::from(previous),
            next: PathBuf::from(next),
            format,
            offsets,
            edit_budget,
            max_chars,
            color,
        },
        ["diff", ..] => return Err("diff needs exactly two files".to_string()),
        ["compose"] => CliCommand::Compose { config },
        [] => return Err("missing command".to_string()),
        [other, ..] => return Err(format!("unknown command: {other}")),
    };

    Ok(CliArgs { command, verbosity })
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(level)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE}");
            process::exit(2);
        }
    };
    init_logging(cli.verbosity);

    let result = match cli.command {
        CliCommand::Diff {
            previous,
            next,
            format,
            offsets,
            edit_budget,
            max_chars,
            color,
        } => {
            let options = DiffOptions {
                edit_budget,
                ..DiffOptions::default()
            };
            run_diff(&previous, &next, format, offsets, options, max_chars, color)
        }
        CliCommand::Compose { config } => run_compose(config),
    };

    if let Err(err) = result {
        tracing::error!("{}", err);
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run_diff(
    previous: &Path,
    next: &Path,
    format: OutputFormat,
    offsets: OffsetUnit,
    options: DiffOptions,
    max_chars: usize,
    color: bool,
) -> io::Result<()> {
    let previous_text = fs::read_to_string(previous)?;
    let next_text = fs::read_to_string(next)?;
    check_input_size(previous, &previous_text, max_chars)?;
    check_input_size(next, &next_text, max_chars)?;
    tracing::info!(
        "Diffing {} ({} bytes) -> {} ({} bytes)",
        previous.display(),
        previous_text.len(),
        next.display(),
        next_text.len()
    );

    let spans = build_diff_spans_with(&previous_text, &next_text, options);
    let mut out = io::stdout().lock();

    match format {
        OutputFormat::Json => {
            let spans = convert_spans(&next_text, &spans, offsets);
            let json = serde_json::to_string_pretty(&spans).map_err(io::Error::other)?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Html => {
            writeln!(out, "{}", render_html(&next_text, &spans, &HtmlOptions::default()))?;
        }
        OutputFormat::HeatMap => {
            let color = color && io::stdout().is_terminal();
            print_heat_map(&mut out, &next_text, &spans, color)?;
            print_summary(&mut out, &spans)?;
        }
    }
    out.flush()
}

fn check_input_size(path: &Path, text: &str, max_chars: usize) -> io::Result<()> {
    let len = text.chars().count();
    if len > max_chars {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} has {} characters; the limit is {} (see --max-chars)",
                path.display(),
                len,
                max_chars
            ),
        ));
    }
    Ok(())
}

fn print_heat_map(
    out: &mut impl Write,
    text: &str,
    spans: &[DiffSpan],
    color: bool,
) -> io::Result<()> {
    let segments = segments(text, spans, HeatMapStyles::default()).unwrap_or_else(|err| {
        tracing::warn!("Invalid spans, printing plain text: {}", err);
        vec![HeatSegment {
            text,
            origin: Origin::User,
            style_id: HeatMapStyles::default().user,
        }]
    });

    for segment in &segments {
        if color {
            let background = match segment.style_id {
                HEAT_STYLE_AI => Color::DarkRed,
                _ => Color::DarkGreen,
            };
            queue!(out, SetBackgroundColor(background), Print(segment.text), ResetColor)?;
        } else if segment.origin == Origin::Ai {
            write!(out, "[+{}]", segment.text)?;
        } else {
            write!(out, "{}", segment.text)?;
        }
    }
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

fn print_summary(out: &mut impl Write, spans: &[DiffSpan]) -> io::Result<()> {
    let summary = AttributionSummary::from_spans(spans);
    writeln!(
        out,
        "-- user {} chars, ai {} chars ({:.0}% ai)",
        summary.user_chars,
        summary.ai_chars,
        summary.ai_ratio() * 100.0
    )
}

const SESSION_DOC: &str = "session";

fn run_compose(config_path: Option<PathBuf>) -> io::Result<()> {
    let config = match config_path {
        Some(path) => ComposeConfig::load(&path).map_err(io::Error::other)?,
        None => ComposeConfig::default(),
    };
    let service = ComposeService::new(MemoryRevisionStore::new(), CannedGenerator::new(), config);
    let mut state = service.new_session();
    let color = io::stdout().is_terminal();

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "{}", state.current_question)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        if input == ":quit" || input == ":q" {
            break;
        }
        if input == ":status" {
            writeln!(out, "{}", state.preview_status(service.config()))?;
            continue;
        }
        if let Some(passage) = input.strip_prefix(":nudge") {
            let request = NudgeRequest {
                doc_id: SESSION_DOC.to_string(),
                section: state.current_section.clone(),
                user_text: passage.trim().to_string(),
            };
            match service.nudge(request) {
                Ok(response) => writeln!(out, "{}", response.nudge_text)?,
                Err(err) => writeln!(out, "Error: {err}")?,
            }
            continue;
        }

        let turn = match service.submit_turn(&state, input) {
            Ok(turn) => turn,
            Err(err) => {
                writeln!(out, "Error: {err}")?;
                continue;
            }
        };

        let draft = service
            .save_revision(SaveRevisionRequest {
                doc_id: SESSION_DOC.to_string(),
                content: turn.state.joined_responses(),
                source: Origin::User,
            })
            .map_err(io::Error::other)?;
        tracing::debug!("Draft saved as {}", draft.revision_id);

        writeln!(out, "\n{}\n", turn.question)?;
        match &turn.preview {
            Some(preview) => {
                let saved = service
                    .save_revision(SaveRevisionRequest {
                        doc_id: SESSION_DOC.to_string(),
                        content: preview.text.clone(),
                        source: Origin::Ai,
                    })
                    .map_err(io::Error::other)?;
                tracing::debug!("Preview saved as {}", saved.revision_id);
                writeln!(out, "Here is what you have so far:\n")?;
                print_heat_map(&mut out, &preview.text, &preview.spans, color)?;
                print_summary(&mut out, &preview.spans)?;
            }
            None => writeln!(out, "{}", turn.state.preview_status(service.config()))?,
        }
        out.flush()?;
        state = turn.state;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_diff() {
        let cli = parse_args(&args(&["diff", "a.txt", "b.txt", "--json", "--utf16", "-v"])).unwrap();
        assert_eq!(cli.verbosity, 1);
        assert_eq!(
            cli.command,
            CliCommand::Diff {
                previous: PathBuf::from("a.txt"),
                next: PathBuf::from("b.txt"),
                format: OutputFormat::Json,
                offsets: OffsetUnit::Utf16,
                edit_budget: Some(revision_core::DEFAULT_EDIT_BUDGET),
                max_chars: 200_000,
                color: true,
            }
        );
    }

    #[test]
    fn test_parse_budget_and_compose() {
        let cli = parse_args(&args(&["diff", "a", "b", "--budget", "64", "--no-color"])).unwrap();
        assert!(matches!(
            cli.command,
            CliCommand::Diff {
                edit_budget: Some(64),
                color: false,
                ..
            }
        ));

        let cli = parse_args(&args(&["diff", "a", "b", "--exact", "--max-chars", "10"])).unwrap();
        assert!(matches!(
            cli.command,
            CliCommand::Diff {
                edit_budget: None,
                max_chars: 10,
                ..
            }
        ));

        let cli = parse_args(&args(&["-vv", "compose", "--config", "c.json"])).unwrap();
        assert_eq!(cli.verbosity, 2);
        assert_eq!(
            cli.command,
            CliCommand::Compose {
                config: Some(PathBuf::from("c.json"))
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["diff", "only-one"])).is_err());
        assert!(parse_args(&args(&["diff", "a", "b", "--budget"])).is_err());
        assert!(parse_args(&args(&["diff", "a", "b", "--budget", "x"])).is_err());
        assert!(parse_args(&args(&["diff", "a", "b", "--max-chars", "-1"])).is_err());
        assert!(parse_args(&args(&["merge"])).is_err());
        assert!(parse_args(&args(&["compose", "--fast"])).is_err());
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let path = Path::new("draft.txt");
        assert!(check_input_size(path, "héllo", 5).is_ok());

        let err = check_input_size(path, "héllo!", 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(
            err.to_string(),
            "draft.txt has 6 characters; the limit is 5 (see --max-chars)"
        );
    }

    #[test]
    fn test_plain_heat_map_marks_inserts() {
        let spans = vec![
            DiffSpan::new(0, 2, Origin::User),
            DiffSpan::new(2, 3, Origin::Ai),
            DiffSpan::new(3, 4, Origin::User),
        ];
        let mut out = Vec::new();
        print_heat_map(&mut out, "abXc", &spans, false).unwrap();
        print_summary(&mut out, &spans).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ab[+X]c\n-- user 3 chars, ai 1 chars (25% ai)\n"
        );
    }
}
