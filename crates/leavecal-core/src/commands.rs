use std::io::{self, Write};

use anyhow::{Context, anyhow};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, instrument};

use crate::calendar::build_grid;
use crate::cli::Invocation;
use crate::config::Config;
use crate::period::{month_title, parse_period};
use crate::render::Renderer;
use crate::source::LeaveSource;

pub fn known_command_names() -> Vec<&'static str> {
    vec!["calendar", "leaves", "_commands", "_show", "help", "version"]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(source, cfg, renderer, inv))]
pub fn dispatch(
    source: &LeaveSource,
    cfg: &Config,
    renderer: &Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let mut out = io::stdout().lock();
    dispatch_to(source, cfg, renderer, inv, today, &mut out)
}

/// Runs one command against a fixed `today`, writing its output to `out`.
#[instrument(skip(source, cfg, renderer, inv, out))]
pub fn dispatch_to<W: Write>(
    source: &LeaveSource,
    cfg: &Config,
    renderer: &Renderer,
    inv: Invocation,
    today: NaiveDate,
    out: &mut W,
) -> anyhow::Result<()> {
    let command = inv.command.as_str();

    debug!(command, args = ?inv.command_args, "dispatching command");

    match command {
        "calendar" => cmd_calendar(source, renderer, &inv.command_args, today, out),
        "leaves" => cmd_leaves(source, renderer, &inv.command_args, today, out),
        "_commands" => cmd_commands(out),
        "_show" => cmd_show(cfg, out),
        "help" => cmd_help(out),
        "version" => {
            writeln!(out, "{}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(source, renderer, args, today, out))]
fn cmd_calendar<W: Write>(
    source: &LeaveSource,
    renderer: &Renderer,
    args: &[String],
    today: NaiveDate,
    out: &mut W,
) -> anyhow::Result<()> {
    info!("command calendar");

    let query = parse_period(&args.join(" "), today)?;
    let leaves = source
        .records_for(&query)
        .with_context(|| format!("failed to load leaves for {}", month_title(&query)))?;
    let grid = build_grid(&query, &leaves)?;

    debug!(
        year = query.year,
        month = query.month,
        leaves = leaves.len(),
        rows = grid.rows().len(),
        "rendering calendar"
    );
    renderer.write_calendar(out, &query, &grid)
}

#[instrument(skip(source, renderer, args, today, out))]
fn cmd_leaves<W: Write>(
    source: &LeaveSource,
    renderer: &Renderer,
    args: &[String],
    today: NaiveDate,
    out: &mut W,
) -> anyhow::Result<()> {
    info!("command leaves");

    let leaves = if args.is_empty() {
        source.load_all()?
    } else {
        let query = parse_period(&args.join(" "), today)?;
        source.records_for(&query)?
    };

    renderer.write_leave_table(out, &leaves)
}

fn cmd_commands<W: Write>(out: &mut W) -> anyhow::Result<()> {
    for name in known_command_names() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

fn cmd_show<W: Write>(cfg: &Config, out: &mut W) -> anyhow::Result<()> {
    for (key, value) in cfg.iter() {
        writeln!(out, "{key}={value}")?;
    }
    for file in &cfg.loaded_files {
        writeln!(out, "# loaded {}", file.display())?;
    }
    Ok(())
}

fn cmd_help<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(
        out,
        "\
leavecal [options] [command] [args]

commands:
  calendar [period]   month grid with leave markers (default)
  leaves [period]     leave details; every record when no period is given
  _show               effective configuration
  _commands           list commands
  help                this text
  version             print version

periods:
  this | next | prev | YYYY-MM | YYYY/MM | <month name> [year]

markers:
  AN  afternoon leave   FN  forenoon leave   DAY  full day
  calendar.marker.other (default LV) for any other session"
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::{dispatch_to, expand_command_abbrev, known_command_names};
    use crate::cli::Invocation;
    use crate::config::Config;
    use crate::render::Renderer;
    use crate::source::LeaveSource;

    const LEAVES: &str = r#"[
        {"_id": "1", "date": 10, "month": 3, "year": 2024, "session": "AN", "reason": "bank", "reasonType": "Personal"},
        {"_id": "2", "date": 11, "month": 4, "year": 2024, "session": "Day", "reason": "trip", "reasonType": "Casual"},
        {"_id": "3", "date": 29, "month": 3, "year": 2024, "session": null, "reason": "", "reasonType": "Other"}
    ]"#;

    fn run_command(command: &str, args: &[&str]) -> anyhow::Result<String> {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("leaves.json");
        fs::write(&path, LEAVES).expect("write leaves");
        let source = LeaveSource::open(&path);

        let mut cfg = Config::default();
        cfg.apply_overrides(vec![("color".to_string(), "off".to_string())]);
        let renderer = Renderer::new(&cfg).expect("renderer");

        let inv = Invocation {
            command: command.to_string(),
            command_args: args.iter().map(|arg| arg.to_string()).collect(),
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date");

        let mut buf = Vec::new();
        dispatch_to(&source, &cfg, &renderer, inv, today, &mut buf)?;
        Ok(String::from_utf8(buf).expect("utf8"))
    }

    #[test]
    fn abbreviations_must_be_unique() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("cal", &known), Some("calendar"));
        assert_eq!(expand_command_abbrev("l", &known), Some("leaves"));
        assert_eq!(expand_command_abbrev("_", &known), None);
        assert_eq!(expand_command_abbrev("_s", &known), Some("_show"));
        assert_eq!(expand_command_abbrev("2024-02", &known), None);
    }

    #[test]
    fn calendar_for_explicit_month() {
        let text = run_command("calendar", &["2024-03"]).expect("calendar");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "March 2024");
        assert_eq!(lines[1], "Sun Mon Tue Wed Thu Fri Sat");
        assert_eq!(lines[4], " AN  11  12  13  14  15  16");
        assert_eq!(lines[6], " 24  25  26  27  28  LV  30");
        assert_eq!(lines[7], " 31");
    }

    #[test]
    fn calendar_defaults_to_current_month() {
        let text = run_command("calendar", &[]).expect("calendar");
        assert_eq!(text.lines().next(), Some("March 2024"));
    }

    #[test]
    fn calendar_next_month_shows_only_its_leaves() {
        let text = run_command("calendar", &["next"]).expect("calendar");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "April 2024");
        assert_eq!(lines[3], "  7   8   9  10 DAY  12  13");
    }

    #[test]
    fn calendar_rejects_unknown_period() {
        let err = run_command("calendar", &["someday"]).expect_err("should fail");
        assert!(format!("{err:#}").contains("someday"));
    }

    #[test]
    fn leaves_for_month_lists_scoped_records() {
        let text = run_command("leaves", &["2024-03"]).expect("leaves");
        assert!(text.contains("bank"));
        assert!(!text.contains("trip"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn leaves_without_period_lists_everything() {
        let text = run_command("leaves", &[]).expect("leaves");
        assert!(text.contains("bank"));
        assert!(text.contains("trip"));
    }

    #[test]
    fn leaves_for_month_without_leave() {
        let text = run_command("leaves", &["may", "2024"]).expect("leaves");
        assert_eq!(text, "No Leave\n");
    }

    #[test]
    fn commands_lists_known_names() {
        let text = run_command("_commands", &[]).expect("commands");
        assert_eq!(text.lines().collect::<Vec<_>>(), known_command_names());
    }
}
