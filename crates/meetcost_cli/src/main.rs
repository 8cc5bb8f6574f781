//! Interactive shell for the meetcost core.
//!
//! Stands in for a presentation layer: every session operation is
//! reachable from a typed command, and `--demo` runs a scripted meeting
//! for a quick smoke check. All state lives in the core session; this
//! binary only parses commands and prints read models.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use meetcost_core::{
    core_version, default_log_level, format_hms, init_logging, parse_count, parse_hms,
    parse_rating, parse_salary_k_eur, Confirmation, ConfirmOutcome, EndOutcome,
    MeetingHistoryEntry, MeetingSession, Participant, SessionConfig, SqliteHistoryRepository,
    StorageLocation, TickMode, TimerPhase, DEFAULT_RATING, K_EUR,
};

#[derive(Parser, Debug)]
#[command(name = "meetcost", version, about = "Track what a meeting costs while it runs")]
struct Args {
    /// Directory holding the database and logs
    #[arg(long, default_value = ".meetcost")]
    data_dir: PathBuf,

    /// Use volatile in-memory storage; nothing persists
    #[arg(long)]
    in_memory: bool,

    /// Run a scripted demonstration meeting and exit
    #[arg(long)]
    demo: bool,

    /// Log level: trace, debug, info, warn or error
    #[arg(long)]
    log_level: Option<String>,
}

type Session = MeetingSession<SqliteHistoryRepository>;

fn main() -> Result<()> {
    let args = Args::parse();

    if args.demo {
        let mut session = MeetingSession::open(&SessionConfig::in_memory())
            .map_err(|err| anyhow!("{err}"))?;
        return run_demo(&mut session);
    }

    let config = if args.in_memory {
        SessionConfig {
            storage: StorageLocation::InMemory,
            tick_mode: TickMode::Interval,
        }
    } else {
        let data_dir = std::path::absolute(&args.data_dir)
            .with_context(|| format!("cannot resolve data dir {}", args.data_dir.display()))?;
        let log_dir = data_dir.join("logs");
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).map_err(|err| anyhow!(err))?;
        SessionConfig::at_data_dir(data_dir)
    };

    let mut session = MeetingSession::open(&config).map_err(|err| anyhow!("{err}"))?;
    if session.history_recovered_from_corruption() {
        println!("warning: stored history was unreadable and has been reset");
    }

    println!("meetcost {} - type `help` for commands", core_version());
    repl(&mut session)
}

fn repl(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        // Fold in any seconds the background ticker accrued while the
        // prompt was waiting.
        session.poll_ticks();
        print!("meetcost> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        session.poll_ticks();
        match dispatch(session, line.trim()) {
            Ok(ReplFlow::Continue) => {}
            Ok(ReplFlow::Quit) => return Ok(()),
            Err(err) => println!("error: {err}"),
        }
    }
}

enum ReplFlow {
    Continue,
    Quit,
}

fn dispatch(session: &mut Session, line: &str) -> Result<ReplFlow> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(ReplFlow::Continue);
    };
    let rest: Vec<&str> = parts.collect();
    match command {
        "help" => print_help(),
        "add" => cmd_add(session, &rest)?,
        "bulk" => cmd_bulk(session, &rest)?,
        "remove" => cmd_remove(session, &rest)?,
        "clear" => cmd_clear(session)?,
        "list" | "participants" => print_participants(session),
        "start" => {
            session.start().map_err(to_anyhow)?;
            println!("meeting running");
        }
        "pause" => {
            session.pause();
            println!("paused at {}", format_hms(session.time_in_seconds()));
        }
        "end" => cmd_end(session)?,
        "resume" => {
            session.resume().map_err(to_anyhow)?;
            println!("meeting resumed at {}", format_hms(session.time_in_seconds()));
        }
        "save" => cmd_save(session)?,
        "discard" => {
            session.discard_meeting().map_err(to_anyhow)?;
            println!("meeting discarded");
        }
        "status" => print_status(session),
        "history" => print_history(session),
        "edit" => cmd_edit(session, &rest)?,
        "delete" => cmd_delete(session, &rest)?,
        "export" => cmd_export(session, &rest)?,
        "quit" | "exit" => return Ok(ReplFlow::Quit),
        other => println!("unknown command `{other}`; try `help`"),
    }
    Ok(ReplFlow::Continue)
}

fn print_help() {
    println!("participants:");
    println!("  add <name...> <salary-k-eur>   add one participant (salary in thousands)");
    println!("  bulk <count> <salary-k-eur>    add several with an average salary");
    println!("  remove <n>                     remove participant n from the list");
    println!("  clear                          remove everyone (asks first)");
    println!("  list                           show the current participants");
    println!("meeting:");
    println!("  start | pause | end | resume   drive the meeting timer");
    println!("  save | discard                 decide about an ended meeting");
    println!("  status                         elapsed time and accrued cost");
    println!("history:");
    println!("  history                        saved meetings, newest first");
    println!("  edit <n> | delete <n>          change or remove a saved meeting");
    println!("  export [path]                  write the history as CSV");
    println!("other: help, quit");
}

fn cmd_add(session: &mut Session, args: &[&str]) -> Result<()> {
    let [name_parts @ .., salary] = args else {
        return Err(anyhow!("usage: add <name...> <salary-k-eur>"));
    };
    if name_parts.is_empty() {
        return Err(anyhow!("usage: add <name...> <salary-k-eur>"));
    }
    let salary_k = parse_salary_k_eur(salary).map_err(to_anyhow)?;
    let name = name_parts.join(" ");
    session.add_participant(name, salary_k).map_err(to_anyhow)?;
    println!(
        "added; {} participant(s), {:.4} EUR/s",
        session.participants().len(),
        session.cost_per_second()
    );
    Ok(())
}

fn cmd_bulk(session: &mut Session, args: &[&str]) -> Result<()> {
    let [count, salary] = args else {
        return Err(anyhow!("usage: bulk <count> <salary-k-eur>"));
    };
    let count = parse_count(count).map_err(to_anyhow)?;
    let salary_k = parse_salary_k_eur(salary).map_err(to_anyhow)?;
    let added = session
        .bulk_add_participants(count, salary_k)
        .map_err(to_anyhow)?;
    println!(
        "added {}; {} participant(s), {:.4} EUR/s",
        added.len(),
        session.participants().len(),
        session.cost_per_second()
    );
    Ok(())
}

fn cmd_remove(session: &mut Session, args: &[&str]) -> Result<()> {
    let index = parse_index(args, session.participants().len(), "remove")?;
    let id = session.participants()[index].id;
    session.remove_participant(id);
    println!("removed; {} participant(s) left", session.participants().len());
    Ok(())
}

fn cmd_clear(session: &mut Session) -> Result<()> {
    let confirmation = confirm("remove all participants?")?;
    match session.clear_participants(confirmation) {
        ConfirmOutcome::Applied { removed } => println!("removed {removed} participant(s)"),
        ConfirmOutcome::Declined => println!("kept everyone"),
    }
    Ok(())
}

fn cmd_end(session: &mut Session) -> Result<()> {
    match session.end().map_err(to_anyhow)? {
        EndOutcome::AwaitingDisposition => {
            let Some(draft) = session.pending_draft() else {
                return Err(anyhow!("ended but no draft is pending"));
            };
            println!(
                "meeting ended after {} at {:.2} EUR; `save`, `discard` or `resume`",
                format_hms(draft.duration_in_seconds),
                draft.cost
            );
        }
        EndOutcome::DiscardedSilently => println!("nothing accrued; timer reset"),
    }
    Ok(())
}

fn cmd_save(session: &mut Session) -> Result<()> {
    let Some(draft) = session.pending_draft() else {
        return Err(anyhow!("no ended meeting is awaiting a decision"));
    };
    let suggested = draft.suggested_name();
    let name_input = prompt(&format!("name [{suggested}]: "))?;
    let name = if name_input.is_empty() {
        suggested
    } else {
        name_input
    };
    let rating_input = prompt(&format!("rating 1-5 [{DEFAULT_RATING}]: "))?;
    let rating = if rating_input.is_empty() {
        DEFAULT_RATING
    } else {
        parse_rating(&rating_input).map_err(to_anyhow)?
    };
    let notes = prompt("notes []: ")?;
    let saved = session
        .save_meeting(name, rating, notes)
        .map_err(to_anyhow)?;
    println!(
        "saved `{}` at {:.2} EUR ({} in history)",
        saved.name,
        saved.cost,
        session.history().len()
    );
    Ok(())
}

fn cmd_edit(session: &mut Session, args: &[&str]) -> Result<()> {
    let sorted = session.history_sorted();
    let index = parse_index(args, sorted.len(), "edit")?;
    let mut entry: MeetingHistoryEntry = sorted[index].clone();

    let name_input = prompt(&format!("name [{}]: ", entry.name))?;
    if !name_input.is_empty() {
        entry.name = name_input;
    }
    let rating_input = prompt(&format!("rating 1-5 [{}]: ", entry.rating))?;
    if !rating_input.is_empty() {
        entry.rating = parse_rating(&rating_input).map_err(to_anyhow)?;
    }
    let duration_input = prompt(&format!(
        "duration [{}]: ",
        format_hms(entry.duration_in_seconds)
    ))?;
    if !duration_input.is_empty() {
        entry.duration_in_seconds = parse_hms(&duration_input).map_err(to_anyhow)?;
    }
    let notes_input = prompt(&format!(
        "notes [{}]: ",
        entry.notes.as_deref().unwrap_or("")
    ))?;
    if !notes_input.is_empty() {
        entry.notes = Some(notes_input);
    }

    println!("participants: `add <name...> <salary-k-eur>`, `remove <n>`, empty keeps the list");
    loop {
        print_roster(&entry.participants);
        let line = prompt("participants []: ")?;
        match apply_participant_edit(&mut entry.participants, &line) {
            Ok(ParticipantEdit::Done) => break,
            Ok(ParticipantEdit::Changed) => {}
            Err(err) => println!("error: {err}"),
        }
    }

    let updated = session.update_meeting(entry).map_err(to_anyhow)?;
    println!(
        "updated `{}`; {} participant(s), cost is now {:.2} EUR",
        updated.name, updated.participants_count, updated.cost
    );
    Ok(())
}

enum ParticipantEdit {
    Done,
    Changed,
}

/// Applies one line of the edit flow's participant subcommands to the
/// entry's list. Salaries arrive in thousands of EUR, like the top-level
/// `add` command.
fn apply_participant_edit(
    participants: &mut Vec<Participant>,
    line: &str,
) -> Result<ParticipantEdit> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(ParticipantEdit::Done);
    };
    let rest: Vec<&str> = parts.collect();
    match command {
        "done" => Ok(ParticipantEdit::Done),
        "add" => {
            let [name_parts @ .., salary] = rest.as_slice() else {
                return Err(anyhow!("usage: add <name...> <salary-k-eur>"));
            };
            if name_parts.is_empty() {
                return Err(anyhow!("usage: add <name...> <salary-k-eur>"));
            }
            let salary_k = parse_salary_k_eur(salary).map_err(to_anyhow)?;
            let participant =
                Participant::new(name_parts.join(" "), salary_k * K_EUR).map_err(to_anyhow)?;
            participants.push(participant);
            Ok(ParticipantEdit::Changed)
        }
        "remove" => {
            let index = parse_index(&rest, participants.len(), "remove")?;
            participants.remove(index);
            Ok(ParticipantEdit::Changed)
        }
        other => Err(anyhow!("unknown command `{other}`; add, remove or done")),
    }
}

fn cmd_delete(session: &mut Session, args: &[&str]) -> Result<()> {
    let sorted = session.history_sorted();
    let index = parse_index(args, sorted.len(), "delete")?;
    let entry = &sorted[index];
    let confirmation = confirm(&format!("delete `{}`?", entry.name))?;
    match session
        .delete_meeting(entry.id, confirmation)
        .map_err(to_anyhow)?
    {
        ConfirmOutcome::Applied { removed } if removed > 0 => println!("deleted"),
        ConfirmOutcome::Applied { .. } => println!("already gone"),
        ConfirmOutcome::Declined => println!("kept"),
    }
    Ok(())
}

fn cmd_export(session: &mut Session, args: &[&str]) -> Result<()> {
    let Some(export) = session.export_history() else {
        println!("history is empty; nothing to export");
        return Ok(());
    };
    let path = match args {
        [] => PathBuf::from(&export.file_name),
        [path] => PathBuf::from(path),
        _ => return Err(anyhow!("usage: export [path]")),
    };
    std::fs::write(&path, &export.content)
        .with_context(|| format!("cannot write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn print_participants(session: &Session) {
    if session.participants().is_empty() {
        println!("no participants yet; `add <name> <salary-k-eur>`");
        return;
    }
    print_roster(session.participants());
    println!("rate: {:.4} EUR/s", session.cost_per_second());
}

fn print_roster(participants: &[Participant]) {
    for (position, participant) in participants.iter().enumerate() {
        println!(
            "{:>3}  {}  {:.0} EUR/year",
            position + 1,
            participant.name,
            participant.annual_salary
        );
    }
}

fn print_status(session: &Session) {
    println!(
        "phase: {}  elapsed: {}  participants: {}  rate: {:.4} EUR/s  total: {:.2} EUR",
        session.phase(),
        format_hms(session.time_in_seconds()),
        session.participants().len(),
        session.cost_per_second(),
        session.total_cost()
    );
    if session.phase() == TimerPhase::AwaitingDisposition {
        println!("an ended meeting awaits `save`, `discard` or `resume`");
    }
}

fn print_history(session: &Session) {
    let sorted = session.history_sorted();
    if sorted.is_empty() {
        println!("no saved meetings yet");
        return;
    }
    for (position, entry) in sorted.iter().enumerate() {
        println!(
            "{:>3}  {}  {}  {:.2} EUR  {}  {}/5  {} participant(s)",
            position + 1,
            entry.date.format("%Y-%m-%d"),
            entry.name,
            entry.cost,
            format_hms(entry.duration_in_seconds),
            entry.rating,
            entry.participants_count
        );
    }
}

fn run_demo(session: &mut Session) -> Result<()> {
    println!("meetcost {} demo (volatile storage)", core_version());

    session.add_participant("Ana", 128.0).map_err(to_anyhow)?;
    session.add_participant("Ben", 96.0).map_err(to_anyhow)?;
    session.bulk_add_participants(3, 80.0).map_err(to_anyhow)?;
    print_participants(session);

    session.start().map_err(to_anyhow)?;
    for _ in 0..65 {
        session.tick();
    }
    print_status(session);

    session.end().map_err(to_anyhow)?;
    let saved = session
        .save_meeting("Demo standup", 4, "scripted run")
        .map_err(to_anyhow)?;
    println!("saved `{}` at {:.2} EUR", saved.name, saved.cost);

    print_history(session);
    if let Some(export) = session.export_history() {
        println!("--- {} ---", export.file_name);
        println!("{}", export.content);
    }
    Ok(())
}

fn parse_index(args: &[&str], len: usize, usage: &str) -> Result<usize> {
    let [raw] = args else {
        return Err(anyhow!("usage: {usage} <n>"));
    };
    let position: usize = raw
        .parse()
        .map_err(|_| anyhow!("`{raw}` is not a list position"))?;
    if position == 0 || position > len {
        return Err(anyhow!("no item {position}; the list has {len}"));
    }
    Ok(position - 1)
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(message: &str) -> Result<Confirmation> {
    let answer = prompt(&format!("{message} [y/N]: "))?;
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        Ok(Confirmation::Confirmed)
    } else {
        Ok(Confirmation::Declined)
    }
}

fn to_anyhow(err: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("{err}")
}
