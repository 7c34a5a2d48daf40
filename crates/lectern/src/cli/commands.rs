//! # CLI Layer
//!
//! The only place that knows about terminal I/O, exit codes and output formatting.
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments become typed commands via clap
//! 2. **Context Setup**: data directory, configuration and the API
//! 3. **Dispatch**: route subcommands and REPL lines to the API
//! 4. **Output Formatting**: hand `CmdResult`s to `render`
//!
//! REPL command errors are printed and the loop continues; only start-up failures end
//! the process.

use super::editor::{edit_note, NoteBuffer};
use super::launcher::Slideshows;
use super::logging::{init_logging, LogConfig};
use super::render::{
    render_books, render_config, render_history, render_messages, render_preview, render_queue,
    render_slide, render_status,
};
use super::repl::{self, ParseError, ReplCommand, HELP};
use super::setup::{Cli, Commands, HistoryCommands};
use super::styles;
use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use console::Term;
use lecternapp::commands::{CmdMessage, CmdResult};
use lecternapp::init::{initialize, LecternContext};
use lecternapp::render::render_snapshot;
use lecternapp::store::fs_backend::FsBackend;
use lecternapp::subscriber::SubscriberSync;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

const PROMPT: &str = "lectern> ";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose))?;

    let mut ctx = initialize(cli.data.clone())?;

    match cli.command.unwrap_or(Commands::Control) {
        Commands::Control => run_control(&mut ctx),
        Commands::Slideshow { interval } => run_slideshow(&ctx, interval),
        Commands::Show => {
            print!("{}", current_slide(&ctx)?);
            Ok(())
        }
        Commands::History { action } => run_history(&mut ctx, action),
        Commands::Books { query } => {
            print!("{}", books(&ctx, query.as_deref().unwrap_or("")));
            Ok(())
        }
        Commands::Config => {
            print!("{}", render_config(&ctx.config));
            Ok(())
        }
    }
}

fn terminal_width() -> usize {
    Term::stdout().size().1 as usize
}

/// Messages plus whatever listing the command produced.
fn result_output(result: &CmdResult) -> String {
    let mut out = String::new();
    if let Some(matches) = &result.books {
        out.push_str(&render_books(matches));
    }
    if !result.listed_items.is_empty() {
        out.push_str(&render_queue(&result.listed_items));
    }
    if !result.history.is_empty() {
        out.push_str(&render_history(&result.history, Utc::now()));
    }
    out.push_str(&render_messages(&result.messages));
    out
}

fn books(ctx: &LecternContext, query: &str) -> String {
    result_output(&ctx.api.search_books(query))
}

fn current_slide(ctx: &LecternContext) -> Result<String> {
    let mut subscriber = SubscriberSync::new(
        FsBackend::new(&ctx.data_dir),
        ctx.config.poll_interval(),
    );
    subscriber.activate()?;
    Ok(render_slide(&subscriber.slide(), terminal_width()))
}

fn run_history(ctx: &mut LecternContext, action: Option<HistoryCommands>) -> Result<()> {
    let result = match action.unwrap_or(HistoryCommands::List) {
        HistoryCommands::List => ctx.api.history(),
        HistoryCommands::Clear => ctx.api.clear_history()?,
        HistoryCommands::Replay { position } => ctx.api.replay(position)?,
    };
    print!("{}", result_output(&result));
    Ok(())
}

fn run_slideshow(ctx: &LecternContext, interval: Option<u64>) -> Result<()> {
    let interval = interval
        .map(Duration::from_millis)
        .unwrap_or_else(|| ctx.config.poll_interval());
    let term = Term::stdout();
    let mut subscriber = SubscriberSync::new(FsBackend::new(&ctx.data_dir), interval);
    tracing::info!(data_dir = %ctx.data_dir.display(), ?interval, "slideshow following");

    print!("{}", render_slide(&subscriber.slide(), terminal_width()));
    let _ = io::stdout().flush();

    // Runs until the process is interrupted
    let stop = AtomicBool::new(false);
    subscriber.run(&stop, |snapshot| {
        if term.is_term() {
            let _ = term.clear_screen();
        }
        print!(
            "{}",
            render_slide(&render_snapshot(snapshot), terminal_width())
        );
        let _ = io::stdout().flush();
    });
    Ok(())
}

fn run_control(ctx: &mut LecternContext) -> Result<()> {
    let interactive = io::stdin().is_terminal();
    if interactive {
        println!(
            "{}",
            styles::MUTED.apply_to(format!(
                "Data: {}. Type `help` for commands.",
                ctx.data_dir.display()
            ))
        );
    }

    let mut slideshows = Slideshows::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("{}", PROMPT);
            io::stdout().flush()?;
        }
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        let command = match repl::parse(&line) {
            Ok(ReplCommand::Quit) => break,
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                println!("{}", styles::WARNING.apply_to(e));
                continue;
            }
        };

        match dispatch(ctx, &mut slideshows, command) {
            Ok(output) => print!("{}", output),
            Err(e) => eprintln!("{} {:#}", styles::ERROR.apply_to("Error:"), e),
        }
    }

    let stopped = slideshows.shutdown();
    if stopped > 0 {
        tracing::info!(stopped, "closed slideshows");
    }
    Ok(())
}

fn dispatch(
    ctx: &mut LecternContext,
    slideshows: &mut Slideshows,
    command: ReplCommand,
) -> Result<String> {
    let api = &mut ctx.api;
    let output = match command {
        ReplCommand::Books(query) => result_output(&api.search_books(query.as_deref().unwrap_or(""))),
        ReplCommand::Book(name) => result_output(&api.select_book(&name)),
        ReplCommand::Chapter(chapter) => result_output(&api.select_chapter(chapter)),
        ReplCommand::Verse(verse, modifiers) => {
            let result = api.select_verse(verse, modifiers);
            format!("{}{}", render_preview(api.state()), result_output(&result))
        }
        ReplCommand::Commit(verse) => result_output(&api.commit(verse)?),
        ReplCommand::Queue => result_output(&api.queue_current()),
        ReplCommand::Unqueue(selector) => result_output(&api.unqueue(&selector)),
        ReplCommand::QueueList => result_output(&api.list_queue()),
        ReplCommand::ClearQueue => result_output(&api.clear_queue()),
        ReplCommand::Note { title, text } => {
            let result = api.preview_note(&title, &text);
            format!("{}{}", render_preview(api.state()), result_output(&result))
        }
        ReplCommand::NoteLive { title, text } => result_output(&api.project_note(&title, &text)?),
        ReplCommand::NoteQueue { title, text } => result_output(&api.queue_note(&title, &text)),
        ReplCommand::NoteEdit(title) => {
            let note = edit_note(&NoteBuffer::new(title, ""))?;
            if note.is_empty() {
                render_messages(&[CmdMessage::info("Note discarded")])
            } else {
                let result = api.preview_note(&note.title, &note.text);
                format!("{}{}", render_preview(api.state()), result_output(&result))
            }
        }
        ReplCommand::Live => result_output(&api.go_live()?),
        ReplCommand::History => {
            api.reload_history()?;
            result_output(&api.history())
        }
        ReplCommand::Replay(position) => result_output(&api.replay(position)?),
        ReplCommand::ClearHistory => result_output(&api.clear_history()?),
        ReplCommand::Font(size) => result_output(&api.set_font_size(&size)),
        ReplCommand::Dark(dark) => result_output(&api.set_dark_mode(dark)?),
        ReplCommand::Version(code) => {
            let result = api.set_version(&code)?;
            format!("{}{}", result_output(&result), render_preview(api.state()))
        }
        ReplCommand::Background(color) => {
            result_output(&api.set_background_color(color.as_deref())?)
        }
        ReplCommand::BackgroundImage(url) => {
            result_output(&api.set_background_image(url.as_deref())?)
        }
        ReplCommand::Open => {
            let pid = slideshows.open(&ctx.config, &ctx.data_dir)?;
            format!("{}\n", styles::SUCCESS.apply_to(format!("Slideshow started (pid {})", pid)))
        }
        ReplCommand::Status => render_status(api.state()),
        ReplCommand::Help => format!("{}\n", HELP),
        ReplCommand::Quit => String::new(),
    };
    Ok(output)
}
