// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line-oriented command loop over an open [`Canvas`].
//!
//! The debounced autosave runs inside the same loop: while a deadline is armed the loop
//! waits for whichever comes first, the next input line or the deadline.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::time::Instant;
use tracing::debug;

use crate::format::ExportFormat;
use crate::model::is_answered;
use crate::ops::Canvas;

pub const HELP: &str = "\
Commands:
  set <cell> <n> <text>     answer question n (1-based) of a cell
  show                      list every cell with its answers
  progress                  answered questions so far
  search <query>            cells matching the query
  save                      save to the cloud now
  reload [--yes]            replace answers with the cloud copy
  reset [--yes]             clear every answer on this device
  export [txt|json] [dir]   write a dated backup (default: txt, current dir)
  import <file>             load a .txt or .json backup
  link                      print the shareable link
  help                      this text
  quit                      save pending changes and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        cell_id: String,
        question_index: usize,
        text: String,
    },
    Show,
    Progress,
    Search(String),
    Save,
    Reload { confirmed: bool },
    Reset { confirmed: bool },
    Export {
        format: ExportFormat,
        dir: Option<PathBuf>,
    },
    Import(PathBuf),
    Link,
    Help,
    Quit,
}

/// Parses one input line; a blank line is `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };

    let command = match word {
        "set" => parse_set(rest)?,
        "show" => Command::Show,
        "progress" => Command::Progress,
        "search" => Command::Search(rest.to_owned()),
        "save" => Command::Save,
        "reload" => Command::Reload {
            confirmed: parse_yes(rest)?,
        },
        "reset" => Command::Reset {
            confirmed: parse_yes(rest)?,
        },
        "export" => parse_export(rest)?,
        "import" => {
            if rest.is_empty() {
                return Err("usage: import <file>".to_owned());
            }
            Command::Import(PathBuf::from(rest))
        }
        "link" => Command::Link,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}; try `help`")),
    };
    Ok(Some(command))
}

fn parse_set(rest: &str) -> Result<Command, String> {
    const USAGE: &str = "usage: set <cell> <n> <text>";
    let mut parts = rest.splitn(3, char::is_whitespace);
    let cell_id = parts.next().filter(|s| !s.is_empty()).ok_or(USAGE)?;
    let number: usize = parts
        .next()
        .and_then(|raw| raw.parse().ok())
        .filter(|n| *n > 0)
        .ok_or(USAGE)?;
    let text = parts.next().unwrap_or("").replace("\\n", "\n");
    Ok(Command::Set {
        cell_id: cell_id.to_owned(),
        question_index: number - 1,
        text,
    })
}

fn parse_yes(rest: &str) -> Result<bool, String> {
    match rest {
        "" => Ok(false),
        "--yes" | "-y" => Ok(true),
        other => Err(format!("unexpected argument {other:?}")),
    }
}

fn parse_export(rest: &str) -> Result<Command, String> {
    let mut format = ExportFormat::Text;
    let mut dir = None;
    for arg in rest.split_whitespace() {
        match arg {
            "txt" | "text" => format = ExportFormat::Text,
            "json" => format = ExportFormat::Json,
            _ if dir.is_none() => dir = Some(PathBuf::from(arg)),
            _ => return Err("usage: export [txt|json] [dir]".to_owned()),
        }
    }
    Ok(Command::Export { format, dir })
}

enum Event {
    Line(Option<String>),
    AutosaveDue,
}

/// Runs commands from `input` until `quit` or end of input, then flushes any pending
/// autosave.
pub async fn run<R, W>(canvas: &mut Canvas, input: R, output: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    writeln_to(output, &format!("Session {}", canvas.session_id())).await?;
    writeln_to(output, &format!("Share: {}", canvas.share_link())).await?;

    loop {
        let event = match canvas.autosave_deadline() {
            Some(deadline) => tokio::select! {
                line = lines.next_line() => Event::Line(line?),
                _ = tokio::time::sleep_until(deadline) => Event::AutosaveDue,
            },
            None => Event::Line(lines.next_line().await?),
        };

        let line = match event {
            Event::AutosaveDue => {
                let outcome = canvas.tick(Instant::now()).await;
                debug!(?outcome, "autosave timer fired");
                continue;
            }
            Event::Line(None) => break,
            Event::Line(Some(line)) => line,
        };

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(canvas, command, &mut lines, output).await?,
            Err(message) => writeln_to(output, &message).await?,
        }
    }

    let outcome = canvas.flush_autosave().await;
    debug!(?outcome, "pending autosave flushed on exit");
    output.flush().await
}

async fn execute<R, W>(
    canvas: &mut Canvas,
    command: Command,
    lines: &mut Lines<R>,
    output: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match command {
        Command::Set {
            cell_id,
            question_index,
            text,
        } => {
            if canvas.catalog().cell(&cell_id).is_none() {
                writeln_to(output, &format!("note: {cell_id:?} is not a cell of this canvas")).await?;
            }
            canvas.set_answer(&cell_id, question_index, text);
        }
        Command::Show => writeln_to(output, &render_answers(canvas)).await?,
        Command::Progress => writeln_to(output, &canvas.progress().to_string()).await?,
        Command::Search(query) => {
            let mut out = String::new();
            for hit in canvas.search(&query) {
                out.push_str(&format!("{}\n", hit.block.title()));
                for cell in hit.cells {
                    out.push_str(&format!("  [{}] {}\n", cell.id(), cell.title()));
                }
            }
            if out.is_empty() {
                out.push_str("No cells match.");
            }
            writeln_to(output, out.trim_end()).await?;
        }
        Command::Save => writeln_to(output, &canvas.manual_save().await.to_string()).await?,
        Command::Reload { confirmed } => {
            let prompt = "Replace every answer with the cloud copy? [y/N] ";
            if confirmed || confirm(prompt, lines, output).await? {
                let notice = canvas.manual_reload().await;
                writeln_to(output, &notice.to_string()).await?;
            } else {
                writeln_to(output, "Reload cancelled.").await?;
            }
        }
        Command::Reset { confirmed } => {
            let prompt = "Clear every answer on this device? The cloud copy is kept. [y/N] ";
            if confirmed || confirm(prompt, lines, output).await? {
                canvas.reset_all();
                writeln_to(output, "All answers cleared.").await?;
            } else {
                writeln_to(output, "Reset cancelled.").await?;
            }
        }
        Command::Export { format, dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            match canvas.export_to_dir(format, &dir, Utc::now()).await {
                Ok(path) => writeln_to(output, &format!("Exported to {}", path.display())).await?,
                Err(err) => writeln_to(output, &format!("Export failed: {err}")).await?,
            }
        }
        Command::Import(path) => match canvas.import_file(&path).await {
            Ok(()) => writeln_to(output, &format!("Imported {}", display_name(&path))).await?,
            Err(err) => writeln_to(output, &format!("Import failed: {err}")).await?,
        },
        Command::Link => writeln_to(output, &canvas.share_link()).await?,
        Command::Help => writeln_to(output, HELP).await?,
        Command::Quit => {}
    }
    Ok(())
}

async fn confirm<R, W>(prompt: &str, lines: &mut Lines<R>, output: &mut W) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(prompt.as_bytes()).await?;
    output.flush().await?;
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn render_answers(canvas: &Canvas) -> String {
    let mut out = String::new();
    for block in canvas.catalog().blocks() {
        out.push_str(&format!("== {} ==\n", block.title()));
        for cell in block.cells() {
            let id = cell.id().as_str();
            out.push_str(&format!(
                "  [{id}] {} ({}/{})\n",
                cell.title(),
                canvas.answered_for_cell(id),
                cell.questions().len()
            ));
            for (idx, question) in cell.questions().iter().enumerate() {
                out.push_str(&format!("    P{}: {question}\n", idx + 1));
                if let Some(text) = canvas.answers().answer(id, idx).filter(|t| is_answered(t)) {
                    for line in text.trim().lines() {
                        out.push_str(&format!("      > {line}\n"));
                    }
                }
            }
        }
    }
    out.push_str(&canvas.progress().to_string());
    out
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn writeln_to<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await
}
