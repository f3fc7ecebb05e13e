// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! ffcanvas CLI entrypoint.
//!
//! Opens the session named by `--url` (or a per-tab session under `--state-dir`) and runs
//! the command loop on stdin. Answers are mirrored under the state directory and synced
//! to a folder-backed remote store, or to an in-memory one with `--offline`.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ffcanvas::model::Catalog;
use ffcanvas::ops::{Canvas, CanvasConfig, SharedRemote};
use ffcanvas::session::{Address, FileTabStorage};
use ffcanvas::store::{FolderMirror, FolderRemote, MemoryRemote, WriteDurability};
use ffcanvas::sync::AUTOSAVE_DELAY;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

const DEFAULT_STATE_DIR: &str = ".ffcanvas";
const DEFAULT_URL: &str = "http://localhost/";
const LOG_ENV: &str = "FFCANVAS_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--url <address>] [--state-dir <dir>] [--remote-dir <dir>] [--catalog <file.json>] [--autosave-ms <n>] [--durable-writes]\n  {program} [--url <address>] [--state-dir <dir>] [--catalog <file.json>] [--autosave-ms <n>] --offline\n\n--url is the address the session id is read from (`sid` in query or fragment; default {DEFAULT_URL}).\nWithout a `sid`, a per-tab id is kept under --state-dir (default {DEFAULT_STATE_DIR}).\n--remote-dir selects the shared remote store (default <state-dir>/remote); --offline keeps it in memory.\n--autosave-ms sets the autosave debounce (default {}).\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n\nLogging goes to stderr; set {LOG_ENV} (e.g. {LOG_ENV}=debug) to change the filter.",
        AUTOSAVE_DELAY.as_millis()
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    url: Option<String>,
    state_dir: Option<String>,
    remote_dir: Option<String>,
    catalog: Option<String>,
    autosave_ms: Option<u64>,
    offline: bool,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    fn set_once(slot: &mut Option<String>, value: Option<String>) -> Result<(), ()> {
        if slot.is_some() {
            return Err(());
        }
        *slot = Some(value.ok_or(())?);
        Ok(())
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--url" => set_once(&mut options.url, args.next())?,
            "--state-dir" => set_once(&mut options.state_dir, args.next())?,
            "--remote-dir" => set_once(&mut options.remote_dir, args.next())?,
            "--catalog" => set_once(&mut options.catalog, args.next())?,
            "--autosave-ms" => {
                if options.autosave_ms.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let ms: u64 = raw.parse().map_err(|_| ())?;
                options.autosave_ms = Some(ms);
            }
            "--offline" => {
                if options.offline {
                    return Err(());
                }
                options.offline = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ => return Err(()),
        }
    }

    if options.offline && options.remote_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "ffcanvas".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging();

        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };
        let state_dir = PathBuf::from(options.state_dir.as_deref().unwrap_or(DEFAULT_STATE_DIR));

        let catalog = match options.catalog.as_deref() {
            Some(path) => Catalog::load(path.as_ref())?,
            None => Catalog::builtin().clone(),
        };
        let config = CanvasConfig {
            catalog: Arc::new(catalog),
            autosave_delay: options
                .autosave_ms
                .map(Duration::from_millis)
                .unwrap_or(AUTOSAVE_DELAY),
        };

        let address = Address::parse(options.url.as_deref().unwrap_or(DEFAULT_URL))?;
        let tab = FileTabStorage::new(state_dir.join("tab"));
        let mirror = Arc::new(FolderMirror::new(state_dir.join("local")).with_durability(durability));
        let remote: SharedRemote = if options.offline {
            Arc::new(MemoryRemote::new())
        } else {
            let remote_dir = options
                .remote_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| state_dir.join("remote"));
            Arc::new(FolderRemote::new(remote_dir).with_durability(durability))
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(async move {
            let mut canvas = Canvas::open(config, address, &tab, mirror, remote);
            canvas.start().await;
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            ffcanvas::repl::run(&mut canvas, stdin, &mut stdout).await
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("ffcanvas: {err}");
        std::process::exit(1);
    }
}
