//! Line-driven event loops for the two views.
//!
//! The tree loop owns its session outright. Fetches run on the runtime and
//! report back through a `JoinSet`, so a reply is only ever applied by the
//! loop itself, in between commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::commands::{self, Step};
use crate::config::Config;
use crate::expand::{FetchReply, FetchResolution, spawn_fetch};
use crate::kanban::BoardSession;
use crate::loader::ChildFetcher;
use crate::render::Renderer;
use crate::session::TreeSession;

pub type Input = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Commands come from `script` when given, stdin otherwise.
pub async fn open_input(script: Option<&Path>) -> anyhow::Result<Input> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open script {}", path.display()))?;
            info!(script = %path.display(), "reading commands from script");
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    Ok(reader.lines())
}

#[instrument(skip_all)]
pub async fn drive_tree(
    mut session: TreeSession,
    fetcher: Arc<dyn ChildFetcher>,
    cfg: &Config,
    renderer: &mut Renderer,
    mut lines: Input,
) -> anyhow::Result<TreeSession> {
    let mut inflight: JoinSet<FetchReply> = JoinSet::new();
    renderer.print_tree(&session)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read command")? else {
                    debug!("input closed");
                    break;
                };

                let step = commands::parse_tree_command(&line).and_then(|cmd| match cmd {
                    Some(cmd) => commands::apply_tree(&mut session, cfg, renderer, cmd).map(Some),
                    None => Ok(None),
                });

                let step = match step {
                    Ok(Some(step)) => step,
                    Ok(None) => continue,
                    Err(err) => {
                        renderer.print_error(&err)?;
                        continue;
                    }
                };

                match step {
                    Step::Continue { redraw } => {
                        flush_notices(&mut session, renderer)?;
                        if redraw {
                            renderer.print_tree(&session)?;
                        }
                    }
                    Step::Fetch(ticket) => {
                        debug!(id = %ticket.node_id, inflight = inflight.len() + 1, "spawning fetch");
                        spawn_fetch(&mut inflight, Arc::clone(&fetcher), ticket);
                        renderer.print_tree(&session)?;
                    }
                    Step::AwaitFetches => {
                        drain(&mut inflight, &mut session, renderer).await?;
                        renderer.print_tree(&session)?;
                    }
                    Step::Quit => {
                        if !inflight.is_empty() {
                            debug!(inflight = inflight.len(), "abandoning outstanding fetches");
                        }
                        inflight.abort_all();
                        return Ok(session);
                    }
                }
            }
            Some(joined) = inflight.join_next(), if !inflight.is_empty() => {
                let reply = joined.context("fetch task did not finish")?;
                settle(&mut session, renderer, reply)?;
                renderer.print_tree(&session)?;
            }
        }
    }

    if !inflight.is_empty() {
        drain(&mut inflight, &mut session, renderer).await?;
        renderer.print_tree(&session)?;
    }
    Ok(session)
}

async fn drain(
    inflight: &mut JoinSet<FetchReply>,
    session: &mut TreeSession,
    renderer: &mut Renderer,
) -> anyhow::Result<()> {
    while let Some(joined) = inflight.join_next().await {
        let reply = joined.context("fetch task did not finish")?;
        settle(session, renderer, reply)?;
    }
    Ok(())
}

fn settle(session: &mut TreeSession, renderer: &mut Renderer, reply: FetchReply) -> anyhow::Result<()> {
    let id = reply.ticket.node_id;
    match session.finish_fetch(reply) {
        FetchResolution::Loaded { count } => debug!(id = %id, count, "children loaded"),
        FetchResolution::Failed { .. } => {}
        FetchResolution::Stale => warn!(id = %id, "reply for a node that no longer exists"),
    }
    flush_notices(session, renderer)
}

fn flush_notices(session: &mut TreeSession, renderer: &mut Renderer) -> anyhow::Result<()> {
    for notice in session.take_notices() {
        renderer.print_notice(&notice)?;
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn drive_board(
    mut board: BoardSession,
    cfg: &Config,
    renderer: &mut Renderer,
    mut lines: Input,
) -> anyhow::Result<BoardSession> {
    renderer.print_board(&board)?;

    while let Some(line) = lines.next_line().await.context("failed to read command")? {
        let step = commands::parse_board_command(&line).and_then(|cmd| match cmd {
            Some(cmd) => commands::apply_board(&mut board, cfg, renderer, cmd).map(Some),
            None => Ok(None),
        });

        match step {
            Ok(Some(Step::Quit)) => break,
            Ok(Some(Step::Continue { redraw: true })) => renderer.print_board(&board)?,
            Ok(_) => {}
            Err(err) => renderer.print_error(&err)?,
        }
    }

    Ok(board)
}
