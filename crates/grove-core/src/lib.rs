pub mod ancestry;
pub mod cli;
pub mod commands;
pub mod config;
pub mod driver;
pub mod expand;
pub mod kanban;
pub mod loader;
pub mod locate;
pub mod mutate;
pub mod node;
pub mod render;
pub mod reparent;
pub mod seed;
pub mod session;

use std::ffi::OsString;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

use crate::cli::View;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting grove"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.grovercfile.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let mut renderer =
    render::Renderer::new(&cfg)?;
  let inv = cli::Invocation::resolve(
    &cfg,
    cli.view.as_deref(),
    cli.script
  )?;
  info!(view = %inv.view, seed = inv.seed, "resolved invocation");

  let runtime =
    tokio::runtime::Builder::new_multi_thread()
      .enable_all()
      .build()
      .context(
        "failed to start async runtime"
      )?;

  runtime.block_on(async {
    let input = driver::open_input(
      inv.script.as_deref()
    )
    .await?;

    match inv.view {
      | View::Tree => {
        let settings =
          loader::FetchSettings::from_config(
            &cfg
          )
          .context(
            "invalid fetch settings"
          )?;
        let fetcher: Arc<
          dyn loader::ChildFetcher
        > = Arc::new(
          loader::MockFetcher::new(
            settings
          )
        );
        let forest = if inv.seed {
          seed::initial_forest()
        } else {
          Vec::new()
        };

        let session = driver::drive_tree(
          session::TreeSession::new(
            forest
          ),
          fetcher,
          &cfg,
          &mut renderer,
          input
        )
        .await?;
        info!(
          nodes = session
            .snapshot()
            .node_count(),
          "tree session closed"
        );
      }
      | View::Kanban => {
        let columns = if inv.seed {
          seed::initial_columns()
        } else {
          Vec::new()
        };

        let board = driver::drive_board(
          kanban::BoardSession::new(
            columns
          ),
          &cfg,
          &mut renderer,
          input
        )
        .await?;
        info!(
          columns = board.columns().len(),
          "board session closed"
        );
      }
    }

    anyhow::Ok(())
  })?;

  info!("done");
  Ok(())
}
