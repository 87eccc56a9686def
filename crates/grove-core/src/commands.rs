//! Line commands for the interactive driver: parsing, reference resolution
//! and dispatch into the tree and board sessions.
//!
//! This is the input-capture boundary, so blank names are rejected here and
//! never reach a session.

use anyhow::{Context, anyhow, bail};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::expand::{FetchTicket, ToggleOutcome};
use crate::kanban::{BoardSession, CardId, ColumnId};
use crate::locate::{find_by_id_prefix, node_at_path};
use crate::node::{NodeId, TreeNode};
use crate::render::Renderer;
use crate::session::TreeSession;

pub const TREE_COMMANDS: &[&str] = &[
    "show", "toggle", "add", "root", "rename", "remove", "yes", "no", "drag", "over", "drop", "end",
    "move", "wait", "json", "config", "help", "quit",
];

pub const BOARD_COMMANDS: &[&str] = &[
    "show", "add", "delete", "rename", "drag", "over", "drop", "dropcol", "end", "move", "json",
    "config", "help", "quit",
];

const MIN_ID_PREFIX: usize = 4;

pub fn expand_command_abbrev<'a>(token: &str, known: &[&'a str]) -> Option<&'a str> {
    if let Some(exact) = known.iter().copied().find(|name| *name == token) {
        return Some(exact);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

/// What the driver should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue { redraw: bool },
    Fetch(FetchTicket),
    AwaitFetches,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeCommand {
    Show,
    Toggle(String),
    Add { parent: String, name: String },
    Root(String),
    Rename { target: String, name: String },
    Remove(String),
    Yes,
    No,
    Drag(String),
    Over(String),
    Drop(String),
    End,
    Move { source: String, target: String },
    Wait,
    Json,
    Config,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    Show,
    Add { column: String, title: String },
    Delete(String),
    Rename { card: String, title: String },
    Drag(String),
    Over(String),
    Drop(String),
    DropColumn(String),
    End,
    Move { card: String, column: String, before: Option<String> },
    Json,
    Config,
    Help,
    Quit,
}

/// Split a line into the expanded command name and its arguments. `None` for
/// blank lines and `#` comments.
fn tokenize(line: &str, known: &[&'static str]) -> anyhow::Result<Option<(&'static str, Vec<String>)>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = shlex::split(trimmed).ok_or_else(|| anyhow!("unbalanced quotes in: {trimmed}"))?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let head = tokens.remove(0);
    let command = expand_command_abbrev(&head.to_ascii_lowercase(), known)
        .ok_or_else(|| anyhow!("unknown or ambiguous command: {head}"))?;
    debug!(token = %head, expanded = command, "resolved command token");
    Ok(Some((command, tokens)))
}

fn arg(args: &[String], idx: usize, what: &str) -> anyhow::Result<String> {
    args.get(idx)
        .cloned()
        .ok_or_else(|| anyhow!("missing {what}"))
}

/// Join the remaining words into a display name, refusing blank input.
fn name_from(args: &[String], from: usize, what: &str) -> anyhow::Result<String> {
    let name = args.get(from..).unwrap_or_default().join(" ");
    let name = name.trim();
    if name.is_empty() {
        bail!("{what} cannot be blank");
    }
    Ok(name.to_string())
}

pub fn parse_tree_command(line: &str) -> anyhow::Result<Option<TreeCommand>> {
    let Some((command, args)) = tokenize(line, TREE_COMMANDS)? else {
        return Ok(None);
    };

    let cmd = match command {
        "show" => TreeCommand::Show,
        "toggle" => TreeCommand::Toggle(arg(&args, 0, "node reference")?),
        "add" => TreeCommand::Add {
            parent: arg(&args, 0, "parent reference")?,
            name: name_from(&args, 1, "node name")?,
        },
        "root" => TreeCommand::Root(name_from(&args, 0, "node name")?),
        "rename" => TreeCommand::Rename {
            target: arg(&args, 0, "node reference")?,
            name: name_from(&args, 1, "node name")?,
        },
        "remove" => TreeCommand::Remove(arg(&args, 0, "node reference")?),
        "yes" => TreeCommand::Yes,
        "no" => TreeCommand::No,
        "drag" => TreeCommand::Drag(arg(&args, 0, "node reference")?),
        "over" => TreeCommand::Over(arg(&args, 0, "node reference")?),
        "drop" => TreeCommand::Drop(arg(&args, 0, "node reference")?),
        "end" => TreeCommand::End,
        "move" => TreeCommand::Move {
            source: arg(&args, 0, "source reference")?,
            target: arg(&args, 1, "target reference")?,
        },
        "wait" => TreeCommand::Wait,
        "json" => TreeCommand::Json,
        "config" => TreeCommand::Config,
        "help" => TreeCommand::Help,
        "quit" => TreeCommand::Quit,
        other => bail!("unhandled tree command: {other}"),
    };
    Ok(Some(cmd))
}

pub fn parse_board_command(line: &str) -> anyhow::Result<Option<BoardCommand>> {
    let Some((command, args)) = tokenize(line, BOARD_COMMANDS)? else {
        return Ok(None);
    };

    let cmd = match command {
        "show" => BoardCommand::Show,
        "add" => BoardCommand::Add {
            column: arg(&args, 0, "column")?,
            title: name_from(&args, 1, "card title")?,
        },
        "delete" => BoardCommand::Delete(arg(&args, 0, "card reference")?),
        "rename" => BoardCommand::Rename {
            card: arg(&args, 0, "card reference")?,
            title: name_from(&args, 1, "card title")?,
        },
        "drag" => BoardCommand::Drag(arg(&args, 0, "card reference")?),
        "over" => BoardCommand::Over(arg(&args, 0, "card reference")?),
        "drop" => BoardCommand::Drop(arg(&args, 0, "card reference")?),
        "dropcol" => BoardCommand::DropColumn(arg(&args, 0, "column")?),
        "end" => BoardCommand::End,
        "move" => BoardCommand::Move {
            card: arg(&args, 0, "card reference")?,
            column: arg(&args, 1, "column")?,
            before: args.get(2).cloned(),
        },
        "json" => BoardCommand::Json,
        "config" => BoardCommand::Config,
        "help" => BoardCommand::Help,
        "quit" => BoardCommand::Quit,
        other => bail!("unhandled board command: {other}"),
    };
    Ok(Some(cmd))
}

fn looks_like_id_prefix(token: &str) -> bool {
    token.len() >= MIN_ID_PREFIX && token.chars().all(|ch| ch.is_ascii_hexdigit() || ch == '-')
}

fn is_path_shaped(token: &str) -> bool {
    !token.is_empty()
        && token
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}

/// Zero-based indices for a one-based dotted path. `None` unless every
/// component is a positive number.
fn index_path(token: &str) -> Option<Vec<usize>> {
    if !is_path_shaped(token) {
        return None;
    }
    token
        .split('.')
        .map(|part| part.parse::<usize>().ok()?.checked_sub(1))
        .collect()
}

fn node_by_id_prefix(forest: &[TreeNode], prefix: &str) -> anyhow::Result<NodeId> {
    if !looks_like_id_prefix(prefix) {
        bail!("id prefixes need at least {MIN_ID_PREFIX} hex digits: {prefix}");
    }
    match find_by_id_prefix(forest, prefix).as_slice() {
        [] => bail!("no node with id prefix {prefix}"),
        [node] => Ok(node.id),
        many => bail!("id prefix {prefix} matches {} nodes", many.len()),
    }
}

/// A dotted one-based index path (`1.2.1`), a unique id prefix, or `@PREFIX`
/// to force the id reading. A token that names one node by path and another
/// by id prefix is refused.
pub fn resolve_node_ref(forest: &[TreeNode], token: &str) -> anyhow::Result<NodeId> {
    if let Some(prefix) = token.strip_prefix('@') {
        return node_by_id_prefix(forest, prefix);
    }

    let by_path = index_path(token)
        .and_then(|path| node_at_path(forest, &path))
        .map(|node| node.id);
    let by_prefix: Vec<NodeId> = if looks_like_id_prefix(token) {
        find_by_id_prefix(forest, token).iter().map(|node| node.id).collect()
    } else {
        Vec::new()
    };

    match (by_path, by_prefix.as_slice()) {
        (Some(id), []) => Ok(id),
        (Some(id), [other]) if *other == id => Ok(id),
        (Some(_), _) => bail!("{token} is both an index path and an id prefix; use @{token} for the id"),
        (None, _) if looks_like_id_prefix(token) => node_by_id_prefix(forest, token),
        (None, _) if is_path_shaped(token) && index_path(token).is_none() => {
            bail!("index paths start at 1: {token}")
        }
        (None, _) if is_path_shaped(token) => bail!("no node at {token}"),
        (None, _) => bail!("invalid node reference: {token} (use an index path like 1.2 or an id prefix)"),
    }
}

/// `COLUMN:N` (one-based position) or a unique card-id prefix.
pub fn resolve_card_ref(board: &BoardSession, token: &str) -> anyhow::Result<(ColumnId, CardId)> {
    if let Some((column, position)) = token.rsplit_once(':') {
        let column_id = ColumnId::new(column);
        let col = board
            .column(&column_id)
            .ok_or_else(|| anyhow!("no column named {column}"))?;
        let idx = position
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| anyhow!("card positions start at 1: {token}"))?;
        let card = col
            .cards
            .get(idx)
            .ok_or_else(|| anyhow!("column {column} has no card {position}"))?;
        return Ok((column_id, card.id));
    }

    if !looks_like_id_prefix(token) {
        bail!("invalid card reference: {token} (use COLUMN:N or an id prefix)");
    }

    let needle = token.replace('-', "").to_ascii_lowercase();
    let hits: Vec<_> = board
        .columns()
        .iter()
        .flat_map(|col| col.cards.iter().map(move |card| (col, card)))
        .filter(|(_, card)| card.id.as_uuid().simple().to_string().starts_with(&needle))
        .collect();

    match hits.as_slice() {
        [] => bail!("no card with id prefix {token}"),
        [(col, card)] => Ok((col.id.clone(), card.id)),
        many => bail!("id prefix {token} matches {} cards", many.len()),
    }
}

fn resolve_column(board: &BoardSession, token: &str) -> anyhow::Result<ColumnId> {
    let id = ColumnId::new(token);
    board
        .column(&id)
        .map(|col| col.id.clone())
        .ok_or_else(|| anyhow!("no column named {token}"))
}

#[instrument(skip(session, cfg, renderer))]
pub fn apply_tree(
    session: &mut TreeSession,
    cfg: &Config,
    renderer: &mut Renderer,
    cmd: TreeCommand,
) -> anyhow::Result<Step> {
    let redraw = Step::Continue { redraw: true };

    let step = match cmd {
        TreeCommand::Show => redraw,
        TreeCommand::Toggle(token) => {
            let id = resolve_node_ref(session.forest(), &token)?;
            match session.toggle(id) {
                ToggleOutcome::Fetch(ticket) => Step::Fetch(ticket),
                ToggleOutcome::Busy => {
                    renderer.print_message("still loading; try again once it finishes")?;
                    Step::Continue { redraw: false }
                }
                ToggleOutcome::NotFound | ToggleOutcome::Flipped { .. } => redraw,
            }
        }
        TreeCommand::Add { parent, name } => {
            let parent_id = resolve_node_ref(session.forest(), &parent)?;
            session
                .add_child(parent_id, &name)
                .with_context(|| format!("parent {parent} vanished"))?;
            redraw
        }
        TreeCommand::Root(name) => {
            session.add_root(&name);
            redraw
        }
        TreeCommand::Rename { target, name } => {
            let id = resolve_node_ref(session.forest(), &target)?;
            session.rename(id, &name);
            redraw
        }
        TreeCommand::Remove(token) => {
            let id = resolve_node_ref(session.forest(), &token)?;
            session.request_remove(id);
            redraw
        }
        TreeCommand::Yes => {
            if session.confirm_remove().is_none() {
                renderer.print_message("nothing to confirm")?;
                Step::Continue { redraw: false }
            } else {
                redraw
            }
        }
        TreeCommand::No => {
            session.cancel_remove();
            redraw
        }
        TreeCommand::Drag(token) => {
            let id = resolve_node_ref(session.forest(), &token)?;
            session.drag_start(id);
            redraw
        }
        TreeCommand::Over(token) => {
            let id = resolve_node_ref(session.forest(), &token)?;
            session.drag_over(id);
            redraw
        }
        TreeCommand::Drop(token) => {
            let id = resolve_node_ref(session.forest(), &token)?;
            session.drop_on(id);
            redraw
        }
        TreeCommand::End => {
            session.drag_end();
            redraw
        }
        TreeCommand::Move { source, target } => {
            let source_id = resolve_node_ref(session.forest(), &source)?;
            let target_id = resolve_node_ref(session.forest(), &target)?;
            session.drag_start(source_id);
            session.drag_over(target_id);
            session.drop_on(target_id);
            redraw
        }
        TreeCommand::Wait => Step::AwaitFetches,
        TreeCommand::Json => {
            renderer.print_json(&session.snapshot())?;
            Step::Continue { redraw: false }
        }
        TreeCommand::Config => {
            print_config(cfg, renderer)?;
            Step::Continue { redraw: false }
        }
        TreeCommand::Help => {
            renderer.print_message(TREE_HELP)?;
            Step::Continue { redraw: false }
        }
        TreeCommand::Quit => Step::Quit,
    };
    Ok(step)
}

#[instrument(skip(board, cfg, renderer))]
pub fn apply_board(
    board: &mut BoardSession,
    cfg: &Config,
    renderer: &mut Renderer,
    cmd: BoardCommand,
) -> anyhow::Result<Step> {
    let redraw = Step::Continue { redraw: true };

    let step = match cmd {
        BoardCommand::Show => redraw,
        BoardCommand::Add { column, title } => {
            let column_id = resolve_column(board, &column)?;
            board.add_card(&column_id, &title);
            redraw
        }
        BoardCommand::Delete(token) => {
            let (column_id, card_id) = resolve_card_ref(board, &token)?;
            board.delete_card(&column_id, card_id);
            redraw
        }
        BoardCommand::Rename { card, title } => {
            let (_, card_id) = resolve_card_ref(board, &card)?;
            board.rename_card(card_id, &title);
            redraw
        }
        BoardCommand::Drag(token) => {
            let (column_id, card_id) = resolve_card_ref(board, &token)?;
            board.drag_start(card_id, column_id);
            redraw
        }
        BoardCommand::Over(token) => {
            let (_, card_id) = resolve_card_ref(board, &token)?;
            board.drag_over(card_id);
            redraw
        }
        BoardCommand::Drop(token) => {
            let (column_id, card_id) = resolve_card_ref(board, &token)?;
            board.drop_on_card(card_id, &column_id);
            redraw
        }
        BoardCommand::DropColumn(column) => {
            let column_id = resolve_column(board, &column)?;
            board.drop_on_column(&column_id);
            redraw
        }
        BoardCommand::End => {
            board.drag_end();
            redraw
        }
        BoardCommand::Move { card, column, before } => {
            let (source, card_id) = resolve_card_ref(board, &card)?;
            let target = resolve_column(board, &column)?;
            let before = before
                .map(|token| resolve_card_ref(board, &token))
                .transpose()?;
            board.drag_start(card_id, source);
            let moved = match before {
                Some((_, before_id)) => {
                    board.drag_over(before_id);
                    board.drop_on_card(before_id, &target)
                }
                None => board.drop_on_column(&target),
            };
            if !moved {
                renderer.print_message("card stayed where it was")?;
            }
            redraw
        }
        BoardCommand::Json => {
            renderer.print_json(&board.snapshot())?;
            Step::Continue { redraw: false }
        }
        BoardCommand::Config => {
            print_config(cfg, renderer)?;
            Step::Continue { redraw: false }
        }
        BoardCommand::Help => {
            renderer.print_message(BOARD_HELP)?;
            Step::Continue { redraw: false }
        }
        BoardCommand::Quit => Step::Quit,
    };
    Ok(step)
}

fn print_config(cfg: &Config, renderer: &mut Renderer) -> anyhow::Result<()> {
    let mut entries: Vec<_> = cfg.iter().collect();
    entries.sort();
    for (key, value) in entries {
        renderer.print_message(&format!("{key} = {value}"))?;
    }
    Ok(())
}

const TREE_HELP: &str = "\
show                 redraw the tree
toggle REF           expand/collapse (loads lazy children)
add REF NAME         add a child under REF
root NAME            add a root node
rename REF NAME      rename a node
remove REF           delete a node and its subtree (asks first)
yes | no             confirm or cancel a pending delete
drag REF             start dragging a node
over REF             hover the dragged node over REF
drop REF             drop the dragged node onto REF
end                  cancel the drag
move SRC DST         drag SRC and drop it onto DST
wait                 wait for outstanding loads
json                 print the current snapshot as JSON
config               print the effective configuration
quit                 leave

REF is an index path as printed (1.2.1) or an id prefix (4+ hex digits);
write @PREFIX when an all-digit prefix could also be read as a path.";

const BOARD_HELP: &str = "\
show                      redraw the board
add COLUMN TITLE          add a card at the end of COLUMN
delete CARD               delete a card
rename CARD TITLE         rename a card
drag CARD                 start dragging a card
over CARD                 hover the dragged card over CARD
drop CARD                 drop in front of CARD
dropcol COLUMN            drop at the end of COLUMN
end                       cancel the drag
move CARD COLUMN [BEFORE] move CARD to COLUMN, in front of BEFORE or at the end
json                      print the current snapshot as JSON
config                    print the effective configuration
quit                      leave

CARD is COLUMN:N (1-based) or an id prefix; COLUMN is a column id such as todo.";

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use crate::kanban::{Card, Column};

    fn forest() -> Vec<TreeNode> {
        vec![
            TreeNode::branch("root", vec![TreeNode::leaf("a"), TreeNode::lazy("b")]),
            TreeNode::leaf("other"),
        ]
    }

    #[test]
    fn abbreviations_must_be_unique() {
        assert_eq!(expand_command_abbrev("tog", TREE_COMMANDS), Some("toggle"));
        assert_eq!(expand_command_abbrev("drop", BOARD_COMMANDS), Some("drop"));
        assert_eq!(expand_command_abbrev("dropc", BOARD_COMMANDS), Some("dropcol"));
        assert_eq!(expand_command_abbrev("r", TREE_COMMANDS), None);
        assert_eq!(expand_command_abbrev("zzz", TREE_COMMANDS), None);
    }

    #[test]
    fn tree_commands_parse_names_with_spaces_and_quotes() {
        assert_eq!(
            parse_tree_command("add 1.2 Quarterly plan").expect("parse"),
            Some(TreeCommand::Add {
                parent: "1.2".to_string(),
                name: "Quarterly plan".to_string()
            })
        );
        assert_eq!(
            parse_tree_command("ren 1 \"Level  B\"").expect("parse"),
            Some(TreeCommand::Rename {
                target: "1".to_string(),
                name: "Level  B".to_string()
            })
        );
        assert_eq!(parse_tree_command("   ").expect("parse"), None);
        assert_eq!(parse_tree_command("# note").expect("parse"), None);
    }

    #[test]
    fn blank_names_never_reach_the_session() {
        assert!(parse_tree_command("root").is_err());
        assert!(parse_tree_command("root \"   \"").is_err());
        assert!(parse_tree_command("rename 1").is_err());
        assert!(parse_board_command("add todo").is_err());
        assert!(parse_tree_command("toggle").is_err());
        assert!(parse_tree_command("root \"unclosed").is_err());
    }

    #[test]
    fn node_refs_resolve_by_path_and_prefix() {
        let forest = forest();
        let b = forest[0].children[1].id;

        assert_eq!(resolve_node_ref(&forest, "1.2").expect("path"), b);
        assert_eq!(resolve_node_ref(&forest, "2").expect("path"), forest[1].id);
        assert_eq!(resolve_node_ref(&forest, &b.short()).expect("prefix"), b);

        assert!(resolve_node_ref(&forest, "0").is_err());
        assert!(resolve_node_ref(&forest, "1.9").is_err());
        assert!(resolve_node_ref(&forest, "abc").is_err());
        assert!(resolve_node_ref(&forest, "zzzzzz").is_err());
    }

    #[test]
    fn digit_only_prefix_that_is_also_a_path_is_refused() {
        let a = TreeNode::leaf("a").with_id(NodeId::from_uuid(Uuid::from_u128(u128::MAX)));
        let b = TreeNode::leaf("b").with_id(NodeId::from_uuid(Uuid::from_u128(0x0001_0000 << 96)));
        let forest = vec![a.clone(), b.clone()];

        let err = resolve_node_ref(&forest, "0001").expect_err("ambiguous");
        assert!(err.to_string().contains("@0001"));
        assert_eq!(resolve_node_ref(&forest, "@0001").expect("forced prefix"), b.id);
        assert_eq!(resolve_node_ref(&forest, "1").expect("path"), a.id);
        assert_eq!(resolve_node_ref(&forest, "0002").expect("path only"), b.id);
        assert!(resolve_node_ref(&forest, "@01").is_err());
    }

    #[test]
    fn card_refs_resolve_by_position_and_prefix() {
        let card = Card::new("Ship it", "#2ecc71");
        let card_id = card.id;
        let board = BoardSession::new(vec![Column {
            id: ColumnId::new("in-progress"),
            title: "In Progress".to_string(),
            color: "#f39c12".to_string(),
            cards: vec![card],
        }]);

        let (column, id) = resolve_card_ref(&board, "in-progress:1").expect("position");
        assert_eq!(column.as_str(), "in-progress");
        assert_eq!(id, card_id);
        assert_eq!(resolve_card_ref(&board, &card_id.short()).expect("prefix").1, card_id);

        assert!(resolve_card_ref(&board, "in-progress:2").is_err());
        assert!(resolve_card_ref(&board, "todo:1").is_err());
        assert!(resolve_card_ref(&board, "x").is_err());
    }

    #[test]
    fn tree_dispatch_drives_session() {
        let mut session = TreeSession::new(forest());
        let cfg = Config::default();
        let mut renderer = Renderer::plain();

        let mut run = |session: &mut TreeSession, line: &str| {
            let cmd = parse_tree_command(line).expect("parse").expect("command");
            apply_tree(session, &cfg, &mut renderer, cmd).expect("apply")
        };

        assert_eq!(run(&mut session, "add 2 child"), Step::Continue { redraw: true });
        assert_eq!(session.forest()[1].children[0].name, "child");

        let lazy = session.forest()[0].children[1].id;
        assert_eq!(run(&mut session, "toggle 1.2"), Step::Fetch(FetchTicket { node_id: lazy }));

        run(&mut session, "move 2 1.1");
        assert_eq!(session.forest().len(), 1);
        assert_eq!(session.forest()[0].children[0].children[0].name, "other");

        run(&mut session, "remove 1");
        run(&mut session, "yes");
        assert!(session.forest().is_empty());
        assert_eq!(run(&mut session, "wait"), Step::AwaitFetches);
        assert_eq!(run(&mut session, "quit"), Step::Quit);
    }

    #[test]
    fn board_dispatch_moves_cards() {
        let mut board = BoardSession::new(crate::seed::initial_columns());
        let cfg = Config::default();
        let mut renderer = Renderer::plain();

        let mut run = |board: &mut BoardSession, line: &str| {
            let cmd = parse_board_command(line).expect("parse").expect("command");
            apply_board(board, &cfg, &mut renderer, cmd).expect("apply")
        };

        let first_todo = board.columns()[0].cards[0].id;
        run(&mut board, "move todo:1 done done:1");
        let done = board.column(&ColumnId::new("done")).expect("done");
        assert_eq!(done.cards[0].id, first_todo);
        assert_eq!(board.columns()[0].cards.len(), 2);

        run(&mut board, "add in-progress Write tests");
        let progress = board.column(&ColumnId::new("in-progress")).expect("column");
        assert_eq!(progress.cards.last().map(|c| c.title.as_str()), Some("Write tests"));

        run(&mut board, "drag in-progress:4");
        run(&mut board, "dropcol todo");
        assert_eq!(
            board.columns()[0].cards.last().map(|c| c.title.as_str()),
            Some("Write tests")
        );
        assert!(board.drag().is_none());

        run(&mut board, "delete todo:3");
        assert_eq!(board.columns()[0].cards.len(), 2);
    }
}
