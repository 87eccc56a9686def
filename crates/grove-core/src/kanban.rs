//! Kanban board: columns of ordered cards, reordered by drag and drop.

use std::fmt;

use grove_shared::{BoardSnapshot, CardDto, ColumnDto};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::seed::random_color;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    /// Accent colour, `#rrggbb`.
    pub color: String,
}

impl Card {
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            title: title.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub color: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// In front of this card, in whichever column the card is dropped.
    Before(CardId),
    End,
}

pub fn add_card(columns: &[Column], column_id: &ColumnId, card: Card) -> Vec<Column> {
    let mut card = Some(card);
    columns
        .iter()
        .map(|col| {
            let mut col = col.clone();
            if col.id == *column_id
                && let Some(card) = card.take()
            {
                col.cards.push(card);
            }
            col
        })
        .collect()
}

pub fn delete_card(columns: &[Column], column_id: &ColumnId, card_id: CardId) -> Vec<Column> {
    columns
        .iter()
        .map(|col| {
            let mut col = col.clone();
            if col.id == *column_id {
                col.cards.retain(|card| card.id != card_id);
            }
            col
        })
        .collect()
}

pub fn rename_card(columns: &[Column], card_id: CardId, title: &str) -> Vec<Column> {
    columns
        .iter()
        .map(|col| Column {
            cards: col
                .cards
                .iter()
                .map(|card| {
                    if card.id == card_id {
                        Card {
                            title: title.to_string(),
                            ..card.clone()
                        }
                    } else {
                        card.clone()
                    }
                })
                .collect(),
            ..col.clone()
        })
        .collect()
}

/// Take `card_id` out of `source` and place it in `target`.
///
/// Returns `None`, leaving the caller's board as it was, when any column or
/// card involved cannot be found or the move would be a no-op on itself.
pub fn move_card(
    columns: &[Column],
    card_id: CardId,
    source: &ColumnId,
    target: &ColumnId,
    placement: Placement,
) -> Option<Vec<Column>> {
    if placement == Placement::Before(card_id) {
        return None;
    }

    let mut next = columns.to_vec();
    let source_idx = next.iter().position(|col| col.id == *source)?;
    let card_idx = next[source_idx].cards.iter().position(|card| card.id == card_id)?;
    let target_idx = next.iter().position(|col| col.id == *target)?;

    let card = next[source_idx].cards.remove(card_idx);
    let cards = &mut next[target_idx].cards;
    match placement {
        Placement::Before(before) => match cards.iter().position(|c| c.id == before) {
            Some(idx) => cards.insert(idx, card),
            None => cards.push(card),
        },
        Placement::End => {
            if cards.iter().any(|c| c.id == card_id) {
                return None;
            }
            cards.push(card);
        }
    }
    Some(next)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDrag {
    pub card_id: CardId,
    pub source_column: ColumnId,
}

#[derive(Debug, Clone, Default)]
pub struct BoardSession {
    columns: Vec<Column>,
    drag: Option<CardDrag>,
    drag_over_card: Option<CardId>,
}

impl BoardSession {
    pub fn new(columns: Vec<Column>) -> Self {
        info!(columns = columns.len(), "board session started");
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn drag(&self) -> Option<&CardDrag> {
        self.drag.as_ref()
    }

    pub fn drag_over_card(&self) -> Option<CardId> {
        self.drag_over_card
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| col.id == *id)
    }

    /// The column currently holding `card_id`.
    pub fn column_of(&self, card_id: CardId) -> Option<&Column> {
        self.columns
            .iter()
            .find(|col| col.cards.iter().any(|card| card.id == card_id))
    }

    #[instrument(skip(self), fields(column = %column_id))]
    pub fn add_card(&mut self, column_id: &ColumnId, title: &str) -> Option<CardId> {
        self.column(column_id)?;
        let card = Card::new(title, random_color());
        let id = card.id;
        self.columns = add_card(&self.columns, column_id, card);
        debug!(card = %id, "added card");
        Some(id)
    }

    #[instrument(skip(self), fields(column = %column_id, card = %card_id))]
    pub fn delete_card(&mut self, column_id: &ColumnId, card_id: CardId) {
        self.columns = delete_card(&self.columns, column_id, card_id);
        if self.drag.as_ref().is_some_and(|drag| drag.card_id == card_id) {
            self.drag_end();
        }
    }

    #[instrument(skip(self), fields(card = %card_id))]
    pub fn rename_card(&mut self, card_id: CardId, title: &str) {
        self.columns = rename_card(&self.columns, card_id, title);
    }

    #[instrument(skip(self), fields(card = %card_id, column = %column_id))]
    pub fn drag_start(&mut self, card_id: CardId, column_id: ColumnId) {
        self.drag = Some(CardDrag {
            card_id,
            source_column: column_id,
        });
        self.drag_over_card = None;
    }

    pub fn drag_over(&mut self, card_id: CardId) {
        self.drag_over_card = Some(card_id);
    }

    pub fn drag_end(&mut self) {
        self.drag = None;
        self.drag_over_card = None;
    }

    /// Drop in front of `target_card` inside `target_column`.
    #[instrument(skip(self), fields(target = %target_card, column = %target_column))]
    pub fn drop_on_card(&mut self, target_card: CardId, target_column: &ColumnId) -> bool {
        self.finish_drop(target_column, Placement::Before(target_card))
    }

    /// Drop at the end of `target_column`.
    #[instrument(skip(self), fields(column = %target_column))]
    pub fn drop_on_column(&mut self, target_column: &ColumnId) -> bool {
        self.finish_drop(target_column, Placement::End)
    }

    fn finish_drop(&mut self, target_column: &ColumnId, placement: Placement) -> bool {
        let drag = self.drag.take();
        self.drag_over_card = None;

        let Some(CardDrag {
            card_id,
            source_column,
        }) = drag
        else {
            return false;
        };

        match move_card(&self.columns, card_id, &source_column, target_column, placement) {
            Some(next) => {
                self.columns = next;
                debug!(card = %card_id, "card moved");
                true
            }
            None => {
                if placement != Placement::Before(card_id) {
                    warn!(card = %card_id, "card move had nothing to act on");
                }
                false
            }
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            columns: self
                .columns
                .iter()
                .map(|col| ColumnDto {
                    id: col.id.to_string(),
                    title: col.title.clone(),
                    color: col.color.clone(),
                    cards: col
                        .cards
                        .iter()
                        .map(|card| CardDto {
                            id: card.id.as_uuid(),
                            title: card.title.clone(),
                            color: card.color.clone(),
                        })
                        .collect(),
                })
                .collect(),
            dragging_card: self.drag.as_ref().map(|drag| drag.card_id.as_uuid()),
            drag_over_card: self.drag_over_card.map(|id| id.as_uuid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::PALETTE;

    fn board() -> (Vec<Column>, [CardId; 4]) {
        let a = Card::new("a", "#f39c12");
        let b = Card::new("b", "#e74c3c");
        let c = Card::new("c", "#2ecc71");
        let d = Card::new("d", "#3498db");
        let ids = [a.id, b.id, c.id, d.id];
        let columns = vec![
            Column {
                id: ColumnId::new("todo"),
                title: "Todo".to_string(),
                color: "#3498db".to_string(),
                cards: vec![a, b, c],
            },
            Column {
                id: ColumnId::new("done"),
                title: "Done".to_string(),
                color: "#2ecc71".to_string(),
                cards: vec![d],
            },
        ];
        (columns, ids)
    }

    fn titles(col: &Column) -> Vec<&str> {
        col.cards.iter().map(|card| card.title.as_str()).collect()
    }

    #[test]
    fn add_delete_rename() {
        let (columns, [a, _, _, d]) = board();
        let todo = ColumnId::new("todo");
        let done = ColumnId::new("done");

        let added = add_card(&columns, &done, Card::new("e", "#9b59b6"));
        assert_eq!(titles(&added[1]), vec!["d", "e"]);
        assert_eq!(add_card(&columns, &ColumnId::new("nope"), Card::new("x", "#000000")), columns);

        let deleted = delete_card(&columns, &todo, a);
        assert_eq!(titles(&deleted[0]), vec!["b", "c"]);
        assert_eq!(delete_card(&columns, &todo, d), columns);

        let renamed = rename_card(&columns, d, "shipped");
        assert_eq!(titles(&renamed[1]), vec!["shipped"]);
    }

    #[test]
    fn move_before_card_within_column() {
        let (columns, [a, _, c, _]) = board();
        let todo = ColumnId::new("todo");
        let next = move_card(&columns, c, &todo, &todo, Placement::Before(a)).expect("moved");
        assert_eq!(titles(&next[0]), vec!["c", "a", "b"]);
    }

    #[test]
    fn move_across_columns() {
        let (columns, [a, b, _, d]) = board();
        let todo = ColumnId::new("todo");
        let done = ColumnId::new("done");

        let next = move_card(&columns, b, &todo, &done, Placement::Before(d)).expect("moved");
        assert_eq!(titles(&next[0]), vec!["a", "c"]);
        assert_eq!(titles(&next[1]), vec!["b", "d"]);

        let next = move_card(&columns, a, &todo, &done, Placement::End).expect("moved");
        assert_eq!(titles(&next[1]), vec!["d", "a"]);

        let missing = CardId::new();
        let next = move_card(&columns, a, &todo, &done, Placement::Before(missing)).expect("moved");
        assert_eq!(titles(&next[1]), vec!["d", "a"]);
    }

    #[test]
    fn move_within_column_to_end() {
        let (columns, [a, _, _, _]) = board();
        let todo = ColumnId::new("todo");
        let next = move_card(&columns, a, &todo, &todo, Placement::End).expect("moved");
        assert_eq!(titles(&next[0]), vec!["b", "c", "a"]);
    }

    #[test]
    fn invalid_moves_lose_nothing() {
        let (columns, [a, _, _, d]) = board();
        let todo = ColumnId::new("todo");
        let gone = ColumnId::new("gone");

        assert!(move_card(&columns, a, &todo, &todo, Placement::Before(a)).is_none());
        assert!(move_card(&columns, a, &todo, &gone, Placement::End).is_none());
        assert!(move_card(&columns, a, &gone, &todo, Placement::End).is_none());
        assert!(move_card(&columns, d, &todo, &todo, Placement::End).is_none());
    }

    #[test]
    fn session_drag_drop_clears_state() {
        let (columns, [a, b, _, d]) = board();
        let mut session = BoardSession::new(columns);
        let todo = ColumnId::new("todo");
        let done = ColumnId::new("done");

        session.drag_start(a, todo.clone());
        session.drag_over(d);
        assert_eq!(session.snapshot().drag_over_card, Some(d.as_uuid()));
        assert!(session.drop_on_card(d, &done));
        assert!(session.drag().is_none());
        assert!(session.drag_over_card().is_none());
        assert_eq!(session.column_of(a).map(|c| c.id.clone()), Some(done.clone()));

        session.drag_start(b, todo.clone());
        assert!(!session.drop_on_card(b, &todo));
        assert!(session.drag().is_none());

        assert!(!session.drop_on_column(&done));

        session.drag_start(b, todo);
        assert!(session.drop_on_column(&done));
        assert_eq!(titles(session.column(&done).expect("done")), vec!["a", "d", "b"]);
    }

    #[test]
    fn session_add_uses_palette() {
        let (columns, _) = board();
        let mut session = BoardSession::new(columns);
        let id = session.add_card(&ColumnId::new("done"), "new").expect("column exists");
        let card = session
            .column_of(id)
            .and_then(|col| col.cards.iter().find(|card| card.id == id))
            .expect("card");
        assert!(PALETTE.contains(&card.color.as_str()));
        assert!(session.add_card(&ColumnId::new("nope"), "x").is_none());

        session.drag_start(id, ColumnId::new("done"));
        session.delete_card(&ColumnId::new("done"), id);
        assert!(session.drag().is_none());
        assert!(session.column_of(id).is_none());
    }
}
