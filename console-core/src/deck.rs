// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Detail screen renderer: one entity as a deck of labeled cards.

use serde::Serialize;
use serde_json::Value;

use crate::path;
use crate::schema::ViewConfig;
use crate::table::display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub field: String,
    /// `None` when the entity lacks the key.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deck {
    /// Value of `header.key`, if the entity has one.
    pub title: Option<String>,
    /// Back navigation target.
    pub back: String,
    pub cards: Vec<Card>,
    pub buttons: bool,
}

/// Render a view screen. Cards keep their declared order.
pub fn render_deck(config: &ViewConfig, entity: &Value, pathname: &str) -> Deck {
    Deck {
        title: display(entity.get(&config.header.key)),
        back: path::resolve(&config.header.path, pathname, Some(entity)),
        cards: config
            .deck
            .cards
            .iter()
            .map(|card| Card {
                field: card.field.clone(),
                value: display(entity.get(&card.key)),
            })
            .collect(),
        buttons: config.deck.buttons,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::path::PathTarget;
    use crate::schema::{CardConfig, DeckConfig, ViewHeader};
    use crate::types::UrlTemplate;

    fn make_config() -> ViewConfig {
        ViewConfig {
            param: "testbed_slug".to_string(),
            header: ViewHeader {
                key: "name".to_string(),
                path: PathTarget::Parent,
            },
            deck: DeckConfig {
                url: UrlTemplate::new("/v0/projects/{project_slug}/testbeds/{testbed_slug}")
                    .unwrap(),
                cards: vec![
                    CardConfig {
                        field: "Testbed Name".to_string(),
                        key: "name".to_string(),
                    },
                    CardConfig {
                        field: "Testbed Slug".to_string(),
                        key: "slug".to_string(),
                    },
                    CardConfig {
                        field: "CPU".to_string(),
                        key: "cpu".to_string(),
                    },
                ],
                buttons: false,
            },
        }
    }

    #[test]
    fn test_render_cards_in_order() {
        let entity = json!({"name": "Linux Box", "slug": "linux-box", "cpu": "x86_64"});
        let deck = render_deck(&make_config(), &entity, "/console/projects/p1/testbeds/linux-box");

        assert_eq!(deck.title.as_deref(), Some("Linux Box"));
        assert_eq!(deck.back, "/console/projects/p1/testbeds");
        let fields: Vec<&str> = deck.cards.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["Testbed Name", "Testbed Slug", "CPU"]);
        assert_eq!(deck.cards[2].value.as_deref(), Some("x86_64"));
    }

    #[test]
    fn test_missing_keys_are_empty_not_errors() {
        let entity = json!({"name": "Linux Box", "cpu": null});
        let deck = render_deck(&make_config(), &entity, "/console/projects/p1/testbeds/x");
        assert_eq!(deck.cards[1].value, None);
        assert_eq!(deck.cards[2].value, None);

        let deck = render_deck(&make_config(), &Value::Null, "/console/projects/p1/testbeds/x");
        assert_eq!(deck.title, None);
        assert!(deck.cards.iter().all(|card| card.value.is_none()));
    }
}
