use crate::config::CollapsibleConfig;
use crate::dom::{Document, DomNode, Init};
use crate::error::EnhanceError;

/// A card whose body sits in a wrapper that CSS shows only while the card is `open`.
pub struct Collapsible<N> {
    card: N,
    heading: N,
}

impl<N: DomNode> Collapsible<N> {
    pub fn heading(&self) -> &N {
        &self.heading
    }
}

/// The project and experience cards, in document order.
pub struct Collapsibles<N> {
    cards: Vec<Collapsible<N>>,
    open_class: String,
}

impl<N: DomNode> Collapsibles<N> {
    /// Wraps each card's body and opens the first card.
    pub fn init<D>(doc: &D, config: &CollapsibleConfig) -> Result<Init<Self>, EnhanceError>
    where
        D: Document<Node = N>,
    {
        let mut cards = Vec::new();
        // Cards without a heading are left alone but still take up an index.
        for (index, card) in doc.query_all(&config.card_selector).into_iter().enumerate() {
            let Some(heading) = card.query(&config.heading_tag) else {
                continue;
            };

            let wrapper = doc.create_element("div")?;
            wrapper.add_class(&config.content_class);
            heading.move_following_siblings(&wrapper)?;
            card.append_child(&wrapper)?;

            card.add_class(&config.collapsible_class);
            if index == 0 {
                card.add_class(&config.open_class);
            }
            cards.push(Collapsible { card, heading });
        }

        if cards.is_empty() {
            return Ok(Init::missing(config.card_selector.as_str()));
        }
        log::debug!("Made {} cards collapsible", cards.len());
        Ok(Init::Active(Self {
            cards,
            open_class: config.open_class.clone(),
        }))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Collapsible<N>] {
        &self.cards
    }

    pub fn is_open(&self, index: usize) -> Option<bool> {
        self.cards
            .get(index)
            .map(|c| c.card.has_class(&self.open_class))
    }

    /// Opens or closes one card; returns its new state.
    pub fn toggle(&self, index: usize) -> Option<bool> {
        self.cards
            .get(index)
            .map(|c| c.card.toggle_class(&self.open_class))
    }
}
