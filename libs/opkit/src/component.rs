//! Presentation components: pure view-config builders.

use opkit_ui::View;

use crate::operation::Entity;
use crate::params::Params;
use crate::result::{Field, Listing};

/// Structured input the dispatcher hands a component.
///
/// Either the result model's named fields passed through, or a single field
/// keyed by the operation's resource name: an explicit tag in place of
/// shape-sniffing the model at render time.
#[derive(Clone, Debug)]
pub enum InputData<E> {
    Fields(Vec<(&'static str, Field<E>)>),
    Keyed {
        key: &'static str,
        value: Field<E>,
    },
}

/// Component input: model data plus the request parameters (for sort links
/// and form redisplay).
#[derive(Clone, Debug)]
pub struct ComponentInput<E> {
    pub data: InputData<E>,
    pub params: Params,
}

impl<E> ComponentInput<E> {
    #[must_use]
    pub fn new(data: InputData<E>, params: Params) -> Self {
        Self { data, params }
    }

    fn field(&self, name: &str) -> Option<&Field<E>> {
        match &self.data {
            InputData::Fields(fields) => fields
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value),
            InputData::Keyed { key, value } if *key == name => Some(value),
            InputData::Keyed { .. } => None,
        }
    }

    /// The record under a named field, if present.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&E> {
        self.field(name).and_then(Field::as_record)
    }

    /// The listing under a named field; empty when absent.
    #[must_use]
    pub fn listing(&self, name: &str) -> &[E] {
        self.field(name)
            .and_then(Field::as_listing)
            .map_or(&[], |listing| listing.items.as_slice())
    }

    /// The full listing value under a named field.
    #[must_use]
    pub fn listing_full(&self, name: &str) -> Option<&Listing<E>> {
        self.field(name).and_then(Field::as_listing)
    }
}

/// A presentation component: consumes plain data, returns renderable config.
///
/// Components hold no business logic and perform no I/O.
pub trait Component {
    type Entity: Entity;

    fn build(&self, input: &ComponentInput<Self::Entity>) -> View;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::Widget;

    #[test]
    fn keyed_input_resolves_only_its_key() {
        let widget = Widget::new("w");
        let input: ComponentInput<Widget> = ComponentInput::new(
            InputData::Keyed {
                key: "widget",
                value: Field::record(widget.clone()),
            },
            Params::new(),
        );

        assert_eq!(input.record("widget").map(|w| w.id), Some(widget.id));
        assert!(input.record("other").is_none());
        assert!(input.listing("widget").is_empty());
    }

    #[test]
    fn fields_input_resolves_by_name() {
        let input: ComponentInput<Widget> = ComponentInput::new(
            InputData::Fields(vec![
                ("one", Field::record(Widget::new("a"))),
                ("many", Field::listing(vec![Widget::new("b"), Widget::new("c")])),
            ]),
            Params::new(),
        );

        assert!(input.record("one").is_some());
        assert_eq!(input.listing("many").len(), 2);
        assert!(input.record("missing").is_none());
    }
}
