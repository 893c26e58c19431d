//! Menu rows and their displayed values.
use std::fmt;

use crate::systems::interaction::Direction;

use super::pool::MenuId;

/// Handle of an item inside the menu that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    /// Carried by items that have not been added to a menu yet.
    pub const DETACHED: Self = Self(u32::MAX);

    pub(super) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Value shown in a row's value slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemValue {
    #[default]
    None,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ItemValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Bool(true) => f.write_str("On"),
            Self::Bool(false) => f.write_str("Off"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for ItemValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ItemValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ItemValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<String> for ItemValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Options cycled in place with left/right, wrapping at both ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListCycler {
    options: Vec<String>,
    index: usize,
}

impl ListCycler {
    pub fn new<I, S>(options: I, index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self {
            options: options.into_iter().map(Into::into).collect(),
            index,
        };
        list.clamp_index();
        list
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
        self.clamp_index();
    }

    pub fn current_option(&self) -> Option<&str> {
        self.option_at(self.index)
    }

    pub fn option_at(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn index_of(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|candidate| candidate == option)
    }

    /// Replaces the options, keeping the cursor when it is still in range.
    pub fn set_options<I, S>(&mut self, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self.clamp_index();
    }

    pub fn cycle(&mut self, direction: Direction) {
        let count = self.options.len();
        if count == 0 {
            return;
        }
        self.index = match direction {
            Direction::Left if self.index == 0 => count - 1,
            Direction::Left => self.index - 1,
            Direction::Right => (self.index + 1) % count,
        };
    }

    fn clamp_index(&mut self) {
        self.index = self.index.min(self.options.len().saturating_sub(1));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Plain,
    Toggle,
    NumberStepper,
    EnumStepper,
    ListCycler(ListCycler),
    Subsection,
    SubmenuLink,
}

impl ItemKind {
    /// Kinds whose value slot is framed as `< value >`.
    pub fn is_stepper(&self) -> bool {
        matches!(
            self,
            Self::NumberStepper | Self::EnumStepper | Self::ListCycler(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub(super) id: ItemId,
    text: String,
    description: Option<String>,
    value: ItemValue,
    kind: ItemKind,
    pub(super) persistent_index: usize,
    pub(super) linked_submenu: Option<MenuId>,
}

impl Item {
    fn with_kind(text: impl Into<String>, kind: ItemKind, value: ItemValue) -> Self {
        Self {
            id: ItemId::DETACHED,
            text: text.into(),
            description: None,
            value,
            kind,
            persistent_index: 0,
            linked_submenu: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::with_kind(text, ItemKind::Plain, ItemValue::None)
    }

    pub fn toggle(text: impl Into<String>, checked: bool) -> Self {
        Self::with_kind(text, ItemKind::Toggle, ItemValue::Bool(checked))
    }

    pub fn number_stepper(text: impl Into<String>, value: f64) -> Self {
        Self::with_kind(text, ItemKind::NumberStepper, ItemValue::Number(value))
    }

    pub fn enum_stepper(text: impl Into<String>, value: impl fmt::Display) -> Self {
        Self::with_kind(
            text,
            ItemKind::EnumStepper,
            ItemValue::Text(value.to_string()),
        )
    }

    pub fn list<I, S>(text: impl Into<String>, options: I, index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(
            text,
            ItemKind::ListCycler(ListCycler::new(options, index)),
            ItemValue::None,
        )
    }

    pub fn subsection(text: impl Into<String>) -> Self {
        Self::with_kind(text, ItemKind::Subsection, ItemValue::None)
    }

    pub fn submenu_link(text: impl Into<String>) -> Self {
        Self::with_kind(text, ItemKind::SubmenuLink, ItemValue::None)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(description);
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn clear_description(&mut self) {
        self.description = None;
    }

    pub fn value(&self) -> &ItemValue {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<ItemValue>) {
        self.value = value.into();
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn is_subsection(&self) -> bool {
        matches!(self.kind, ItemKind::Subsection)
    }

    pub fn persistent_index(&self) -> usize {
        self.persistent_index
    }

    pub fn linked_submenu(&self) -> Option<MenuId> {
        self.linked_submenu
    }

    pub fn list_cycler(&self) -> Option<&ListCycler> {
        match &self.kind {
            ItemKind::ListCycler(list) => Some(list),
            _ => None,
        }
    }

    pub fn list_cycler_mut(&mut self) -> Option<&mut ListCycler> {
        match &mut self.kind {
            ItemKind::ListCycler(list) => Some(list),
            _ => None,
        }
    }

    /// Text drawn in the value slot, if any.
    pub fn value_label(&self) -> Option<String> {
        let raw = match &self.kind {
            ItemKind::ListCycler(list) => list.current_option()?.to_string(),
            _ if self.value.is_none() => return None,
            _ => self.value.to_string(),
        };
        if self.kind.is_stepper() {
            Some(format!("< {raw} >"))
        } else {
            Some(raw)
        }
    }
}
