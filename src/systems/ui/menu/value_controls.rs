//! Helpers that drive caller-owned values from a menu's frame edges.
//!
//! The authoritative value lives with the caller. Each helper checks whether
//! `item` is the selected row and whether this frame produced the matching
//! edge, updates the value, and writes the (clamped, rounded) result back to
//! the item's value slot. Call each helper once per frame, after the pool
//! tick or from one of the menu's listeners. The return value tells whether
//! the caller's value changed.
use std::{fmt, ops::RangeInclusive};

use enum_map::Enum;

use crate::systems::interaction::{Direction, MenuAction};

use super::{defs::ItemId, Menu};

#[derive(Debug, Clone, PartialEq)]
pub struct NumberStep {
    pub normal: f64,
    pub fast: f64,
    pub range: Option<RangeInclusive<f64>>,
    /// Decimal places kept after every step.
    pub decimals: u32,
}

impl NumberStep {
    pub fn new(normal: f64, fast: f64) -> Self {
        Self {
            normal,
            fast,
            range: None,
            decimals: 2,
        }
    }

    pub fn with_range(mut self, range: RangeInclusive<f64>) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    fn normalize(&self, value: f64) -> f64 {
        let value = match &self.range {
            Some(range) if range.start() <= range.end() => value.clamp(*range.start(), *range.end()),
            _ => value,
        };
        let factor = 10f64.powi(self.decimals.min(15) as i32);
        (value * factor).round() / factor
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntStep {
    pub normal: i64,
    pub fast: i64,
    pub range: Option<RangeInclusive<i64>>,
}

impl IntStep {
    pub fn new(normal: i64, fast: i64) -> Self {
        Self {
            normal,
            fast,
            range: None,
        }
    }

    pub fn with_range(mut self, range: RangeInclusive<i64>) -> Self {
        self.range = Some(range);
        self
    }

    fn normalize(&self, value: i64) -> i64 {
        match &self.range {
            Some(range) if range.start() <= range.end() => value.clamp(*range.start(), *range.end()),
            _ => value,
        }
    }
}

fn selected_direction(menu: &Menu, item: ItemId) -> Option<Direction> {
    if menu.is_selected(item) {
        menu.edges().direction()
    } else {
        None
    }
}

/// Flips `value` on an accept edge while `item` is selected.
pub fn control_bool(menu: &mut Menu, item: ItemId, value: &mut bool) -> bool {
    let changed = menu.is_selected(item) && menu.edges().pressed(MenuAction::Accept);
    if changed {
        *value = !*value;
    }
    if let Some(target) = menu.item_mut(item) {
        target.set_value(*value);
    }
    changed
}

/// Steps `value` on left/right edges, using the fast step while the fast
/// modifier is held.
pub fn control_float(menu: &mut Menu, item: ItemId, value: &mut f64, step: &NumberStep) -> bool {
    let previous = *value;
    if let Some(direction) = selected_direction(menu, item) {
        let amount = if menu.edges().fast_modifier_held() {
            step.fast
        } else {
            step.normal
        };
        let delta = match direction {
            Direction::Left => -amount,
            Direction::Right => amount,
        };
        *value = step.normalize(*value + delta);
    }
    if let Some(target) = menu.item_mut(item) {
        target.set_value(*value);
    }
    *value != previous
}

pub fn control_int(menu: &mut Menu, item: ItemId, value: &mut i64, step: &IntStep) -> bool {
    let previous = *value;
    if let Some(direction) = selected_direction(menu, item) {
        let amount = if menu.edges().fast_modifier_held() {
            step.fast
        } else {
            step.normal
        };
        let stepped = match direction {
            Direction::Left => value.saturating_sub(amount),
            Direction::Right => value.saturating_add(amount),
        };
        *value = step.normalize(stepped);
    }
    if let Some(target) = menu.item_mut(item) {
        target.set_value(*value);
    }
    *value != previous
}

/// Cycles `value` through the enum's variants in declaration order, wrapping
/// at both ends.
pub fn control_enum<T>(menu: &mut Menu, item: ItemId, value: &mut T) -> bool
where
    T: Enum + Copy + fmt::Display,
{
    let mut changed = false;
    if let Some(direction) = selected_direction(menu, item) {
        let length = T::LENGTH;
        if length > 0 {
            let ordinal = value.into_usize();
            let next = match direction {
                Direction::Left => (ordinal + length - 1) % length,
                Direction::Right => (ordinal + 1) % length,
            };
            changed = next != ordinal;
            *value = T::from_usize(next);
        }
    }
    if let Some(target) = menu.item_mut(item) {
        target.set_value(value.to_string());
    }
    changed
}
