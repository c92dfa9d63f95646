//! Shopping cart.
//!
//! Cart lines are identified by the menu item together with the set of
//! selected add-ons, so the same dish with different add-ons occupies
//! separate lines. A line never holds a quantity of zero.

use std::collections::BTreeSet;

use quickbite_sdk::types::{AddonId, MenuItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    /// Menu item.
    pub menu_item_id: MenuItemId,
    /// Selected add-ons. Order of selection does not matter.
    pub addon_ids: BTreeSet<AddonId>,
}

impl LineKey {
    /// Creates a key from a menu item and its add-ons in any order.
    #[must_use]
    pub fn new(menu_item_id: MenuItemId, addon_ids: impl IntoIterator<Item = AddonId>) -> Self {
        Self {
            menu_item_id,
            addon_ids: addon_ids.into_iter().collect(),
        }
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Menu item.
    pub menu_item_id: MenuItemId,
    /// Item name, for display.
    pub name: String,
    /// Price of one unit including add-ons.
    pub unit_price: Decimal,
    /// Selected add-ons.
    #[serde(default)]
    pub addon_ids: BTreeSet<AddonId>,
    /// Number of units.
    pub quantity: u32,
    /// Free-text preparation instructions.
    #[serde(default)]
    pub instructions: String,
}

impl CartLine {
    /// Creates a line without add-ons or instructions.
    #[must_use]
    pub fn new(
        menu_item_id: MenuItemId,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            menu_item_id,
            name: name.into(),
            unit_price,
            addon_ids: BTreeSet::new(),
            quantity,
            instructions: String::new(),
        }
    }

    /// Sets the selected add-ons.
    #[must_use]
    pub fn with_addons(mut self, addon_ids: impl IntoIterator<Item = AddonId>) -> Self {
        self.addon_ids = addon_ids.into_iter().collect();
        self
    }

    /// Sets the instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Returns the identity of the line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            menu_item_id: self.menu_item_id.clone(),
            addon_ids: self.addon_ids.clone(),
        }
    }

    /// Returns true if the line has the given identity.
    #[must_use]
    pub fn matches(&self, key: &LineKey) -> bool {
        self.menu_item_id == key.menu_item_id && self.addon_ids == key.addon_ids
    }

    /// Returns unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The shopping cart, lines in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn line_mut(&mut self, key: &LineKey) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.matches(key))
    }

    /// Adds a line, merging it into an existing line with the same identity.
    ///
    /// Quantities are summed. Non-empty instructions on the incoming line
    /// replace the stored ones. A zero quantity is ignored.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }

        let key = line.key();
        match self.line_mut(&key) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                if !line.instructions.is_empty() {
                    existing.instructions = line.instructions;
                }
            }
            None => self.lines.push(line),
        }
    }

    /// Sets the quantity of a line. Zero removes it.
    ///
    /// Returns false if no line has the identity.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(key).is_some();
        }
        match self.line_mut(key) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Changes the quantity of a line by `delta`, removing it at zero or below.
    ///
    /// Returns false if no line has the identity.
    pub fn adjust_quantity(&mut self, key: &LineKey, delta: i32) -> bool {
        let Some(current) = self.get(key).map(|line| i64::from(line.quantity)) else {
            return false;
        };
        let next = current.saturating_add(i64::from(delta));
        let quantity = u32::try_from(next.max(0)).unwrap_or(u32::MAX);
        self.set_quantity(key, quantity)
    }

    /// Removes exactly the line with the given identity.
    pub fn remove(&mut self, key: &LineKey) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.matches(key))?;
        Some(self.lines.remove(index))
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the line with the given identity.
    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(key))
    }

    /// Returns the lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the total number of units.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Returns the sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}
