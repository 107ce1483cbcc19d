use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Composition, Ingredient, Kitchen, Position, Station};

/// Index of the chef this engine controls.
pub const CONTROLLED: usize = 0;

/// Position and held items of one chef.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chef {
    pub position: Position,
    pub items: Composition,
}

impl Chef {
    pub fn new(position: Position, items: Composition) -> Self {
        Self { position, items }
    }
}

/// The single oven. `timer` is reported by the referee but no rule reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oven {
    pub contents: Composition,
    pub timer: u32,
}

impl Oven {
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn holds(&self, ingredient: Ingredient) -> bool {
        self.contents.is_only(ingredient)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub items: Composition,
    pub reward: u32,
}

impl CustomerOrder {
    pub fn new(items: Composition, reward: u32) -> Self {
        Self { items, reward }
    }
}

/// Everything that changes from one turn to the next.
///
/// Built fresh from each turn's input; nothing is carried over between turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub turns_remaining: u32,
    pub chefs: [Chef; 2],
    /// Occupied counters only. Empty counters are absent.
    pub counters: HashMap<Position, Composition>,
    pub oven: Oven,
    pub orders: Vec<CustomerOrder>,
}

impl Snapshot {
    pub fn new(chefs: [Chef; 2]) -> Self {
        Self {
            turns_remaining: 0,
            chefs,
            counters: HashMap::new(),
            oven: Oven::default(),
            orders: Vec::new(),
        }
    }

    pub fn me(&self) -> &Chef {
        &self.chefs[CONTROLLED]
    }

    pub fn partner(&self) -> &Chef {
        &self.chefs[1 - CONTROLLED]
    }

    pub fn counter(&self, position: Position) -> Option<&Composition> {
        self.counters.get(&position)
    }
}

/// Read-only view handed to the decision engine: the static layout plus one turn.
#[derive(Debug, Clone, Copy)]
pub struct KitchenView<'a> {
    pub kitchen: &'a Kitchen,
    pub snapshot: &'a Snapshot,
}

impl<'a> KitchenView<'a> {
    pub fn new(kitchen: &'a Kitchen, snapshot: &'a Snapshot) -> Self {
        Self { kitchen, snapshot }
    }

    pub fn station(&self, station: Station) -> Position {
        self.kitchen.station(station)
    }

    pub fn me(&self) -> &'a Chef {
        self.snapshot.me()
    }

    pub fn oven(&self) -> &'a Oven {
        &self.snapshot.oven
    }

    pub fn orders(&self) -> &'a [CustomerOrder] {
        &self.snapshot.orders
    }

    /// Occupied counters in row-major layout order.
    pub fn occupied_counters(&self) -> impl Iterator<Item = (Position, &'a Composition)> + 'a {
        let snapshot = self.snapshot;
        self.kitchen
            .counters()
            .filter_map(move |position| snapshot.counter(position).map(|items| (position, items)))
    }

    pub fn is_free_counter(&self, position: Position) -> bool {
        self.kitchen.is_counter(position) && self.snapshot.counter(position).is_none()
    }

    /// First counter holding exactly `ingredient` and nothing else.
    pub fn counter_with(&self, ingredient: Ingredient) -> Option<Position> {
        self.occupied_counters()
            .find(|(_, items)| items.is_only(ingredient))
            .map(|(position, _)| position)
    }

    /// Number of counters whose contents include `ingredient`.
    pub fn counters_containing(&self, ingredient: Ingredient) -> usize {
        self.occupied_counters()
            .filter(|(_, items)| items.contains(ingredient))
            .count()
    }

    /// Number of chefs, controlled or not, holding `ingredient`.
    pub fn chefs_holding(&self, ingredient: Ingredient) -> usize {
        self.snapshot
            .chefs
            .iter()
            .filter(|chef| chef.items.contains(ingredient))
            .count()
    }
}
