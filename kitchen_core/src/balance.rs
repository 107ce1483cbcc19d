//! Supply/demand balancing for the goods that must be prepared before plating.
//!
//! Each [`SubRecipe`] counts how many waiting orders need its product and how many
//! already exist on counters, in the oven or in a chef's hands. On a shortage the
//! controlled chef is moved one step along the recipe, picking up half-finished
//! work before starting from the bin.
//!
//! Work already under way does not wait for a shortage: [`SubRecipe::resume`]
//! empties the oven of a finished bake and keeps a held stage moving.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Command, Ingredient, KitchenView, PlanError, Station, search::nearest_free_counter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubRecipe {
    ChoppedStrawberries,
    Croissant,
    Tart,
}

/// Demand and supply figures for one good on one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stock {
    pub required: usize,
    pub available: usize,
}

impl Stock {
    pub fn is_short(&self) -> bool {
        self.available < self.required
    }
}

impl SubRecipe {
    /// Evaluation order; the first balancer that acts wins the turn.
    pub const PRIORITY: [SubRecipe; 3] = [
        SubRecipe::ChoppedStrawberries,
        SubRecipe::Croissant,
        SubRecipe::Tart,
    ];

    pub fn product(&self) -> Ingredient {
        match self {
            SubRecipe::ChoppedStrawberries => Ingredient::ChoppedStrawberries,
            SubRecipe::Croissant => Ingredient::Croissant,
            SubRecipe::Tart => Ingredient::Tart,
        }
    }

    /// Oven contents that will become (or already are) this product.
    fn oven_stages(&self) -> &'static [Ingredient] {
        match self {
            SubRecipe::ChoppedStrawberries => &[],
            SubRecipe::Croissant => &[Ingredient::Dough, Ingredient::Croissant],
            SubRecipe::Tart => &[Ingredient::RawTart, Ingredient::Tart],
        }
    }

    /// Held compositions that are on the way to this product, product excluded.
    fn held_stages(&self) -> &'static [Ingredient] {
        match self {
            SubRecipe::ChoppedStrawberries => &[Ingredient::Strawberries],
            SubRecipe::Croissant => &[Ingredient::Dough],
            SubRecipe::Tart => &[
                Ingredient::Dough,
                Ingredient::ChoppedDough,
                Ingredient::RawTart,
            ],
        }
    }

    pub fn stock(&self, view: &KitchenView<'_>) -> Stock {
        let product = self.product();
        let required = view
            .orders()
            .iter()
            .filter(|order| order.items.contains(product))
            .count();
        let in_oven = self
            .oven_stages()
            .iter()
            .any(|stage| view.oven().holds(*stage));
        let available = view.counters_containing(product)
            + usize::from(in_oven)
            + view.chefs_holding(product);
        Stock {
            required,
            available,
        }
    }

    /// Runs the balancer for this good.
    ///
    /// Returns `Ok(None)` when there is nothing for this good to do, which lets the
    /// next balancer in [`SubRecipe::PRIORITY`] have a go.
    pub fn balance(&self, view: &KitchenView<'_>) -> Result<Option<Command>, PlanError> {
        let stock = self.stock(view);
        debug!(recipe = ?self, required = stock.required, available = stock.available, "stock");

        let me = view.me();
        if stock.is_short() {
            return self.advance(view);
        }
        if me.items.is_only(self.product()) {
            return store(view, self.product()).map(Some);
        }
        Ok(None)
    }

    /// Carries on with this good regardless of demand.
    ///
    /// An empty-handed chef takes a finished product out of the oven; a chef holding
    /// an unfinished stage moves it one step further. Anything else passes.
    pub fn resume(&self, view: &KitchenView<'_>) -> Result<Option<Command>, PlanError> {
        let held = &view.me().items;
        let product = self.product();

        if held.is_empty() {
            let command = view.oven().holds(product).then(|| {
                Command::use_at(
                    view.station(Station::Oven),
                    format!("take {}", product.token().to_lowercase()),
                )
            });
            return Ok(command);
        }
        if self.held_stages().iter().any(|stage| held.is_only(*stage)) {
            return self.advance(view);
        }
        Ok(None)
    }

    /// One step along the preparation sequence, keyed on what the chef holds.
    fn advance(&self, view: &KitchenView<'_>) -> Result<Option<Command>, PlanError> {
        let held = &view.me().items;
        let oven = view.oven();

        if held.is_empty() {
            return Ok(Some(self.start(view)));
        }

        let command = match self {
            SubRecipe::ChoppedStrawberries => {
                if held.is_only(Ingredient::Strawberries) {
                    Some(Command::use_at(
                        view.station(Station::ChoppingBoard),
                        "chop strawberries",
                    ))
                } else if held.is_only(Ingredient::ChoppedStrawberries) {
                    Some(store(view, Ingredient::ChoppedStrawberries)?)
                } else {
                    None
                }
            }
            SubRecipe::Croissant => {
                if held.is_only(Ingredient::Dough) {
                    if oven.is_empty() {
                        Some(Command::use_at(view.station(Station::Oven), "bake croissant"))
                    } else {
                        Some(Command::wait("oven busy"))
                    }
                } else if held.is_only(Ingredient::Croissant) {
                    Some(store(view, Ingredient::Croissant)?)
                } else {
                    None
                }
            }
            SubRecipe::Tart => {
                if held.is_only(Ingredient::Dough) {
                    Some(Command::use_at(
                        view.station(Station::ChoppingBoard),
                        "chop dough",
                    ))
                } else if held.is_only(Ingredient::ChoppedDough) {
                    Some(Command::use_at(
                        view.station(Station::Blueberries),
                        "fill tart",
                    ))
                } else if held.is_only(Ingredient::RawTart) {
                    if oven.is_empty() {
                        Some(Command::use_at(view.station(Station::Oven), "bake tart"))
                    } else {
                        Some(store(view, Ingredient::RawTart)?)
                    }
                } else if held.is_only(Ingredient::Tart) {
                    Some(store(view, Ingredient::Tart)?)
                } else {
                    None
                }
            }
        };
        Ok(command)
    }

    /// Empty-handed step: resume work in progress before opening a new batch.
    fn start(&self, view: &KitchenView<'_>) -> Command {
        let oven = view.oven();
        match self {
            SubRecipe::ChoppedStrawberries => view
                .counter_with(Ingredient::Strawberries)
                .map(|p| Command::use_at(p, "take strawberries"))
                .unwrap_or_else(|| {
                    Command::use_at(view.station(Station::Strawberries), "get strawberries")
                }),
            SubRecipe::Croissant => {
                if oven.holds(Ingredient::Croissant) {
                    Command::use_at(view.station(Station::Oven), "take croissant")
                } else {
                    view.counter_with(Ingredient::Dough)
                        .map(|p| Command::use_at(p, "take dough"))
                        .unwrap_or_else(|| {
                            Command::use_at(view.station(Station::DoughBin), "get dough")
                        })
                }
            }
            SubRecipe::Tart => {
                if oven.holds(Ingredient::RawTart) {
                    return Command::wait("tart baking");
                }
                if oven.holds(Ingredient::Tart) {
                    return Command::use_at(view.station(Station::Oven), "take tart");
                }
                [
                    Ingredient::RawTart,
                    Ingredient::ChoppedDough,
                    Ingredient::Dough,
                ]
                .into_iter()
                .find_map(|stage| view.counter_with(stage))
                .map(|p| Command::use_at(p, "resume tart"))
                .unwrap_or_else(|| Command::use_at(view.station(Station::DoughBin), "get dough"))
            }
        }
    }
}

/// Puts the held item down on the closest free counter.
fn store(view: &KitchenView<'_>, ingredient: Ingredient) -> Result<Command, PlanError> {
    let me = view.me();
    let spot = nearest_free_counter(view, me.position)?;
    Ok(Command::use_at(
        spot,
        format!("store {}", ingredient.token().to_lowercase()),
    ))
}
