use crate::{Command, Composition, CustomerOrder, Ingredient, KitchenView, Station};

/// Fetch precedence for missing ingredients: prepared goods, then bins, then the plate.
const FETCH_ORDER: [Ingredient; 6] = [
    Ingredient::Croissant,
    Ingredient::Tart,
    Ingredient::ChoppedStrawberries,
    Ingredient::Blueberries,
    Ingredient::IceCream,
    Ingredient::Dish,
];

/// The waiting order whose items are exactly what the chef holds, if any.
pub fn finished_order<'a>(view: &KitchenView<'a>) -> Option<&'a CustomerOrder> {
    let held = &view.me().items;
    view.orders().iter().find(|order| order.items == *held)
}

/// Whether every ingredient the chef still lacks for `order` can be fetched right now.
///
/// Bin goods and plates are always obtainable; prepared goods must already sit on
/// a counter.
pub fn is_fulfillable(view: &KitchenView<'_>, order: &CustomerOrder) -> bool {
    let held = &view.me().items;
    order.items.difference(held).all(|missing| {
        if missing.is_raw_fetchable() {
            true
        } else if missing.is_intermediate() {
            view.counter_with(missing).is_some()
        } else {
            false
        }
    })
}

/// Orders that can be completed with what is currently in the kitchen.
pub fn candidates<'a>(view: &KitchenView<'a>) -> Vec<&'a CustomerOrder> {
    view.orders()
        .iter()
        .filter(|order| is_fulfillable(view, order))
        .collect()
}

/// Highest-reward candidate. Equal rewards go to the order listed first.
pub fn select<'a>(view: &KitchenView<'a>) -> Option<&'a CustomerOrder> {
    let mut best: Option<&'a CustomerOrder> = None;
    for order in candidates(view) {
        if best.is_none_or(|current| order.reward > current.reward) {
            best = Some(order);
        }
    }
    best
}

/// Ingredients held by the chef that `order` does not ask for.
pub fn irrelevant_items(held: &Composition, order: &CustomerOrder) -> Vec<Ingredient> {
    held.difference(&order.items).collect()
}

/// Next ingredient to go and get, in fetch precedence.
pub fn next_missing(held: &Composition, order: &CustomerOrder) -> Option<Ingredient> {
    FETCH_ORDER
        .into_iter()
        .find(|ingredient| order.items.contains(*ingredient) && !held.contains(*ingredient))
}

/// One fetch step towards `order`.
///
/// Returns `None` when the next ingredient cannot be found anywhere this turn.
pub fn fetch_step(view: &KitchenView<'_>, order: &CustomerOrder) -> Option<Command> {
    let held = &view.me().items;
    let missing = next_missing(held, order)?;
    let needs_plate = order.items.has_plate() && !held.has_plate();

    match missing {
        Ingredient::Croissant | Ingredient::Tart | Ingredient::ChoppedStrawberries => {
            let note = format!("fetch {}", missing.token().to_lowercase());
            if let Some(counter) = view.counter_with(missing) {
                Some(Command::use_at(counter, note))
            } else if view.oven().holds(missing) {
                Some(Command::use_at(view.station(Station::Oven), note))
            } else {
                None
            }
        }
        Ingredient::Blueberries | Ingredient::IceCream if needs_plate => Some(Command::use_at(
            view.station(Station::Dishwasher),
            "fetch dish",
        )),
        Ingredient::Blueberries => Some(Command::use_at(
            view.station(Station::Blueberries),
            "fetch blueberries",
        )),
        Ingredient::IceCream => Some(Command::use_at(
            view.station(Station::IceCream),
            "fetch ice cream",
        )),
        Ingredient::Dish => Some(Command::use_at(
            view.station(Station::Dishwasher),
            "fetch dish",
        )),
        _ => None,
    }
}
