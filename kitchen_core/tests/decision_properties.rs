use kitchen_core::{
    Chef, Composition, CustomerOrder, DecisionEngine, Kitchen, KitchenView, PlanError, Position,
    Snapshot, Station,
    balance::SubRecipe,
    orders,
    protocol::ProtocolReader,
    search::{MAX_SEARCH_RADIUS, nearest_free_counter},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

const LAYOUT: [&str; 7] = [
    "#####D#####",
    "#.........#",
    "#.####B##.#",
    "#.#..0.1#.I",
    "#.##S##C#.#",
    "W.........#",
    "###H#O#####",
];

const ORDER_POOL: [&str; 8] = [
    "DISH-BLUEBERRIES-ICE_CREAM",
    "DISH-ICE_CREAM",
    "DISH-BLUEBERRIES",
    "DISH-CHOPPED_STRAWBERRIES",
    "DISH-CHOPPED_STRAWBERRIES-ICE_CREAM",
    "DISH-CROISSANT-BLUEBERRIES",
    "DISH-TART-ICE_CREAM",
    "DISH-CROISSANT-TART-CHOPPED_STRAWBERRIES",
];

const ITEM_POOL: [&str; 12] = [
    "NONE",
    "DISH",
    "BLUEBERRIES",
    "ICE_CREAM",
    "STRAWBERRIES",
    "CHOPPED_STRAWBERRIES",
    "DOUGH",
    "CHOPPED_DOUGH",
    "RAW_TART",
    "CROISSANT",
    "TART",
    "DISH-ICE_CREAM",
];

const OVEN_POOL: [&str; 5] = ["NONE", "DOUGH", "CROISSANT", "RAW_TART", "TART"];

fn comp(s: &str) -> Composition {
    s.parse().unwrap()
}

fn kitchen() -> Kitchen {
    Kitchen::from_rows(&LAYOUT).unwrap()
}

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}

fn floor_cell(rng: &mut StdRng, kitchen: &Kitchen) -> Position {
    loop {
        let p = Position::new(
            rng.random_range(0..kitchen.width()),
            rng.random_range(0..kitchen.height()),
        );
        if kitchen.tile(p) == Ok(kitchen_core::kitchen::Tile::Floor) {
            return p;
        }
    }
}

fn random_snapshot(rng: &mut StdRng, kitchen: &Kitchen) -> Snapshot {
    let mut snapshot = Snapshot::new([
        Chef::new(floor_cell(rng, kitchen), comp(pick(rng, &ITEM_POOL))),
        Chef::new(floor_cell(rng, kitchen), comp(pick(rng, &ITEM_POOL))),
    ]);
    snapshot.turns_remaining = rng.random_range(1..=200);
    for counter in kitchen.counters() {
        if rng.random_bool(0.2) {
            let items = comp(pick(rng, &ITEM_POOL[1..]));
            snapshot.counters.insert(counter, items);
        }
    }
    snapshot.oven.contents = comp(pick(rng, &OVEN_POOL));
    snapshot.oven.timer = rng.random_range(0..10);
    snapshot.orders = (0..rng.random_range(0..=3))
        .map(|_| CustomerOrder::new(comp(pick(rng, &ORDER_POOL)), rng.random_range(100..2000)))
        .collect();
    snapshot
}

#[test]
fn holding_a_finished_dish_always_delivers() {
    let kitchen = kitchen();
    let engine = DecisionEngine::default();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..500 {
        let mut snapshot = random_snapshot(&mut rng, &kitchen);
        if snapshot.orders.is_empty() {
            continue;
        }
        let index = rng.random_range(0..snapshot.orders.len());
        snapshot.chefs[0].items = snapshot.orders[index].items.clone();

        let decision = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
        assert_eq!(decision.rule, "deliver");
        assert_eq!(
            decision.command.target(),
            Some(kitchen.station(Station::Window))
        );
    }
}

#[test]
fn without_candidates_the_first_acting_balancer_decides() {
    let kitchen = kitchen();
    let engine = DecisionEngine::default();
    let mut rng = StdRng::seed_from_u64(11);
    let mut checked = 0;

    for _ in 0..2000 {
        let snapshot = random_snapshot(&mut rng, &kitchen);
        let view = KitchenView::new(&kitchen, &snapshot);
        if orders::finished_order(&view).is_some() || !orders::candidates(&view).is_empty() {
            continue;
        }
        let Some(short) = SubRecipe::PRIORITY
            .into_iter()
            .find(|recipe| recipe.stock(&view).is_short())
        else {
            continue;
        };

        let expected = SubRecipe::PRIORITY
            .into_iter()
            .find_map(|recipe| recipe.balance(&view).transpose());
        let decision = engine.decide(view);
        match expected {
            Some(Ok(command)) => {
                let decision = decision.unwrap();
                assert!(decision.rule.starts_with("balance"), "short on {short:?}");
                assert_eq!(decision.command, command, "short on {short:?}");
                checked += 1;
            }
            Some(Err(err)) => assert_eq!(decision, Err(err)),
            // Every balancer declined on what the chef holds; the chef must not idle.
            None => {
                if let Ok(decision) = decision {
                    assert!(
                        decision.rule == "resume" || decision.rule == "clear hands",
                        "short on {short:?} holding {} fell through to {}",
                        snapshot.me().items,
                        decision.rule
                    );
                }
            }
        }
    }
    assert!(checked > 20, "only {checked} snapshots exercised the balancers");
}

#[test]
fn finished_bake_in_the_oven_is_collected() {
    let kitchen = kitchen();
    let engine = DecisionEngine::default();
    let mut snapshot = Snapshot::new([
        Chef::new(Position::new(5, 5), Composition::empty()),
        Chef::new(Position::new(9, 1), Composition::empty()),
    ]);
    snapshot.orders = vec![CustomerOrder::new(comp("DISH-CROISSANT"), 900)];
    snapshot.oven.contents = comp("CROISSANT");

    let take = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(take.command.target(), Some(kitchen.station(Station::Oven)));

    // In hand, the croissant makes the order workable and plating starts.
    snapshot.oven.contents = Composition::empty();
    snapshot.chefs[0].items = comp("CROISSANT");
    let plate = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(plate.rule, "assemble");
    assert_eq!(
        plate.command.target(),
        Some(kitchen.station(Station::Dishwasher))
    );
}

#[test]
fn held_strawberries_are_chopped_without_demand() {
    let kitchen = kitchen();
    let engine = DecisionEngine::default();
    let mut snapshot = Snapshot::new([
        Chef::new(Position::new(5, 5), comp("STRAWBERRIES")),
        Chef::new(Position::new(9, 1), Composition::empty()),
    ]);
    snapshot.orders = vec![CustomerOrder::new(comp("DISH-TART-ICE_CREAM"), 1500)];

    let decision = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(
        decision.command.target(),
        Some(kitchen.station(Station::ChoppingBoard))
    );
}

#[test]
fn free_counter_search_is_bounded_and_deterministic() {
    let kitchen = kitchen();
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..500 {
        let snapshot = random_snapshot(&mut rng, &kitchen);
        let view = KitchenView::new(&kitchen, &snapshot);
        let origin = snapshot.me().position;
        let free_within = |radius: usize| {
            kitchen
                .counters()
                .filter(|c| view.is_free_counter(*c))
                .any(|c| c.manhattan(&origin) <= radius)
        };

        match nearest_free_counter(&view, origin) {
            Ok(spot) => {
                assert!(kitchen.is_counter(spot));
                assert!(snapshot.counter(spot).is_none());
                assert!(Station::ALL.iter().all(|s| kitchen.station(*s) != spot));
                let distance = spot.manhattan(&origin);
                assert!((1..=MAX_SEARCH_RADIUS).contains(&distance));
                if free_within(1) {
                    assert_eq!(distance, 1);
                }
                assert_eq!(nearest_free_counter(&view, origin), Ok(spot));
            }
            Err(PlanError::NoFreeCounter { .. }) => {
                assert!(!free_within(MAX_SEARCH_RADIUS));
            }
        }
    }
}

#[test]
fn order_selection_is_idempotent() {
    let kitchen = kitchen();
    let mut rng = StdRng::seed_from_u64(19);

    for _ in 0..500 {
        let snapshot = random_snapshot(&mut rng, &kitchen);
        let view = KitchenView::new(&kitchen, &snapshot);
        assert_eq!(orders::candidates(&view), orders::candidates(&view));
        assert_eq!(orders::select(&view), orders::select(&view));
        if let Some(best) = orders::select(&view) {
            assert!(
                orders::candidates(&view)
                    .iter()
                    .all(|order| order.reward <= best.reward)
            );
        }
    }
}

#[test]
fn plated_dish_is_assembled_plate_first() {
    let kitchen = kitchen();
    let engine = DecisionEngine::default();
    let mut snapshot = Snapshot::new([
        Chef::new(Position::new(5, 1), Composition::empty()),
        Chef::new(Position::new(9, 5), Composition::empty()),
    ]);
    snapshot.orders = vec![CustomerOrder::new(comp("DISH-ICE_CREAM-BLUEBERRIES"), 10)];
    snapshot.counters.insert(Position::new(0, 0), comp("BLUEBERRIES"));

    let first = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(first.command.target(), Some(kitchen.station(Station::Dishwasher)));

    snapshot.chefs[0].items = comp("DISH");
    let second = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(second.command.target(), Some(kitchen.station(Station::Blueberries)));

    snapshot.chefs[0].items = comp("DISH-BLUEBERRIES");
    let third = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(third.command.target(), Some(kitchen.station(Station::IceCream)));

    snapshot.chefs[0].items = comp("BLUEBERRIES-ICE_CREAM-DISH");
    let fourth = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(fourth.command.target(), Some(kitchen.station(Station::Window)));
}

#[test]
fn strawberry_shortage_overrides_other_goods() {
    let kitchen = kitchen();
    let engine = DecisionEngine::default();
    let mut snapshot = Snapshot::new([
        Chef::new(Position::new(5, 3), Composition::empty()),
        Chef::new(Position::new(9, 5), Composition::empty()),
    ]);
    snapshot.orders = vec![
        CustomerOrder::new(comp("DISH-CHOPPED_STRAWBERRIES-CROISSANT"), 1200),
        CustomerOrder::new(comp("DISH-CHOPPED_STRAWBERRIES-TART"), 1700),
    ];

    let empty_handed = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(
        empty_handed.command.target(),
        Some(kitchen.station(Station::Strawberries))
    );

    snapshot.chefs[0].items = comp("STRAWBERRIES");
    let holding = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    assert_eq!(
        holding.command.target(),
        Some(kitchen.station(Station::ChoppingBoard))
    );
}

#[test]
fn unrelated_croissant_is_put_down() {
    let kitchen = kitchen();
    let engine = DecisionEngine::default();
    let mut snapshot = Snapshot::new([
        Chef::new(Position::new(5, 1), comp("CROISSANT")),
        Chef::new(Position::new(9, 5), Composition::empty()),
    ]);
    snapshot.orders = vec![CustomerOrder::new(comp("DISH-ICE_CREAM"), 400)];

    let decision = engine.decide(KitchenView::new(&kitchen, &snapshot)).unwrap();
    let target = decision.command.target().unwrap();
    assert_eq!(decision.rule, "shed");
    assert!(kitchen.is_counter(target));
    assert_ne!(target, kitchen.station(Station::Window));
}

#[test]
fn replays_a_recorded_turn() {
    let input = "\
1
DISH-ICE_CREAM 300
#####D#####
#.........#
#.####B##.#
#.#..0.1#.I
#.##S##C#.#
W.........#
###H#O#####
199
1 3 DISH-ICE_CREAM
9 1 NONE
0
NONE 0
1
DISH-ICE_CREAM 300
198
1 4 NONE
9 1 NONE
0
NONE 0
1
DISH-CROISSANT 900
";
    let mut reader = ProtocolReader::new(input.as_bytes());
    let header = reader.read_header().unwrap();
    let engine = DecisionEngine::default();

    let mut lines = Vec::new();
    while let Some(snapshot) = reader.read_turn(&header.kitchen).unwrap() {
        let decision = engine
            .decide(KitchenView::new(&header.kitchen, &snapshot))
            .unwrap();
        lines.push(decision.command.to_string());
    }
    assert_eq!(lines, vec!["USE 0 5 deliver", "USE 3 6 get dough"]);
}
