use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Command, CustomerOrder, KitchenView, PlanError, Station, balance::SubRecipe, orders,
    search::nearest_free_counter,
};

/// Per-turn facts shared by every rule, computed once before the chain runs.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub view: KitchenView<'a>,
    /// Best order that can be completed from what is in the kitchen right now.
    pub candidate: Option<&'a CustomerOrder>,
}

impl<'a> TurnContext<'a> {
    pub fn new(view: KitchenView<'a>) -> Self {
        Self {
            view,
            candidate: orders::select(&view),
        }
    }
}

/// One link of the decision chain.
///
/// A rule either produces the turn's command or passes (`Ok(None)`) to the next one.
pub trait Rule {
    fn name(&self) -> &'static str;

    fn fire(&self, ctx: &TurnContext<'_>) -> Result<Option<Command>, PlanError>;
}

/// The command picked for a turn together with the rule that picked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub rule: String,
    pub command: Command,
}

/// Hand the finished dish in at the window.
#[derive(Debug, Default)]
pub struct DeliverFinishedDish;

impl Rule for DeliverFinishedDish {
    fn name(&self) -> &'static str {
        "deliver"
    }

    fn fire(&self, ctx: &TurnContext<'_>) -> Result<Option<Command>, PlanError> {
        Ok(orders::finished_order(&ctx.view)
            .map(|_| Command::use_at(ctx.view.station(Station::Window), "deliver")))
    }
}

/// Top up one prepared good when no order can be worked on.
#[derive(Debug)]
pub struct BalanceSubRecipe(pub SubRecipe);

impl Rule for BalanceSubRecipe {
    fn name(&self) -> &'static str {
        match self.0 {
            SubRecipe::ChoppedStrawberries => "balance strawberries",
            SubRecipe::Croissant => "balance croissant",
            SubRecipe::Tart => "balance tart",
        }
    }

    fn fire(&self, ctx: &TurnContext<'_>) -> Result<Option<Command>, PlanError> {
        if ctx.candidate.is_some() {
            return Ok(None);
        }
        self.0.balance(&ctx.view)
    }
}

/// Keep in-progress work moving once every balancer has passed.
#[derive(Debug, Default)]
pub struct ResumeSubRecipes;

impl Rule for ResumeSubRecipes {
    fn name(&self) -> &'static str {
        "resume"
    }

    fn fire(&self, ctx: &TurnContext<'_>) -> Result<Option<Command>, PlanError> {
        if ctx.candidate.is_some() {
            return Ok(None);
        }
        SubRecipe::PRIORITY
            .into_iter()
            .find_map(|recipe| recipe.resume(&ctx.view).transpose())
            .transpose()
    }
}

/// Free the chef's hands when a good is short but its balancer cannot use
/// what is held.
#[derive(Debug, Default)]
pub struct ClearHands;

impl Rule for ClearHands {
    fn name(&self) -> &'static str {
        "clear hands"
    }

    fn fire(&self, ctx: &TurnContext<'_>) -> Result<Option<Command>, PlanError> {
        let me = ctx.view.me();
        if ctx.candidate.is_some() || me.items.is_empty() {
            return Ok(None);
        }
        let short = SubRecipe::PRIORITY
            .into_iter()
            .find(|recipe| recipe.stock(&ctx.view).is_short());
        let Some(short) = short else {
            return Ok(None);
        };
        debug!(held = %me.items, recipe = ?short, "hands full while a good is short");
        let spot = nearest_free_counter(&ctx.view, me.position)?;
        Ok(Some(Command::use_at(spot, "clear hands")))
    }
}

/// Put down whatever the chosen order does not need before fetching more.
#[derive(Debug, Default)]
pub struct ShedIrrelevantItems;

impl Rule for ShedIrrelevantItems {
    fn name(&self) -> &'static str {
        "shed"
    }

    fn fire(&self, ctx: &TurnContext<'_>) -> Result<Option<Command>, PlanError> {
        let Some(order) = ctx.candidate else {
            return Ok(None);
        };
        let me = ctx.view.me();
        let extra = orders::irrelevant_items(&me.items, order);
        if extra.is_empty() {
            return Ok(None);
        }
        debug!(held = %me.items, order = %order.items, ?extra, "carrying items the order does not need");
        let spot = nearest_free_counter(&ctx.view, me.position)?;
        Ok(Some(Command::use_at(spot, "drop")))
    }
}

/// Fetch the next missing ingredient of the chosen order.
#[derive(Debug, Default)]
pub struct AssembleOrder;

impl Rule for AssembleOrder {
    fn name(&self) -> &'static str {
        "assemble"
    }

    fn fire(&self, ctx: &TurnContext<'_>) -> Result<Option<Command>, PlanError> {
        Ok(ctx
            .candidate
            .and_then(|order| orders::fetch_step(&ctx.view, order)))
    }
}

/// Last resort.
#[derive(Debug, Default)]
pub struct Idle;

impl Rule for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn fire(&self, _ctx: &TurnContext<'_>) -> Result<Option<Command>, PlanError> {
        Ok(Some(Command::wait("idle")))
    }
}

/// Stateless decision engine: an ordered list of rules evaluated top-down each turn.
pub struct DecisionEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl DecisionEngine {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Picks the command for the controlled chef.
    ///
    /// The first rule that produces a command wins. An empty chain, or one where
    /// every rule passes, yields a plain wait.
    pub fn decide(&self, view: KitchenView<'_>) -> Result<Decision, PlanError> {
        let ctx = TurnContext::new(view);
        debug!(
            held = %view.me().items,
            candidate = ?ctx.candidate.map(|order| order.items.to_string()),
            "evaluating rules"
        );

        for rule in &self.rules {
            if let Some(command) = rule.fire(&ctx)? {
                debug!(rule = rule.name(), %command, "rule fired");
                return Ok(Decision {
                    rule: rule.name().to_string(),
                    command,
                });
            }
        }

        Ok(Decision {
            rule: "none".to_string(),
            command: Command::Wait { note: None },
        })
    }
}

impl Default for DecisionEngine {
    /// Deliver, balance each good, resume work in progress, clear hands, shed,
    /// assemble, idle.
    fn default() -> Self {
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(DeliverFinishedDish)];
        rules.extend(
            SubRecipe::PRIORITY
                .into_iter()
                .map(|recipe| Box::new(BalanceSubRecipe(recipe)) as Box<dyn Rule>),
        );
        rules.push(Box::new(ResumeSubRecipes));
        rules.push(Box::new(ClearHands));
        rules.push(Box::new(ShedIrrelevantItems));
        rules.push(Box::new(AssembleOrder));
        rules.push(Box::new(Idle));
        Self::new(rules)
    }
}
