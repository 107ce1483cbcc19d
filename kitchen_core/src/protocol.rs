//! Reader for the referee's line-based input.
//!
//! The game starts with a header (every customer of the game, then the kitchen
//! rows) followed by one block per turn:
//!
//! ```text
//! <turns remaining>
//! <x> <y> <held>            controlled chef
//! <x> <y> <held>            partner
//! <n>                       occupied counters
//! <x> <y> <items>           (n lines)
//! <oven contents> <timer>
//! <m>                       waiting customers
//! <items> <reward>          (m lines)
//! ```

use std::{collections::HashMap, io::BufRead, str::FromStr};

use tracing::{trace, warn};

use crate::{
    Chef, Composition, CustomerOrder, Kitchen, Oven, Position, Snapshot,
    items::UnknownIngredient,
    kitchen::{KITCHEN_HEIGHT, KitchenError},
};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input ended while expecting {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("Line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("Line {line}: {source}")]
    Ingredient {
        line: usize,
        source: UnknownIngredient,
    },
    #[error("Invalid kitchen: {0}")]
    Kitchen(#[from] KitchenError),
}

/// Data sent once before the first turn.
#[derive(Debug, Clone)]
pub struct GameHeader {
    /// Every customer that will show up during the game. Not used for decisions.
    pub all_orders: Vec<CustomerOrder>,
    pub kitchen: Kitchen,
}

pub struct ProtocolReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> ProtocolReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.lines.next() {
            Some(line) => {
                let line = line?;
                self.line_no += 1;
                trace!(line_no = self.line_no, "{line}");
                Ok(Some(line))
            }
            None => Ok(None),
        }
    }

    fn expect_line(&mut self, expected: &'static str) -> Result<String, ProtocolError> {
        self.next_line()?
            .ok_or(ProtocolError::UnexpectedEof { expected })
    }

    fn malformed(&self, reason: impl Into<String>) -> ProtocolError {
        ProtocolError::Malformed {
            line: self.line_no,
            reason: reason.into(),
        }
    }

    fn number<T: FromStr>(&self, token: Option<&str>, what: &str) -> Result<T, ProtocolError> {
        let token = token.ok_or_else(|| self.malformed(format!("missing {what}")))?;
        token
            .parse()
            .map_err(|_| self.malformed(format!("invalid {what} '{token}'")))
    }

    fn composition(&self, token: Option<&str>) -> Result<Composition, ProtocolError> {
        let token = token.ok_or_else(|| self.malformed("missing item list"))?;
        token.parse().map_err(|source| ProtocolError::Ingredient {
            line: self.line_no,
            source,
        })
    }

    fn count(&mut self, expected: &'static str) -> Result<usize, ProtocolError> {
        let line = self.expect_line(expected)?;
        self.number(line.split_whitespace().next(), expected)
    }

    fn order(&mut self) -> Result<CustomerOrder, ProtocolError> {
        let line = self.expect_line("customer order")?;
        let mut tokens = line.split_whitespace();
        let items = self.composition(tokens.next())?;
        let reward = self.number(tokens.next(), "reward")?;
        Ok(CustomerOrder::new(items, reward))
    }

    fn orders(&mut self, expected: &'static str) -> Result<Vec<CustomerOrder>, ProtocolError> {
        let count = self.count(expected)?;
        (0..count).map(|_| self.order()).collect()
    }

    fn placed(&mut self, expected: &'static str) -> Result<(Position, Composition), ProtocolError> {
        let line = self.expect_line(expected)?;
        let mut tokens = line.split_whitespace();
        let x = self.number(tokens.next(), "x")?;
        let y = self.number(tokens.next(), "y")?;
        let items = self.composition(tokens.next())?;
        Ok((Position::new(x, y), items))
    }

    /// Reads the game header.
    pub fn read_header(&mut self) -> Result<GameHeader, ProtocolError> {
        let all_orders = self.orders("customer count")?;
        let rows = (0..KITCHEN_HEIGHT)
            .map(|_| self.expect_line("kitchen row"))
            .collect::<Result<Vec<_>, _>>()?;
        let kitchen = Kitchen::from_rows(&rows)?;
        Ok(GameHeader {
            all_orders,
            kitchen,
        })
    }

    /// Reads one turn. Returns `Ok(None)` when input ends cleanly between turns.
    pub fn read_turn(&mut self, kitchen: &Kitchen) -> Result<Option<Snapshot>, ProtocolError> {
        let Some(line) = self.next_line()? else {
            return Ok(None);
        };
        let turns_remaining = self.number(line.split_whitespace().next(), "turns remaining")?;

        let (position, items) = self.placed("chef")?;
        let me = Chef::new(position, items);
        let (position, items) = self.placed("partner")?;
        let partner = Chef::new(position, items);

        let mut counters = HashMap::new();
        for _ in 0..self.count("counter count")? {
            let (position, items) = self.placed("counter")?;
            if items.is_empty() {
                continue;
            }
            if !kitchen.is_counter(position) {
                warn!(x = position.x, y = position.y, %items, "items reported on a non-counter cell");
                continue;
            }
            counters.insert(position, items);
        }

        let line = self.expect_line("oven")?;
        let mut tokens = line.split_whitespace();
        let contents = self.composition(tokens.next())?;
        let timer = self.number(tokens.next(), "oven timer")?;

        let orders = self.orders("waiting customer count")?;

        Ok(Some(Snapshot {
            turns_remaining,
            chefs: [me, partner],
            counters,
            oven: Oven { contents, timer },
            orders,
        }))
    }
}
