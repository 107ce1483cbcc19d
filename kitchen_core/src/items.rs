use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Token the referee uses for empty hands, an empty oven and an empty counter.
pub const NONE_TOKEN: &str = "NONE";

/// Error returned when a token is not part of the ingredient vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown ingredient token '{0}'")]
pub struct UnknownIngredient(pub String);

/// Every token that can appear in a held item, on a counter, in the oven or in an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    Dish,
    IceCream,
    Blueberries,
    Strawberries,
    ChoppedStrawberries,
    Dough,
    ChoppedDough,
    RawTart,
    Croissant,
    Tart,
}

impl Ingredient {
    pub const ALL: [Ingredient; 10] = [
        Ingredient::Dish,
        Ingredient::IceCream,
        Ingredient::Blueberries,
        Ingredient::Strawberries,
        Ingredient::ChoppedStrawberries,
        Ingredient::Dough,
        Ingredient::ChoppedDough,
        Ingredient::RawTart,
        Ingredient::Croissant,
        Ingredient::Tart,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Ingredient::Dish => "DISH",
            Ingredient::IceCream => "ICE_CREAM",
            Ingredient::Blueberries => "BLUEBERRIES",
            Ingredient::Strawberries => "STRAWBERRIES",
            Ingredient::ChoppedStrawberries => "CHOPPED_STRAWBERRIES",
            Ingredient::Dough => "DOUGH",
            Ingredient::ChoppedDough => "CHOPPED_DOUGH",
            Ingredient::RawTart => "RAW_TART",
            Ingredient::Croissant => "CROISSANT",
            Ingredient::Tart => "TART",
        }
    }

    /// Goods that have to be prepared and can only be fetched once they sit somewhere.
    pub fn is_intermediate(&self) -> bool {
        matches!(
            self,
            Ingredient::Croissant | Ingredient::Tart | Ingredient::ChoppedStrawberries
        )
    }

    /// Goods that can be taken straight from a station at any time.
    pub fn is_raw_fetchable(&self) -> bool {
        matches!(
            self,
            Ingredient::Dish | Ingredient::Blueberries | Ingredient::IceCream
        )
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Ingredient {
    type Err = UnknownIngredient;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ingredient::ALL
            .into_iter()
            .find(|ingredient| ingredient.token() == s)
            .ok_or_else(|| UnknownIngredient(s.to_string()))
    }
}

/// The set of ingredients held by a chef, lying on a counter, sitting in the oven
/// or requested by a customer.
///
/// An empty composition is the `NONE` sentinel. Order of tokens carries no meaning,
/// so two compositions compare equal whenever they hold the same ingredients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Composition {
    ingredients: BTreeSet<Ingredient>,
}

impl Composition {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn contains(&self, ingredient: Ingredient) -> bool {
        self.ingredients.contains(&ingredient)
    }

    /// True when the composition is exactly the single given ingredient.
    pub fn is_only(&self, ingredient: Ingredient) -> bool {
        self.ingredients.len() == 1 && self.contains(ingredient)
    }

    pub fn has_plate(&self) -> bool {
        self.contains(Ingredient::Dish)
    }

    pub fn is_subset(&self, other: &Composition) -> bool {
        self.ingredients.is_subset(&other.ingredients)
    }

    /// Ingredients of `self` that `other` lacks.
    pub fn difference<'a>(&'a self, other: &'a Composition) -> impl Iterator<Item = Ingredient> + 'a {
        self.ingredients.difference(&other.ingredients).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Ingredient> + '_ {
        self.ingredients.iter().copied()
    }
}

impl From<Ingredient> for Composition {
    fn from(ingredient: Ingredient) -> Self {
        Self::from_iter([ingredient])
    }
}

impl FromIterator<Ingredient> for Composition {
    fn from_iter<I: IntoIterator<Item = Ingredient>>(iter: I) -> Self {
        Self {
            ingredients: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(NONE_TOKEN);
        }
        for (i, ingredient) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            f.write_str(ingredient.token())?;
        }
        Ok(())
    }
}

impl FromStr for Composition {
    type Err = UnknownIngredient;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == NONE_TOKEN || s.is_empty() {
            return Ok(Composition::empty());
        }
        s.split('-').map(str::parse).collect()
    }
}
