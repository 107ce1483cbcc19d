use serde::{Deserialize, Serialize};

use crate::{
    Position,
    map::{Grid, GridError},
};

/// Number of rows in every kitchen layout.
pub const KITCHEN_HEIGHT: usize = 7;

/// A fixed-function cell. Interacting with a station transforms what the chef
/// holds; a station never stores an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Station {
    Window,
    Dishwasher,
    ChoppingBoard,
    Blueberries,
    IceCream,
    Strawberries,
    DoughBin,
    Oven,
}

impl Station {
    pub const ALL: [Station; 8] = [
        Station::Window,
        Station::Dishwasher,
        Station::ChoppingBoard,
        Station::Blueberries,
        Station::IceCream,
        Station::Strawberries,
        Station::DoughBin,
        Station::Oven,
    ];

    /// Layout character used by the referee for this station.
    pub fn code(&self) -> char {
        match self {
            Station::Window => 'W',
            Station::Dishwasher => 'D',
            Station::ChoppingBoard => 'C',
            Station::Blueberries => 'B',
            Station::IceCream => 'I',
            Station::Strawberries => 'S',
            Station::DoughBin => 'H',
            Station::Oven => 'O',
        }
    }

    pub fn from_code(code: char) -> Option<Station> {
        Station::ALL.into_iter().find(|station| station.code() == code)
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

/// Static type of a kitchen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Floor,
    /// Plain counter usable for temporary storage.
    Counter,
    Station(Station),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KitchenError {
    #[error("Kitchen layout has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Station {0:?} appears more than once")]
    DuplicateStation(Station),
    #[error("Station {0:?} is missing from the layout")]
    MissingStation(Station),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Immutable per-game layout: where each station sits and which cells are counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kitchen {
    tiles: Grid<Tile>,
    stations: [Position; 8],
}

impl Kitchen {
    /// Builds the layout from the referee's rows.
    ///
    /// `#` is a counter, station letters map through [`Station::from_code`], every
    /// other character (including the `0`/`1` spawn markers) is floor.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Kitchen, KitchenError> {
        if rows.len() != KITCHEN_HEIGHT {
            return Err(KitchenError::RowCount {
                expected: KITCHEN_HEIGHT,
                found: rows.len(),
            });
        }

        let width = rows[0].as_ref().chars().count();
        for (row, line) in rows.iter().enumerate() {
            let found = line.as_ref().chars().count();
            if found != width {
                return Err(KitchenError::RowWidth {
                    row,
                    expected: width,
                    found,
                });
            }
        }

        let chars: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();
        let tiles = Grid::from_generator(width, KITCHEN_HEIGHT, |x, y| match chars[y][x] {
            '#' => Tile::Counter,
            code => Station::from_code(code).map_or(Tile::Floor, Tile::Station),
        });

        let mut found: [Option<Position>; 8] = [None; 8];
        for (position, tile) in tiles.enumerate() {
            if let Tile::Station(station) = tile {
                let slot = &mut found[station.slot()];
                if slot.is_some() {
                    return Err(KitchenError::DuplicateStation(*station));
                }
                *slot = Some(position);
            }
        }

        let mut stations = [Position::new(0, 0); 8];
        for station in Station::ALL {
            stations[station.slot()] =
                found[station.slot()].ok_or(KitchenError::MissingStation(station))?;
        }

        Ok(Kitchen { tiles, stations })
    }

    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn station(&self, station: Station) -> Position {
        self.stations[station.slot()]
    }

    pub fn tile(&self, position: Position) -> Result<Tile, GridError> {
        self.tiles.try_get(position).copied()
    }

    pub fn is_counter(&self, position: Position) -> bool {
        matches!(self.tiles.get(position), Some(Tile::Counter))
    }

    /// All plain counters in row-major order.
    pub fn counters(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Counter)
            .map(|(position, _)| position)
    }
}
