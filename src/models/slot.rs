// Bloques horarios: un día + un período, p.ej. "M1" (lunes, período 1).
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Días de la grilla en orden de columna (lunes a domingo).
pub const DAYS: [char; 7] = ['M', 'T', 'W', 'R', 'F', 'S', 'U'];

/// Períodos en orden de fila, con su franja horaria.
pub const PERIODS: [(char, &str); 16] = [
    ('y', "6:00~6:50"),
    ('z', "7:00~7:50"),
    ('1', "8:00~8:50"),
    ('2', "9:00~9:50"),
    ('3', "10:10~11:00"),
    ('4', "11:10~12:00"),
    ('n', "12:20~13:10"),
    ('5', "13:20~14:10"),
    ('6', "14:20~15:10"),
    ('7', "15:30~16:20"),
    ('8', "16:30~17:20"),
    ('9', "17:30~18:20"),
    ('a', "18:30~19:20"),
    ('b', "19:30~20:20"),
    ('c', "20:30~21:20"),
    ('d', "21:30~22:20"),
];

pub fn day_index(c: char) -> Option<usize> {
    DAYS.iter().position(|d| *d == c)
}

pub fn period_index(c: char) -> Option<usize> {
    PERIODS.iter().position(|(p, _)| *p == c)
}

pub fn is_day(c: char) -> bool {
    day_index(c).is_some()
}

pub fn is_period(c: char) -> bool {
    period_index(c).is_some()
}

/// Unidad atómica de la grilla. Se ordena por día y luego por período
/// (orden de la grilla, no alfabético: `y` y `z` van antes que `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotToken {
    day: char,
    period: char,
}

impl SlotToken {
    /// Devuelve `None` si el día o el período no pertenecen a los alfabetos.
    pub fn new(day: char, period: char) -> Option<Self> {
        if is_day(day) && is_period(period) {
            Some(SlotToken { day, period })
        } else {
            None
        }
    }

    pub fn day(&self) -> char {
        self.day
    }

    pub fn period(&self) -> char {
        self.period
    }

    /// (fila, columna) dentro de la grilla.
    pub fn grid_position(&self) -> (usize, usize) {
        // los constructores garantizan que ambos índices existen
        (
            period_index(self.period).unwrap_or_default(),
            day_index(self.day).unwrap_or_default(),
        )
    }
}

impl Ord for SlotToken {
    fn cmp(&self, other: &Self) -> Ordering {
        let (p1, d1) = self.grid_position();
        let (p2, d2) = other.grid_position();
        d1.cmp(&d2).then(p1.cmp(&p2))
    }
}

impl PartialOrd for SlotToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SlotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.day, self.period)
    }
}

impl FromStr for SlotToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(d), Some(p), None) => {
                SlotToken::new(d, p).ok_or_else(|| format!("bloque horario inválido: '{}'", s))
            }
            _ => Err(format!("bloque horario inválido: '{}'", s)),
        }
    }
}

impl TryFrom<String> for SlotToken {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotToken> for String {
    fn from(value: SlotToken) -> Self {
        value.to_string()
    }
}
