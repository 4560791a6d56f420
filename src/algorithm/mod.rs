// Lógica de horarios: expansión de bloques y detección de choques.
pub mod conflict;
pub mod slots;

pub use conflict::{is_conflict, pair_clashes, Clash, OccupancyMap, PairClash};
pub use slots::{expand_slot_runs, parse_slots};
