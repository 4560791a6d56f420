// Funciones para expandir la codificación "día+períodos-sala" a bloques atómicos.
use crate::models::{is_day, is_period, SlotToken};
use std::collections::BTreeMap;

/// Extrae cada tramo maximal "letra de día + uno o más períodos" y lo expande
/// a un bloque por período.
/// Ejemplo: "M12T3" -> [M1, M2, T3]. Los caracteres fuera de un tramo se ignoran.
pub fn expand_slot_runs(run: &str) -> Vec<SlotToken> {
    let chars: Vec<char> = run.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let day = chars[i];
        i += 1;
        if !is_day(day) {
            continue;
        }
        while i < chars.len() && is_period(chars[i]) {
            if let Some(t) = SlotToken::new(day, chars[i]) {
                tokens.push(t);
            }
            i += 1;
        }
    }
    tokens
}

/// Parsear `time-classroom` a un mapa bloque -> sala.
/// Ejemplo: "M12-ED101,T3-EC015" -> {M1: ED101, M2: ED101, T3: EC015}
///
/// Cada grupo separado por coma se corta en el PRIMER '-' (sin '-' la sala es
/// vacía). Si un bloque aparece en varios grupos gana el último.
pub fn parse_slots(encoding: &str) -> BTreeMap<SlotToken, String> {
    let mut out = BTreeMap::new();
    for group in encoding.split(',') {
        let (run, classroom) = group.split_once('-').unwrap_or((group, ""));
        for token in expand_slot_runs(run) {
            out.insert(token, classroom.to_string());
        }
    }
    out
}
