// Estructuras de datos principales
mod slot;

pub use slot::{day_index, is_day, is_period, period_index, SlotToken, DAYS, PERIODS};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Cupo que el catálogo usa como "sin límite".
pub const UNLIMITED_NUM_LIMIT: i64 = 9999;
/// Inscritos que el catálogo usa como "no aplica".
pub const NOT_APPLICABLE_REG_NUM: i64 = -999;

const OUTLINE_URL: &str = "https://timetable.nycu.edu.tw/?r=main/crsoutline";

/// Año académico + semestre, p.ej. 111-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcademicTerm {
    pub year: u32,
    pub semester: u32,
}

impl AcademicTerm {
    pub fn new(year: u32, semester: u32) -> Self {
        AcademicTerm { year, semester }
    }

    /// Nombre del archivo del catálogo de este período (`111-2_data.json`).
    pub fn catalog_file_name(&self) -> String {
        format!("{}_data.json", self)
    }

    /// Nombre de la imagen exportada de la grilla.
    pub fn export_file_name(&self) -> String {
        format!("{}_timetable.png", self)
    }

    /// Enlace al programa oficial del curso.
    pub fn outline_url(&self, course_id: &str) -> String {
        format!(
            "{}&Acy={}&Sem={}&CrsNo={}&lang=zh-tw",
            OUTLINE_URL, self.year, self.semester, course_id
        )
    }
}

impl fmt::Display for AcademicTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.semester)
    }
}

/// Un curso del catálogo. Los nombres de campo siguen el JSON de origen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub teacher: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub course_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub memo: String,
    /// Créditos; vacío o no numérico => 0.
    #[serde(default, deserialize_with = "lenient_number")]
    pub credit: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub hours: f64,
    /// `null` cuenta como sin bloques; un bloque mal escrito invalida el catálogo.
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: Vec<SlotToken>,
    #[serde(default, rename = "time-classroom", deserialize_with = "lenient_string")]
    pub time_classroom: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub english: bool,
    #[serde(default, deserialize_with = "lenient_labels")]
    pub brief: Vec<String>,
    #[serde(default = "default_num_limit", deserialize_with = "lenient_num_limit")]
    pub num_limit: i64,
    #[serde(default = "default_reg_num", deserialize_with = "lenient_reg_num")]
    pub reg_num: i64,
}

impl CourseRecord {
    /// Bloque -> sala, derivado de `time-classroom`.
    pub fn classrooms(&self) -> BTreeMap<SlotToken, String> {
        crate::algorithm::parse_slots(&self.time_classroom)
    }

    /// True si `time` y `time-classroom` describen exactamente los mismos bloques.
    pub fn slots_consistent(&self) -> bool {
        let from_encoding: BTreeSet<SlotToken> = self.classrooms().into_keys().collect();
        let listed: BTreeSet<SlotToken> = self.time.iter().copied().collect();
        from_encoding == listed
    }

    /// Etiquetas visibles: tipo, "英文授課" si corresponde y las de `brief`
    /// hasta la primera vacía.
    pub fn badges(&self) -> Vec<String> {
        let mut badges = vec![self.course_type.clone()];
        if self.english {
            badges.push("英文授課".to_string());
        }
        badges.extend(self.brief.iter().take_while(|b| !b.is_empty()).cloned());
        badges
    }

    pub fn num_limit_label(&self) -> String {
        if self.num_limit == UNLIMITED_NUM_LIMIT {
            "不限".to_string()
        } else {
            self.num_limit.to_string()
        }
    }

    pub fn reg_num_label(&self) -> String {
        if self.reg_num == NOT_APPLICABLE_REG_NUM {
            "-".to_string()
        } else {
            self.reg_num.to_string()
        }
    }
}

/// Cursos elegidos por el usuario (id -> incluido). Sólo se guardan los incluidos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids en orden ascendente.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Forma persistida: `{"<id>": true, ...}`.
    pub fn to_flags(&self) -> BTreeMap<String, bool> {
        self.ids.iter().map(|id| (id.clone(), true)).collect()
    }

    pub fn from_flags(flags: BTreeMap<String, bool>) -> Self {
        SelectionSet {
            ids: flags.into_iter().filter(|(_, on)| *on).map(|(id, _)| id).collect(),
        }
    }
}

fn default_num_limit() -> i64 {
    UNLIMITED_NUM_LIMIT
}

fn default_reg_num() -> i64 {
    NOT_APPLICABLE_REG_NUM
}

/// Interpreta el prefijo numérico de una cadena ("3.0" -> 3.0, "2 hrs" -> 2.0,
/// "1e3" -> 1000.0). Sin dígitos al inicio devuelve `None`.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = if matches!(bytes.first(), Some(b'+' | b'-')) { 1 } else { 0 };
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digits += frac_end - end - 1;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }
    // El exponente sólo cuenta si trae al menos un dígito ("2e" -> 2).
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "y" | "yes"),
        _ => false,
    })
}

/// Etiquetas de `brief`: `null` => sin etiquetas; elementos `null` => "".
fn lenient_labels<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_leading_number(&s).unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_int(v: Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn lenient_num_limit<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(lenient_int(Value::deserialize(d)?).unwrap_or(UNLIMITED_NUM_LIMIT))
}

fn lenient_reg_num<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(lenient_int(Value::deserialize(d)?).unwrap_or(NOT_APPLICABLE_REG_NUM))
}
