use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Output columns, in export order.
pub const SCHEMA: [&str; 32] = [
    "Prodotto",
    "Categoria",
    "@image_01",
    "@image_scheda",
    "Nome Articolo",
    "Sottotitolo",
    "Codice Articolo",
    "cod1",
    "Prezzo_cod1",
    "fin1",
    "@image_fin1",
    "cod2",
    "Prezzo_cod2",
    "fin2",
    "@image_fin2",
    "cod3",
    "Prezzo_cod3",
    "fin3",
    "@image_fin3",
    "cod4",
    "Prezzo_cod4",
    "fin4",
    "@image_fin4",
    "cod5",
    "Prezzo_cod5",
    "fin5",
    "@image_fin5",
    "Dimensione",
    "Per Vetro",
    "Materiale",
    "UM",
    "@image_SchedeTecniche",
];

/// Number of variant slots (`cod1`..`cod5`) in the schema.
pub const VARIANT_SLOTS: usize = 5;

pub const CODICE_ARTICOLO: &str = "Codice Articolo";

/// Position of a schema column.
pub fn column_index(name: &str) -> Option<usize> {
    SCHEMA.iter().position(|c| *c == name)
}

/// Column names for variant slot `slot` (1-based): code, price, finish, image.
pub fn variant_columns(slot: usize) -> [String; 4] {
    [
        format!("cod{slot}"),
        format!("Prezzo_cod{slot}"),
        format!("fin{slot}"),
        format!("@image_fin{slot}"),
    ]
}

/// One row of the fixed output schema. Every column is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    cells: Vec<String>,
}

impl Default for OutputRow {
    fn default() -> Self {
        Self {
            cells: vec![String::new(); SCHEMA.len()],
        }
    }
}

impl OutputRow {
    /// A row with every column empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from values in schema order. `None` when the count is wrong.
    pub fn from_values(values: Vec<String>) -> Option<Self> {
        (values.len() == SCHEMA.len()).then_some(Self { cells: values })
    }

    /// Value of a schema column; `None` only for names outside the schema.
    pub fn get(&self, column: &str) -> Option<&str> {
        column_index(column).map(|i| self.cells[i].as_str())
    }

    /// Set a schema column. Returns `false` for names outside the schema.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> bool {
        match column_index(column) {
            Some(i) => {
                self.cells[i] = value.into();
                true
            }
            None => false,
        }
    }

    pub fn codice_articolo(&self) -> &str {
        self.get(CODICE_ARTICOLO).unwrap_or("")
    }

    /// Values in schema order.
    pub fn values(&self) -> &[String] {
        &self.cells
    }

    /// `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        SCHEMA.iter().copied().zip(self.cells.iter().map(String::as_str))
    }

    /// Number of populated variant slots.
    pub fn filled_slots(&self) -> usize {
        (1..=VARIANT_SLOTS)
            .filter(|slot| {
                let [cod, ..] = variant_columns(*slot);
                self.get(&cod).is_some_and(|v| !v.is_empty())
            })
            .count()
    }
}

impl Serialize for OutputRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SCHEMA.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
