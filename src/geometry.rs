use crate::error::{BfResult, BindForgeError};
use crate::graph::DistanceGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KeyPosition {
    Keyboard { x: f64, y: f64 },
    // Penalty charged when two different mouse buttons are pressed in sequence
    Mouse { button_penalty: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub key: String,
    pub position: KeyPosition,
    #[serde(default)]
    pub modifier: String,
    #[serde(default)]
    pub modifier_penalty: f64,
}

impl fmt::Display for KeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifier, self.key)
        }
    }
}

impl KeyEntry {
    pub fn distance_to(&self, other: &KeyEntry, horizontal: f64, vertical: f64) -> f64 {
        let mut distance = match (self.position, other.position) {
            (KeyPosition::Keyboard { x: x1, y: y1 }, KeyPosition::Keyboard { x: x2, y: y2 }) => {
                let dx = (x2 - x1) * horizontal;
                let dy = (y2 - y1) * vertical;
                (dx * dx + dy * dy).sqrt()
            }
            (
                KeyPosition::Mouse { button_penalty: p1 },
                KeyPosition::Mouse { button_penalty: p2 },
            ) => {
                if self.key == other.key {
                    0.0
                } else {
                    p1 + p2
                }
            }
            // Hands are independent across devices
            _ => 0.0,
        };

        if self.modifier != other.modifier {
            distance += self.modifier_penalty + other.modifier_penalty;
        }
        distance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRow {
    pub vertical_offset: f64,
    pub horizontal_offset: f64,
    pub keys: Vec<String>,
}

impl KeyRow {
    pub fn new<S: Into<String>>(
        vertical_offset: f64,
        horizontal_offset: f64,
        keys: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            vertical_offset,
            horizontal_offset,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Collection of keyboard and mouse keys that can be turned into a distance graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyboard {
    pub entries: Vec<KeyEntry>,
    pub horizontal_coefficient: f64,
    pub vertical_coefficient: f64,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Keyboard {
    pub fn new(horizontal_coefficient: f64, vertical_coefficient: f64) -> Self {
        Self {
            entries: Vec::new(),
            horizontal_coefficient,
            vertical_coefficient,
        }
    }

    pub fn add_key_row(&mut self, row: &KeyRow, modifier: &str, modifier_penalty: f64) {
        for (i, key) in row.keys.iter().enumerate() {
            self.entries.push(KeyEntry {
                key: key.clone(),
                position: KeyPosition::Keyboard {
                    x: row.horizontal_offset + i as f64,
                    y: row.vertical_offset,
                },
                modifier: modifier.to_string(),
                modifier_penalty,
            });
        }
    }

    pub fn add_mouse_keys<S: AsRef<str>>(
        &mut self,
        keys: &[S],
        mouse_penalty: f64,
        modifier: &str,
        modifier_penalty: f64,
    ) {
        for key in keys {
            self.entries.push(KeyEntry {
                key: key.as_ref().to_string(),
                position: KeyPosition::Mouse {
                    button_penalty: mouse_penalty,
                },
                modifier: modifier.to_string(),
                modifier_penalty,
            });
        }
    }

    pub fn generate_graph(&self) -> BfResult<DistanceGraph> {
        let names = self.entries.iter().map(|e| e.to_string()).collect();
        let mut graph = DistanceGraph::new(names)?;

        let size = self.entries.len();
        for i in 0..size {
            for j in (i + 1)..size {
                let d = self.entries[i].distance_to(
                    &self.entries[j],
                    self.horizontal_coefficient,
                    self.vertical_coefficient,
                );
                graph.set_distance(i, j, d)?;
            }
        }
        Ok(graph)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowGroup {
    #[serde(flatten)]
    pub row: KeyRow,
    #[serde(default)]
    pub modifier: String,
    #[serde(default)]
    pub modifier_penalty: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouseGroup {
    pub keys: Vec<String>,
    pub mouse_penalty: f64,
    #[serde(default)]
    pub modifier: String,
    #[serde(default)]
    pub modifier_penalty: f64,
}

fn default_coefficient() -> f64 {
    1.0
}

/// On-disk keyboard description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardDefinition {
    #[serde(default = "default_coefficient")]
    pub horizontal_coefficient: f64,
    #[serde(default = "default_coefficient")]
    pub vertical_coefficient: f64,
    #[serde(default)]
    pub rows: Vec<RowGroup>,
    #[serde(default)]
    pub mouse: Vec<MouseGroup>,
}

impl KeyboardDefinition {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BfResult<Self> {
        let content = fs::read_to_string(path)?;
        let def: Self = serde_json::from_str(&content)?;
        if def.rows.is_empty() && def.mouse.is_empty() {
            return Err(BindForgeError::Validation(
                "Keyboard definition contains no keys".to_string(),
            ));
        }
        Ok(def)
    }

    pub fn build(&self) -> Keyboard {
        let mut kb = Keyboard::new(self.horizontal_coefficient, self.vertical_coefficient);
        for group in &self.rows {
            kb.add_key_row(&group.row, &group.modifier, group.modifier_penalty);
        }
        for group in &self.mouse {
            kb.add_mouse_keys(
                &group.keys,
                group.mouse_penalty,
                &group.modifier,
                group.modifier_penalty,
            );
        }
        kb
    }
}
