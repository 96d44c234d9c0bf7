use crate::error::{BfResult, BindForgeError};
use crate::types::{Ability, Combination};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

fn parse_priority(raw: &str, row: usize, table: &str) -> BfResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(p) if p.is_finite() && p > 0.0 => Ok(p),
        _ => Err(BindForgeError::Validation(format!(
            "{} row {}: priority '{}' is not a positive number",
            table, row, raw
        ))),
    }
}

/// Reads `name, priority[, bar, comment]` rows.
pub fn load_abilities<R: Read>(reader: R) -> BfResult<Vec<Ability>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut abilities: Vec<Ability> = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let rec = result?;
        if rec.len() < 2 {
            warn!("Abilities row {}: expected at least 2 columns, skipping", row + 1);
            continue;
        }
        let name = rec[0].trim().to_string();
        if name.is_empty() {
            continue;
        }
        if abilities.iter().any(|a| a.name == name) {
            return Err(BindForgeError::Validation(format!(
                "Duplicate ability '{}'",
                name
            )));
        }
        let priority = parse_priority(&rec[1], row + 1, "Abilities")?;
        abilities.push(Ability { name, priority });
    }

    debug!("Loaded {} abilities", abilities.len());
    Ok(abilities)
}

/// Resolves an `A > B > C` chain against ability names.
pub fn parse_combination_string<S: AsRef<str>>(
    ability_names: &[S],
    combination: &str,
) -> BfResult<Vec<usize>> {
    combination
        .split('>')
        .map(|token| {
            let token = token.trim();
            ability_names
                .iter()
                .position(|n| n.as_ref() == token)
                .ok_or_else(|| BindForgeError::UnknownAbility(token.to_string()))
        })
        .collect()
}

/// Reads `name, priority[, ordered, comment]` rows where `name` is the chain.
pub fn load_combinations<R: Read>(
    reader: R,
    abilities: &[Ability],
) -> BfResult<Vec<Combination>> {
    let names: Vec<&str> = abilities.iter().map(|a| a.name.as_str()).collect();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut combinations = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let rec = result?;
        if rec.len() < 2 {
            warn!("Combinations row {}: expected at least 2 columns, skipping", row + 1);
            continue;
        }
        let name = rec[0].trim().to_string();
        if name.is_empty() {
            continue;
        }
        let indices = parse_combination_string(&names, &name)?;
        let priority = parse_priority(&rec[1], row + 1, "Combinations")?;
        combinations.push(Combination {
            name,
            priority,
            indices,
        });
    }

    debug!("Loaded {} combinations", combinations.len());
    Ok(combinations)
}

/// Reads `ability, key` rows describing an existing binding.
pub fn load_binds<R: Read>(reader: R) -> BfResult<Vec<(String, String)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut binds = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let rec = result?;
        if rec.len() < 2 {
            warn!("Binds row {}: expected 2 columns, skipping", row + 1);
            continue;
        }
        binds.push((rec[0].trim().to_string(), rec[1].trim().to_string()));
    }
    Ok(binds)
}

pub fn load_abilities_from_path<P: AsRef<Path>>(path: P) -> BfResult<Vec<Ability>> {
    load_abilities(File::open(path)?)
}

pub fn load_combinations_from_path<P: AsRef<Path>>(
    path: P,
    abilities: &[Ability],
) -> BfResult<Vec<Combination>> {
    load_combinations(File::open(path)?, abilities)
}

pub fn load_binds_from_path<P: AsRef<Path>>(path: P) -> BfResult<Vec<(String, String)>> {
    load_binds(File::open(path)?)
}
