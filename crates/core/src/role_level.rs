//! Role-level rules: header discovery, name/rank extraction and rank
//! conflict reporting.
//!
//! Ranks are not unique. Several levels may share one, and
//! [`find_rank_conflicts`] reports those groups so clients can resolve them.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::{as_i64, as_text};
use crate::document::AnswersDocument;
use crate::error::CoreError;
use crate::messages;
use crate::template::{TableHeader, TemplateStructure, LEVEL_INFO_GROUP};

/// Template label of the level-name field.
pub const LEVEL_LABEL: &str = "Level";

/// Template label of the rank field.
pub const RANK_LABEL: &str = "Rank/Order";

/// Header id of the level-name column.
pub const LEVEL_HEADER_ID: &str = "level";

/// Header id of the rank column.
pub const RANK_HEADER_ID: &str = "rank/order";

/// Fallback field ids inside `level_info` when the template has no labels.
const FALLBACK_NAME_FIELD: &str = "level_name";
const FALLBACK_RANK_FIELD: &str = "rank";

/// Sort fields accepted by the role-level list, mapped to columns.
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("created", "created"),
    ("modified", "modified"),
    ("level", "name"),
    ("name", "name"),
    ("rank/order", "rank"),
    ("rank", "rank"),
];

/// Default sort column for the role-level list.
pub const DEFAULT_SORT: &str = "created";

/// Headers for the role-level table: the `Level` and `Rank/Order` fields.
pub fn table_headers(structure: &TemplateStructure) -> Result<Vec<TableHeader>, CoreError> {
    let level = structure.find_field_by_label(LEVEL_LABEL);
    let rank = structure.find_field_by_label(RANK_LABEL);
    match (level, rank) {
        (Some((_, level)), Some((_, rank))) => Ok(vec![
            TableHeader::new(LEVEL_HEADER_ID, level.display_label()),
            TableHeader::new(RANK_HEADER_ID, rank.display_label()),
        ]),
        _ => Err(CoreError::validation(messages::LEVEL_HEADERS_MISSING)),
    }
}

/// Name and rank derived from an answers document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelSummary {
    pub name: Option<String>,
    pub rank: Option<i32>,
}

/// Extract name and rank from `answers`.
///
/// The template fields labelled [`LEVEL_LABEL`] and [`RANK_LABEL`] are
/// consulted first; `level_info.level_name` and `level_info.rank` are used
/// when the template does not label them.
pub fn extract_summary(structure: &TemplateStructure, answers: &AnswersDocument) -> LevelSummary {
    let lookup = |label: &str, fallback: &str| {
        structure
            .find_field_by_label(label)
            .and_then(|(g, f)| answers.field(&g.id, &f.id))
            .or_else(|| answers.field(LEVEL_INFO_GROUP, fallback))
    };

    let name = lookup(LEVEL_LABEL, FALLBACK_NAME_FIELD).and_then(as_text);
    let rank = lookup(RANK_LABEL, FALLBACK_RANK_FIELD)
        .and_then(as_i64)
        .and_then(|r| i32::try_from(r).ok());
    LevelSummary { name, rank }
}

/// `{display label: value}` for every template field answered.
pub fn labelled_fields(structure: &TemplateStructure, answers: &AnswersDocument) -> Map<String, Value> {
    structure
        .fields()
        .filter_map(|(g, f)| {
            answers
                .field(&g.id, &f.id)
                .map(|v| (f.display_label().to_string(), v.clone()))
        })
        .collect()
}

/// `{group: {field: value}}` restricted to fields the template declares.
pub fn edit_fields(structure: &TemplateStructure, answers: &AnswersDocument) -> Map<String, Value> {
    let mut out = Map::new();
    for group in &structure.groups {
        let values: Map<String, Value> = group
            .fields
            .iter()
            .filter_map(|f| answers.field(&group.id, &f.id).map(|v| (f.id.clone(), v.clone())))
            .collect();
        out.insert(group.id.clone(), Value::Object(values));
    }
    out
}

// ---------------------------------------------------------------------------
// Rank conflicts
// ---------------------------------------------------------------------------

/// Levels sharing one rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankConflict {
    pub rank: i32,
    pub count: usize,
    pub level_unique_ids: Vec<String>,
    pub names: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankConflictReport {
    pub has_conflicts: bool,
    pub conflict_count: usize,
    pub conflicts: Vec<RankConflict>,
}

/// A `(rank, level_unique_id, name)` triple fed to [`find_rank_conflicts`].
pub type RankedLevel = (Option<i32>, String, Option<String>);

/// Group levels by rank and report ranks held by more than one level.
/// Levels without a rank never conflict.
pub fn find_rank_conflicts(levels: impl IntoIterator<Item = RankedLevel>) -> RankConflictReport {
    let mut by_rank: BTreeMap<i32, (Vec<String>, Vec<Option<String>>)> = BTreeMap::new();
    for (rank, id, name) in levels {
        if let Some(rank) = rank {
            let entry = by_rank.entry(rank).or_default();
            entry.0.push(id);
            entry.1.push(name);
        }
    }

    let conflicts: Vec<RankConflict> = by_rank
        .into_iter()
        .filter(|(_, (ids, _))| ids.len() > 1)
        .map(|(rank, (level_unique_ids, names))| RankConflict {
            rank,
            count: level_unique_ids.len(),
            level_unique_ids,
            names,
        })
        .collect();

    RankConflictReport {
        has_conflicts: !conflicts.is_empty(),
        conflict_count: conflicts.len(),
        conflicts,
    }
}
