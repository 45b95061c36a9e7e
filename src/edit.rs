//! Edit Rehydration
//!
//! Reopening a cart line rebuilds its selection from the line's discrete fields and serialized
//! customizations. Rehydration never fails: anything that cannot be restored falls back to the
//! fresh catalog defaults, and the [`RehydrationReport`] says what happened.

use std::fmt;

use smallvec::SmallVec;
use tracing::warn;

use crate::{
    catalog::{CatalogEntry, find_by_name},
    codec::{self, SerializationError},
    order_line::OrderLine,
    selection::SelectionState,
};

/// Fields the edit entry point may supply. Absent fields keep their fresh defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRequest {
    /// Name of the size to restore
    pub size_name: Option<String>,

    /// Name of the side to restore
    pub side_name: Option<String>,

    /// Name of the drink to restore
    pub drink_name: Option<String>,

    /// Blob produced by [`codec::serialize`]
    pub serialized_customizations: Option<String>,
}

impl EditRequest {
    /// Build a request that restores an existing order line of `entry`.
    pub fn for_line(entry: &CatalogEntry<'_>, line: &OrderLine<'_>) -> Self {
        Self {
            size_name: entry.size(&line.size_id).map(|size| size.name.clone()),
            side_name: line
                .side_id
                .as_deref()
                .and_then(|id| entry.side(id))
                .map(|side| side.name.clone()),
            drink_name: line
                .drink_id
                .as_deref()
                .and_then(|id| entry.drink(id))
                .map(|drink| drink.name.clone()),
            serialized_customizations: Some(line.serialized_customizations.clone()),
        }
    }
}

/// What happened to the serialized customizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomizationOutcome {
    /// None were supplied; catalog defaults apply.
    Absent,

    /// The blob was decoded and applied.
    Restored,

    /// The blob was malformed; catalog defaults apply.
    FellBack(SerializationError),
}

/// Kind of top-level option named in an edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Size
    Size,

    /// Side
    Side,

    /// Drink
    Drink,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Size => f.write_str("size"),
            OptionKind::Side => f.write_str("side"),
            OptionKind::Drink => f.write_str("drink"),
        }
    }
}

/// A name in an edit request that matched no catalog option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedName {
    /// Which option list was searched
    pub kind: OptionKind,

    /// The name as supplied
    pub name: String,
}

/// Outcome of [`rehydrate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RehydrationReport {
    /// What happened to the customizations
    pub customizations: CustomizationOutcome,

    /// Names that kept their defaults because nothing matched
    pub unmatched: SmallVec<[UnmatchedName; 3]>,
}

impl RehydrationReport {
    /// Whether everything in the request was restored.
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
            && !matches!(self.customizations, CustomizationOutcome::FellBack(_))
    }
}

/// Rebuild a selection for editing.
///
/// Starts from the fresh selection for `entry`, then matches each supplied name against the
/// catalog and applies the decoded customizations. Blank blobs count as absent.
#[tracing::instrument(
    name = "edit.rehydrate",
    skip_all,
    fields(product_id = %entry.id)
)]
pub fn rehydrate<'a>(
    entry: &CatalogEntry<'a>,
    request: &EditRequest,
) -> (SelectionState<'a>, RehydrationReport) {
    let mut state = SelectionState::new(entry);
    let mut unmatched = SmallVec::new();

    if let Some(name) = &request.size_name {
        match find_by_name(&entry.sizes, name) {
            Some(size) => state = state.set_size(size.clone()),
            None => unmatched.push(unmatched_name(OptionKind::Size, name)),
        }
    }

    if let Some(name) = &request.side_name {
        match find_by_name(&entry.sides, name) {
            Some(side) => state = state.set_side(side.clone()),
            None => unmatched.push(unmatched_name(OptionKind::Side, name)),
        }
    }

    if let Some(name) = &request.drink_name {
        match find_by_name(&entry.drinks, name) {
            Some(drink) => state = state.set_drink(drink.clone()),
            None => unmatched.push(unmatched_name(OptionKind::Drink, name)),
        }
    }

    let blob = request
        .serialized_customizations
        .as_deref()
        .filter(|blob| !blob.trim().is_empty());

    let customizations = match blob.map(codec::deserialize) {
        None => CustomizationOutcome::Absent,
        Some(Ok(decoded)) => {
            state = state.with_customizations(entry, &decoded);

            CustomizationOutcome::Restored
        }
        Some(Err(err)) => {
            warn!(error = %err, "falling back to catalog defaults");

            CustomizationOutcome::FellBack(err)
        }
    };

    (
        state,
        RehydrationReport {
            customizations,
            unmatched,
        },
    )
}

fn unmatched_name(kind: OptionKind, name: &str) -> UnmatchedName {
    warn!(%kind, option_name = name, "no catalog option matches edit request");

    UnmatchedName {
        kind,
        name: name.to_string(),
    }
}
