//! Assembly helpers
//!
//! Turn builder-level collections into canonical ones. Empty inputs become
//! absent fields; canonical collections are never constructed from zero
//! entries. Entry order is preserved.

use super::{BuildsModel, RefOr};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, KeyedCollection, OrderedList, OrderedMap};

/// Assemble a keyed collection, or `None` when there is nothing to assemble
pub fn assemble_keyed<B: BuildsModel>(
    kind: CollectionKind,
    items: &OrderedMap<B>,
) -> Result<Option<KeyedCollection<B::Model>>> {
    if items.is_empty() {
        return Ok(None);
    }
    tracing::trace!(kind = %kind, entries = items.len(), "assembling keyed collection");

    let mut entries = OrderedMap::new();
    for (name, item) in items.iter() {
        entries.insert(name, item.to_model()?);
    }
    Ok(Some(KeyedCollection::try_new(kind, entries)?))
}

/// Assemble an ordered list, or `None` when there is nothing to assemble
pub fn assemble_list<B: BuildsModel>(
    kind: CollectionKind,
    items: &[B],
) -> Result<Option<OrderedList<B::Model>>> {
    if items.is_empty() {
        return Ok(None);
    }
    tracing::trace!(kind = %kind, entries = items.len(), "assembling list");

    let assembled = items
        .iter()
        .map(BuildsModel::to_model)
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(OrderedList::try_new(kind, assembled)?))
}

/// List of plain values (tag names, scope names)
pub fn assemble_values<T: Clone>(
    kind: CollectionKind,
    items: &[T],
) -> Result<Option<OrderedList<T>>> {
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(OrderedList::try_new(kind, items.to_vec())?))
}

/// Assemble an optional nested builder
pub fn assemble_opt<B: BuildsModel>(item: Option<&B>) -> Result<Option<B::Model>> {
    item.map(BuildsModel::to_model).transpose()
}

/// Assemble an optional builder-or-reference slot into a boxed canonical slot
pub fn assemble_boxed<B: BuildsModel>(
    item: Option<&RefOr<B>>,
) -> Result<Option<Box<model::RefOr<B::Model>>>> {
    Ok(assemble_opt(item)?.map(Box::new))
}

/// Turn a raw `$ref` token into a canonical reference
pub fn to_reference(token: &str) -> Result<model::Reference> {
    check_token(token)?;
    Ok(model::Reference::new(token, None, None)?)
}

pub(crate) fn check_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(BuildError::because("a $ref placeholder cannot be empty"));
    }
    Ok(())
}
