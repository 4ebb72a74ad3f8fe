//! Resolve a parsed JSON Pointer against the live document.

use autosync_json_pointer::{format_json_pointer, parse_array_step, ArrayStep};
use tracing::trace;
use yrs::{Array as _, Map as _, MapRef, ReadTxn};

use super::container::{Container, Terminal};
use super::convert::describe;
use crate::error::{Error, Result};

/// Walk `path` from `root` to the container that holds its last step.
///
/// Every step but the last must resolve to an existing map or list; the last
/// step is interpreted against that container and returned unresolved, so
/// callers can create, overwrite or delete it.
///
/// The empty path has no parent container and is rejected with
/// [`Error::InvalidPath`]; root-level operations never navigate.
pub fn navigate<T: ReadTxn>(txn: &T, root: &MapRef, path: &[String]) -> Result<(Container, Terminal)> {
    let Some((last, walk)) = path.split_last() else {
        return Err(Error::invalid_path(path, "the root has no parent container"));
    };

    let mut current = Container::Map(root.clone());
    for (depth, step) in walk.iter().enumerate() {
        let here = &path[..=depth];
        trace!(
            pointer = %format_json_pointer(here),
            parent = current.kind().as_str(),
            "navigate step"
        );
        let child = match &current {
            Container::Map(map) => map.get(txn, step).ok_or_else(|| Error::not_found(here))?,
            Container::List(array) => {
                let len = array.len(txn);
                let index = match parse_array_step(step) {
                    Ok(ArrayStep::Index(index)) => index,
                    _ => return Err(Error::invalid_path(here, format!("{step:?} is not a list index"))),
                };
                u32::try_from(index)
                    .ok()
                    .filter(|i| *i < len)
                    .and_then(|i| array.get(txn, i))
                    .ok_or_else(|| Error::out_of_range(here, index, len))?
            }
        };
        current = Container::from_out(child)
            .map_err(|out| Error::type_mismatch(here, "map or list", describe(&out)))?;
    }

    let terminal = match &current {
        Container::Map(_) => Terminal::Key(last.clone()),
        Container::List(array) => match parse_array_step(last) {
            Ok(ArrayStep::Append) => Terminal::Append,
            Ok(ArrayStep::Index(index)) => match u32::try_from(index) {
                Ok(index) => Terminal::Index(index),
                Err(_) => return Err(Error::out_of_range(path, index, array.len(txn))),
            },
            Err(_) => {
                return Err(Error::invalid_path(
                    path,
                    format!("{last:?} is neither a list index nor \"-\""),
                ))
            }
        },
    };
    trace!(pointer = %format_json_pointer(path), ?terminal, "navigate resolved");
    Ok((current, terminal))
}
