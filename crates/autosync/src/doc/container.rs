//! Map and list nodes of the live document.

use yrs::{Array, ArrayRef, In, Map, MapRef, Out, ReadTxn, TransactionMut};

/// An engine-owned container node.
///
/// A `Container` is a handle, not a snapshot: it only means something inside
/// the transaction it was resolved in, which is why every method takes the
/// transaction explicitly.
#[derive(Debug, Clone)]
pub enum Container {
    Map(MapRef),
    List(ArrayRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Map,
    List,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Map => "map",
            ContainerKind::List => "list",
        }
    }
}

/// The last step of a resolved path, interpreted against its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// A key of a map parent.
    Key(String),
    /// A position in a list parent. Not bounds-checked.
    Index(u32),
    /// The `-` marker of a list parent: one past the last element.
    Append,
}

impl Container {
    /// Wrap `out` when it is a map or list node; hand it back otherwise.
    pub fn from_out(out: Out) -> Result<Container, Out> {
        match out {
            Out::YMap(map) => Ok(Container::Map(map)),
            Out::YArray(array) => Ok(Container::List(array)),
            other => Err(other),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Map(_) => ContainerKind::Map,
            Container::List(_) => ContainerKind::List,
        }
    }

    pub fn len<T: ReadTxn>(&self, txn: &T) -> u32 {
        match self {
            Container::Map(map) => map.len(txn),
            Container::List(array) => array.len(txn),
        }
    }

    /// Read the child at `at`. `None` when absent, out of bounds, `Append`,
    /// or when `at` does not fit this kind of container.
    pub fn get<T: ReadTxn>(&self, txn: &T, at: &Terminal) -> Option<Out> {
        match (self, at) {
            (Container::Map(map), Terminal::Key(key)) => map.get(txn, key),
            (Container::List(array), Terminal::Index(index)) => array.get(txn, *index),
            _ => None,
        }
    }

    /// Whether [`Container::insert`] would succeed at `at`.
    pub fn accepts<T: ReadTxn>(&self, txn: &T, at: &Terminal) -> bool {
        match (self, at) {
            (Container::Map(_), Terminal::Key(_)) => true,
            (Container::List(array), Terminal::Index(index)) => *index <= array.len(txn),
            (Container::List(_), Terminal::Append) => true,
            _ => false,
        }
    }

    /// Insert `value` at `at`: a map key is created or overwritten, a list
    /// element is inserted and later elements shift right. Returns `false`
    /// without touching the document when a list index is beyond the end.
    pub fn insert(&self, txn: &mut TransactionMut, at: &Terminal, value: In) -> bool {
        if !self.accepts(&*txn, at) {
            return false;
        }
        match (self, at) {
            (Container::Map(map), Terminal::Key(key)) => {
                map.insert(txn, key.as_str(), value);
            }
            (Container::List(array), Terminal::Index(index)) => {
                array.insert(txn, *index, value);
            }
            (Container::List(array), Terminal::Append) => {
                let len = array.len(&*txn);
                array.insert(txn, len, value);
            }
            _ => return false,
        }
        true
    }

    /// Overwrite an existing child. Returns `false` when there is none.
    pub fn set(&self, txn: &mut TransactionMut, at: &Terminal, value: In) -> bool {
        match (self, at) {
            (Container::Map(map), Terminal::Key(key)) => {
                if map.get(&*txn, key).is_none() {
                    return false;
                }
                map.insert(txn, key.as_str(), value);
                true
            }
            (Container::List(array), Terminal::Index(index)) => {
                if *index >= array.len(&*txn) {
                    return false;
                }
                array.remove(txn, *index);
                array.insert(txn, *index, value);
                true
            }
            _ => false,
        }
    }

    /// Delete an existing child. Returns `false` when there is none.
    pub fn remove(&self, txn: &mut TransactionMut, at: &Terminal) -> bool {
        match (self, at) {
            (Container::Map(map), Terminal::Key(key)) => map.remove(txn, key).is_some(),
            (Container::List(array), Terminal::Index(index)) => {
                if *index >= array.len(&*txn) {
                    return false;
                }
                array.remove(txn, *index);
                true
            }
            _ => false,
        }
    }
}
