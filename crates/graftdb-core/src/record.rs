use crate::value::Value;
use serde::{Deserialize, Serialize};

///
/// Record
///
/// One raw row as returned by a document source: ordered field/value pairs
/// with unique names. Field order is preserved end to end so projections and
/// store ordering survive the trip through the engine.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

///
/// SlotValues
///
/// Borrowed view of the value(s) living at one dotted path.
/// `Items` is the one-level flatten through an array of sub-documents;
/// absent or non-record elements read as `None`.
///

#[derive(Debug)]
pub enum SlotValues<'a> {
    Missing,
    Scalar(&'a Value),
    Items(Vec<Option<&'a Value>>),
}

///
/// SlotWrite
///
/// Replacement for the value(s) at one dotted path.
/// `Items` entries set to `None` leave the element untouched.
///

#[derive(Debug)]
pub enum SlotWrite {
    Scalar(Value),
    Items(Vec<Option<Value>>),
}

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build a record from field/value pairs; later duplicates replace
    /// earlier ones in place.
    pub fn from_fields<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let mut record = Self::new();
        for (name, value) in pairs {
            record.set(name, value);
        }

        record
    }

    ///
    /// ACCESS
    ///

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a field, replacing in place or appending at the end.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();

        if let Some(slot) = self.get_mut(&name) {
            *slot = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Remove a top-level field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(field, _)| field == name)?;

        Some(self.fields.remove(index).1)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    ///
    /// PATHS
    ///

    /// Read the value at a dotted path, descending through embedded records
    /// and grafted documents (never through lists; see [`read_slots`]).
    ///
    /// [`read_slots`]: Self::read_slots
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let value = current.get(segment)?;
            if segments.peek().is_none() {
                return Some(value);
            }

            current = match value {
                Value::Record(inner) => inner,
                Value::Doc(doc) => doc.fields(),
                _ => return None,
            };
        }

        None
    }

    /// Read the value(s) at a dotted path, flattening one array-of-subdocument
    /// level into positional items.
    #[must_use]
    pub fn read_slots(&self, path: &str) -> SlotValues<'_> {
        let segments: Vec<&str> = path.split('.').collect();

        read_in(self, &segments)
    }

    /// Replace the value(s) at a dotted path.
    ///
    /// A `Scalar` write creates the terminal field when absent (virtual
    /// relations attach fields the store never returned); intermediate
    /// segments must already exist. Returns whether anything was written.
    pub fn write_slots(&mut self, path: &str, write: SlotWrite) -> bool {
        let segments: Vec<&str> = path.split('.').collect();

        write_in(self, &segments, write)
    }
}

fn read_in<'a>(record: &'a Record, segments: &[&str]) -> SlotValues<'a> {
    let Some((head, rest)) = segments.split_first() else {
        return SlotValues::Missing;
    };
    let Some(value) = record.get(head) else {
        return SlotValues::Missing;
    };

    if rest.is_empty() {
        return SlotValues::Scalar(value);
    }

    match value {
        Value::Record(inner) => read_in(inner, rest),
        Value::Doc(doc) => read_in(doc.fields(), rest),
        Value::List(items) => {
            // one flatten level: the remaining path applies to each element
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let element = match item {
                    Value::Record(inner) => read_in(inner, rest),
                    Value::Doc(doc) => read_in(doc.fields(), rest),
                    _ => SlotValues::Missing,
                };
                out.push(match element {
                    SlotValues::Scalar(v) => Some(v),
                    _ => None,
                });
            }

            SlotValues::Items(out)
        }
        _ => SlotValues::Missing,
    }
}

fn write_in(record: &mut Record, segments: &[&str], write: SlotWrite) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };

    if rest.is_empty() {
        return match write {
            SlotWrite::Scalar(value) => {
                record.set(*head, value);
                true
            }
            // items always target a flattened list, never a terminal field
            SlotWrite::Items(_) => false,
        };
    }

    let Some(value) = record.get_mut(head) else {
        return false;
    };

    match value {
        Value::Record(inner) => write_in(inner, rest, write),
        Value::Doc(doc) => write_in(doc.fields_mut(), rest, write),
        Value::List(items) => match write {
            SlotWrite::Items(values) => {
                let mut wrote = false;
                for (item, replacement) in items.iter_mut().zip(values) {
                    let Some(replacement) = replacement else {
                        continue;
                    };
                    let target = match item {
                        Value::Record(inner) => inner,
                        Value::Doc(doc) => doc.fields_mut(),
                        _ => continue,
                    };
                    wrote |= write_in(target, rest, SlotWrite::Scalar(replacement));
                }

                wrote
            }
            SlotWrite::Scalar(_) => false,
        },
        _ => false,
    }
}

/// Build a [`Record`] from literal field/value pairs.
#[macro_export]
macro_rules! record {
    () => { $crate::record::Record::new() };
    ( $( $name:literal => $value:expr ),* $(,)? ) => {{
        let mut record = $crate::record::Record::new();
        $( record.set($name, $value); )*
        record
    }};
}
