mod document;

pub(crate) use self::document::{DocumentRow, KeyColumns};
