use core::str::{FromStr, Split};

#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Specified path not exists or invalid")]
    UnknownPath,
    #[error("Expect value")]
    ExpectValue,
    #[error("Value not valid")]
    InvalidValue,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Value<'a>(pub Option<&'a str>);

impl<'a> Value<'a> {
    pub fn parse<T: FromStr>(&self) -> Result<T, Error> {
        match self.0 {
            Some(s) => FromStr::from_str(s).map_err(|_| Error::InvalidValue),
            None => Err(Error::ExpectValue),
        }
    }

    pub fn parse_or<T: FromStr>(&self, or: T) -> Result<T, Error> {
        match self.0 {
            Some(s) => FromStr::from_str(s).map_err(|_| Error::InvalidValue),
            None => Ok(or),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Path<'a>(Split<'a, char>);

impl<'a> Path<'a> {
    pub fn str(&mut self) -> Result<&'a str, Error> {
        self.0.next().ok_or(Error::UnknownPath)
    }
}

impl<'a> From<&'a str> for Path<'a> {
    fn from(path: &'a str) -> Self {
        Self(path.split('.'))
    }
}

/// Sets a single field addressed by a dotted, kebab-case path.
pub trait PathSet {
    fn set(&mut self, path: Path, value: Value) -> Result<(), Error>;
}

/// Applies `path=value`; a bare `path` resets the field to its default.
pub fn apply<T: PathSet>(target: &mut T, assignment: &str) -> Result<(), Error> {
    let mut splitted = assignment.splitn(2, '=');
    let path = splitted.next().map(str::trim).filter(|p| !p.is_empty()).ok_or(Error::UnknownPath)?;
    let value = Value(splitted.next().map(str::trim));
    target.set(Path::from(path), value)
}
