//! Various basic utilites that are used in places throughout the project

/// Conversion into another type, like `Into`
///
/// These exist alongside the standard `From`/`Into` so that we can provide conversions between
/// types from other crates (like `Option<_>` from crossterm's modifiers) without running into the
/// orphan rules.
pub trait XInto<T> {
    fn xinto(self) -> T;
}

pub trait XFrom<T> {
    fn xfrom(other: T) -> Self;
}

impl<T, S: XFrom<T>> XInto<S> for T {
    fn xinto(self) -> S {
        S::xfrom(self)
    }
}
