//! surface - Resolving the drawing surface handed to the engine

use crate::error::SnowfallError;

pub const SURFACE_ID_CAPACITY: usize = 32;

/// Fixed-capacity identifier used to look a surface up by name.
pub type SurfaceId = heapless::String<SURFACE_ID_CAPACITY>;

/// Where the engine's drawing surface comes from.
#[derive(Debug)]
pub enum SurfaceSource<S> {
    /// An already obtained surface.
    Handle(S),
    /// A surface registered with a [`SurfaceResolver`] under this name.
    Lookup(SurfaceId),
}

impl<S> SurfaceSource<S> {
    /// Build a lookup source, failing if `id` does not fit a [`SurfaceId`].
    pub fn lookup(id: &str) -> Result<Self, SnowfallError> {
        let mut owned = SurfaceId::new();
        owned
            .push_str(id)
            .map_err(|_| SnowfallError::IdentifierTooLong)?;
        Ok(SurfaceSource::Lookup(owned))
    }

    /// Turn the source into a concrete surface. Called once, at construction.
    pub fn resolve<R>(self, resolver: &mut R) -> Result<S, SnowfallError>
    where
        R: SurfaceResolver<Surface = S> + ?Sized,
    {
        match self {
            SurfaceSource::Handle(surface) => Ok(surface),
            SurfaceSource::Lookup(id) => resolver
                .resolve(&id)
                .ok_or(SnowfallError::SurfaceNotFound(id)),
        }
    }
}

impl<S> From<S> for SurfaceSource<S> {
    fn from(surface: S) -> Self {
        SurfaceSource::Handle(surface)
    }
}

/// Host hook that hands out surfaces by identifier.
pub trait SurfaceResolver {
    type Surface;

    fn resolve(&mut self, id: &str) -> Option<Self::Surface>;
}

/// Resolver for hosts that only ever pass handles.
pub struct NoLookup<S>(core::marker::PhantomData<S>);

impl<S> NoLookup<S> {
    pub const fn new() -> Self {
        Self(core::marker::PhantomData)
    }
}

impl<S> Default for NoLookup<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SurfaceResolver for NoLookup<S> {
    type Surface = S;

    fn resolve(&mut self, _id: &str) -> Option<S> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Registry {
        names: &'static [&'static str],
    }

    impl SurfaceResolver for Registry {
        type Surface = usize;

        fn resolve(&mut self, id: &str) -> Option<usize> {
            self.names.iter().position(|n| *n == id)
        }
    }

    #[test]
    fn handle_resolves_to_itself() {
        let source: SurfaceSource<usize> = 42.into();
        assert_eq!(source.resolve(&mut NoLookup::new()), Ok(42));
    }

    #[test]
    fn lookup_goes_through_resolver() {
        let mut registry = Registry {
            names: &["sidebar", "snow"],
        };
        let source = SurfaceSource::lookup("snow").unwrap();
        assert_eq!(source.resolve(&mut registry), Ok(1));
    }

    #[test]
    fn missing_surface_fails_fast() {
        let mut registry = Registry { names: &[] };
        let source = SurfaceSource::<usize>::lookup("snow").unwrap();
        match source.resolve(&mut registry) {
            Err(SnowfallError::SurfaceNotFound(id)) => assert_eq!(id.as_str(), "snow"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn oversized_identifier_is_rejected() {
        let long = "x".repeat(SURFACE_ID_CAPACITY + 1);
        assert!(matches!(
            SurfaceSource::<usize>::lookup(&long),
            Err(SnowfallError::IdentifierTooLong)
        ));
    }
}
