//! Subsystems whose pre-build hooks ship with stevedore.

pub mod interpolate;

use crate::hook::PreBuildHook;

pub use interpolate::InterpolateHook;

/// Names accepted by `builtin = [...]` in the manifest.
pub const BUILTIN_NAMES: &[&str] = &[interpolate::NAME];

/// Look up a built-in subsystem hook by name.
pub fn builtin(name: &str) -> Option<Box<dyn PreBuildHook>> {
    match name {
        interpolate::NAME => Some(Box::new(InterpolateHook)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_name_resolves() {
        for name in BUILTIN_NAMES {
            let hook = builtin(name).unwrap();
            assert_eq!(hook.subsystem(), *name);
        }
        assert!(builtin("optimize").is_none());
    }
}
