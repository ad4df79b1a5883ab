//! Spline fitting and interpolation extensions.
//!
//! `fitpack` is a static Fortran library of curve and surface fitting
//! routines. `_fitpack` and the generated `dfitpack` wrapper both link it;
//! the remaining modules are plain C or C++ extensions.

use crate::builder::config::BuilderConfig;
use crate::builder::errors::RegistryError;
use crate::core::feature::tags::{
    BUILD_SHARED_EXTENSION, BUILD_STATIC_LIBRARY, COMPILE_C, COMPILE_CXX, COMPILE_FORTRAN,
    WRAP_FORTRAN_AS_EXTENSION,
};
use crate::hook::{HookContext, PreBuildHook};

/// Subsystem identity.
pub const NAME: &str = "interpolate";

/// Pre-build hook for the interpolate subsystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpolateHook;

impl PreBuildHook for InterpolateHook {
    fn subsystem(&self) -> &str {
        NAME
    }

    fn pre_build(&self, ctx: &mut HookContext<'_>) -> Result<(), RegistryError> {
        ctx.register_compiled_library_builder(
            "fitpack",
            BuilderConfig::default().with_features([COMPILE_FORTRAN, BUILD_STATIC_LIBRARY]),
        )?;

        let extension = |uses: &[&str], features: &[&str]| {
            uses.iter()
                .fold(BuilderConfig::default(), |config, dep| config.uses(dep))
                .with_features(features.iter().copied())
                .with_feature(BUILD_SHARED_EXTENSION)
        };

        ctx.register_builder(
            "_fitpack",
            extension(&["fitpack", "CLIB"], &[COMPILE_C, COMPILE_FORTRAN]),
        )?;
        ctx.register_builder(
            "dfitpack",
            extension(
                &["fitpack", "CLIB"],
                &[COMPILE_C, COMPILE_FORTRAN, WRAP_FORTRAN_AS_EXTENSION],
            ),
        )?;
        ctx.register_builder("_interpolate", extension(&["CLIB"], &[COMPILE_CXX]))?;
        ctx.register_builder("interpnd", extension(&["CLIB"], &[COMPILE_C]))?;
        ctx.register_builder(
            "_ppoly",
            extension(&["FBLAS", "CLIB"], &[COMPILE_C, COMPILE_FORTRAN]),
        )?;

        Ok(())
    }
}
