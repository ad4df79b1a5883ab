//! Source languages and wrapping passes.
//!
//! Maps the language-compile and wrapping families of the feature vocabulary
//! onto typed values.

use serde::{Deserialize, Serialize};

use crate::core::feature::{tags, FeatureSet};

/// Source language compiled by a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C
    C,
    /// C++
    Cxx,
    /// Fortran (77 and 90)
    Fortran,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 3] = [Language::C, Language::Cxx, Language::Fortran];

    /// The feature tag that selects this language's compiler front end.
    pub fn compile_tag(&self) -> &'static str {
        match self {
            Language::C => tags::COMPILE_C,
            Language::Cxx => tags::COMPILE_CXX,
            Language::Fortran => tags::COMPILE_FORTRAN,
        }
    }

    /// Look up the language selected by a compile tag.
    pub fn from_compile_tag(tag: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.compile_tag() == tag)
    }

    /// Languages requested by a feature set, in declaration order.
    pub fn requested_by(features: &FeatureSet) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|l| features.contains(l.compile_tag()))
            .collect()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Language::C => "C",
            Language::Cxx => "C++",
            Language::Fortran => "Fortran",
        })
    }
}

/// An automatic interface-generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapPass {
    /// Generate an extension-callable wrapper from Fortran subroutine signatures.
    FortranExtension,
}

impl WrapPass {
    /// Every supported wrapping pass.
    pub const ALL: [WrapPass; 1] = [WrapPass::FortranExtension];

    /// The feature tag that requests this pass.
    pub fn tag(&self) -> &'static str {
        match self {
            WrapPass::FortranExtension => tags::WRAP_FORTRAN_AS_EXTENSION,
        }
    }

    /// The language the pass's generated code must be compiled with.
    pub fn required_language(&self) -> Language {
        match self {
            WrapPass::FortranExtension => Language::Fortran,
        }
    }

    /// Wrapping passes requested by a feature set.
    pub fn requested_by(features: &FeatureSet) -> Vec<WrapPass> {
        WrapPass::ALL
            .into_iter()
            .filter(|w| features.contains(w.tag()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_tag_roundtrip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_compile_tag(lang.compile_tag()), Some(lang));
        }
        assert_eq!(Language::from_compile_tag("compile-Rust"), None);
    }

    #[test]
    fn test_requested_by() {
        let features = FeatureSet::parse("compile-Fortran build-shared-extension compile-C");
        assert_eq!(
            Language::requested_by(&features),
            vec![Language::C, Language::Fortran]
        );
    }

    #[test]
    fn test_display_and_json_names() {
        assert_eq!(Language::Cxx.to_string(), "C++");
        assert_eq!(serde_json::to_string(&Language::Cxx).unwrap(), "\"cxx\"");
        assert!(serde_json::from_str::<Language>("\"cpp\"").is_err());
    }

    #[test]
    fn test_wrap_pass_requires_fortran() {
        let features = FeatureSet::parse("wrap-Fortran-as-extension");
        let passes = WrapPass::requested_by(&features);
        assert_eq!(passes, vec![WrapPass::FortranExtension]);
        assert_eq!(passes[0].required_language(), Language::Fortran);
    }
}
