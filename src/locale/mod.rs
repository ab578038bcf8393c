//! Locale descriptors
//!
//! A [`Locale`] bundles everything region-specific: the demographic data the
//! fact provider draws from, the national identifier scheme, the code-table
//! additions and the phrase used when asking for clinical narratives. The
//! composer receives one descriptor; nothing downstream branches on the
//! region.

mod ireland;

use crate::domain::{CodedConcept, IpsError, ResourceKind, Result};

/// How national identifier values are formed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierFormat {
    /// `#` is any digit, `^` a non-zero digit, other characters are literal
    Pattern(&'static str),
    /// Irish Personal Public Service number: 7 digits and a check letter
    IrishPps,
}

/// National identifier system and value format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierScheme {
    pub system: &'static str,
    pub format: IdentifierFormat,
}

/// How postal codes are formed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostcodeFormat {
    /// Faker's English postcodes
    Faker,
    /// Irish Eircode: routing key from the list plus a 4 character unique id
    Eircode(&'static [&'static str]),
}

/// Region-specific generation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Locale code accepted on the command line (`en_US`, `en_IE`)
    pub code: &'static str,
    /// Human readable region name
    pub name: &'static str,
    /// ISO 3166 country code used on addresses
    pub country_code: &'static str,
    pub identifier: IdentifierScheme,
    /// Values for `Address.state`; `None` draws faker state names
    pub regions: Option<&'static [&'static str]>,
    /// Values for `Address.city`; `None` draws faker city names
    pub cities: Option<&'static [&'static str]>,
    /// Family names; `None` draws faker last names
    pub surnames: Option<&'static [&'static str]>,
    pub postcode: PostcodeFormat,
    /// Phone number pattern, same placeholders as [`IdentifierFormat::Pattern`]
    pub phone_pattern: &'static str,
    /// How narrative prompts refer to the patient
    pub patient_descriptor: &'static str,
    /// Field the narrative service is told it specializes in
    pub clinical_specialty: &'static str,
    /// Code-table additions per kind
    pub code_extensions: &'static [(ResourceKind, &'static [CodedConcept])],
}

static BASE: Locale = Locale {
    code: "en_US",
    name: "United States",
    country_code: "US",
    identifier: IdentifierScheme {
        system: "urn:oid:2.16.840.1.113883.2.4.6.3",
        format: IdentifierFormat::Pattern("^##-##-####"),
    },
    regions: None,
    cities: None,
    surnames: None,
    postcode: PostcodeFormat::Faker,
    phone_pattern: "+1 ^##-^##-####",
    patient_descriptor: "a patient",
    clinical_specialty: "healthcare",
    code_extensions: &[],
};

impl Locale {
    /// The base locale (United States data, base code tables)
    pub fn base() -> &'static Locale {
        &BASE
    }

    /// Ireland: Irish surnames and counties, PPS numbers, extra conditions
    pub fn ireland() -> &'static Locale {
        &ireland::IRELAND
    }

    /// Every shipped locale
    pub fn all() -> [&'static Locale; 2] {
        [Self::base(), Self::ireland()]
    }

    /// Resolves a locale selector
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown selectors.
    ///
    /// ```rust
    /// use ipsgen::locale::Locale;
    ///
    /// assert_eq!(Locale::from_code("en_IE").unwrap().country_code, "IE");
    /// assert_eq!(Locale::from_code("ireland").unwrap().code, "en_IE");
    /// assert!(Locale::from_code("fr_FR").is_err());
    /// ```
    pub fn from_code(code: &str) -> Result<&'static Locale> {
        match code.trim().to_lowercase().replace('-', "_").as_str() {
            "en_us" | "us" | "base" => Ok(Self::base()),
            "en_ie" | "ie" | "ireland" | "irish" => Ok(Self::ireland()),
            other => Err(IpsError::Configuration(format!(
                "Unknown locale '{other}'. Supported locales: en_US, en_IE"
            ))),
        }
    }

    /// Code-table additions for a kind
    pub fn extensions_for(&self, kind: ResourceKind) -> &'static [CodedConcept] {
        self.code_extensions
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, concepts)| *concepts)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_aliases() {
        assert_eq!(Locale::from_code("en_US").unwrap(), Locale::base());
        assert_eq!(Locale::from_code("EN-us").unwrap(), Locale::base());
        assert_eq!(Locale::from_code("en_IE").unwrap(), Locale::ireland());
        assert_eq!(Locale::from_code(" irish ").unwrap(), Locale::ireland());
    }

    #[test]
    fn test_unknown_locale_is_configuration_error() {
        let err = Locale::from_code("de_DE").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_base_has_no_extensions() {
        for kind in ResourceKind::ALL {
            assert!(Locale::base().extensions_for(kind).is_empty());
        }
    }

    #[test]
    fn test_ireland_extends_only_conditions() {
        let irish = Locale::ireland();
        assert_eq!(irish.extensions_for(ResourceKind::Condition).len(), 4);
        assert!(irish.extensions_for(ResourceKind::Allergy).is_empty());
        assert_eq!(irish.identifier.format, IdentifierFormat::IrishPps);
        assert_eq!(irish.identifier.system, "urn:oid:2.16.372.1.2.1.1");
    }

    #[test]
    fn test_locale_codes_are_unique() {
        let [a, b] = Locale::all();
        assert_ne!(a.code, b.code);
    }
}
