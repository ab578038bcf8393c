//! Irish locale data

use super::{IdentifierFormat, IdentifierScheme, Locale, PostcodeFormat};
use crate::domain::ResourceKind;
use crate::terminology::tables::IRISH_CONDITIONS;

const COUNTIES: &[&str] = &[
    "Dublin",
    "Cork",
    "Galway",
    "Limerick",
    "Waterford",
    "Kilkenny",
    "Wexford",
    "Kerry",
    "Clare",
    "Tipperary",
    "Mayo",
    "Donegal",
    "Kildare",
    "Wicklow",
    "Meath",
    "Louth",
    "Sligo",
    "Westmeath",
];

const TOWNS: &[&str] = &[
    "Dublin",
    "Cork",
    "Galway",
    "Limerick",
    "Waterford",
    "Kilkenny",
    "Drogheda",
    "Dundalk",
    "Swords",
    "Bray",
    "Navan",
    "Ennis",
    "Tralee",
    "Carlow",
    "Athlone",
    "Sligo",
    "Letterkenny",
    "Wexford",
];

const SURNAMES: &[&str] = &[
    "Murphy",
    "Kelly",
    "O'Sullivan",
    "Walsh",
    "Smith",
    "O'Brien",
    "Byrne",
    "Ryan",
    "O'Connor",
    "O'Neill",
    "O'Reilly",
    "Doyle",
    "McCarthy",
    "Gallagher",
    "O'Doherty",
    "Kennedy",
    "Lynch",
    "Murray",
    "Quinn",
    "Moore",
];

const EIRCODE_ROUTING_KEYS: &[&str] = &[
    "A94", "D01", "D02", "D04", "D08", "D12", "D15", "D24", "H91", "T12", "T23", "V94", "X91",
    "R95", "F94", "V92", "A92", "W91",
];

pub(super) static IRELAND: Locale = Locale {
    code: "en_IE",
    name: "Ireland",
    country_code: "IE",
    identifier: IdentifierScheme {
        system: "urn:oid:2.16.372.1.2.1.1",
        format: IdentifierFormat::IrishPps,
    },
    regions: Some(COUNTIES),
    cities: Some(TOWNS),
    surnames: Some(SURNAMES),
    postcode: PostcodeFormat::Eircode(EIRCODE_ROUTING_KEYS),
    phone_pattern: "+353 8^ ### ####",
    patient_descriptor: "an Irish patient",
    clinical_specialty: "Irish healthcare",
    code_extensions: &[(ResourceKind::Condition, IRISH_CONDITIONS)],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_keys_are_three_characters() {
        for key in EIRCODE_ROUTING_KEYS {
            assert_eq!(key.len(), 3, "{key}");
        }
    }

    #[test]
    fn test_counties_are_unique() {
        let mut counties = COUNTIES.to_vec();
        counties.sort();
        counties.dedup();
        assert_eq!(counties.len(), COUNTIES.len());
    }
}
