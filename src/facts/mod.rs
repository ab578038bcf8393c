//! Fact provider
//!
//! Source of every random value in a bundle: demographics, dates, booleans,
//! identifiers and UUIDs. All draws go through one seeded [`StdRng`] and all
//! dates are computed relative to a fixed reference instant, so two providers
//! built with the same seed and instant produce identical bundles.
//!
//! ```rust
//! use ipsgen::facts::FactProvider;
//! use ipsgen::locale::Locale;
//!
//! let mut a = FactProvider::seeded(Locale::base(), 7);
//! let mut b = FactProvider::seeded(Locale::base(), 7).with_reference_time(a.now());
//! assert_eq!(a.uuid(), b.uuid());
//! assert_eq!(a.full_name(), b.full_name());
//! ```

mod identifiers;

pub use identifiers::pps_check_letter;

use crate::domain::{Address, ContactPoint, Gender, HumanName, Identifier, IpsError, Result};
use crate::locale::{Locale, PostcodeFormat};
use chrono::{DateTime, Duration, DurationRound, NaiveDate, Utc};
use fake::faker::address::en::{
    BuildingNumber, CityName, PostCode, StateName, StreetName, StreetSuffix,
};
use fake::faker::internet::en::FreeEmailProvider;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Youngest and oldest generated patient, in years
pub const PATIENT_AGE_RANGE: (i64, i64) = (18, 90);

/// Given and family name of a generated person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub given: String,
    pub family: String,
}

impl From<PersonName> for HumanName {
    fn from(name: PersonName) -> Self {
        HumanName {
            name_use: "official".to_string(),
            family: name.family,
            given: vec![name.given],
        }
    }
}

/// Seeded source of synthetic facts for one locale
#[derive(Debug)]
pub struct FactProvider {
    locale: &'static Locale,
    rng: StdRng,
    now: DateTime<Utc>,
}

impl FactProvider {
    /// Provider with a fixed seed; the reference instant is the current time
    pub fn seeded(locale: &'static Locale, seed: u64) -> Self {
        Self::from_rng(locale, StdRng::seed_from_u64(seed))
    }

    /// Provider seeded from system entropy
    pub fn from_entropy(locale: &'static Locale) -> Self {
        Self::from_rng(locale, StdRng::from_entropy())
    }

    /// Seeded when `seed` is set, entropy otherwise
    pub fn new(locale: &'static Locale, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(locale, seed),
            None => Self::from_entropy(locale),
        }
    }

    fn from_rng(locale: &'static Locale, rng: StdRng) -> Self {
        let now = Utc::now();
        let now = now.duration_trunc(Duration::seconds(1)).unwrap_or(now);
        Self { locale, rng, now }
    }

    /// Pins the instant that relative dates are computed from
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// The reference instant
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The locale facts are drawn for
    pub fn locale(&self) -> &'static Locale {
        self.locale
    }

    /// Random v4 UUID drawn from the provider's generator
    pub fn uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }

    /// Fair coin
    pub fn boolean(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Integer in `low..=high`
    pub fn int_between(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    /// Float in `low..=high` rounded to `decimals` places
    pub fn decimal_between(&mut self, low: f64, high: f64, decimals: u32) -> f64 {
        let raw = if low >= high {
            low
        } else {
            self.rng.gen_range(low..=high)
        };
        let scale = 10f64.powi(decimals as i32);
        ((raw * scale).round() / scale).clamp(low, high.max(low))
    }

    /// Uniform choice from a non-empty slice
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming `what` when `items` is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T], what: &str) -> Result<&'a T> {
        items
            .choose(&mut self.rng)
            .ok_or_else(|| IpsError::Configuration(format!("no {what} to choose from")))
    }

    /// Locale-appropriate given and family name
    pub fn full_name(&mut self) -> PersonName {
        let given: String = FirstName().fake_with_rng(&mut self.rng);
        let family = self.pick_or_fake(self.locale.surnames, |rng| LastName().fake_with_rng(rng));
        PersonName { given, family }
    }

    /// Administrative gender
    pub fn gender(&mut self) -> Gender {
        Gender::ALL[self.rng.gen_range(0..Gender::ALL.len())]
    }

    /// Locale-appropriate home address
    pub fn address(&mut self) -> Address {
        let number: String = BuildingNumber().fake_with_rng(&mut self.rng);
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        let suffix: String = StreetSuffix().fake_with_rng(&mut self.rng);
        let city = self.pick_or_fake(self.locale.cities, |rng| CityName().fake_with_rng(rng));
        let state = self.pick_or_fake(self.locale.regions, |rng| StateName().fake_with_rng(rng));
        let postal_code = self.postal_code();

        Address {
            address_use: "home".to_string(),
            line: vec![format!("{number} {street} {suffix}")],
            city,
            state: Some(state),
            postal_code,
            country: self.locale.country_code.to_string(),
        }
    }

    fn pick_or_fake(
        &mut self,
        table: Option<&'static [&'static str]>,
        fake: impl FnOnce(&mut StdRng) -> String,
    ) -> String {
        match table.and_then(|t| t.choose(&mut self.rng)) {
            Some(value) => value.to_string(),
            None => fake(&mut self.rng),
        }
    }

    fn postal_code(&mut self) -> String {
        match self.locale.postcode {
            PostcodeFormat::Faker => PostCode().fake_with_rng(&mut self.rng),
            PostcodeFormat::Eircode(routing_keys) => {
                let key = routing_keys.choose(&mut self.rng).copied().unwrap_or("D01");
                format!("{key} {}", identifiers::eircode_unique_id(&mut self.rng))
            }
        }
    }

    /// National identifier under the locale's scheme
    pub fn national_identifier(&mut self) -> Identifier {
        let scheme = self.locale.identifier;
        Identifier {
            system: scheme.system.to_string(),
            value: identifiers::format_identifier(scheme.format, &mut self.rng),
        }
    }

    /// Phone number and email address
    pub fn telecom(&mut self, name: &PersonName) -> Vec<ContactPoint> {
        let phone = identifiers::fill_pattern(self.locale.phone_pattern, &mut self.rng);
        let provider: String = FreeEmailProvider().fake_with_rng(&mut self.rng);
        let local_part: String = format!("{}.{}", name.given, name.family)
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
            .collect();
        let suffix = self.rng.gen_range(1..100);

        vec![
            ContactPoint {
                system: "phone".to_string(),
                value: phone,
                contact_use: "mobile".to_string(),
            },
            ContactPoint {
                system: "email".to_string(),
                value: format!("{local_part}{suffix}@{provider}"),
                contact_use: "home".to_string(),
            },
        ]
    }

    /// Birth date of an adult within [`PATIENT_AGE_RANGE`]
    pub fn birth_date(&mut self) -> NaiveDate {
        let (min_age, max_age) = PATIENT_AGE_RANGE;
        let days = self.rng.gen_range(min_age * 365..=max_age * 365);
        (self.now - Duration::days(days)).date_naive()
    }

    /// Instant between `min_days` and `max_days` (plus up to a day) before
    /// the reference instant
    pub fn past_datetime(&mut self, min_days: i64, max_days: i64) -> DateTime<Utc> {
        let days = self.int_between(min_days, max_days);
        let seconds = self.rng.gen_range(0..86_400);
        self.now - Duration::days(days) - Duration::seconds(seconds)
    }

    /// Instant within the last `years` years
    pub fn datetime_within_years(&mut self, years: i64) -> DateTime<Utc> {
        self.past_datetime(0, years * 365)
    }

    /// Date between `min_days` and `max_days` after `after`
    pub fn date_after(&mut self, after: NaiveDate, min_days: i64, max_days: i64) -> NaiveDate {
        after + Duration::days(self.int_between(min_days, max_days))
    }

    /// Alphanumeric code such as a vaccine lot number
    pub fn lot_number(&mut self) -> String {
        identifiers::fill_pattern("??####", &mut self.rng)
    }
}
