//! Observation values driven by measurement profiles

use crate::domain::{
    CodeableConcept, CodedConcept, IpsError, Meta, Observation, ObservationComponent,
    ObservationStatus, Quantity, Reference, ReferenceRange, ResourceId, Result,
};
use crate::facts::FactProvider;
use crate::terminology::measurements::{profile_for, QuantitySpec, ValueSpec};

fn draw_quantity(facts: &mut FactProvider, spec: &QuantitySpec) -> Quantity {
    let value = facts.decimal_between(spec.low, spec.high, spec.decimals);
    Quantity::ucum(value, spec.unit, spec.ucum)
}

pub(super) fn build(
    facts: &mut FactProvider,
    id: ResourceId,
    concept: &CodedConcept,
    subject: Reference,
) -> Result<Observation> {
    let profile = profile_for(concept.code).ok_or_else(|| {
        IpsError::Configuration(format!(
            "observation code {} ({}) has no measurement profile",
            concept.code, concept.display
        ))
    })?;

    let (min_days, max_days) = profile.recency_days;
    let mut observation = Observation {
        id,
        meta: Meta::profile(profile.profile),
        status: ObservationStatus::Final,
        category: vec![CodeableConcept::coded(&profile.category)],
        code: CodeableConcept::coded(concept),
        subject,
        effective_date_time: facts.past_datetime(min_days, max_days),
        value_quantity: None,
        value_codeable_concept: None,
        component: Vec::new(),
        reference_range: Vec::new(),
    };

    match profile.value {
        ValueSpec::Quantity(spec) => {
            observation.value_quantity = Some(draw_quantity(facts, &spec));
            if let Some((low, high)) = spec.reference_range {
                observation.reference_range.push(ReferenceRange {
                    low: Quantity::ucum(low, spec.unit, spec.ucum),
                    high: Quantity::ucum(high, spec.unit, spec.ucum),
                });
            }
        }
        ValueSpec::Panel(components) => {
            observation.component = components
                .iter()
                .map(|(code, spec)| ObservationComponent {
                    code: CodeableConcept::coded(code),
                    value_quantity: draw_quantity(facts, spec),
                })
                .collect();
        }
        ValueSpec::Coded(answers) => {
            let answer = facts.choose(answers, "coded results")?;
            observation.value_codeable_concept = Some(CodeableConcept::coded(answer));
        }
    }

    Ok(observation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use crate::terminology::measurements::{LABORATORY_PROFILE, VITAL_SIGNS_PROFILE};
    use crate::terminology::tables::LOINC;

    fn subject() -> Reference {
        Reference::to("Patient", "p-1")
    }

    #[test]
    fn test_blood_pressure_is_a_panel() {
        let mut facts = FactProvider::seeded(Locale::base(), 1);
        let concept = CodedConcept::new(LOINC, "85354-9", "Blood pressure panel");
        let id = ResourceId::from_uuid(facts.uuid());
        let obs = build(&mut facts, id, &concept, subject()).unwrap();

        assert_eq!(obs.component.len(), 2);
        assert!(obs.value_quantity.is_none());
        assert_eq!(obs.meta.profile[0], VITAL_SIGNS_PROFILE);
        let systolic = &obs.component[0].value_quantity;
        assert!((110.0..=140.0).contains(&systolic.value));
        assert_eq!(systolic.code, "mm[Hg]");
    }

    #[test]
    fn test_glucose_is_a_quantity_with_range() {
        let mut facts = FactProvider::seeded(Locale::base(), 2);
        let concept = CodedConcept::new(LOINC, "2339-0", "Glucose [Mass/volume] in Blood");
        let id = ResourceId::from_uuid(facts.uuid());
        let obs = build(&mut facts, id, &concept, subject()).unwrap();

        assert!(obs.value_quantity.is_some());
        assert_eq!(obs.reference_range.len(), 1);
        assert_eq!(obs.meta.profile[0], LABORATORY_PROFILE);
    }

    #[test]
    fn test_blood_group_is_coded() {
        let mut facts = FactProvider::seeded(Locale::base(), 3);
        let concept = CodedConcept::new(LOINC, "882-1", "ABO and Rh group [Type] in Blood");
        let id = ResourceId::from_uuid(facts.uuid());
        let obs = build(&mut facts, id, &concept, subject()).unwrap();

        let value = obs.value_codeable_concept.unwrap();
        assert!(value.coding[0].display.starts_with("Blood group"));
    }

    #[test]
    fn test_unprofiled_code_is_configuration_error() {
        let mut facts = FactProvider::seeded(Locale::base(), 4);
        let concept = CodedConcept::new(LOINC, "0000-0", "Unknown");
        let id = ResourceId::from_uuid(facts.uuid());
        let err = build(&mut facts, id, &concept, subject()).unwrap_err();
        assert!(err.is_configuration());
    }
}
