use std::sync::Arc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use super::*;
use crate::estimator::{ConstantEstimator, Estimator, FnEstimator, Statistic};
use crate::features::{apply_derived_flags, Attribute, FeatureColumn as C, FeatureRow};

fn projector(set: EstimatorSet) -> Projector {
    Projector::new(Arc::new(set), ProjectionConfig::default()).unwrap()
}

fn shifted(column: C, by: f64) -> Arc<dyn Estimator> {
    Arc::new(FnEstimator::new("shifted", move |row: &FeatureRow| row.get(column) + by))
}

/// Every attribute and the overall improve by one point a season.
fn optimistic() -> EstimatorSet {
    let mut builder = EstimatorSet::builder();
    for attribute in Attribute::ALL {
        builder =
            builder.with(Statistic::for_attribute(attribute), shifted(attribute.column(), 1.0));
    }
    builder
        .with(Statistic::Overall, shifted(C::Overall, 1.0))
        .with(Statistic::Potential, shifted(C::Potential, 0.0))
        .with(Statistic::RatingChange, Arc::new(ConstantEstimator::new(1.0)))
        .with(Statistic::ValueEur, Arc::new(ConstantEstimator::new(30_000_000.0)))
        .with(Statistic::Goals90, shifted(C::GoalsPer90, 0.0))
        .with(Statistic::Assists90, shifted(C::AssistsPer90, 0.0))
        .with(Statistic::Tackles90, shifted(C::TacklesPer90, 0.0))
        .with(Statistic::Interceptions90, shifted(C::InterceptionsPer90, 0.0))
        .with(Statistic::KeyPasses90, shifted(C::KeyPassesPer90, 0.0))
        .with(Statistic::Minutes, shifted(C::Minutes, 0.0))
        .build()
}

fn prospect() -> FeatureRecord {
    let mut record = FeatureRecord {
        age: 22.0,
        overall: 80.0,
        potential: 88.0,
        pace: 86.0,
        shooting: 79.0,
        passing: 74.0,
        dribbling: 82.0,
        defending: 38.0,
        physic: 68.0,
        minutes: 2400.0,
        nineties: 2400.0 / 90.0,
        goals_per90: 0.45,
        assists_per90: 0.2,
        goals_assists_per90: 0.65,
        xg_per90: 0.4,
        value_eur: 20_000_000.0,
        is_forward: 1.0,
        ..Default::default()
    };
    apply_derived_flags(&mut record);
    record
}

fn veteran() -> FeatureRecord {
    let mut record = FeatureRecord {
        age: 36.0,
        overall: 85.0,
        potential: 85.0,
        pace: 70.0,
        shooting: 86.0,
        passing: 84.0,
        dribbling: 83.0,
        defending: 45.0,
        physic: 76.0,
        minutes: 2100.0,
        goals_per90: 0.6,
        value_eur: 15_000_000.0,
        has_prior_season: 1.0,
        ..Default::default()
    };
    apply_derived_flags(&mut record);
    record
}

#[test]
fn test_prospect_grows_without_passing_ceiling() {
    let projection =
        projector(optimistic()).project(&ProjectionRequest::new(7, prospect())).unwrap();
    let seasons = projection.seasons();

    assert_eq!(seasons.len(), usize::from(PROJECTION_YEARS));
    assert_eq!(seasons[0].age, 22);
    assert_eq!(seasons[8].age, 30);
    assert_eq!(seasons[0].overall, 83);

    let mut previous_overall = 80;
    let mut previous_value = 20_000_000.0;
    for season in seasons {
        assert!(season.overall <= 93);
        assert!(season.overall >= previous_overall);
        if season.overall > previous_overall {
            assert!(season.value_eur > previous_value, "year {} value did not grow", season.year);
        }
        previous_overall = season.overall;
        previous_value = season.value_eur;
    }
    assert!(seasons[8].overall > seasons[0].overall);
}

#[test]
fn test_old_elite_declines_gently() {
    let projection = projector(EstimatorSet::carry_forward())
        .project(&ProjectionRequest::new(9, veteran()))
        .unwrap();
    let seasons = projection.seasons();

    assert_eq!(seasons[0].overall, 84);
    let mut previous_overall = 85;
    let mut previous_value = 15_000_000.0;
    for season in seasons {
        // the elite tier from year 1 keeps the decline at a point per season
        assert!(season.rating_change <= 0 && season.rating_change >= -1);
        assert!(season.overall <= previous_overall);
        assert!(season.value_eur <= previous_value);
        assert!(season.value_eur >= 500_000.0);
        previous_overall = season.overall;
        previous_value = season.value_eur;
    }
    assert!(seasons[8].value_eur < 15_000_000.0);
    let last = projection.year(9).unwrap();
    assert_eq!(last.age, 44);
    assert!(last.overall >= 75);
}

#[test]
fn test_missing_record_aborts_only_that_player() {
    let projector = projector(EstimatorSet::carry_forward());
    let missing =
        ProjectionRequest { player_id: 3, name: Some("No Stats".to_string()), features: None };

    let err = projector.project(&missing).unwrap_err();
    assert!(matches!(err, ProjectionError::MissingFeatureRecord { player_id: 3 }));
    assert!(err.is_input_error());

    let report = projector.project_batch(&[
        ProjectionRequest::new(1, prospect()),
        missing,
        ProjectionRequest::new(2, veteran()),
    ]);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.entries[1].player_id, 3);

    let computed_at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
    let records = report.records(computed_at);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].player_id, 1);
}

#[test]
fn test_invalid_mandatory_features_rejected() {
    let projector = projector(EstimatorSet::carry_forward());

    for record in [
        FeatureRecord { age: f64::NAN, ..prospect() },
        FeatureRecord { overall: 0.0, ..prospect() },
        FeatureRecord { potential: f64::INFINITY, ..prospect() },
    ] {
        let err = projector.project(&ProjectionRequest::new(5, record)).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidFeature { player_id: 5, .. }));
    }
}

#[test]
fn test_non_finite_optional_features_are_neutralised() {
    let record = FeatureRecord { xg_per90: f64::NAN, wage_zscore: f64::INFINITY, ..prospect() };
    let projection = projector(EstimatorSet::carry_forward())
        .project(&ProjectionRequest::new(1, record))
        .unwrap();
    assert_eq!(projection.len(), 9);
    assert!(!projection.is_empty());
}

#[test]
fn test_repeated_projection_is_identical() {
    let projector = projector(optimistic());
    let request = ProjectionRequest::new(11, prospect());
    assert_eq!(projector.project(&request).unwrap(), projector.project(&request).unwrap());
}

#[test]
fn test_projection_serialises_as_year_list() {
    let projection = projector(EstimatorSet::carry_forward())
        .project(&ProjectionRequest::new(1, prospect()))
        .unwrap();
    let json = serde_json::to_value(&projection).unwrap();
    let list = json.as_array().unwrap();

    assert_eq!(list.len(), 9);
    for (i, season) in list.iter().enumerate() {
        assert_eq!(season["year"], i as u64 + 1);
    }
}

#[test]
fn test_record_carries_year_one_summary() {
    let projection =
        projector(optimistic()).project(&ProjectionRequest::new(21, prospect())).unwrap();
    let computed_at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
    let name = Some("Prospect".to_string());
    let record = ProjectionRecord::from_projection(21, name, &projection, computed_at).unwrap();

    assert_eq!(record.year1_overall, projection.seasons()[0].overall);
    assert_eq!(record.year1_goals, projection.seasons()[0].goals);
    assert_eq!(record.seasons.len(), 9);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["computed_at"], "2026-05-01T12:00:00Z");
    let empty = Projection::default();
    assert!(ProjectionRecord::from_projection(21, None, &empty, computed_at).is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_projection_invariants(
        age in 17.0f64..38.0,
        overall in 45.0f64..92.0,
        gap in 0.0f64..12.0,
        value in 100_000.0f64..180_000_000.0,
        momentum in -10.0f64..10.0,
        minutes in 0.0f64..3400.0,
        attrs in proptest::array::uniform6(20.0f64..95.0),
    ) {
        let mut record = FeatureRecord {
            age,
            overall,
            potential: (overall + gap).min(99.0),
            pace: attrs[0],
            shooting: attrs[1],
            passing: attrs[2],
            dribbling: attrs[3],
            defending: attrs[4],
            physic: attrs[5],
            minutes,
            value_eur: value,
            rating_momentum: momentum,
            ..Default::default()
        };
        apply_derived_flags(&mut record);
        let first_potential = record.potential;

        let projection =
            projector(optimistic()).project(&ProjectionRequest::new(1, record)).unwrap();
        let seasons = projection.seasons();
        prop_assert_eq!(seasons.len(), 9);

        let mut previous_value = value.max(500_000.0);
        let mut previous_potential = first_potential.round() as u8;
        for (i, season) in seasons.iter().enumerate() {
            prop_assert_eq!(usize::from(season.year), i + 1);
            prop_assert_eq!(season.age, seasons[0].age + i as u32);
            prop_assert!((1..=99).contains(&season.overall));
            prop_assert!(season.value_eur >= 500_000.0);
            prop_assert!(season.attributes_at_or_above_overall() >= 2);
            prop_assert!(season.potential >= previous_potential);
            if season.rating_change < 0 {
                prop_assert!(season.value_eur <= previous_value);
            }
            previous_value = season.value_eur;
            previous_potential = season.potential;
        }
    }
}
