use std::{io::Write, path::PathBuf};

use machine_learning::{Classifier, Measurements, MlErr, PipelineSpec};
use tempfile::NamedTempFile;

const HEADER: &str =
    "species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year";

fn penguins_excerpt() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/fixtures/penguins_excerpt.csv")
}

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// Each species owns its depth and flipper values, bill length and mass are unique per row.
fn separated_csv() -> NamedTempFile {
    write_csv(&[
        "Adelie,Torgersen,30.1,20.0,170,3000,male,2007",
        "Adelie,Torgersen,30.2,20.0,170,3010,female,2007",
        "Adelie,Torgersen,30.3,20.0,170,3020,male,2008",
        "Adelie,Torgersen,30.4,20.0,170,3030,female,2008",
        "Gentoo,Biscoe,50.1,14.0,220,5000,male,2007",
        "Gentoo,Biscoe,50.2,14.0,220,5010,female,2007",
        "Gentoo,Biscoe,50.3,14.0,220,5020,male,2008",
        "Gentoo,Biscoe,50.4,14.0,220,5030,female,2008",
        "Chinstrap,Dream,45.1,18.5,195,3600,male,2007",
        "Chinstrap,Dream,45.2,18.5,195,3610,female,2007",
        "Chinstrap,Dream,45.3,18.5,195,3620,male,2008",
        "Chinstrap,Dream,45.4,18.5,195,3630,female,2008",
    ])
}

#[test]
fn classify_returns_a_known_species() {
    let classifier = Classifier::train(penguins_excerpt(), &PipelineSpec::default()).unwrap();
    let species = ["Adelie", "Gentoo", "Chinstrap"];

    assert_eq!(classifier.labels().names(), species);

    let queries = [
        ["39.1", "18.7", "181", "3750"],
        ["50", "15", "220", "5000"],
        ["45", "17", "190", "3500"],
        ["1", "2", "3", "4"],
    ];
    for [bl, bd, fl, bm] in queries {
        let variety = classifier.classify(bl, bd, fl, bm).unwrap();
        assert!(species.contains(&variety), "unexpected species {variety}");
    }
}

#[test]
fn known_rows_keep_their_label() {
    let classifier = Classifier::train(penguins_excerpt(), &PipelineSpec::default()).unwrap();

    assert_eq!(
        classifier.classify("39.1", "18.7", "181", "3750").unwrap(),
        "Adelie"
    );
    assert_eq!(
        classifier.classify("46.1", "13.2", "211", "4500").unwrap(),
        "Gentoo"
    );
    assert_eq!(
        classifier.classify("52.7", "19.8", "197", "3725").unwrap(),
        "Chinstrap"
    );
}

#[test]
fn every_row_of_a_separated_dataset_is_reproduced() {
    let file = separated_csv();
    let classifier = Classifier::train(file.path(), &PipelineSpec::default()).unwrap();

    let cases = [
        (["30.2", "20.0", "170", "3010"], "Adelie"),
        (["50.4", "14.0", "220", "5030"], "Gentoo"),
        (["45.1", "18.5", "195", "3600"], "Chinstrap"),
        // unseen length and mass, but the species' own depth and flipper
        (["30.9", "20.0", "170", "3999"], "Adelie"),
    ];
    for ([bl, bd, fl, bm], expected) in cases {
        assert_eq!(classifier.classify(bl, bd, fl, bm).unwrap(), expected);
    }
}

#[test]
fn classify_is_deterministic() {
    let classifier = Classifier::train(penguins_excerpt(), &PipelineSpec::default()).unwrap();
    let first = classifier.classify("44.0", "16.0", "200", "4200").unwrap().to_string();

    for _ in 0..10 {
        assert_eq!(classifier.classify("44.0", "16.0", "200", "4200").unwrap(), first);
    }
}

#[test]
fn training_twice_gives_the_same_predictions() {
    let a = Classifier::train(penguins_excerpt(), &PipelineSpec::default()).unwrap();
    let b = Classifier::train(penguins_excerpt(), &PipelineSpec::default()).unwrap();

    let points = [
        Measurements {
            bill_length_mm: 39.1,
            bill_depth_mm: 18.7,
            flipper_length_mm: 181.0,
            body_mass_g: 3750.0,
        },
        Measurements {
            bill_length_mm: 48.0,
            bill_depth_mm: 16.0,
            flipper_length_mm: 220.0,
            body_mass_g: 5400.0,
        },
    ];
    for point in points {
        assert_eq!(a.predict(point).unwrap(), b.predict(point).unwrap());
    }
    assert_eq!(
        a.pipeline().estimator().n_support(),
        b.pipeline().estimator().n_support()
    );
}

#[test]
fn non_numeric_input_is_an_error() {
    let file = separated_csv();
    let classifier = Classifier::train(file.path(), &PipelineSpec::default()).unwrap();

    let err = classifier.classify("abc", "18.7", "181", "3750").unwrap_err();

    assert!(matches!(
        err,
        MlErr::InvalidMeasurement {
            field: "bill_length_mm",
            ..
        }
    ));
}

#[test]
fn infinite_input_is_an_error() {
    let file = separated_csv();
    let classifier = Classifier::train(file.path(), &PipelineSpec::default()).unwrap();

    for value in ["inf", "-infinity", "1e400"] {
        let err = classifier.classify(value, "20.0", "170", "3000").unwrap_err();
        assert!(matches!(err, MlErr::NonFinite { .. }), "{value}: {err}");
    }

    // NaN is a missing value, encoded as an unseen category.
    let variety = classifier.classify("nan", "20.0", "170", "3000").unwrap();
    assert_eq!(variety, "Adelie");
}

#[test]
fn missing_dataset_is_fatal() {
    let err = Classifier::train("does/not/exist.csv", &PipelineSpec::default()).unwrap_err();

    assert!(matches!(err, MlErr::Csv(_)));
}

#[test]
fn a_single_species_cannot_be_fitted() {
    let file = write_csv(&[
        "Adelie,Torgersen,39.1,18.7,181,3750,male,2007",
        "Adelie,Torgersen,39.5,17.4,186,3800,female,2007",
    ]);

    let err = Classifier::train(file.path(), &PipelineSpec::default()).unwrap_err();

    assert!(matches!(err, MlErr::TooFewClasses { got: 1 }));
}
