use anyhow::Result;

mod frames;
use frames::hostile::test_hostile_streams;
use frames::roundtrip::{test_random_tables, test_scenarios};

#[test]
fn integration_test_scenarios() -> Result<()> {
    test_scenarios()
}

#[test]
fn integration_test_random_tables() -> Result<()> {
    test_random_tables()
}

#[test]
fn integration_test_hostile_streams() -> Result<()> {
    test_hostile_streams()
}
