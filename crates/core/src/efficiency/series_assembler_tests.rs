use super::*;
use crate::errors::{EfficiencyError, Error};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
}

fn valuation(day: u32, portfolio: Decimal) -> ValuationTotal {
    ValuationTotal {
        date: date(day),
        portfolio,
    }
}

fn flow(day: u32, flow: Decimal, commission: Decimal) -> FlowTotal {
    FlowTotal {
        date: date(day),
        flow,
        commission,
    }
}

#[test]
fn test_series_covers_union_of_dates() {
    let valuations = vec![valuation(2, dec!(100)), valuation(4, dec!(120))];
    let flows = vec![flow(1, dec!(100), dec!(1)), flow(4, dec!(-10), dec!(0.5))];

    let series = assemble_series(&valuations, &flows).unwrap();

    let dates: Vec<NaiveDate> = series.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(1), date(2), date(4)]);

    assert_eq!(series[0].portfolio, None);
    assert_eq!(series[0].flow, dec!(100));
    assert_eq!(series[0].commission, dec!(1));

    assert_eq!(series[1].portfolio, Some(dec!(100)));
    assert_eq!(series[1].flow, Decimal::ZERO);
    assert_eq!(series[1].commission, Decimal::ZERO);

    assert_eq!(series[2].portfolio, Some(dec!(120)));
    assert_eq!(series[2].flow, dec!(-10));
}

#[test]
fn test_growth_is_one_before_derivation() {
    let series = assemble_series(&[valuation(1, dec!(5)), valuation(2, dec!(6))], &[]).unwrap();
    assert!(series.iter().all(|r| r.growth == Decimal::ONE));
}

#[test]
fn test_empty_inputs_give_empty_series() {
    assert!(assemble_series(&[], &[]).unwrap().is_empty());
}

#[test]
fn test_duplicate_valuation_date_is_reported() {
    let valuations = vec![valuation(3, dec!(100)), valuation(3, dec!(200))];
    let result = assemble_series(&valuations, &[]);
    assert!(matches!(
        result,
        Err(Error::Efficiency(EfficiencyError::DuplicateDate(d))) if d == date(3)
    ));
}

#[test]
fn test_duplicate_flow_date_is_reported() {
    let flows = vec![flow(5, dec!(1), dec!(0)), flow(5, dec!(2), dec!(0))];
    let result = assemble_series(&[valuation(5, dec!(10))], &flows);
    assert!(matches!(
        result,
        Err(Error::Efficiency(EfficiencyError::DuplicateDate(d))) if d == date(5)
    ));
}

#[test]
fn test_validate_order_rejects_backwards_dates() {
    let records = vec![
        DailyRecord::new(date(2), Some(dec!(1)), dec!(0), dec!(0)),
        DailyRecord::new(date(1), Some(dec!(1)), dec!(0), dec!(0)),
    ];
    assert!(matches!(
        validate_order(&records),
        Err(Error::Efficiency(EfficiencyError::UnorderedDates { .. }))
    ));
}

#[test]
fn test_validate_order_rejects_repeated_dates() {
    let records = vec![
        DailyRecord::new(date(1), Some(dec!(1)), dec!(0), dec!(0)),
        DailyRecord::new(date(1), Some(dec!(2)), dec!(0), dec!(0)),
    ];
    assert!(matches!(
        validate_order(&records),
        Err(Error::Efficiency(EfficiencyError::DuplicateDate(_)))
    ));
}

#[test]
fn test_grouped_records_feed_the_assembler() {
    let values = vec![
        AssetValue {
            date: date(1),
            isin: "RU000A0JX0J2".to_string(),
            full_value: dec!(600),
        },
        AssetValue {
            date: date(1),
            isin: "RU000A0ZZYW2".to_string(),
            full_value: dec!(400),
        },
    ];
    let flows = vec![
        AssetFlow {
            date: date(1),
            isin: "RU000A0JX0J2".to_string(),
            full_value: dec!(1000),
            direction: FlowDirection::Inflow,
            commission: dec!(2),
            broker_commission: dec!(1),
        },
        AssetFlow {
            date: date(1),
            isin: "RU000A0ZZYW2".to_string(),
            full_value: dec!(50),
            direction: FlowDirection::Outflow,
            commission: dec!(0),
            broker_commission: dec!(0.5),
        },
    ];

    let series = assemble_series(&group_valuations(&values), &group_flows(&flows)).unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].portfolio, Some(dec!(1000)));
    assert_eq!(series[0].flow, dec!(950));
    assert_eq!(series[0].commission, dec!(3.5));
}
