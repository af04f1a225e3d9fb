use approx::assert_relative_eq;
use powscale_rs::core::{Knots, PowerScale, Rgb, ScaleValue};
use powscale_rs::ScaleError;

#[test]
fn factories_set_expected_exponent() {
    assert_eq!(PowerScale::sqrt().exponent(), 0.5);

    let mut scale = PowerScale::new();
    assert_eq!(scale.exponent(), 1.0);
    scale.set_exponent(5.0).expect("set exponent");
    assert_eq!(scale.exponent(), 5.0);
}

#[test]
fn default_domain_and_range_are_unit_interval() {
    let scale = PowerScale::new();
    assert_eq!(scale.domain(), &Knots::Number(vec![0.0, 1.0]));
    assert_eq!(scale.range(), &Knots::Number(vec![0.0, 1.0]));
    assert!(!scale.clamp());
    assert!(!scale.is_round());
}

#[test]
fn domain_setter_replaces_knots_and_keeps_text_verbatim() {
    let mut scale = PowerScale::new();
    scale.set_domain([10, 100]).expect("numeric domain");
    assert_eq!(scale.domain(), &Knots::Number(vec![10.0, 100.0]));

    scale.set_domain(["5", "6"]).expect("text domain");
    assert_eq!(scale.domain(), &Knots::Text(vec!["5".into(), "6".into()]));
    assert_eq!(scale.domain_extent(), (5.0, 6.0));
}

#[test]
fn knot_count_changes_go_through_set_knots() {
    let mut scale = PowerScale::new();
    let err = scale.set_domain([-1, 0, 1]).expect_err("count mismatch");
    assert_eq!(err, ScaleError::KnotCountMismatch { domain: 3, range: 2 });
    assert_eq!(scale.domain(), &Knots::Number(vec![0.0, 1.0]));

    scale
        .set_knots([-1, 0, 1], ["red", "white", "blue"])
        .expect("three knots");
    assert_eq!(scale.domain().len(), 3);
    assert_eq!(scale.domain().get(0), Some(ScaleValue::Number(-1.0)));
    assert_eq!(scale.domain().get(2), Some(ScaleValue::Number(1.0)));
    assert_eq!(scale.range().get(1), Some(ScaleValue::Text("white".into())));

    scale
        .set_range([0, 100, 200])
        .expect("numeric range with matching count");
    assert_eq!(scale.range(), &Knots::Number(vec![0.0, 100.0, 200.0]));

    scale
        .set_range(["blah", "bloh", "bluh"])
        .expect("text range");
    assert_eq!(scale.range().get(0), Some(ScaleValue::Text("blah".into())));
    assert_eq!(scale.range().get(2), Some(ScaleValue::Text("bluh".into())));
}

#[test]
fn range_round_keeps_knots_and_rounds_outputs() {
    let mut scale = PowerScale::new();
    scale.set_range_round([0, 100]).expect("round range");
    assert_eq!(scale.range(), &Knots::Number(vec![0.0, 100.0]));
    assert!(scale.is_round());
    assert_eq!(scale.apply_number(0.333).expect("apply"), 33.0);
    assert_eq!(scale.apply_number(0.506).expect("apply"), 51.0);

    scale.set_range([0, 100]).expect("plain range");
    assert!(!scale.is_round());
    assert_relative_eq!(scale.apply_number(0.333).expect("apply"), 33.3, epsilon = 1e-9);
}

#[test]
fn clamp_flag_round_trips() {
    let mut scale = PowerScale::new();
    assert!(!scale.clamp());
    scale.set_clamp(true);
    assert!(scale.clamp());
}

#[test]
fn linear_apply_extrapolates_outside_domain() {
    let mut scale = PowerScale::new();
    scale
        .set_domain([1, 10])
        .and_then(|scale| scale.set_range([0, 10]))
        .expect("configure scale");

    assert_eq!(scale.apply_number(0.0).expect("apply") as i64, -1);
    assert_eq!(scale.apply_number(10.0).expect("apply"), 10.0);
    assert_relative_eq!(scale.apply_number(100.0).expect("apply"), 110.0, epsilon = 1e-9);
    assert_eq!(scale.apply_number(-10.0).expect("apply") as i64, -12);
}

#[test]
fn linear_invert_extrapolates_outside_range() {
    let mut scale = PowerScale::new();
    scale
        .set_domain([1, 10])
        .and_then(|scale| scale.set_range([0, 10]))
        .expect("configure scale");

    assert_relative_eq!(scale.invert(100.0).expect("invert"), 91.0, epsilon = 1e-9);
    assert_relative_eq!(scale.invert(-100.0).expect("invert"), -89.0, epsilon = 1e-9);
}

#[test]
fn sqrt_scale_maps_through_square_root() {
    let mut scale = PowerScale::sqrt();
    scale
        .set_domain([0, 100])
        .and_then(|scale| scale.set_range([0, 10]))
        .expect("configure scale");

    assert_relative_eq!(scale.apply_number(25.0).expect("apply"), 5.0, epsilon = 1e-12);
    assert_relative_eq!(scale.apply_number(81.0).expect("apply"), 9.0, epsilon = 1e-12);
    assert_relative_eq!(scale.invert(5.0).expect("invert"), 25.0, epsilon = 1e-12);
}

#[test]
fn negative_inputs_use_signed_power() {
    let mut scale = PowerScale::with_exponent(2.0).expect("square scale");
    scale
        .set_domain([-2, 2])
        .and_then(|scale| scale.set_range([-4, 4]))
        .expect("configure scale");

    assert_relative_eq!(scale.apply_number(-1.0).expect("apply"), -1.0, epsilon = 1e-12);
    assert_relative_eq!(scale.apply_number(1.0).expect("apply"), 1.0, epsilon = 1e-12);
    assert_relative_eq!(scale.invert(-1.0).expect("invert"), -1.0, epsilon = 1e-12);
}

#[test]
fn text_domain_knots_are_not_powered() {
    let mut scale = PowerScale::with_exponent(2.0).expect("square scale");
    scale.set_domain(["0", "10"]).expect("text domain");
    scale.set_range([0, 100]).expect("range");
    assert_relative_eq!(scale.apply_number(5.0).expect("apply"), 50.0, epsilon = 1e-12);
}

#[test]
fn clamp_pins_outputs_to_range_extremes() {
    let mut scale = PowerScale::new();
    scale
        .set_domain([1, 10])
        .and_then(|scale| scale.set_range([0.1, 0.7]))
        .expect("configure scale");
    scale.set_clamp(true);

    assert_eq!(scale.apply_number(1_000.0).expect("apply"), 0.7);
    assert_eq!(scale.apply_number(-1_000.0).expect("apply"), 0.1);
    assert_eq!(scale.invert(5.0).expect("invert"), 10.0);
    assert_eq!(scale.invert(-5.0).expect("invert"), 1.0);
}

#[test]
fn polylinear_scale_uses_containing_segment() {
    let mut scale = PowerScale::new();
    scale
        .set_knots([0, 10, 20], [0, 100, 1_000])
        .expect("three knots");

    assert_relative_eq!(scale.apply_number(5.0).expect("apply"), 50.0, epsilon = 1e-9);
    assert_relative_eq!(scale.apply_number(10.0).expect("apply"), 100.0, epsilon = 1e-9);
    assert_relative_eq!(scale.apply_number(15.0).expect("apply"), 550.0, epsilon = 1e-9);
    assert_relative_eq!(scale.apply_number(30.0).expect("apply"), 1_900.0, epsilon = 1e-9);
    assert_relative_eq!(scale.invert(550.0).expect("invert"), 15.0, epsilon = 1e-9);
}

#[test]
fn descending_domain_maps_and_inverts() {
    let mut scale = PowerScale::new();
    scale
        .set_knots([20, 10, 0], [0, 1, 2])
        .expect("descending knots");

    assert_relative_eq!(scale.apply_number(15.0).expect("apply"), 0.5, epsilon = 1e-12);
    assert_relative_eq!(scale.apply_number(5.0).expect("apply"), 1.5, epsilon = 1e-12);
    assert_relative_eq!(scale.invert(1.5).expect("invert"), 5.0, epsilon = 1e-12);
}

#[test]
fn zero_width_domain_maps_to_first_range_knot() {
    let mut scale = PowerScale::new();
    scale
        .set_domain([3, 3])
        .and_then(|scale| scale.set_range([10, 20]))
        .expect("flat domain");
    assert_eq!(scale.apply_number(-50.0).expect("apply"), 10.0);
    assert_eq!(scale.apply_number(50.0).expect("apply"), 10.0);
}

#[test]
fn color_range_interpolates_components() {
    let mut scale = PowerScale::new();
    scale
        .set_knots([-1, 0, 1], ["red", "white", "blue"])
        .expect("color knots");

    assert_eq!(
        scale.apply(-1.0).expect("apply"),
        ScaleValue::Color(Rgb::new(255, 0, 0))
    );
    assert_eq!(
        scale.apply(-0.5).expect("apply"),
        ScaleValue::Color(Rgb::new(255, 128, 128))
    );
    assert_eq!(scale.apply(1.0).expect("apply").to_string(), "#0000ff");
}

#[test]
fn text_range_without_numbers_steps_between_knots() {
    let mut scale = PowerScale::new();
    scale
        .set_knots([0, 1, 2], ["blah", "bloh", "bluh"])
        .expect("text knots");
    assert_eq!(scale.apply(0.0).expect("apply"), ScaleValue::Text("blah".into()));
    assert_eq!(scale.apply(0.5).expect("apply"), ScaleValue::Text("bloh".into()));
    assert_eq!(scale.apply(1.5).expect("apply"), ScaleValue::Text("bluh".into()));
}

#[test]
fn numeric_only_operations_reject_opaque_ranges() {
    let mut scale = PowerScale::new();
    scale.set_range(["red", "blue"]).expect("color range");

    assert_eq!(
        scale.invert(0.5).expect_err("invert needs numbers"),
        ScaleError::NonNumericRange { kind: "text" }
    );
    assert!(scale.apply_number(0.5).is_err());
    assert!(scale.apply(0.5).is_ok());
}

#[test]
fn invert_rejects_non_monotonic_range() {
    let mut scale = PowerScale::new();
    scale
        .set_knots([0, 1, 2], [0, 10, 5])
        .expect("apply works on any numeric range");
    assert!(scale.apply_number(1.5).is_ok());
    assert!(matches!(scale.invert(7.0), Err(ScaleError::InvalidRange(_))));
}

#[test]
fn rejected_setters_leave_state_intact() {
    let mut scale = PowerScale::new();
    scale.set_domain([2, 4]).expect("domain");

    assert_eq!(scale.set_exponent(0.0).expect_err("zero"), ScaleError::InvalidExponent(0.0));
    assert!(scale.set_exponent(-1.0).is_err());
    assert!(scale.set_exponent(f64::NAN).is_err());
    assert!(scale.set_domain([1.0, 2.0, 1.5]).is_err());
    assert!(scale.set_domain([5]).is_err());
    assert!(scale.set_domain(["a", "b"]).is_err());
    assert!(scale
        .set_domain([Rgb::new(0, 0, 0), Rgb::new(1, 1, 1)])
        .is_err());
    assert!(scale
        .set_range(vec![ScaleValue::from(1.0), ScaleValue::from("x")])
        .is_err());
    assert!(scale.set_knots([0, 1, 2], [0, 1]).is_err());

    assert_eq!(scale.exponent(), 1.0);
    assert_eq!(scale.domain(), &Knots::Number(vec![2.0, 4.0]));
    assert_eq!(scale.range(), &Knots::Number(vec![0.0, 1.0]));
}

#[test]
fn non_finite_inputs_are_rejected() {
    let scale = PowerScale::new();
    assert!(scale.apply(f64::NAN).is_err());
    assert!(scale.invert(f64::INFINITY).is_err());
}

#[test]
fn copy_is_independent() {
    let mut scale = PowerScale::new();
    scale.set_domain([1, 2]).expect("domain");

    let mut copy = scale.copy();
    copy.set_domain([2, 3]).expect("copy domain");
    copy.set_exponent(3.0).expect("copy exponent");
    copy.set_clamp(true);

    assert_eq!(scale.domain(), &Knots::Number(vec![1.0, 2.0]));
    assert_eq!(scale.exponent(), 1.0);
    assert!(!scale.clamp());
    assert_eq!(copy.domain(), &Knots::Number(vec![2.0, 3.0]));
}

#[test]
fn batch_apply_matches_single_apply() {
    let mut scale = PowerScale::sqrt();
    scale
        .set_domain([0, 16])
        .and_then(|scale| scale.set_range([0, 400]))
        .expect("configure scale");

    let inputs = [0.0, 1.0, 4.0, 9.0, 16.0];
    let mapped = scale.apply_batch(&inputs).expect("batch");
    assert_eq!(mapped.len(), inputs.len());
    for (value, input) in mapped.iter().zip(inputs) {
        assert_eq!(*value, scale.apply_number(input).expect("apply"));
    }
    assert!(scale.apply_batch(&[1.0, f64::NAN]).is_err());
}

#[test]
fn css_color_forms_interpolate_as_colors() {
    let mut scale = PowerScale::new();

    scale
        .set_range(["lightsteelblue", "black"])
        .expect("keyword range");
    assert_eq!(
        scale.apply(0.5).expect("apply"),
        ScaleValue::Color(Rgb::new(88, 98, 111))
    );

    scale
        .set_range(["rgba(0, 0, 0, 1)", "white"])
        .expect("rgba range");
    assert_eq!(
        scale.apply(0.5).expect("apply"),
        ScaleValue::Color(Rgb::new(128, 128, 128))
    );

    scale
        .set_range(["hsl(0, 100%, 50%)", "blue"])
        .expect("hsl range");
    assert_eq!(
        scale.apply(0.5).expect("apply"),
        ScaleValue::Color(Rgb::new(128, 0, 128))
    );
}

#[test]
fn numeric_text_range_is_not_read_as_hex_color() {
    let mut scale = PowerScale::new();
    scale.set_range(["100", "200"]).expect("text range");
    assert_eq!(scale.apply(0.5).expect("apply"), ScaleValue::Text("150".into()));
}

#[test]
fn knots_that_overflow_under_exponent_are_rejected() {
    let mut scale = PowerScale::with_exponent(5.0).expect("exponent");
    assert!(matches!(
        scale.set_domain([0.0, 1e100]),
        Err(ScaleError::InvalidDomain(_))
    ));
    assert!(matches!(
        scale.set_knots([0.0, 1e100], [0, 1]),
        Err(ScaleError::InvalidDomain(_))
    ));
    assert_eq!(scale.domain(), &Knots::Number(vec![0.0, 1.0]));

    let mut linear = PowerScale::new();
    linear.set_domain([0.0, 1e100]).expect("linear domain");
    assert!(matches!(
        linear.set_exponent(5.0),
        Err(ScaleError::InvalidDomain(_))
    ));
    assert_eq!(linear.exponent(), 1.0);
    assert_relative_eq!(linear.apply_number(5e99).expect("apply"), 0.5, epsilon = 1e-12);
}

#[test]
fn inputs_that_overflow_under_exponent_are_rejected() {
    let square = PowerScale::with_exponent(2.0).expect("exponent");
    assert!(matches!(square.apply(1e300), Err(ScaleError::InvalidData(_))));

    let mut sqrt = PowerScale::sqrt();
    sqrt.set_domain([0.0, 1e300]).expect("domain");
    assert!(matches!(sqrt.invert(1e10), Err(ScaleError::InvalidData(_))));
}

#[test]
fn value_on_interior_knot_uses_segment_above_it() {
    let mut scale = PowerScale::new();
    scale
        .set_knots([0, 10, 20], ["0px", "10px", "20em"])
        .expect("text knots");
    assert_eq!(scale.apply(10.0).expect("apply"), ScaleValue::Text("10em".into()));
    assert_eq!(scale.apply(5.0).expect("apply"), ScaleValue::Text("5px".into()));

    scale
        .set_range([0, 100, 1_000])
        .expect("numeric range");
    assert_eq!(scale.apply_number(10.0).expect("apply"), 100.0);
    assert_eq!(scale.invert(100.0).expect("invert"), 10.0);

    scale
        .set_knots([20, 10, 0], [1_000, 100, 0])
        .expect("descending knots");
    assert_eq!(scale.apply_number(10.0).expect("apply"), 100.0);
    assert_eq!(scale.invert(100.0).expect("invert"), 10.0);
}
